//! Byte-level atomic primitive: get/set/CAS on one byte, synthesized from
//! word-level CAS on the word that contains it.
//!
//! Every write reads the full containing word fresh, splices in the new
//! byte and swaps the whole word. Concurrent writers to sibling bytes go
//! through the same protocol, so a lost race only costs a retry, never a
//! torn or lost sibling update.

use core::ops::ControlFlow;
use core::sync::atomic::AtomicU32;

use crate::endian::Endianness;
use crate::metrics;
use crate::retry::retry_cas;
use crate::slot::WordSlot;
use crate::word::{AtomicWord, WORD_BYTES};

/// "This byte inside these words." Borrowed, never owns the storage.
pub struct MemoryTarget<'a, W: AtomicWord = AtomicU32> {
    words: &'a [W],
    offset: usize,
}

// Manual impls: a derive would require `W: Clone`.
impl<W: AtomicWord> Clone for MemoryTarget<'_, W> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: AtomicWord> Copy for MemoryTarget<'_, W> {}

impl<W: AtomicWord> core::fmt::Debug for MemoryTarget<'_, W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryTarget")
            .field("offset", &self.offset)
            .field("words", &self.words.len())
            .finish()
    }
}

impl<'a, W: AtomicWord> MemoryTarget<'a, W> {
    /// Target byte `offset` of `words`, or `None` if it lies past the end.
    #[inline]
    pub fn new(words: &'a [W], offset: usize) -> Option<Self> {
        if offset / WORD_BYTES < words.len() {
            Some(Self { words, offset })
        } else {
            None
        }
    }

    /// Caller has already checked `offset` against the word storage.
    #[inline(always)]
    pub(crate) fn new_unchecked(words: &'a [W], offset: usize) -> Self {
        debug_assert!(offset / WORD_BYTES < words.len());
        Self { words, offset }
    }

    /// Byte offset from the start of the word storage.
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Containing word and where the byte sits in it. Recomputed every call.
    #[inline(always)]
    pub fn slot(&self) -> (&'a W, WordSlot) {
        let slot = WordSlot::locate(self.offset, Endianness::native());
        (&self.words[slot.word_index()], slot)
    }

    /// Acquire-load the containing word and extract the byte.
    #[inline]
    pub fn get_volatile(&self) -> i8 {
        let (word, slot) = self.slot();
        slot.extract(word.load_word())
    }

    /// Unconditional store. A CAS loop over the containing word: a plain
    /// store of the whole word would clobber concurrent sibling writes.
    #[inline]
    pub fn set_volatile(&self, value: i8) {
        let (word, slot) = self.slot();
        retry_cas(
            || word.load_word(),
            |current| ControlFlow::Continue((slot.splice(current, value), ())),
            |current, next| swap_word(word, current, next),
        )
    }

    /// Install `update` iff the byte currently equals `expected`.
    ///
    /// Returns `false` only when the byte itself mismatched. A word-level
    /// CAS lost to a sibling write (or a spurious failure) is retried
    /// internally against a fresh read of the word.
    #[inline]
    pub fn compare_and_swap(&self, expected: i8, update: i8) -> bool {
        let swapped = self.try_swap(expected, update);
        if !swapped {
            metrics::record_compare_failure();
        }
        swapped
    }

    /// `compare_and_swap` without touching the compare-failure counter.
    /// Retry loops use this: a mismatch there is contention, not a caller's
    /// failed compare.
    #[inline]
    pub(crate) fn try_swap(&self, expected: i8, update: i8) -> bool {
        let (word, slot) = self.slot();
        retry_cas(
            || word.load_word(),
            |current| {
                if slot.extract(current) != expected {
                    ControlFlow::Break(false)
                } else {
                    ControlFlow::Continue((slot.splice(current, update), true))
                }
            },
            |current, next| swap_word(word, current, next),
        )
    }

    /// Add `delta` (wrapping), return the previous byte.
    #[inline]
    pub fn get_and_add(&self, delta: i8) -> i8 {
        self.fetch_update_word(|old| old.wrapping_add(delta))
    }

    /// Store `value`, return the previous byte.
    #[inline]
    pub fn get_and_set(&self, value: i8) -> i8 {
        self.fetch_update_word(|_| value)
    }

    /// Fast path shared by `get_and_add`/`get_and_set`: one loop directly
    /// on the word instead of a byte CAS nested in a byte retry loop.
    #[inline(always)]
    fn fetch_update_word(&self, f: impl Fn(i8) -> i8) -> i8 {
        let (word, slot) = self.slot();
        retry_cas(
            || word.load_word(),
            |current| {
                let old = slot.extract(current);
                ControlFlow::Continue((slot.splice(current, f(old)), old))
            },
            |current, next| swap_word(word, current, next),
        )
    }
}

/// Word CAS that counts a lost attempt. Every word-level retry in the crate
/// comes through here exactly once.
#[inline(always)]
fn swap_word<W: AtomicWord>(word: &W, current: u32, next: u32) -> bool {
    let swapped = word.compare_exchange_word(current, next);
    if !swapped {
        metrics::record_cas_failure();
    }
    swapped
}

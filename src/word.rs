//! Word-level atomic primitive. The single building block everything else
//! composes from.

use core::sync::atomic::{AtomicU32, Ordering};

/// Bytes per atomic word.
pub const WORD_BYTES: usize = 4;

/// An aligned 32-bit word supporting acquire loads and compare-and-swap.
///
/// `compare_exchange_word` may fail spuriously. Every caller in this crate
/// rereads and retries, so a weak CAS is enough.
pub trait AtomicWord: Sync {
    fn load_word(&self) -> u32;

    fn compare_exchange_word(&self, current: u32, new: u32) -> bool;
}

impl AtomicWord for AtomicU32 {
    #[inline(always)]
    fn load_word(&self) -> u32 {
        self.load(Ordering::Acquire)
    }

    #[inline(always)]
    fn compare_exchange_word(&self, current: u32, new: u32) -> bool {
        self.compare_exchange_weak(current, new, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

const _: () = {
    assert!(core::mem::size_of::<AtomicU32>() == WORD_BYTES);
    assert!(core::mem::align_of::<AtomicU32>() == WORD_BYTES);
};

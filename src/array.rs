//! Bounds-checked byte array view over caller-owned word storage.
//!
//! Every operation is `target(index)?` followed by the matching byte-level
//! or accumulate operation. A rejected index never touches memory.

use core::sync::atomic::AtomicU32;

use crate::error::AccessError;
use crate::layout::{ArrayLayout, BYTE_LAYOUT};
use crate::target::MemoryTarget;
use crate::word::{AtomicWord, WORD_BYTES};

/// `[i8]` view laid over `&[W]`. Shared freely between threads; all access
/// goes through atomic word operations.
pub struct AtomicBytes<'a, W: AtomicWord = AtomicU32> {
    words: &'a [W],
    layout: ArrayLayout,
    len: usize,
}

impl<W: AtomicWord> Clone for AtomicBytes<'_, W> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<W: AtomicWord> Copy for AtomicBytes<'_, W> {}

impl<W: AtomicWord> core::fmt::Debug for AtomicBytes<'_, W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AtomicBytes")
            .field("base_offset", &self.layout.base_offset)
            .field("len", &self.len)
            .field("words", &self.words.len())
            .finish()
    }
}

impl<'a> AtomicBytes<'a, AtomicU32> {
    /// View raw memory as `words` atomic words, all of them addressable.
    ///
    /// # Safety
    ///
    /// - `ptr` is non-null and aligned to 4 bytes.
    /// - `ptr` is valid for reads and writes of `words * 4` bytes for `'a`.
    /// - For `'a`, every access to that memory from anywhere (other threads,
    ///   other processes mapping it) is atomic. Plain reads or writes racing
    ///   with this view are undefined behavior.
    pub unsafe fn from_ptr(ptr: *mut u32, words: usize) -> Self {
        // SAFETY: AtomicU32 has the same size and alignment as u32, and the
        // caller guarantees validity and exclusively-atomic access for 'a.
        let words = unsafe { core::slice::from_raw_parts(ptr as *const AtomicU32, words) };
        Self::new(words)
    }
}

impl<'a, W: AtomicWord> AtomicBytes<'a, W> {
    /// View every byte of `words`, up to `usize::MAX` bytes.
    #[inline]
    pub fn new(words: &'a [W]) -> Self {
        Self {
            words,
            layout: BYTE_LAYOUT,
            len: byte_capacity(words),
        }
    }

    /// View the first `len` bytes of `words`.
    #[inline]
    pub fn with_len(words: &'a [W], len: usize) -> Result<Self, AccessError> {
        let capacity = byte_capacity(words);
        if len > capacity {
            return Err(AccessError::CapacityExceeded { len, capacity });
        }
        Ok(Self {
            words,
            layout: BYTE_LAYOUT,
            len,
        })
    }

    /// Sub-view of `start..end`. Index 0 of the result is `start` here.
    pub fn slice(&self, start: usize, end: usize) -> Result<Self, AccessError> {
        if start > end || end > self.len {
            tracing::trace!(start, end, len = self.len, "rejected slice range");
            return Err(AccessError::RangeOutOfBounds {
                start,
                end,
                len: self.len,
            });
        }
        Ok(Self {
            words: self.words,
            layout: self.layout.rebased(start),
            len: end - start,
        })
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of element 0 within the word storage.
    #[inline(always)]
    pub fn base_offset(&self) -> usize {
        self.layout.base_offset
    }

    /// Validate `index` against `[0, len)` and map it to a memory target.
    #[inline]
    pub fn target(&self, index: usize) -> Result<MemoryTarget<'a, W>, AccessError> {
        if index >= self.len {
            tracing::trace!(index, len = self.len, "rejected out-of-range index");
            return Err(AccessError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(MemoryTarget::new_unchecked(self.words, self.layout.offset(index)))
    }

    /// Plain read. Same as [`get_volatile`](Self::get_volatile): a narrower
    /// non-atomic access can't be expressed over shared atomic words.
    #[inline]
    pub fn get(&self, index: usize) -> Result<i8, AccessError> {
        self.get_volatile(index)
    }

    /// Plain write. Same CAS-loop write as [`set_volatile`](Self::set_volatile),
    /// since a raw store to the containing word would corrupt sibling bytes.
    #[inline]
    pub fn set(&self, index: usize, value: i8) -> Result<(), AccessError> {
        self.set_volatile(index, value)
    }

    #[inline]
    pub fn get_volatile(&self, index: usize) -> Result<i8, AccessError> {
        Ok(self.target(index)?.get_volatile())
    }

    #[inline]
    pub fn set_volatile(&self, index: usize, value: i8) -> Result<(), AccessError> {
        self.target(index)?.set_volatile(value);
        Ok(())
    }

    #[inline]
    pub fn compare_and_swap(&self, index: usize, expected: i8, update: i8) -> Result<bool, AccessError> {
        Ok(self.target(index)?.compare_and_swap(expected, update))
    }

    #[inline]
    pub fn get_and_add(&self, index: usize, delta: i8) -> Result<i8, AccessError> {
        Ok(self.target(index)?.get_and_add(delta))
    }

    #[inline]
    pub fn get_and_set(&self, index: usize, value: i8) -> Result<i8, AccessError> {
        Ok(self.target(index)?.get_and_set(value))
    }

    #[inline]
    pub fn get_and_update<F>(&self, index: usize, transform: F) -> Result<i8, AccessError>
    where
        F: Fn(i8) -> i8,
    {
        Ok(self.target(index)?.get_and_update(transform))
    }

    #[inline]
    pub fn update_and_get<F>(&self, index: usize, transform: F) -> Result<i8, AccessError>
    where
        F: Fn(i8) -> i8,
    {
        Ok(self.target(index)?.update_and_get(transform))
    }

    #[inline]
    pub fn get_and_accumulate<F>(&self, index: usize, update: i8, accumulator: F) -> Result<i8, AccessError>
    where
        F: Fn(i8, i8) -> i8,
    {
        Ok(self.target(index)?.get_and_accumulate(update, accumulator))
    }

    #[inline]
    pub fn accumulate_and_get<F>(&self, index: usize, update: i8, accumulator: F) -> Result<i8, AccessError>
    where
        F: Fn(i8, i8) -> i8,
    {
        Ok(self.target(index)?.accumulate_and_get(update, accumulator))
    }

    #[inline]
    pub fn get_and_bitwise_or(&self, index: usize, bits: i8) -> Result<i8, AccessError> {
        Ok(self.target(index)?.get_and_bitwise_or(bits))
    }

    /// Volatile read of each byte in order. Bytes are read one at a time,
    /// so this is not a consistent snapshot under concurrent writes.
    pub fn iter(&self) -> impl Iterator<Item = i8> + 'a {
        let words = self.words;
        let layout = self.layout;
        (0..self.len).map(move |i| MemoryTarget::new_unchecked(words, layout.offset(i)).get_volatile())
    }

    /// Copy up to `out.len()` bytes into `out`. Returns the count copied.
    pub fn copy_to(&self, out: &mut [u8]) -> usize {
        let mut count = 0;
        for (dst, byte) in out.iter_mut().zip(self.iter()) {
            *dst = byte as u8;
            count += 1;
        }
        count
    }
}

/// Addressable bytes in `words`. Zero-sized words allow slices long enough
/// for `len * 4` to overflow; every byte offset still fits in `usize`, so
/// the capacity clamps there.
#[inline(always)]
fn byte_capacity<W>(words: &[W]) -> usize {
    words.len().checked_mul(WORD_BYTES).unwrap_or(usize::MAX)
}

#[cfg(feature = "std")]
pub use owned::AtomicByteBuf;

#[cfg(feature = "std")]
mod owned {
    use core::sync::atomic::{AtomicU32, Ordering};

    use zerocopy::IntoBytes;

    use super::AtomicBytes;
    use crate::word::WORD_BYTES;

    /// Heap-backed, word-aligned byte storage. The only type in the crate
    /// that owns memory.
    pub struct AtomicByteBuf {
        words: Box<[AtomicU32]>,
        len: usize,
    }

    impl AtomicByteBuf {
        /// `len` zero bytes.
        pub fn new(len: usize) -> Self {
            let words = (0..len.div_ceil(WORD_BYTES)).map(|_| AtomicU32::new(0)).collect();
            Self { words, len }
        }

        /// Copy of `bytes`, laid out so index `i` addresses `bytes[i]`.
        pub fn from_bytes(bytes: &[u8]) -> Self {
            let words = bytes
                .chunks(WORD_BYTES)
                .map(|chunk| {
                    let mut word = [0u8; WORD_BYTES];
                    word[..chunk.len()].copy_from_slice(chunk);
                    AtomicU32::new(u32::from_ne_bytes(word))
                })
                .collect();
            Self {
                words,
                len: bytes.len(),
            }
        }

        #[inline]
        pub fn view(&self) -> AtomicBytes<'_> {
            AtomicBytes {
                words: &self.words,
                layout: crate::layout::BYTE_LAYOUT,
                len: self.len,
            }
        }

        #[inline]
        pub fn len(&self) -> usize {
            self.len
        }

        #[inline]
        pub fn is_empty(&self) -> bool {
            self.len == 0
        }

        /// Copy out the current contents. Each word is loaded once, so
        /// bytes sharing a word are mutually consistent.
        pub fn to_vec(&self) -> Vec<u8> {
            let words: Vec<u32> = self.words.iter().map(|w| w.load(Ordering::Acquire)).collect();
            words.as_bytes()[..self.len].to_vec()
        }
    }

    impl Clone for AtomicByteBuf {
        fn clone(&self) -> Self {
            Self::from_bytes(&self.to_vec())
        }
    }

    impl core::fmt::Debug for AtomicByteBuf {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("AtomicByteBuf")
                .field("len", &self.len)
                .field("bytes", &self.to_vec())
                .finish()
        }
    }

    impl From<&[u8]> for AtomicByteBuf {
        fn from(bytes: &[u8]) -> Self {
            Self::from_bytes(bytes)
        }
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<AtomicU32> {
        (0..n).map(|_| AtomicU32::new(0)).collect()
    }

    #[test]
    fn test_new_covers_all_words() {
        let storage = words(3);
        let bytes = AtomicBytes::new(&storage);
        assert_eq!(bytes.len(), 12);
        assert!(!bytes.is_empty());
    }

    #[test]
    fn test_with_len_capacity() {
        let storage = words(2);
        assert_eq!(AtomicBytes::with_len(&storage, 5).unwrap().len(), 5);
        assert_eq!(
            AtomicBytes::with_len(&storage, 9).unwrap_err(),
            AccessError::CapacityExceeded { len: 9, capacity: 8 }
        );
    }

    #[test]
    fn test_target_bounds() {
        let storage = words(2);
        let bytes = AtomicBytes::with_len(&storage, 5).unwrap();
        assert_eq!(bytes.target(4).unwrap().offset(), 4);
        assert_eq!(
            bytes.target(5).unwrap_err(),
            AccessError::IndexOutOfRange { index: 5, len: 5 }
        );
        assert_eq!(
            bytes.get(usize::MAX).unwrap_err(),
            AccessError::IndexOutOfRange { index: usize::MAX, len: 5 }
        );
    }

    #[test]
    fn test_set_get_every_index() {
        let storage = words(2);
        let bytes = AtomicBytes::new(&storage);
        for i in 0..8 {
            bytes.set(i, i as i8 * 3 - 10).unwrap();
        }
        let read: Vec<i8> = bytes.iter().collect();
        assert_eq!(read, vec![-10, -7, -4, -1, 2, 5, 8, 11]);
    }

    #[test]
    fn test_slice_rebases_indices() {
        let storage = words(3);
        let bytes = AtomicBytes::new(&storage);
        let middle = bytes.slice(3, 9).unwrap();
        assert_eq!(middle.len(), 6);
        assert_eq!(middle.base_offset(), 3);

        middle.set(0, 7).unwrap();
        middle.set(5, 9).unwrap();
        assert_eq!(bytes.get(3).unwrap(), 7);
        assert_eq!(bytes.get(8).unwrap(), 9);
        assert!(middle.get(6).is_err());

        let inner = middle.slice(1, 3).unwrap();
        assert_eq!(inner.base_offset(), 4);
        assert!(bytes.slice(5, 4).is_err());
        assert!(bytes.slice(0, 13).is_err());
        assert!(bytes.slice(12, 12).unwrap().is_empty());
    }

    #[test]
    fn test_ops_dispatch() {
        let storage = words(1);
        let bytes = AtomicBytes::new(&storage);
        assert_eq!(bytes.get_and_set(0, 4).unwrap(), 0);
        assert_eq!(bytes.get_and_add(0, 4).unwrap(), 4);
        assert!(bytes.compare_and_swap(0, 8, 1).unwrap());
        assert!(!bytes.compare_and_swap(0, 8, 2).unwrap());
        assert_eq!(bytes.get_and_update(0, |v| v + 1).unwrap(), 1);
        assert_eq!(bytes.update_and_get(0, |v| v + 1).unwrap(), 3);
        assert_eq!(bytes.get_and_accumulate(0, 2, |a, b| a * b).unwrap(), 3);
        assert_eq!(bytes.accumulate_and_get(0, 1, |a, b| a - b).unwrap(), 5);
        assert_eq!(bytes.get_and_bitwise_or(0, 0b1000).unwrap(), 5);
        assert_eq!(bytes.get_volatile(0).unwrap(), 0b1101);
    }

    #[test]
    fn test_copy_to() {
        let storage = words(2);
        let bytes = AtomicBytes::with_len(&storage, 6).unwrap();
        for i in 0..6 {
            bytes.set(i, -(i as i8)).unwrap();
        }
        let mut out = [0u8; 4];
        assert_eq!(bytes.copy_to(&mut out), 4);
        assert_eq!(out, [0, 0xFF, 0xFE, 0xFD]);
        let mut big = [0u8; 10];
        assert_eq!(bytes.copy_to(&mut big), 6);
    }

    #[test]
    fn test_from_ptr() {
        let mut raw = [0u32; 2];
        let bytes = unsafe { AtomicBytes::from_ptr(raw.as_mut_ptr(), raw.len()) };
        bytes.set(5, 42).unwrap();
        assert_eq!(bytes.get(5).unwrap(), 42);
        assert_eq!(raw[1].to_ne_bytes()[1], 42);
    }

    /// Zero-sized word: every load reads zero, every CAS succeeds.
    struct NullWord;

    impl AtomicWord for NullWord {
        fn load_word(&self) -> u32 {
            0
        }

        fn compare_exchange_word(&self, _current: u32, _new: u32) -> bool {
            true
        }
    }

    #[test]
    fn test_capacity_clamps_instead_of_overflowing() {
        let count = usize::MAX / 2;
        // SAFETY: zero-sized elements need no backing memory; any non-null
        // aligned pointer is valid for any length.
        let storage: &[NullWord] =
            unsafe { core::slice::from_raw_parts(core::ptr::NonNull::dangling().as_ptr(), count) };

        let bytes = AtomicBytes::new(storage);
        assert_eq!(bytes.len(), usize::MAX);
        assert_eq!(bytes.get(usize::MAX - 1).unwrap(), 0);
        assert_eq!(
            bytes.get(usize::MAX).unwrap_err(),
            AccessError::IndexOutOfRange { index: usize::MAX, len: usize::MAX }
        );

        assert_eq!(AtomicBytes::with_len(storage, usize::MAX).unwrap().len(), usize::MAX);
        let tail = bytes.slice(usize::MAX - 4, usize::MAX).unwrap();
        assert_eq!(tail.len(), 4);
        assert_eq!(tail.get(3).unwrap(), 0);
    }

    #[test]
    fn test_owned_buffer_roundtrip() {
        let buf = AtomicByteBuf::from_bytes(&[1, 2, 3, 4, 5]);
        assert_eq!(buf.len(), 5);
        buf.view().set(4, -1).unwrap();
        assert_eq!(buf.to_vec(), vec![1, 2, 3, 4, 0xFF]);
        assert_eq!(buf.clone().to_vec(), buf.to_vec());
        assert!(buf.view().get(5).is_err());
    }

    #[test]
    fn test_owned_buffer_zeroed() {
        let buf = AtomicByteBuf::new(7);
        assert_eq!(buf.to_vec(), vec![0; 7]);
        assert!(AtomicByteBuf::new(0).is_empty());
    }
}

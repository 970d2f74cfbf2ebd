//! Sub-word offset translator: byte offset -> (containing word, shift, mask).

use crate::endian::Endianness;
use crate::word::WORD_BYTES;

/// Where a single byte lives inside its containing word.
///
/// Derived per call from a byte offset and the process byte order. Never
/// cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSlot {
    /// Byte offset of the containing word. Multiple of 4, `<= byte_offset`.
    pub word_offset: usize,
    /// Bit position of the byte's least-significant bit inside the word.
    pub shift: u32,
    /// `0xFF << shift`.
    pub mask: u32,
}

const _: () = {
    assert!(WORD_BYTES == 4);
};

impl WordSlot {
    #[inline(always)]
    pub const fn locate(byte_offset: usize, order: Endianness) -> Self {
        let word_offset = byte_offset & !(WORD_BYTES - 1);
        let pos_in_word = (byte_offset & (WORD_BYTES - 1)) as u32;
        let shift = match order {
            Endianness::Big => 24 - pos_in_word * 8,
            Endianness::Little => pos_in_word * 8,
        };
        Self {
            word_offset,
            shift,
            mask: 0xFF << shift,
        }
    }

    /// Index of the containing word in a word slice.
    #[inline(always)]
    pub const fn word_index(&self) -> usize {
        self.word_offset / WORD_BYTES
    }

    /// The addressed byte, as a two's-complement value.
    #[inline(always)]
    pub const fn extract(&self, word: u32) -> i8 {
        ((word & self.mask) >> self.shift) as u8 as i8
    }

    /// `word` with the addressed byte replaced by `byte`. Sibling bytes are
    /// carried over untouched.
    #[inline(always)]
    pub const fn splice(&self, word: u32, byte: i8) -> u32 {
        (word & !self.mask) | (((byte as u8) as u32) << self.shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_offset_is_aligned_and_not_past_byte() {
        for offset in 0..64usize {
            for order in [Endianness::Little, Endianness::Big] {
                let slot = WordSlot::locate(offset, order);
                assert_eq!(slot.word_offset % 4, 0);
                assert!(slot.word_offset <= offset);
                assert!(offset - slot.word_offset < 4);
                assert_eq!(slot.mask.count_ones(), 8);
                assert_eq!(slot.mask >> slot.shift, 0xFF);
            }
        }
    }

    #[test]
    fn test_shift_by_order() {
        let little: [u32; 4] = core::array::from_fn(|i| WordSlot::locate(i, Endianness::Little).shift);
        let big: [u32; 4] = core::array::from_fn(|i| WordSlot::locate(i, Endianness::Big).shift);
        assert_eq!(little, [0, 8, 16, 24]);
        assert_eq!(big, [24, 16, 8, 0]);
    }

    #[test]
    fn test_extract_sign() {
        let slot = WordSlot::locate(1, Endianness::Little);
        assert_eq!(slot.extract(0x0000_8000), -128);
        assert_eq!(slot.extract(0x0000_7F00), 127);
    }

    #[test]
    fn test_splice_leaves_siblings() {
        let slot = WordSlot::locate(6, Endianness::Little);
        assert_eq!(slot.word_index(), 1);
        let word = slot.splice(0xAABB_CCDD, -1);
        assert_eq!(word, 0xAAFF_CCDD);
        assert_eq!(slot.extract(word), -1);

        let slot = WordSlot::locate(6, Endianness::Big);
        assert_eq!(slot.splice(0xAABB_CCDD, 0x11), 0xAABB_11DD);
    }

    #[test]
    fn test_matches_native_memory_layout() {
        let order = Endianness::native();
        let word = u32::from_ne_bytes([10, 20, 30, 40]);
        for (i, expected) in [10i8, 20, 30, 40].into_iter().enumerate() {
            assert_eq!(WordSlot::locate(i, order).extract(word), expected);
        }
    }
}

//! Index -> byte offset mapping for element arrays laid over word storage.

/// `offset(index) = base_offset + (index << index_shift)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayLayout {
    /// Byte offset of element 0 from the start of the storage.
    pub base_offset: usize,
    /// `log2(size_of::<T>())`.
    pub index_shift: u32,
}

impl ArrayLayout {
    /// Layout of a `[T]` starting at the storage origin.
    ///
    /// Evaluated in const context, so a non-power-of-two element size stops
    /// the build instead of surfacing at runtime.
    pub const fn of<T>() -> Self {
        let scale = core::mem::size_of::<T>();
        assert!(scale.is_power_of_two(), "element scale must be a power of two");
        Self {
            base_offset: 0,
            index_shift: scale.trailing_zeros(),
        }
    }

    /// Same scale, element 0 moved `elements` further in.
    #[inline(always)]
    pub const fn rebased(self, elements: usize) -> Self {
        Self {
            base_offset: self.offset(elements),
            index_shift: self.index_shift,
        }
    }

    #[inline(always)]
    pub const fn offset(self, index: usize) -> usize {
        self.base_offset + (index << self.index_shift)
    }
}

/// Layout for `i8`/`u8` elements.
pub const BYTE_LAYOUT: ArrayLayout = ArrayLayout::of::<u8>();

const _: () = {
    assert!(BYTE_LAYOUT.base_offset == 0);
    assert!(BYTE_LAYOUT.index_shift == 0);
};

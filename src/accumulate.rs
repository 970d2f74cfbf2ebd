//! Generic update/accumulate operations over a single byte.
//!
//! Built only from `get_volatile` + byte-level compare-and-swap. The
//! transform may run many times for one call under contention: keep it pure.

use core::ops::ControlFlow;

use crate::retry::retry_cas;
use crate::target::MemoryTarget;
use crate::word::AtomicWord;

/// `(a, b) -> a | b`. The pre-built accumulator for flag-style bit setting.
#[inline(always)]
pub const fn bitwise_or(a: i8, b: i8) -> i8 {
    a | b
}

impl<W: AtomicWord> MemoryTarget<'_, W> {
    /// Apply `transform`, return the previous byte.
    #[inline]
    pub fn get_and_update<F>(&self, transform: F) -> i8
    where
        F: Fn(i8) -> i8,
    {
        self.update_with(|old| {
            let new = transform(old);
            (new, old)
        })
    }

    /// Apply `transform`, return the new byte.
    #[inline]
    pub fn update_and_get<F>(&self, transform: F) -> i8
    where
        F: Fn(i8) -> i8,
    {
        self.update_with(|old| {
            let new = transform(old);
            (new, new)
        })
    }

    /// Combine the current byte with `update` via `accumulator`, return the
    /// previous byte.
    #[inline]
    pub fn get_and_accumulate<F>(&self, update: i8, accumulator: F) -> i8
    where
        F: Fn(i8, i8) -> i8,
    {
        self.get_and_update(|old| accumulator(old, update))
    }

    /// Combine the current byte with `update` via `accumulator`, return the
    /// new byte.
    #[inline]
    pub fn accumulate_and_get<F>(&self, update: i8, accumulator: F) -> i8
    where
        F: Fn(i8, i8) -> i8,
    {
        self.update_and_get(|old| accumulator(old, update))
    }

    /// Set the bits of `bits`, return the previous byte.
    #[inline]
    pub fn get_and_bitwise_or(&self, bits: i8) -> i8 {
        self.get_and_accumulate(bits, bitwise_or)
    }

    #[inline(always)]
    fn update_with(&self, step: impl Fn(i8) -> (i8, i8)) -> i8 {
        retry_cas(
            || self.get_volatile(),
            |old| ControlFlow::Continue(step(old)),
            |old, new| self.try_swap(old, new),
        )
    }
}

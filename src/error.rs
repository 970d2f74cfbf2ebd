//! Error types. Validation errors are recoverable, environment errors are not.

use thiserror::Error;

/// A bounds or range check rejected the call before any memory was touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessError {
    /// `index` is outside the half-open range `[0, len)`.
    #[error("index {index} out of range [0, {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// `start..end` is not a valid sub-range of `[0, len)`.
    #[error("range {start}..{end} out of bounds for length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },
    /// Requested byte length does not fit in the backing words.
    #[error("length {len} exceeds word storage capacity of {capacity} bytes")]
    CapacityExceeded { len: usize, capacity: usize },
}

impl AccessError {
    /// The offending index, if this is an index error.
    #[inline]
    pub const fn index(&self) -> Option<usize> {
        match self {
            AccessError::IndexOutOfRange { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// The host does not match what the access layer models. Fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnvironmentError {
    /// The endianness probe read back a byte that is neither the least nor
    /// the most significant byte of the probe word (mixed/PDP ordering).
    #[error("unrecognized byte order: probe word 0x04030201 stored 0x{probe:02x} at its lowest address")]
    UnrecognizedByteOrder { probe: u8 },
}

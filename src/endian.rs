//! Endianness probe. Runs once per process, cached forever after.

use once_cell::race::OnceBool;
use zerocopy::IntoBytes;

use crate::error::EnvironmentError;

/// Probe pattern. Its lowest-addressed byte identifies the byte order.
pub const PROBE_WORD: u32 = 0x0403_0201;

/// Where the least-significant byte of a word lives in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// LSB at the lowest address.
    Little,
    /// MSB at the lowest address.
    Big,
}

impl Endianness {
    /// Process-wide byte order. First call probes, every later call reads
    /// the cached value.
    ///
    /// # Panics
    ///
    /// If the probe observes a byte order the access layer does not model.
    #[inline]
    pub fn native() -> Self {
        static LITTLE: OnceBool = OnceBool::new();
        if LITTLE.get_or_init(|| detect() == Endianness::Little) {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    #[inline(always)]
    pub const fn is_little(self) -> bool {
        matches!(self, Endianness::Little)
    }
}

/// Classify the byte read back from the lowest address of [`PROBE_WORD`].
#[inline]
pub const fn classify(lowest_byte: u8) -> Result<Endianness, EnvironmentError> {
    match lowest_byte {
        0x01 => Ok(Endianness::Little),
        0x04 => Ok(Endianness::Big),
        probe => Err(EnvironmentError::UnrecognizedByteOrder { probe }),
    }
}

/// Write [`PROBE_WORD`] into a fresh word and return its lowest-addressed byte.
#[inline]
pub fn probe() -> u8 {
    let word = PROBE_WORD;
    word.as_bytes()[0]
}

/// Run the probe without consulting the cache.
///
/// # Panics
///
/// On an unrecognized byte order. This is an unsupported platform, not a
/// condition callers can recover from.
pub fn detect() -> Endianness {
    match classify(probe()) {
        Ok(order) => {
            debug_assert_eq!(order.is_little(), cfg!(target_endian = "little"));
            tracing::debug!(?order, "detected host byte order");
            order
        }
        Err(err) => panic!("{}", err),
    }
}

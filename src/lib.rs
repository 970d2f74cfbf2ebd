#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_op_in_unsafe_fn)]

//! Lock-free byte-granular atomics synthesized from 32-bit word CAS.
//!
//! Hardware CAS works on aligned words. To atomically update one byte, read
//! the word that contains it, splice in the new byte, and CAS the whole
//! word, retrying whenever any byte of the word moved underneath you.
//!
//! ```
//! use core::sync::atomic::AtomicU32;
//! use subword::AtomicBytes;
//!
//! let words = [AtomicU32::new(0), AtomicU32::new(0)];
//! let bytes = AtomicBytes::new(&words);
//!
//! bytes.set(5, 127).unwrap();
//! assert_eq!(bytes.get_and_add(5, 1).unwrap(), 127);
//! assert_eq!(bytes.get(5).unwrap(), -128);
//! assert!(bytes.get(8).is_err());
//! ```

pub mod accumulate;
pub mod array;
pub mod endian;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod retry;
pub mod slot;
pub mod target;
pub mod word;

/// Prelude for convenient imports of primary API types.
pub mod prelude {
    pub use crate::accumulate::bitwise_or;
    pub use crate::array::AtomicBytes;
    #[cfg(feature = "std")]
    pub use crate::array::AtomicByteBuf;
    pub use crate::endian::Endianness;
    pub use crate::error::{AccessError, EnvironmentError};
    pub use crate::target::MemoryTarget;
    pub use crate::word::AtomicWord;
}

pub use accumulate::bitwise_or;
pub use array::AtomicBytes;
#[cfg(feature = "std")]
pub use array::AtomicByteBuf;
pub use endian::Endianness;
pub use error::{AccessError, EnvironmentError};
pub use layout::{ArrayLayout, BYTE_LAYOUT};
pub use metrics::{ContentionMetrics, ContentionSnapshot};
pub use slot::WordSlot;
pub use target::MemoryTarget;
pub use word::{AtomicWord, WORD_BYTES};

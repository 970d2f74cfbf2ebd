//! Contention counters. No allocations, no locks, just atomics.
//!
//! Recording only happens with the `metrics` feature. Without it the
//! `record_*` calls are empty and every counter reads zero.

use core::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counters, shared by every view and target.
pub static CONTENTION: ContentionMetrics = ContentionMetrics::new();

/// Cache-line aligned so bumping a counter doesn't false-share with
/// whatever the linker puts next to it.
#[repr(C, align(64))]
pub struct ContentionMetrics {
    /// Word-level CAS attempts that lost a race (or failed spuriously) and
    /// were retried.
    pub cas_failures: AtomicU64,
    /// Explicit byte compare-and-swaps whose expected value did not match.
    pub compare_failures: AtomicU64,
}

/// Point-in-time copy of [`ContentionMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentionSnapshot {
    pub cas_failures: u64,
    pub compare_failures: u64,
}

impl ContentionMetrics {
    pub const fn new() -> Self {
        Self {
            cas_failures: AtomicU64::new(0),
            compare_failures: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ContentionSnapshot {
        ContentionSnapshot {
            cas_failures: self.cas_failures.load(Ordering::Relaxed),
            compare_failures: self.compare_failures.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.cas_failures.store(0, Ordering::Relaxed);
        self.compare_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for ContentionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentionSnapshot {
    /// Counter deltas since an earlier snapshot.
    pub fn since(&self, earlier: &ContentionSnapshot) -> ContentionSnapshot {
        ContentionSnapshot {
            cas_failures: self.cas_failures.wrapping_sub(earlier.cas_failures),
            compare_failures: self.compare_failures.wrapping_sub(earlier.compare_failures),
        }
    }
}

/// Snapshot of the global counters.
pub fn snapshot() -> ContentionSnapshot {
    CONTENTION.snapshot()
}

/// Zero the global counters.
pub fn reset() {
    CONTENTION.reset();
}

#[inline(always)]
pub(crate) fn record_cas_failure() {
    #[cfg(feature = "metrics")]
    CONTENTION.cas_failures.fetch_add(1, Ordering::Relaxed);
}

#[inline(always)]
pub(crate) fn record_compare_failure() {
    #[cfg(feature = "metrics")]
    CONTENTION.compare_failures.fetch_add(1, Ordering::Relaxed);
}

//! The one CAS retry loop every byte operation is built from.

use core::ops::ControlFlow;

/// Read, decide, swap. Repeat until the swap lands or the decision bails.
///
/// - `read` observes the current value (fresh on every iteration).
/// - `compute_next` either `Break`s with a final result and no write, or
///   `Continue`s with `(next, outcome)`: the value to install and the
///   result to return if the install succeeds.
/// - `cas(current, next)` attempts the install.
///
/// No backoff, no yield, no bound. Lock-free, not wait-free. `compute_next`
/// may run any number of times for one logical operation, so it must be pure.
#[inline(always)]
pub fn retry_cas<T, R>(
    mut read: impl FnMut() -> T,
    mut compute_next: impl FnMut(T) -> ControlFlow<R, (T, R)>,
    mut cas: impl FnMut(T, T) -> bool,
) -> R
where
    T: Copy,
{
    loop {
        let current = read();
        let (next, outcome) = match compute_next(current) {
            ControlFlow::Break(done) => return done,
            ControlFlow::Continue(step) => step,
        };
        if cas(current, next) {
            return outcome;
        }
    }
}

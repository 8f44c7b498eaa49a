//! # One-shot, multi-observer terminal notification.
//!
//! [`Latch`] moves from *armed* to *fired* exactly once. Any number of tasks may
//! wait on it; all of them wake when it fires. Concurrent `fire()` calls collapse
//! to a single effective fire, and only the winning caller sees `true`.
//!
//! ```text
//! armed ──fire()──► fired   (fire() again → false, no effect)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// Fire-once notification with any number of waiters.
#[derive(Debug, Default)]
pub struct Latch {
    fired: AtomicBool,
    token: CancellationToken,
}

impl Latch {
    /// Creates an armed latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the latch. Returns `true` only for the call that performed the transition.
    pub fn fire(&self) -> bool {
        let won = self
            .fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if won {
            self.token.cancel();
        }
        won
    }

    /// Completes once the latch has fired (immediately if it already has).
    pub fn wait(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }

    /// True once the latch has fired.
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

#![forbid(unsafe_code)]

//! Deadline tracking for debounced and delayed callbacks.
//!
//! [`Debouncer`] models a `clearTimeout` + `setTimeout` pair without owning a
//! clock: callers [`schedule`](Debouncer::schedule) with the current instant
//! and later [`poll`](Debouncer::poll) with a newer one. Only the most recent
//! schedule within the delay window fires.
//!
//! # Invariants
//!
//! 1. At most one deadline is pending.
//! 2. `schedule(now)` replaces any pending deadline with `now + delay`.
//! 3. `poll(now)` returns `true` exactly once per pending deadline, when
//!    `now >= deadline`, and clears it.
//! 4. `cancel()` clears the pending deadline; a later `poll` returns `false`.

use std::time::Duration;
use web_time::Instant;

/// A single-slot, "last call wins" timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    /// Create an idle debouncer with the given delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)arm the timer so it fires `delay` after `now`.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Fire if the pending deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending deadline.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Whether a deadline is pending.
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// The pending deadline, if any.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Configured delay.
    #[inline]
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending deadline keeps its original instant.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }
}

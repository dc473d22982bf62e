//! Host refresh-callback abstraction.
//!
//! A loop asks its [`FrameScheduler`] for the next refresh and receives a [`FrameHandle`]; the
//! host later dispatches that handle back to the loop. Handles can be canceled, and a loop must
//! ignore any handle it is no longer waiting for.

use std::collections::BTreeSet;

use crate::foundation::core::Timestamp;
use crate::foundation::error::{FramepaceError, FramepaceResult};

/// Opaque identifier of one requested refresh callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(pub u64);

/// Source of refresh callbacks.
pub trait FrameScheduler {
    /// Request one callback at the next refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Cancel a pending callback. Returns `false` if it already fired or was never issued.
    fn cancel_frame(&mut self, handle: FrameHandle) -> bool;
}

/// Scheduler whose callbacks fire only when the caller says so.
///
/// Useful in tests and for hosts with their own event loop.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
    canceled: u64,
}

impl ManualScheduler {
    /// Empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending handle, oldest first. The caller dispatches them.
    pub fn fire(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Number of callbacks waiting to fire.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// `true` if `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }

    /// Total successful cancellations.
    pub fn canceled_count(&self) -> u64 {
        self.canceled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        let removed = self.pending.remove(&handle);
        if removed {
            self.canceled += 1;
        }
        removed
    }
}

/// Fixed-rate timer used where no vsync-aligned source exists.
///
/// Deadline `n` sits at `start + n * 1000 / rate_hz` ms. When the host falls behind, missed
/// deadlines are skipped instead of fired in a burst.
#[derive(Debug)]
pub struct IntervalScheduler {
    inner: ManualScheduler,
    start: Timestamp,
    rate_hz: f64,
    next_index: u64,
    skipped: u64,
}

impl IntervalScheduler {
    /// Timer ticking `rate_hz` times per second, first deadline one period after `start`.
    pub fn new(rate_hz: f64, start: Timestamp) -> FramepaceResult<Self> {
        if !rate_hz.is_finite() || rate_hz <= 0.0 {
            return Err(FramepaceError::validation(format!(
                "refresh rate must be finite and > 0, got {rate_hz}"
            )));
        }
        Ok(Self {
            inner: ManualScheduler::new(),
            start,
            rate_hz,
            next_index: 1,
            skipped: 0,
        })
    }

    fn deadline(&self, index: u64) -> Timestamp {
        self.start.add_millis(index as f64 * 1000.0 / self.rate_hz)
    }

    /// Period between deadlines in milliseconds.
    pub fn period_ms(&self) -> f64 {
        1000.0 / self.rate_hz
    }

    /// Next time callbacks are due.
    pub fn next_deadline(&self) -> Timestamp {
        self.deadline(self.next_index)
    }

    /// Deadlines passed without firing because the host was late.
    pub fn skipped_deadlines(&self) -> u64 {
        self.skipped
    }

    /// Number of callbacks waiting for the next deadline.
    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    /// Fire pending callbacks if the deadline has been reached at `now`.
    ///
    /// Returns an empty list before the deadline. Otherwise advances the deadline past `now`.
    pub fn fire_due(&mut self, now: Timestamp) -> Vec<FrameHandle> {
        if now.as_millis() < self.next_deadline().as_millis() {
            return Vec::new();
        }
        let reached = (now.millis_since(self.start) * self.rate_hz / 1000.0).floor() as u64;
        let due = reached.max(self.next_index);
        let missed = due - self.next_index;
        if missed > 0 {
            self.skipped += missed;
            tracing::trace!(missed, "interval scheduler skipped deadlines");
        }
        self.next_index = due + 1;
        self.inner.fire()
    }
}

impl FrameScheduler for IntervalScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.inner.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) -> bool {
        self.inner.cancel_frame(handle)
    }
}

#[cfg(test)]
#[path = "../tests/unit/schedule.rs"]
mod tests;

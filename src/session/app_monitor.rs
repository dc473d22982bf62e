use std::time::Duration;

use crate::clock::{FpsReading, FpsTier, FrameClock};
use crate::foundation::core::Timestamp;
use crate::foundation::error::FramepaceResult;
use crate::schedule::{FrameHandle, FrameScheduler};

/// Instantaneous and rolling-average app loop FPS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct AppFpsSnapshot {
    /// Latest reading, zero before the first window closes.
    pub current: FpsReading,
    /// Rounded mean of the retained readings, zero when none.
    pub average: FpsReading,
}

impl AppFpsSnapshot {
    /// Tier of the latest reading.
    pub fn current_tier(&self) -> FpsTier {
        self.current.tier()
    }

    /// Tier of the rolling average.
    pub fn average_tier(&self) -> FpsTier {
        self.average.tier()
    }
}

/// Process-scoped loop measuring the host's own refresh cadence.
///
/// It ticks on every callback regardless of what any surface is doing and stops only at
/// [`AppLoopMonitor::teardown`].
#[derive(Debug)]
pub struct AppLoopMonitor {
    clock: FrameClock,
    pending: Option<FrameHandle>,
}

impl AppLoopMonitor {
    /// Start measuring at `now` with the given window and history capacity.
    pub fn new(
        window: Duration,
        history: usize,
        now: Timestamp,
        sched: &mut dyn FrameScheduler,
    ) -> FramepaceResult<Self> {
        let clock = FrameClock::with_history(window, history, now)?;
        tracing::debug!(window_ms = clock.window_ms(), history, "app loop monitor started");
        Ok(Self {
            clock,
            pending: Some(sched.request_frame()),
        })
    }

    /// Handle one dispatched callback; returns the reading emitted by this tick, if any.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now: Timestamp,
        sched: &mut dyn FrameScheduler,
    ) -> Option<FpsReading> {
        if self.pending != Some(handle) {
            return None;
        }
        let reading = self.clock.tick(now);
        if let Some(r) = reading {
            tracing::trace!(fps = r.get(), avg = ?self.clock.average(), "app loop fps");
        }
        self.pending = Some(sched.request_frame());
        reading
    }

    /// Current and average readings.
    pub fn snapshot(&self) -> AppFpsSnapshot {
        AppFpsSnapshot {
            current: self.clock.latest().unwrap_or_default(),
            average: self.clock.average().unwrap_or_default(),
        }
    }

    /// Underlying clock.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Callback the monitor is waiting for.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// `false` once torn down.
    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Cancel the pending callback. The last snapshot stays readable.
    pub fn teardown(&mut self, sched: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            sched.cancel_frame(handle);
            tracing::debug!("app loop monitor stopped");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/app_monitor.rs"]
mod tests;

//! Windowed FPS estimation.

use std::collections::VecDeque;
use std::time::Duration;

use crate::foundation::core::Timestamp;
use crate::foundation::error::{FramepaceError, FramepaceResult};

/// Sampling window of the pattern renderer.
pub const PATTERN_WINDOW: Duration = Duration::from_millis(500);
/// Sampling window of the app loop monitor.
pub const MONITOR_WINDOW: Duration = Duration::from_millis(250);
/// Rolling-average capacity of the app loop monitor.
pub const MONITOR_HISTORY: usize = 20;
/// Frame rate the system is expected to reach.
pub const TARGET_FPS: u32 = 120;

/// One integer frames-per-second reading.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FpsReading(pub u32);

impl FpsReading {
    /// Reading as `u32`.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Quality tier of this reading.
    pub fn tier(self) -> FpsTier {
        FpsTier::of(self.0)
    }
}

impl std::fmt::Display for FpsReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} FPS", self.0)
    }
}

/// Coarse quality bands used to color FPS figures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FpsTier {
    /// Below 30.
    Poor,
    /// 30 to 59.
    Fair,
    /// 60 to 99.
    Good,
    /// 100 and above.
    Excellent,
}

impl FpsTier {
    /// Tier for an FPS value.
    pub fn of(fps: u32) -> Self {
        match fps {
            100.. => FpsTier::Excellent,
            60..=99 => FpsTier::Good,
            30..=59 => FpsTier::Fair,
            _ => FpsTier::Poor,
        }
    }

    /// Display color as `#rrggbb`.
    pub fn color(self) -> &'static str {
        match self {
            FpsTier::Excellent => "#00ff00",
            FpsTier::Good => "#ffff00",
            FpsTier::Fair => "#ff8800",
            FpsTier::Poor => "#ff0000",
        }
    }
}

/// Bounded FIFO of recent readings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FpsHistory {
    readings: VecDeque<FpsReading>,
    capacity: usize,
}

impl FpsHistory {
    /// Empty history holding at most `capacity` readings.
    pub fn new(capacity: usize) -> FramepaceResult<Self> {
        if capacity == 0 {
            return Err(FramepaceError::validation(
                "fps history capacity must be > 0",
            ));
        }
        Ok(Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a reading, evicting the oldest once full.
    pub fn push(&mut self, reading: FpsReading) {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    /// Maximum number of retained readings.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of retained readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// `true` when nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Readings from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = FpsReading> + '_ {
        self.readings.iter().copied()
    }

    /// Mean of the retained readings, rounded to the nearest integer.
    pub fn average(&self) -> Option<FpsReading> {
        if self.readings.is_empty() {
            return None;
        }
        let sum: u64 = self.readings.iter().map(|r| u64::from(r.0)).sum();
        let avg = (sum as f64 / self.readings.len() as f64).round();
        Some(FpsReading(avg as u32))
    }
}

/// Frame counter that emits one reading per elapsed sampling window.
///
/// The window boundary is wall-clock time: a reading is produced on the first tick at which at
/// least one full window has passed since the previous reading (or since the clock started), and covers
/// exactly the frames counted in between.
#[derive(Clone, Debug)]
pub struct FrameClock {
    window_ms: f64,
    window_start: Timestamp,
    frame_count: u64,
    latest: Option<FpsReading>,
    history: Option<FpsHistory>,
}

impl FrameClock {
    /// Clock without history, window starting at `start`.
    pub fn new(window: Duration, start: Timestamp) -> FramepaceResult<Self> {
        let window_ms = window.as_secs_f64() * 1000.0;
        if window_ms <= 0.0 {
            return Err(FramepaceError::validation(
                "sampling window must be > 0",
            ));
        }
        Ok(Self {
            window_ms,
            window_start: start,
            frame_count: 0,
            latest: None,
            history: None,
        })
    }

    /// Clock that also keeps a rolling average over `capacity` readings.
    pub fn with_history(
        window: Duration,
        capacity: usize,
        start: Timestamp,
    ) -> FramepaceResult<Self> {
        let mut clock = Self::new(window, start)?;
        clock.history = Some(FpsHistory::new(capacity)?);
        Ok(clock)
    }

    /// Count one frame at `now`; returns a reading when a window closed.
    pub fn tick(&mut self, now: Timestamp) -> Option<FpsReading> {
        self.frame_count += 1;
        let elapsed = now.millis_since(self.window_start);
        if elapsed < self.window_ms {
            return None;
        }

        let fps = ((self.frame_count as f64) * 1000.0 / elapsed).round();
        let reading = FpsReading(fps.clamp(0.0, f64::from(u32::MAX)) as u32);
        self.frame_count = 0;
        self.window_start = now;
        self.latest = Some(reading);
        if let Some(history) = self.history.as_mut() {
            history.push(reading);
        }
        Some(reading)
    }

    /// Frames counted in the open window.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Start of the open window.
    pub fn window_start(&self) -> Timestamp {
        self.window_start
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Most recent reading.
    pub fn latest(&self) -> Option<FpsReading> {
        self.latest
    }

    /// Rolling average, when history is enabled and non-empty.
    pub fn average(&self) -> Option<FpsReading> {
        self.history.as_ref().and_then(FpsHistory::average)
    }

    /// Rolling history, when enabled.
    pub fn history(&self) -> Option<&FpsHistory> {
        self.history.as_ref()
    }
}

#[cfg(test)]
#[path = "../tests/unit/clock.rs"]
mod tests;

//! Headless host driving the loops without a display.
//!
//! One [`IntervalScheduler`] stands in for the display refresh: every due deadline dispatches the
//! pending handles to both the [`RenderLoop`] and the [`AppLoopMonitor`], each of which ignores
//! handles it did not request.

use std::time::{Duration, Instant};

use crate::clock::{FpsReading, MONITOR_HISTORY, MONITOR_WINDOW, TARGET_FPS};
use crate::foundation::core::Timestamp;
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::pattern::PatternKind;
use crate::render::surface::{FrameRGBA, Surface, SurfaceGeometry};
use crate::schedule::IntervalScheduler;
use crate::session::{AppFpsSnapshot, AppLoopMonitor, RenderLoop};
use crate::sink::{FrameIndex, FrameSink, SinkConfig};

/// Time source of a host.
pub trait HostClock {
    /// Current time.
    fn now(&self) -> Timestamp;

    /// Block (or advance) until `deadline`.
    fn wait_until(&mut self, deadline: Timestamp);
}

/// Monotonic wall clock measured from its creation.
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock reading zero now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(self.origin.elapsed().as_secs_f64() * 1000.0)
    }

    fn wait_until(&mut self, deadline: Timestamp) {
        let remaining = deadline.millis_since(self.now());
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining / 1000.0));
        }
    }
}

/// Clock that jumps straight to each deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct VirtualClock {
    now: Timestamp,
}

impl VirtualClock {
    /// Clock starting at `start`.
    pub fn starting_at(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move forward by `ms`, e.g. to simulate a slow frame.
    pub fn advance(&mut self, ms: f64) {
        self.now = self.now.add_millis(ms.max(0.0));
    }
}

impl HostClock for VirtualClock {
    fn now(&self) -> Timestamp {
        self.now
    }

    fn wait_until(&mut self, deadline: Timestamp) {
        if deadline.as_millis() > self.now.as_millis() {
            self.now = deadline;
        }
    }
}

/// Options for [`HeadlessHost`].
#[derive(Clone, Debug)]
pub struct HostOpts {
    /// Simulated refresh rate.
    pub rate_hz: f64,
    /// How long to run.
    pub duration: Duration,
    /// Advance to the next pattern at this interval.
    pub cycle_every: Option<Duration>,
    /// Geometry of the surface created when the loop has none.
    pub geometry: SurfaceGeometry,
    /// App loop monitor window.
    pub monitor_window: Duration,
    /// App loop monitor rolling-average capacity.
    pub monitor_history: usize,
    /// Frame rate readings are compared against in logs.
    pub target_fps: u32,
}

impl Default for HostOpts {
    fn default() -> Self {
        Self {
            rate_hz: f64::from(TARGET_FPS),
            duration: Duration::from_secs(2),
            cycle_every: None,
            geometry: SurfaceGeometry::from_logical(800.0, 450.0),
            monitor_window: MONITOR_WINDOW,
            monitor_history: MONITOR_HISTORY,
            target_fps: TARGET_FPS,
        }
    }
}

/// Summary of one headless run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct RunReport {
    /// Frames swapped to the front buffer.
    pub frames_presented: u64,
    /// Deadlines at which callbacks were dispatched.
    pub host_ticks: u64,
    /// Deadlines skipped because the host ran late.
    pub skipped_deadlines: u64,
    /// Pattern-FPS readings, tagged with the pattern that produced them.
    pub pattern_readings: Vec<(PatternKind, FpsReading)>,
    /// Final app loop monitor figures.
    pub monitor: AppFpsSnapshot,
    /// Patterns in the order they were shown.
    pub patterns_shown: Vec<PatternKind>,
    /// Configured target.
    pub target_fps: u32,
}

impl RunReport {
    /// Most recent pattern-FPS reading.
    pub fn last_pattern_fps(&self) -> Option<FpsReading> {
        self.pattern_readings.last().map(|(_, r)| *r)
    }
}

/// Drives a [`RenderLoop`] and an [`AppLoopMonitor`] from one interval scheduler.
pub struct HeadlessHost<C: HostClock> {
    clock: C,
    opts: HostOpts,
    render_loop: RenderLoop,
}

impl<C: HostClock> HeadlessHost<C> {
    /// Host running `render_loop` on `clock`.
    pub fn new(clock: C, render_loop: RenderLoop, opts: HostOpts) -> FramepaceResult<Self> {
        if !opts.rate_hz.is_finite() || opts.rate_hz <= 0.0 {
            return Err(FramepaceError::validation(format!(
                "host rate must be finite and > 0, got {}",
                opts.rate_hz
            )));
        }
        if opts.cycle_every.is_some_and(|d| d.is_zero()) {
            return Err(FramepaceError::validation("cycle interval must be > 0"));
        }
        Ok(Self {
            clock,
            opts,
            render_loop,
        })
    }

    /// The driven loop.
    pub fn render_loop(&self) -> &RenderLoop {
        &self.render_loop
    }

    /// Host clock.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Consume the host, returning the loop (with its surface) for inspection.
    pub fn into_render_loop(self) -> RenderLoop {
        self.render_loop
    }

    /// Run for the configured duration, feeding presented frames to `sink`.
    ///
    /// The loop is paused at the end but keeps its surface, so the last frame stays readable.
    #[tracing::instrument(level = "debug", skip(self, sink), fields(rate_hz = self.opts.rate_hz))]
    pub fn run(&mut self, mut sink: Option<&mut dyn FrameSink>) -> FramepaceResult<RunReport> {
        let start = self.clock.now();
        let end = start.add_millis(self.opts.duration.as_secs_f64() * 1000.0);
        let mut sched = IntervalScheduler::new(self.opts.rate_hz, start)?;
        let mut monitor = AppLoopMonitor::new(
            self.opts.monitor_window,
            self.opts.monitor_history,
            start,
            &mut sched,
        )?;

        if self.render_loop.surface().is_none() {
            self.render_loop
                .attach_surface(Surface::new(self.opts.geometry));
        }
        let (w, h) = self
            .render_loop
            .surface()
            .map(Surface::backing_size)
            .unwrap_or_default();
        if let Some(sink) = sink.as_deref_mut() {
            sink.begin(SinkConfig {
                width: u32::from(w),
                height: u32::from(h),
                rate_hz: self.opts.rate_hz,
            })?;
        }

        let mut report = RunReport {
            target_fps: self.opts.target_fps,
            patterns_shown: vec![self.render_loop.pattern()],
            ..RunReport::default()
        };
        let cycle_ms = self.opts.cycle_every.map(|d| d.as_secs_f64() * 1000.0);
        let mut next_cycle = cycle_ms.map(|c| start.add_millis(c));
        let mut readback = FrameRGBA {
            width: 0,
            height: 0,
            data: Vec::new(),
            premultiplied: true,
        };
        let mut next_index: FrameIndex = 0;

        tracing::info!(
            pattern = %self.render_loop.pattern(),
            rate_hz = self.opts.rate_hz,
            seconds = self.opts.duration.as_secs_f64(),
            "headless run started"
        );
        self.render_loop.set_playing(true, start, &mut sched);

        loop {
            let deadline = sched.next_deadline();
            if deadline.as_millis() > end.as_millis() {
                break;
            }
            self.clock.wait_until(deadline);
            let now = self.clock.now();

            if let (Some(at), Some(c)) = (next_cycle, cycle_ms)
                && now.as_millis() >= at.as_millis()
            {
                let next = self.render_loop.pattern().next();
                self.render_loop.set_pattern(next, now, &mut sched);
                report.patterns_shown.push(next);
                next_cycle = Some(at.add_millis(c));
            }

            let handles = sched.fire_due(now);
            if handles.is_empty() {
                continue;
            }
            report.host_ticks += 1;
            for handle in handles {
                if let Some(r) = monitor.on_frame(handle, now, &mut sched) {
                    let snap = monitor.snapshot();
                    tracing::debug!(
                        fps = r.get(),
                        avg = snap.average.get(),
                        tier = ?snap.current_tier(),
                        "app loop fps"
                    );
                }

                let outcome = self.render_loop.on_frame(handle, now, &mut sched);
                if outcome.drawn {
                    report.frames_presented += 1;
                    let idx = next_index;
                    next_index += 1;
                    if let Some(s) = sink.as_deref_mut()
                        && s.wants_frame(idx)
                        && let Some(surface) = self.render_loop.surface()
                    {
                        let pushed = surface
                            .read_front_into(&mut readback)
                            .and_then(|()| s.push_frame(idx, &readback));
                        if let Err(e) = pushed {
                            tracing::warn!(error = %e, frame = idx, "frame sink failed; detaching");
                            sink = None;
                        }
                    }
                }
                if let Some(r) = outcome.reading {
                    let pattern = self.render_loop.pattern();
                    tracing::info!(
                        pattern = %pattern,
                        fps = r.get(),
                        target = self.opts.target_fps,
                        tier = ?r.tier(),
                        color = r.tier().color(),
                        "pattern fps"
                    );
                    report.pattern_readings.push((pattern, r));
                }
            }
        }

        let now = self.clock.now();
        self.render_loop.set_playing(false, now, &mut sched);
        monitor.teardown(&mut sched);
        report.monitor = monitor.snapshot();
        report.skipped_deadlines = sched.skipped_deadlines();
        if let Some(sink) = sink {
            sink.end()?;
        }

        tracing::info!(
            frames = report.frames_presented,
            app_fps = report.monitor.current.get(),
            app_avg = report.monitor.average.get(),
            "headless run finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../tests/unit/host.rs"]
mod tests;

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::{FpsReading, FrameClock, PATTERN_WINDOW};
use crate::foundation::core::Timestamp;
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::pattern::{
    DEFAULT_PARTICLE_COUNT, DEFAULT_TILE_SIZE, DiagnosticOverlay, Particle, PatternKind,
    PatternSynthesizer,
};
use crate::render::surface::{Surface, SurfaceGeometry};
use crate::render::text::FontFace;
use crate::schedule::{FrameHandle, FrameScheduler};

/// Options for a [`RenderLoop`].
#[derive(Clone, Debug)]
pub struct RenderLoopOpts {
    /// Pattern-FPS sampling window.
    pub window: Duration,
    /// Particles spawned per `particles` activation.
    pub particle_count: usize,
    /// Checkerboard tile edge in logical pixels.
    pub tile_size: f64,
    /// Draw the diagnostic overlay on every frame.
    pub overlay: bool,
}

impl Default for RenderLoopOpts {
    fn default() -> Self {
        Self {
            window: PATTERN_WINDOW,
            particle_count: DEFAULT_PARTICLE_COUNT,
            tile_size: DEFAULT_TILE_SIZE,
            overlay: true,
        }
    }
}

/// What one dispatched callback did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// A new frame was presented on the surface.
    pub drawn: bool,
    /// A pattern-FPS reading was emitted.
    pub reading: Option<FpsReading>,
}

/// State that lives exactly as long as one activation.
struct Activation {
    origin: Timestamp,
    clock: FrameClock,
    synth: PatternSynthesizer,
}

type FpsListener = Box<dyn FnMut(FpsReading)>;

/// Per-surface animation loop.
///
/// While playing, every dispatched callback synthesizes one frame, counts it, and requests the
/// next callback. Pausing, switching patterns and teardown cancel the outstanding callback; an
/// activation (start of play, or a pattern change while playing) restarts the time origin, the
/// FPS accumulator, and the particle field.
pub struct RenderLoop {
    opts: RenderLoopOpts,
    pattern: PatternKind,
    playing: bool,
    surface: Option<Surface>,
    resize_attached: bool,
    deferred_geometry: Option<SurfaceGeometry>,
    overlay: Option<DiagnosticOverlay>,
    active: Option<Activation>,
    pending: Option<FrameHandle>,
    listener: Option<FpsListener>,
    last_fps: FpsReading,
    rng: Box<dyn rand::RngCore>,
}

impl RenderLoop {
    /// Idle loop for `pattern`. Nothing is scheduled until a surface is attached and playback
    /// starts.
    pub fn new(pattern: PatternKind, opts: RenderLoopOpts) -> FramepaceResult<Self> {
        if opts.window.is_zero() {
            return Err(FramepaceError::validation("pattern window must be > 0"));
        }
        if !opts.tile_size.is_finite() || opts.tile_size <= 0.0 {
            return Err(FramepaceError::validation(
                "tile size must be finite and > 0",
            ));
        }
        let overlay = opts.overlay.then(|| DiagnosticOverlay::new(None));
        Ok(Self {
            opts,
            pattern,
            playing: false,
            surface: None,
            resize_attached: false,
            deferred_geometry: None,
            overlay,
            active: None,
            pending: None,
            listener: None,
            last_fps: FpsReading(0),
            rng: Box::new(StdRng::from_os_rng()),
        })
    }

    /// Replace the random source used to spawn particles.
    pub fn with_rng(mut self, rng: impl rand::RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Draw overlay text with `face`. Ignored when the overlay is disabled.
    pub fn with_font(mut self, face: Option<FontFace>) -> Self {
        if self.opts.overlay {
            self.overlay = Some(DiagnosticOverlay::new(face));
        }
        self
    }

    /// Register the callback receiving every pattern-FPS reading.
    pub fn on_fps_update(&mut self, listener: impl FnMut(FpsReading) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Give the loop a surface to draw into.
    ///
    /// An activation that found no surface is not retried here; it retries on the next
    /// activation.
    pub fn attach_surface(&mut self, surface: Surface) {
        tracing::debug!(backing = ?surface.backing_size(), "surface attached");
        self.surface = Some(surface);
    }

    /// Toggle playback at `now`.
    ///
    /// Pausing cancels the pending callback immediately; resuming starts a fresh activation.
    pub fn set_playing(&mut self, playing: bool, now: Timestamp, sched: &mut dyn FrameScheduler) {
        if self.playing == playing {
            return;
        }
        self.playing = playing;
        self.deactivate(sched);
        if playing {
            self.activate(now, sched);
        }
    }

    /// Switch to `pattern` at `now`.
    ///
    /// The previous activation is discarded together with its particles, and the last reported
    /// pattern FPS drops to zero.
    pub fn set_pattern(
        &mut self,
        pattern: PatternKind,
        now: Timestamp,
        sched: &mut dyn FrameScheduler,
    ) {
        if self.pattern == pattern {
            return;
        }
        tracing::debug!(from = %self.pattern, to = %pattern, "pattern changed");
        self.pattern = pattern;
        self.last_fps = FpsReading(0);
        self.deactivate(sched);
        if self.playing {
            self.activate(now, sched);
        }
    }

    /// Apply a geometry change.
    ///
    /// Elapsed time and FPS accumulators are untouched. While no resize listener is attached, or
    /// no surface is, the geometry is kept and applied at the next activation.
    pub fn on_resize(&mut self, geometry: SurfaceGeometry) {
        match self.surface.as_mut() {
            Some(surface) if self.resize_attached => {
                surface.resize(geometry);
            }
            _ => self.deferred_geometry = Some(geometry),
        }
    }

    /// Handle one dispatched refresh callback.
    ///
    /// Handles other than the one this loop is waiting for are ignored.
    pub fn on_frame(
        &mut self,
        handle: FrameHandle,
        now: Timestamp,
        sched: &mut dyn FrameScheduler,
    ) -> FrameOutcome {
        if self.pending != Some(handle) {
            tracing::trace!(?handle, "ignoring stale frame callback");
            return FrameOutcome::default();
        }
        self.pending = None;
        if !self.playing {
            return FrameOutcome::default();
        }
        let (Some(active), Some(surface)) = (self.active.as_mut(), self.surface.as_mut()) else {
            return FrameOutcome::default();
        };

        let elapsed = now.secs_since(active.origin);
        let kind = self.pattern;
        let overlay = self.overlay.as_mut();
        let synth = &mut active.synth;
        let drawn = match surface.render_frame(|painter| {
            synth.draw(elapsed, painter)?;
            if let Some(overlay) = overlay {
                overlay.draw(painter, kind, elapsed);
            }
            Ok(())
        }) {
            Ok(drawn) => drawn,
            Err(e) => {
                tracing::warn!(error = %e, pattern = %kind, "frame render failed");
                false
            }
        };

        let reading = active.clock.tick(now);
        tracing::trace!(elapsed, drawn, "pattern frame");
        if let Some(reading) = reading {
            tracing::debug!(fps = reading.get(), pattern = %kind, "pattern fps");
            self.last_fps = reading;
            if let Some(listener) = self.listener.as_mut() {
                listener(reading);
            }
        }

        self.pending = Some(sched.request_frame());
        FrameOutcome { drawn, reading }
    }

    /// Stop for good: cancel the pending callback, drop the activation and the surface.
    pub fn teardown(&mut self, sched: &mut dyn FrameScheduler) {
        self.deactivate(sched);
        self.playing = false;
        self.surface = None;
        tracing::debug!("render loop torn down");
    }

    #[tracing::instrument(level = "debug", skip(self, sched), fields(pattern = %self.pattern))]
    fn activate(&mut self, now: Timestamp, sched: &mut dyn FrameScheduler) {
        let Some(surface) = self.surface.as_mut() else {
            tracing::debug!("no surface attached; activation skipped");
            return;
        };
        self.resize_attached = true;
        if let Some(geometry) = self.deferred_geometry.take() {
            surface.resize(geometry);
        }

        let clock = match FrameClock::new(self.opts.window, now) {
            Ok(clock) => clock,
            Err(e) => {
                tracing::warn!(error = %e, "activation skipped");
                return;
            }
        };
        let mut synth = PatternSynthesizer::new(
            self.pattern,
            surface.geometry().logical,
            self.opts.particle_count,
            &mut *self.rng,
        );
        if let Err(e) = synth.set_tile_size(self.opts.tile_size) {
            tracing::warn!(error = %e, "keeping default tile size");
        }

        self.active = Some(Activation {
            origin: now,
            clock,
            synth,
        });
        self.pending = Some(sched.request_frame());
    }

    fn deactivate(&mut self, sched: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending.take() {
            let canceled = sched.cancel_frame(handle);
            tracing::debug!(?handle, canceled, "pending frame canceled");
        }
        self.resize_attached = false;
        self.active = None;
    }

    /// Active pattern.
    pub fn pattern(&self) -> PatternKind {
        self.pattern
    }

    /// Whether playback is on.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// `true` while an activation is producing frames.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Callback this loop is waiting for.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Whether surface geometry changes are applied immediately.
    pub fn resize_attached(&self) -> bool {
        self.resize_attached
    }

    /// Most recent pattern-FPS reading, zero after a pattern change.
    pub fn last_fps(&self) -> FpsReading {
        self.last_fps
    }

    /// Time origin of the current activation.
    pub fn activation_origin(&self) -> Option<Timestamp> {
        self.active.as_ref().map(|a| a.origin)
    }

    /// FPS accumulator of the current activation.
    pub fn frame_clock(&self) -> Option<&FrameClock> {
        self.active.as_ref().map(|a| &a.clock)
    }

    /// Particles of the current activation, for the `particles` pattern.
    pub fn particles(&self) -> Option<&[Particle]> {
        self.active.as_ref().and_then(|a| a.synth.particles())
    }

    /// Attached surface.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// Options this loop was built with.
    pub fn opts(&self) -> &RenderLoopOpts {
        &self.opts
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_loop.rs"]
mod tests;

//! Procedural frame patterns.
//!
//! Every pattern is a function of elapsed time and surface size. Only `particles` carries state
//! between frames, owned by the [`PatternSynthesizer`] of one activation.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::foundation::core::LogicalSize;
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::render::raster::Painter;

pub(crate) mod checkerboard;
pub(crate) mod gradient;
pub(crate) mod overlay;
pub(crate) mod particles;
pub(crate) mod wave;

pub use overlay::{DiagnosticOverlay, overlay_lines};
pub use particles::{Particle, ParticleField};

/// Number of particles spawned per activation.
pub const DEFAULT_PARTICLE_COUNT: usize = 100;
/// Checkerboard tile edge in logical pixels.
pub const DEFAULT_TILE_SIZE: f64 = 40.0;

/// The selectable procedural patterns.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    /// Diagonal three-stop gradient with cycling hue.
    Gradient,
    /// Shifting colored checker tiles.
    Checkerboard,
    /// Quarter-resolution field of three sine waves.
    Wave,
    /// Bouncing colored discs.
    Particles,
}

impl PatternKind {
    /// All patterns in carousel order.
    pub const ALL: [PatternKind; 4] = [
        PatternKind::Gradient,
        PatternKind::Checkerboard,
        PatternKind::Wave,
        PatternKind::Particles,
    ];

    /// Short identifier, also shown in the diagnostic overlay.
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Gradient => "gradient",
            PatternKind::Checkerboard => "checkerboard",
            PatternKind::Wave => "wave",
            PatternKind::Particles => "particles",
        }
    }

    /// Human-facing title.
    pub fn title(self) -> &'static str {
        match self {
            PatternKind::Gradient => "120 FPS Animated Gradient",
            PatternKind::Checkerboard => "120 FPS Moving Checkerboard",
            PatternKind::Wave => "120 FPS Wave Pattern",
            PatternKind::Particles => "120 FPS Particle System",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    /// Next pattern, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous pattern, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatternKind {
    type Err = FramepaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        PatternKind::ALL
            .into_iter()
            .find(|k| k.name() == needle)
            .ok_or_else(|| {
                FramepaceError::validation(format!(
                    "unknown pattern '{s}' (expected gradient, checkerboard, wave or particles)"
                ))
            })
    }
}

/// Per-activation mutable pattern state.
#[derive(Clone, Debug, PartialEq)]
pub enum PatternState {
    /// Patterns that are pure functions of time.
    Stateless,
    /// Particle simulation owned by the activation.
    Particles(ParticleField),
}

/// Synthesizes frames for one pattern activation.
#[derive(Clone, Debug)]
pub struct PatternSynthesizer {
    kind: PatternKind,
    state: PatternState,
    tile_size: f64,
}

impl PatternSynthesizer {
    /// Start a fresh activation of `kind`. Particles are spawned inside `bounds` from `rng`.
    pub fn new<R: Rng + ?Sized>(
        kind: PatternKind,
        bounds: LogicalSize,
        particle_count: usize,
        rng: &mut R,
    ) -> Self {
        let state = match kind {
            PatternKind::Particles => {
                PatternState::Particles(ParticleField::spawn(particle_count, bounds, rng))
            }
            _ => PatternState::Stateless,
        };
        Self {
            kind,
            state,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Synthesizer for a stateless pattern. Particles start with an empty field.
    pub fn stateless(kind: PatternKind) -> Self {
        let state = match kind {
            PatternKind::Particles => PatternState::Particles(ParticleField::default()),
            _ => PatternState::Stateless,
        };
        Self {
            kind,
            state,
            tile_size: DEFAULT_TILE_SIZE,
        }
    }

    /// Override the checkerboard tile size; non-positive values are rejected.
    pub fn with_tile_size(mut self, tile_size: f64) -> FramepaceResult<Self> {
        self.set_tile_size(tile_size)?;
        Ok(self)
    }

    /// In-place form of [`PatternSynthesizer::with_tile_size`].
    pub fn set_tile_size(&mut self, tile_size: f64) -> FramepaceResult<()> {
        if !tile_size.is_finite() || tile_size <= 0.0 {
            return Err(FramepaceError::validation(
                "tile size must be finite and > 0",
            ));
        }
        self.tile_size = tile_size;
        Ok(())
    }

    /// Checkerboard tile edge in logical pixels.
    pub fn tile_size(&self) -> f64 {
        self.tile_size
    }

    /// Pattern being synthesized.
    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// Current state.
    pub fn state(&self) -> &PatternState {
        &self.state
    }

    /// Particles of a `particles` activation.
    pub fn particles(&self) -> Option<&[Particle]> {
        match &self.state {
            PatternState::Particles(field) => Some(field.particles()),
            PatternState::Stateless => None,
        }
    }

    /// Run `floor(elapsed_secs * steps_per_sec)` particle steps within `bounds`.
    ///
    /// Returns the number of steps taken; always 0 for stateless patterns.
    pub fn advance_to(
        &mut self,
        elapsed_secs: f64,
        steps_per_sec: f64,
        bounds: LogicalSize,
    ) -> u64 {
        let PatternState::Particles(field) = &mut self.state else {
            return 0;
        };
        let steps = (elapsed_secs * steps_per_sec).max(0.0).floor() as u64;
        for _ in 0..steps {
            field.step(bounds);
        }
        steps
    }

    /// Draw the pattern for `elapsed_secs` (advancing particle physics by one step).
    ///
    /// Empty surfaces are a no-op.
    pub fn draw(&mut self, elapsed_secs: f64, painter: &mut Painter<'_>) -> FramepaceResult<()> {
        self.draw_frame(elapsed_secs, painter, true)
    }

    /// Draw the pattern for `elapsed_secs` without touching particle state.
    pub fn draw_still(
        &mut self,
        elapsed_secs: f64,
        painter: &mut Painter<'_>,
    ) -> FramepaceResult<()> {
        self.draw_frame(elapsed_secs, painter, false)
    }

    fn draw_frame(
        &mut self,
        elapsed_secs: f64,
        painter: &mut Painter<'_>,
        step: bool,
    ) -> FramepaceResult<()> {
        let size = painter.logical_size();
        if size.is_empty() {
            return Ok(());
        }
        match (&mut self.state, self.kind) {
            (_, PatternKind::Gradient) => gradient::draw(elapsed_secs, painter),
            (_, PatternKind::Checkerboard) => {
                checkerboard::draw(elapsed_secs, self.tile_size, painter);
                Ok(())
            }
            (_, PatternKind::Wave) => wave::draw(elapsed_secs, painter),
            (PatternState::Particles(field), PatternKind::Particles) => {
                if step {
                    field.step(size);
                }
                field.draw(painter);
                Ok(())
            }
            (PatternState::Stateless, PatternKind::Particles) => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pattern/mod.rs"]
mod tests;

use rand::Rng;

use crate::foundation::color::hsl_to_rgba8;
use crate::foundation::core::{LogicalSize, Point, Rgba8};
use crate::render::raster::Painter;

/// Disc radius in logical pixels.
pub const PARTICLE_RADIUS: f64 = 4.0;
/// Maximum absolute velocity component, in logical pixels per frame.
pub const MAX_SPEED: f64 = 2.0;

/// One bouncing disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Horizontal velocity per step.
    pub vx: f64,
    /// Vertical velocity per step.
    pub vy: f64,
    /// Display color, fixed at creation.
    pub color: Rgba8,
}

impl Particle {
    /// Integrate one step and reflect off the bounds.
    ///
    /// Reaching or crossing an edge negates the matching velocity component, then the position
    /// is clamped into `[0, width] x [0, height]`.
    pub fn step(&mut self, bounds: LogicalSize) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x <= 0.0 || self.x >= bounds.width {
            self.vx = -self.vx;
        }
        if self.y <= 0.0 || self.y >= bounds.height {
            self.vy = -self.vy;
        }

        self.x = self.x.clamp(0.0, bounds.width);
        self.y = self.y.clamp(0.0, bounds.height);
    }
}

/// The particle collection of one activation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Spawn `count` particles with uniform positions inside `bounds`, velocities in
    /// `(-MAX_SPEED, MAX_SPEED)` and random hues.
    pub fn spawn<R: Rng + ?Sized>(count: usize, bounds: LogicalSize, rng: &mut R) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.random::<f64>() * bounds.width,
                y: rng.random::<f64>() * bounds.height,
                vx: (rng.random::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                vy: (rng.random::<f64>() - 0.5) * 2.0 * MAX_SPEED,
                color: hsl_to_rgba8(rng.random::<f64>() * 360.0, 0.7, 0.6),
            })
            .collect();
        Self { particles }
    }

    /// Field made of explicit particles.
    pub fn from_particles(particles: Vec<Particle>) -> Self {
        Self { particles }
    }

    /// Current particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` when the field holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every particle by one step.
    pub fn step(&mut self, bounds: LogicalSize) {
        for p in &mut self.particles {
            p.step(bounds);
        }
    }

    pub(crate) fn draw(&self, painter: &mut Painter<'_>) {
        for p in &self.particles {
            painter.fill_circle(Point::new(p.x, p.y), PARTICLE_RADIUS, p.color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/particles.rs"]
mod tests;

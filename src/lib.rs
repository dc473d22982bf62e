//! Framepace renders procedural full-frame patterns at the host's refresh rate and measures two
//! independent frame rates while doing it.
//!
//! - A [`RenderLoop`] owns one [`Surface`], draws the active [`PatternKind`] on every refresh
//!   callback and reports a pattern-FPS reading every 500 ms.
//! - An [`AppLoopMonitor`] ticks on every refresh regardless of playback and keeps a rolling
//!   average of the host's own cadence.
//! - Both are driven through a [`FrameScheduler`]; [`HeadlessHost`] provides one for running
//!   without a display.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Windowed FPS estimation.
pub mod clock;
/// JSON configuration.
pub mod config;
/// Headless host and clocks.
pub mod host;
/// Procedural patterns.
pub mod pattern;
/// CPU rasterization and surfaces.
pub mod render;
/// Refresh-callback scheduling.
pub mod schedule;
/// Render loop and app loop monitor.
pub mod session;
/// Frame sinks.
pub mod sink;

pub use crate::foundation::color::{circular_mean_hue, hsl_to_rgba8};
pub use crate::foundation::core::{
    Affine, BezPath, LogicalSize, PixelRatio, Point, Rect, Rgba8, Timestamp, Vec2,
};
pub use crate::foundation::error::{FramepaceError, FramepaceResult};

pub use crate::clock::{FpsHistory, FpsReading, FpsTier, FrameClock};
pub use crate::config::FramepaceConfig;
pub use crate::host::{HeadlessHost, HostClock, HostOpts, RunReport, SystemClock, VirtualClock};
pub use crate::pattern::{Particle, ParticleField, PatternKind, PatternState, PatternSynthesizer};
pub use crate::render::surface::{FrameRGBA, Surface, SurfaceGeometry};
pub use crate::render::text::FontFace;
pub use crate::schedule::{FrameHandle, FrameScheduler, IntervalScheduler, ManualScheduler};
pub use crate::session::{AppFpsSnapshot, AppLoopMonitor, FrameOutcome, RenderLoop, RenderLoopOpts};
pub use crate::sink::{FrameIndex, FrameSink, InMemorySink, PngSnapshotSink, SinkConfig};

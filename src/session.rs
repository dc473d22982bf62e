//! Refresh-driven loops: the per-surface pattern renderer and the app loop monitor.

/// Host refresh cadence monitor.
pub mod app_monitor;
/// Per-surface pattern loop.
pub mod render_loop;

pub use app_monitor::{AppFpsSnapshot, AppLoopMonitor};
pub use render_loop::{FrameOutcome, RenderLoop, RenderLoopOpts};

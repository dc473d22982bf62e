//! JSON run configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clock::{MONITOR_HISTORY, TARGET_FPS};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::host::HostOpts;
use crate::pattern::{DEFAULT_PARTICLE_COUNT, DEFAULT_TILE_SIZE};
use crate::render::text::FontFace;
use crate::session::RenderLoopOpts;

/// Environment variable naming the overlay font file.
pub const FONT_ENV: &str = "FRAMEPACE_FONT";

/// Tunables shared by the library entry points and the CLI.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramepaceConfig {
    /// Pattern-FPS sampling window in milliseconds.
    pub pattern_window_ms: u64,
    /// App loop monitor window in milliseconds.
    pub monitor_window_ms: u64,
    /// App loop monitor rolling-average capacity.
    pub monitor_history: usize,
    /// Particles per `particles` activation.
    pub particle_count: usize,
    /// Checkerboard tile edge in logical pixels.
    pub tile_size: f64,
    /// Target frame rate. Also the default headless refresh rate.
    pub target_fps: u32,
    /// Draw the diagnostic overlay.
    pub overlay: bool,
    /// Overlay font file; system fonts are used when unset.
    pub font_path: Option<PathBuf>,
}

impl Default for FramepaceConfig {
    fn default() -> Self {
        Self {
            pattern_window_ms: 500,
            monitor_window_ms: 250,
            monitor_history: MONITOR_HISTORY,
            particle_count: DEFAULT_PARTICLE_COUNT,
            tile_size: DEFAULT_TILE_SIZE,
            target_fps: TARGET_FPS,
            overlay: true,
            font_path: None,
        }
    }
}

impl FramepaceConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> FramepaceResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| FramepaceError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Path) -> FramepaceResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            FramepaceError::config(format!("read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> FramepaceResult<()> {
        if self.pattern_window_ms == 0 {
            return Err(FramepaceError::config("pattern_window_ms must be > 0"));
        }
        if self.monitor_window_ms == 0 {
            return Err(FramepaceError::config("monitor_window_ms must be > 0"));
        }
        if self.monitor_history == 0 {
            return Err(FramepaceError::config("monitor_history must be > 0"));
        }
        if !self.tile_size.is_finite() || self.tile_size <= 0.0 {
            return Err(FramepaceError::config(
                "tile_size must be finite and > 0",
            ));
        }
        if self.target_fps == 0 {
            return Err(FramepaceError::config("target_fps must be > 0"));
        }
        Ok(())
    }

    /// Options for a [`crate::RenderLoop`].
    pub fn render_loop_opts(&self) -> RenderLoopOpts {
        RenderLoopOpts {
            window: Duration::from_millis(self.pattern_window_ms),
            particle_count: self.particle_count,
            tile_size: self.tile_size,
            overlay: self.overlay,
        }
    }

    /// Host options at the target rate. Duration, cycling and geometry keep their defaults.
    pub fn host_opts(&self) -> HostOpts {
        HostOpts {
            rate_hz: f64::from(self.target_fps),
            monitor_window: Duration::from_millis(self.monitor_window_ms),
            monitor_history: self.monitor_history,
            target_fps: self.target_fps,
            ..HostOpts::default()
        }
    }

    /// Font path after applying the [`FONT_ENV`] override.
    pub fn effective_font_path(&self) -> Option<PathBuf> {
        std::env::var_os(FONT_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| self.font_path.clone())
    }

    /// Load the overlay font, or `None` when the overlay is off or no font is available.
    pub fn resolve_font(&self) -> Option<FontFace> {
        if !self.overlay {
            return None;
        }
        FontFace::resolve(self.effective_font_path().as_deref())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

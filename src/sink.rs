//! Consumers of presented frames.

use std::path::{Path, PathBuf};

use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::render::surface::FrameRGBA;

/// Sequence number of a presented frame within one run, starting at zero.
pub type FrameIndex = u64;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkConfig {
    /// Backing width in pixels.
    pub width: u32,
    /// Backing height in pixels.
    pub height: u32,
    /// Nominal presentation rate.
    pub rate_hz: f64,
}

/// Sink contract for consuming presented frames.
///
/// `push_frame` is called in strictly increasing `FrameIndex` order. Indices may skip when
/// [`FrameSink::wants_frame`] declines a frame.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> FramepaceResult<()>;

    /// Whether the caller should read back frame `idx` at all.
    fn wants_frame(&self, _idx: FrameIndex) -> bool {
        true
    }

    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FramepaceResult<()>;

    /// Called once after the last frame.
    fn end(&mut self) -> FramepaceResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    every: u64,
    ended: bool,
}

impl InMemorySink {
    /// Sink keeping every frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink keeping one frame out of `n`.
    pub fn every(n: u64) -> Self {
        Self {
            every: n,
            ..Self::default()
        }
    }

    /// Configuration captured in `begin`.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Captured frames in presentation order.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// `true` once `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> FramepaceResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn wants_frame(&self, idx: FrameIndex) -> bool {
        self.every <= 1 || idx % self.every == 0
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FramepaceResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> FramepaceResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Keeps the most recent frame and writes it as a PNG when the run ends.
#[derive(Debug)]
pub struct PngSnapshotSink {
    path: PathBuf,
    last: Option<(FrameIndex, FrameRGBA)>,
}

impl PngSnapshotSink {
    /// Sink writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            last: None,
        }
    }

    /// Output path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Frame that will be written.
    pub fn last_frame(&self) -> Option<&(FrameIndex, FrameRGBA)> {
        self.last.as_ref()
    }
}

impl FrameSink for PngSnapshotSink {
    fn begin(&mut self, _cfg: SinkConfig) -> FramepaceResult<()> {
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> FramepaceResult<()> {
        match self.last.as_mut() {
            Some((last_idx, last)) => {
                *last_idx = idx;
                last.clone_from(frame);
            }
            None => self.last = Some((idx, frame.clone())),
        }
        Ok(())
    }

    fn end(&mut self) -> FramepaceResult<()> {
        let Some((idx, frame)) = self.last.take() else {
            tracing::warn!(path = %self.path.display(), "no frame presented; snapshot not written");
            return Ok(());
        };
        write_png(&self.path, &frame)?;
        tracing::info!(path = %self.path.display(), frame = idx, "snapshot written");
        Ok(())
    }
}

/// Write `frame` as an RGBA8 PNG, converting premultiplied pixels to straight alpha.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> FramepaceResult<()> {
    let expected = (frame.width as usize) * (frame.height as usize) * 4;
    if frame.data.len() != expected {
        return Err(FramepaceError::validation(format!(
            "frame data is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    let straight = frame.clone().into_straight();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    image::save_buffer_with_format(
        path,
        &straight.data,
        straight.width,
        straight.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| FramepaceError::render(format!("write png '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../tests/unit/sink.rs"]
mod tests;

use crate::foundation::error::{FramepaceError, FramepaceResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Monotonic high-resolution timestamp in milliseconds.
///
/// Hosts feed these into the loops; the origin is arbitrary (process start for the
/// built-in clocks), only differences are meaningful.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Timestamp(pub f64);

impl Timestamp {
    /// Zero timestamp.
    pub const ZERO: Timestamp = Timestamp(0.0);

    /// Construct from milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    /// Milliseconds since the clock origin.
    pub fn as_millis(self) -> f64 {
        self.0
    }

    /// Milliseconds elapsed since `earlier`, never negative.
    pub fn millis_since(self, earlier: Timestamp) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }

    /// Seconds elapsed since `earlier`, never negative.
    pub fn secs_since(self, earlier: Timestamp) -> f64 {
        self.millis_since(earlier) / 1000.0
    }

    /// Timestamp shifted forward by `ms`.
    pub fn add_millis(self, ms: f64) -> Self {
        Self(self.0 + ms)
    }
}

/// Display-independent surface size in logical (CSS-style) pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LogicalSize {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl LogicalSize {
    /// Construct a size; negative or non-finite extents collapse to zero.
    pub fn new(width: f64, height: f64) -> Self {
        fn sanitize(v: f64) -> f64 {
            if v.is_finite() && v > 0.0 { v } else { 0.0 }
        }
        Self {
            width: sanitize(width),
            height: sanitize(height),
        }
    }

    /// `true` when either extent is zero.
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Ratio between backing (device) pixels and logical pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRatio(f64);

impl PixelRatio {
    /// Ratio of a standard-density display.
    pub const ONE: PixelRatio = PixelRatio(1.0);

    /// Validated constructor: must be finite and > 0.
    pub fn new(ratio: f64) -> FramepaceResult<Self> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(FramepaceError::validation(
                "device pixel ratio must be finite and > 0",
            ));
        }
        Ok(Self(ratio))
    }

    /// Ratio as `f64`.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self::ONE
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Rgba8 = Rgba8::opaque(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Rgba8 = Rgba8::opaque(255, 255, 255);

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with alpha replaced by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Premultiplied byte quadruple.
    pub fn to_premul_array(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let premul = |c: u8| -> u8 { (((u16::from(c) * a) + 127) / 255) as u8 };
        [premul(self.r), premul(self.g), premul(self.b), self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

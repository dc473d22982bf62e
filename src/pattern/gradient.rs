use crate::foundation::color::{circular_mean_hue, hsl_to_rgba8, wrap_hue};
use crate::foundation::core::{Point, Rect, Rgba8};
use crate::foundation::error::FramepaceResult;
use crate::render::raster::Painter;

const HUE_DEG_PER_SEC: f64 = 30.0;
const SATURATION: f64 = 0.7;
const STOP_LIGHTNESS: [f64; 3] = [0.5, 0.4, 0.3];

/// Hues of the three gradient stops at `elapsed_secs`.
pub(crate) fn stop_hues(elapsed_secs: f64) -> [f64; 3] {
    let h0 = wrap_hue(elapsed_secs * HUE_DEG_PER_SEC);
    let h2 = wrap_hue(h0 + 180.0);
    [h0, circular_mean_hue(h0, h2), h2]
}

/// Colors of the three stops (at offsets 0, 0.5 and 1).
pub(crate) fn stop_colors(elapsed_secs: f64) -> [Rgba8; 3] {
    let hues = stop_hues(elapsed_secs);
    [0, 1, 2].map(|i| hsl_to_rgba8(hues[i], SATURATION, STOP_LIGHTNESS[i]))
}

/// Offsets of the three stops along the top-left to bottom-right diagonal.
const STOP_OFFSETS: [f32; 3] = [0.0, 0.5, 1.0];

pub(crate) fn draw(elapsed_secs: f64, painter: &mut Painter<'_>) -> FramepaceResult<()> {
    let size = painter.logical_size();
    let colors = stop_colors(elapsed_secs);
    painter.fill_linear_gradient(
        Rect::new(0.0, 0.0, size.width, size.height),
        Point::ZERO,
        Point::new(size.width, size.height),
        [0, 1, 2].map(|i| (STOP_OFFSETS[i], colors[i])),
    );
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/gradient.rs"]
mod tests;

use crate::foundation::color::{hsl_to_rgba8, wrap_hue};
use crate::foundation::core::{Rect, Rgba8};
use crate::render::raster::Painter;

const SHIFTS_PER_SEC: f64 = 4.0;
const HUE_DEG_PER_SEC: f64 = 60.0;

/// Whether tile `(tile_x, tile_y)` is painted at `elapsed_secs`.
pub(crate) fn tile_painted(tile_x: u64, tile_y: u64, elapsed_secs: f64) -> bool {
    let shift = (elapsed_secs * SHIFTS_PER_SEC).floor().max(0.0) as u64;
    (tile_x + tile_y + shift) % 2 == 0
}

/// Color of a painted tile whose top-left corner is at `(x, y)` logical pixels.
pub(crate) fn tile_color(x: f64, y: f64, elapsed_secs: f64) -> Rgba8 {
    hsl_to_rgba8(wrap_hue(elapsed_secs * HUE_DEG_PER_SEC + x + y), 0.7, 0.5)
}

pub(crate) fn draw(elapsed_secs: f64, tile: f64, painter: &mut Painter<'_>) {
    let size = painter.logical_size();
    let mut tile_y = 0u64;
    while (tile_y as f64) * tile < size.height {
        let y = (tile_y as f64) * tile;
        let mut tile_x = 0u64;
        while (tile_x as f64) * tile < size.width {
            let x = (tile_x as f64) * tile;
            if tile_painted(tile_x, tile_y, elapsed_secs) {
                painter.fill_rect(
                    Rect::new(x, y, x + tile, y + tile),
                    tile_color(x, y, elapsed_secs),
                );
            }
            tile_x += 1;
        }
        tile_y += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/checkerboard.rs"]
mod tests;

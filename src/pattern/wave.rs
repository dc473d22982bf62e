use crate::foundation::color::unit_sine_to_u8;
use crate::foundation::core::Rgba8;
use crate::foundation::error::FramepaceResult;
use crate::render::raster::{Painter, PixelBuffer};

/// Sample spacing in logical pixels along both axes.
pub(crate) const STRIDE: u32 = 2;

/// Field value at logical pixel `(x, y)`.
pub(crate) fn sample(x: f64, y: f64, t: f64) -> Rgba8 {
    let r = (x * 0.02 + t * 2.0).sin();
    let g = (y * 0.02 + t * 1.5).sin();
    let b = ((x + y) * 0.01 + t * 3.0).sin();
    Rgba8::opaque(unit_sine_to_u8(r), unit_sine_to_u8(g), unit_sine_to_u8(b))
}

/// Rasterize the field at logical resolution, one sample per `STRIDE`×`STRIDE` block.
pub(crate) fn rasterize(elapsed_secs: f64, width: u32, height: u32) -> PixelBuffer {
    let mut buf = PixelBuffer::new(width, height);
    for y in (0..height).step_by(STRIDE as usize) {
        for x in (0..width).step_by(STRIDE as usize) {
            let c = sample(f64::from(x), f64::from(y), elapsed_secs);
            buf.fill_block(x, y, STRIDE, STRIDE, c);
        }
    }
    buf
}

pub(crate) fn draw(elapsed_secs: f64, painter: &mut Painter<'_>) -> FramepaceResult<()> {
    let size = painter.logical_size();
    let w = size.width.ceil() as u32;
    let h = size.height.ceil() as u32;
    let buf = rasterize(elapsed_secs, w, h);
    painter.draw_logical_image(&buf)
}

#[cfg(test)]
#[path = "../../tests/unit/pattern/wave.rs"]
mod tests;

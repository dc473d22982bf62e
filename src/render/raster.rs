use std::sync::Arc;

use crate::foundation::core::{Affine, BezPath, LogicalSize, Point, Rect, Rgba8};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use kurbo::Shape;

/// Premultiplied RGBA8 scratch image, row-major and tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        Self {
            width,
            height,
            data: vec![0u8; len],
        }
    }

    /// `true` when the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Write one pixel. Out-of-range coordinates are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[idx..idx + 4].copy_from_slice(&color.to_premul_array());
    }

    /// Fill an axis-aligned block clipped to the buffer.
    pub fn fill_block(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba8) {
        let px = color.to_premul_array();
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for yy in y..y_end {
            let row = (yy as usize) * (self.width as usize);
            for xx in x..x_end {
                let idx = (row + xx as usize) * 4;
                self.data[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    /// Read one pixel as premultiplied bytes.
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[idx..idx + 4]);
        Some(out)
    }
}

/// Drawing handle for one frame, in logical coordinates.
///
/// The base transform maps logical pixels to backing pixels; it is fixed for the lifetime of the
/// painter and only changes when the surface is resized.
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    base: Affine,
    logical: LogicalSize,
    ratio: f64,
    backing_width: u32,
    backing_height: u32,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(
        ctx: &'a mut vello_cpu::RenderContext,
        logical: LogicalSize,
        ratio: f64,
        backing_width: u32,
        backing_height: u32,
    ) -> Self {
        Self {
            ctx,
            base: Affine::scale(ratio),
            logical,
            ratio,
            backing_width,
            backing_height,
        }
    }

    /// Logical surface size.
    pub fn logical_size(&self) -> LogicalSize {
        self.logical
    }

    /// Device pixel ratio applied by the base transform.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// Backing buffer size in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        (self.backing_width, self.backing_height)
    }

    /// Fill a logical-space rectangle with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill a logical-space disc.
    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        let circle = kurbo::Circle::new(center, radius);
        let mut path = BezPath::new();
        for el in circle.path_elements(0.1) {
            path.push(el);
        }
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(color));
        self.ctx.fill_path(&bezpath_to_cpu(&path));
    }

    /// Draw an image whose pixels are logical pixels, anchored at the origin.
    pub fn draw_logical_image(&mut self, image: &PixelBuffer) -> FramepaceResult<()> {
        if image.is_empty() {
            return Ok(());
        }
        let paint = image_from_premul(image)?;
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(paint);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(image.width),
            f64::from(image.height),
        ));
        Ok(())
    }

    /// Fill a logical-space rectangle with a linear gradient running from `start` to `end`.
    ///
    /// Stops are `(offset, color)` pairs with offsets in `[0, 1]`, interpolated in sRGB.
    pub fn fill_linear_gradient<const N: usize>(
        &mut self,
        rect: Rect,
        start: Point,
        end: Point,
        stops: [(f32, Rgba8); N],
    ) {
        let gradient =
            vello_cpu::peniko::Gradient::new_linear(point_to_cpu(start), point_to_cpu(end))
                .with_stops(stops.map(|(offset, c)| (offset, color_to_cpu(c))));
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(gradient);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Raw context access for glyph runs, with the transform for `origin` already applied.
    pub(crate) fn ctx_at(&mut self, origin: Point) -> &mut vello_cpu::RenderContext {
        let tr = self.base * Affine::translate(origin.to_vec2());
        self.ctx.set_transform(affine_to_cpu(tr));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        &mut *self.ctx
    }
}

pub(crate) fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

pub(crate) fn pixmap_from_premul(buf: &PixelBuffer) -> FramepaceResult<vello_cpu::Pixmap> {
    let w: u16 = buf
        .width
        .try_into()
        .map_err(|_| FramepaceError::render("pixmap width exceeds u16"))?;
    let h: u16 = buf
        .height
        .try_into()
        .map_err(|_| FramepaceError::render("pixmap height exceeds u16"))?;
    if buf.data.len() != (buf.width as usize) * (buf.height as usize) * 4 {
        return Err(FramepaceError::render("pixmap byte len mismatch"));
    }
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (buf.width as usize) * (buf.height as usize),
    );
    for px in buf.data.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

fn image_from_premul(buf: &PixelBuffer) -> FramepaceResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul(buf)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;

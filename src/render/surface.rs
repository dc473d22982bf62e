use crate::foundation::core::{LogicalSize, PixelRatio, Rgba8};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::render::raster::{Painter, color_to_cpu};

/// A presented frame read back from a surface.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in backing pixels.
    pub width: u32,
    /// Frame height in backing pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha in place; no-op when already straight.
    pub fn into_straight(mut self) -> Self {
        if !self.premultiplied {
            return self;
        }
        for px in self.data.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            if a == 0 || a == 255 {
                continue;
            }
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        self.premultiplied = false;
        self
    }

    /// Read one pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let mut out = [0u8; 4];
        out.copy_from_slice(&self.data[idx..idx + 4]);
        Some(out)
    }
}

/// Display geometry of a drawing region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceGeometry {
    /// Size in logical pixels.
    pub logical: LogicalSize,
    /// Device pixel ratio.
    pub ratio: PixelRatio,
}

impl SurfaceGeometry {
    /// Geometry with an explicit pixel ratio.
    pub fn new(logical: LogicalSize, ratio: PixelRatio) -> Self {
        Self { logical, ratio }
    }

    /// Geometry at ratio 1.
    pub fn from_logical(width: f64, height: f64) -> Self {
        Self::new(LogicalSize::new(width, height), PixelRatio::ONE)
    }

    /// Backing buffer size: `logical * ratio`, rounded, capped by the rasterizer limit.
    pub fn backing_size(self) -> (u16, u16) {
        fn scale(v: f64, r: f64) -> u16 {
            (v * r).round().clamp(0.0, f64::from(u16::MAX)) as u16
        }
        let r = self.ratio.get();
        (scale(self.logical.width, r), scale(self.logical.height, r))
    }

    /// `true` when the backing buffer would hold no pixels.
    pub fn is_degenerate(self) -> bool {
        let (w, h) = self.backing_size();
        w == 0 || h == 0
    }
}

/// Double-buffered drawing surface.
///
/// Frames are rasterized into the back buffer and become visible only when the buffers are
/// swapped, so readers of the front buffer never observe a partially drawn frame.
pub struct Surface {
    geometry: SurfaceGeometry,
    buffers: Option<[vello_cpu::Pixmap; 2]>,
    front: usize,
    ctx: Option<vello_cpu::RenderContext>,
    presented: u64,
}

impl Surface {
    /// Allocate a surface for `geometry`.
    pub fn new(geometry: SurfaceGeometry) -> Self {
        let mut out = Self {
            geometry,
            buffers: None,
            front: 0,
            ctx: None,
            presented: 0,
        };
        out.allocate();
        out
    }

    fn allocate(&mut self) {
        let (w, h) = self.geometry.backing_size();
        self.front = 0;
        self.buffers = if w == 0 || h == 0 {
            None
        } else {
            Some([vello_cpu::Pixmap::new(w, h), vello_cpu::Pixmap::new(w, h)])
        };
    }

    /// Current display geometry.
    pub fn geometry(&self) -> SurfaceGeometry {
        self.geometry
    }

    /// Backing buffer size in device pixels.
    pub fn backing_size(&self) -> (u16, u16) {
        self.geometry.backing_size()
    }

    /// Number of frames swapped to the front so far.
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    /// Apply a geometry change. Returns `true` when the backing buffers were reallocated.
    ///
    /// Reallocation clears both buffers, matching a canvas whose size attribute changed.
    pub fn resize(&mut self, geometry: SurfaceGeometry) -> bool {
        let old_backing = self.geometry.backing_size();
        self.geometry = geometry;
        if geometry.backing_size() == old_backing {
            return false;
        }
        tracing::debug!(
            from = ?old_backing,
            to = ?geometry.backing_size(),
            ratio = geometry.ratio.get(),
            "surface backing resized"
        );
        self.allocate();
        true
    }

    /// Rasterize one frame into the back buffer and swap it to the front.
    ///
    /// The back buffer is cleared to opaque black before `draw` runs. Returns `Ok(false)` without
    /// calling `draw` when the surface has no pixels.
    pub fn render_frame(
        &mut self,
        draw: impl FnOnce(&mut Painter<'_>) -> FramepaceResult<()>,
    ) -> FramepaceResult<bool> {
        let Some(buffers) = self.buffers.as_mut() else {
            return Ok(false);
        };
        let (w, h) = self.geometry.backing_size();

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(color_to_cpu(Rgba8::BLACK));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));

        let drawn = {
            let mut painter = Painter::new(
                &mut ctx,
                self.geometry.logical,
                self.geometry.ratio.get(),
                u32::from(w),
                u32::from(h),
            );
            draw(&mut painter)
        };
        if let Err(e) = drawn {
            self.ctx = Some(ctx);
            return Err(e);
        }

        let back = 1 - self.front;
        ctx.flush();
        ctx.render_to_pixmap(&mut buffers[back]);
        self.ctx = Some(ctx);
        self.front = back;
        self.presented += 1;
        Ok(true)
    }

    /// Copy the front buffer out as premultiplied RGBA8.
    pub fn front_frame(&self) -> Option<FrameRGBA> {
        let buffers = self.buffers.as_ref()?;
        let pm = &buffers[self.front];
        Some(FrameRGBA {
            width: u32::from(pm.width()),
            height: u32::from(pm.height()),
            data: pm.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Copy the front buffer into an existing frame, reusing its allocation.
    pub fn read_front_into(&self, out: &mut FrameRGBA) -> FramepaceResult<()> {
        let buffers = self
            .buffers
            .as_ref()
            .ok_or_else(|| FramepaceError::render("surface has no backing buffer"))?;
        let pm = &buffers[self.front];
        out.width = u32::from(pm.width());
        out.height = u32::from(pm.height());
        out.premultiplied = true;
        out.data.clear();
        out.data.extend_from_slice(pm.data_as_u8_slice());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

use std::path::Path;
use std::sync::Arc;

use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{FramepaceError, FramepaceResult};
use crate::render::raster::{Painter, color_to_cpu};

/// Font face bytes shared by every text renderer that uses them.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<Vec<u8>>,
    index: u32,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

impl FontFace {
    /// Load a face from a `.ttf`/`.otf`/`.ttc` file.
    pub fn from_path(path: &Path) -> FramepaceResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            FramepaceError::render(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Ok(Self::from_bytes(bytes, 0))
    }

    /// Wrap raw font bytes.
    pub fn from_bytes(bytes: Vec<u8>, index: u32) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index,
        }
    }

    /// Look up a monospace (falling back to sans-serif) face among system fonts.
    pub fn system_monospace() -> Option<Self> {
        use usvg::fontdb::{Database, Family, Query};

        let mut db = Database::new();
        db.load_system_fonts();
        let query = Query {
            families: &[Family::Monospace, Family::SansSerif],
            ..Default::default()
        };
        let id = db.query(&query)?;
        db.with_face_data(id, |data, index| Self::from_bytes(data.to_vec(), index))
    }

    /// Resolve the overlay font: an explicit file wins, system fonts are the fallback.
    pub fn resolve(path: Option<&Path>) -> Option<Self> {
        if let Some(p) = path {
            match Self::from_path(p) {
                Ok(face) => return Some(face),
                Err(e) => tracing::warn!(error = %e, "overlay font unusable, trying system fonts"),
            }
        }
        let face = Self::system_monospace();
        if face.is_none() {
            tracing::warn!("no system font found; overlay text is disabled");
        }
        face
    }
}

/// Single-line text drawing on top of Parley layout and `vello_cpu` glyph runs.
pub struct TextRenderer {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgba8>,
    font: Option<(vello_cpu::peniko::FontData, String)>,
}

impl TextRenderer {
    /// Renderer for `face`. A missing face, or one Parley cannot register, draws nothing.
    pub fn new(face: Option<FontFace>) -> Self {
        let mut font_ctx = parley::FontContext::default();
        let font = face.and_then(|face| {
            let families = font_ctx.collection.register_fonts(
                parley::fontique::Blob::from(face.bytes.as_ref().clone()),
                None,
            );
            let family_id = families.first().map(|(id, _)| *id)?;
            let family_name = font_ctx.collection.family_name(family_id)?.to_string();
            let data = vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(face.bytes.as_ref().clone()),
                face.index,
            );
            Some((data, family_name))
        });
        Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            font,
        }
    }

    /// `true` when a usable font is loaded.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` with its first baseline at `baseline` (logical coordinates).
    pub fn draw_line(
        &mut self,
        painter: &mut Painter<'_>,
        text: &str,
        baseline: Point,
        size_px: f32,
        color: Rgba8,
    ) {
        let Some((font, family_name)) = self.font.as_ref() else {
            return;
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));
        let mut layout: parley::Layout<Rgba8> = builder.build(text);
        layout.break_all_lines(None);

        let first_baseline = layout
            .lines()
            .next()
            .map(|line| f64::from(line.metrics().baseline))
            .unwrap_or(0.0);
        let ctx = painter.ctx_at(Point::new(baseline.x, baseline.y - first_baseline));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                ctx.set_paint(color_to_cpu(run.style().brush));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

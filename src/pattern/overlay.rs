use crate::foundation::core::{Point, Rect, Rgba8};
use crate::pattern::PatternKind;
use crate::render::raster::Painter;
use crate::render::text::{FontFace, TextRenderer};

const PANEL: Rect = Rect::new(10.0, 10.0, 310.0, 90.0);
const PANEL_ALPHA: f64 = 0.7;
const TEXT_X: f64 = 20.0;
const BASELINES: [f64; 3] = [30.0, 50.0, 70.0];
const FONT_SIZE_PX: f32 = 14.0;
/// Fixed rate used only to derive the displayed frame label.
const LABEL_FPS: f64 = 60.0;

/// The three overlay text lines for `kind` at `elapsed_secs`.
///
/// The frame figure is `floor(elapsed * 60)`, a label derived from time, not a measurement.
pub fn overlay_lines(kind: PatternKind, elapsed_secs: f64) -> [String; 3] {
    let t = elapsed_secs.max(0.0);
    [
        format!("Pattern: {}", kind.name()),
        format!("Frame: {}", (t * LABEL_FPS).floor() as u64),
        format!("Time: {t:.1}s"),
    ]
}

/// Fixed-position diagnostic panel drawn over every frame.
pub struct DiagnosticOverlay {
    text: TextRenderer,
}

impl DiagnosticOverlay {
    /// Overlay drawing its text with `face`; without a face only the panel is drawn.
    pub fn new(face: Option<FontFace>) -> Self {
        Self {
            text: TextRenderer::new(face),
        }
    }

    /// `true` when text lines will be drawn.
    pub fn has_text(&self) -> bool {
        self.text.has_font()
    }

    /// Draw the panel and its text.
    pub fn draw(&mut self, painter: &mut Painter<'_>, kind: PatternKind, elapsed_secs: f64) {
        painter.fill_rect(PANEL, Rgba8::BLACK.with_alpha(PANEL_ALPHA));
        let lines = overlay_lines(kind, elapsed_secs);
        for (line, baseline) in lines.iter().zip(BASELINES) {
            self.text.draw_line(
                painter,
                line,
                Point::new(TEXT_X, baseline),
                FONT_SIZE_PX,
                Rgba8::WHITE,
            );
        }
    }
}

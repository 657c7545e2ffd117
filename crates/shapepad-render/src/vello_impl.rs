//! Vello-backed drawing surface.

use crate::surface::{DrawingSurface, append_arc};
use crate::renderer::DEFAULT_FONT_SIZE;
use kurbo::{Affine, BezPath, Point, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use shapepad_core::TextMeasure;
use vello::Scene;

/// Ink color for outlines and text.
const INK: Color = Color::BLACK;

/// Drawing surface that records into a [`vello::Scene`].
///
/// Text is shaped with Parley against the system's sans-serif fonts, and the
/// same layouts answer width queries.
pub struct VelloSurface {
    scene: Scene,
    path: BezPath,
    line_width: f64,
    font_size: f64,
    /// Device pixels per surface unit.
    scale: f64,
    font_cx: FontContext,
    layout_cx: LayoutContext<Brush>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            path: BezPath::new(),
            line_width: 1.0,
            font_size: DEFAULT_FONT_SIZE,
            scale: 1.0,
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
        }
    }

    /// Scale everything drawn from now on, e.g. by the window's HiDPI factor.
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn layout(&mut self, text: &str) -> Layout<Brush> {
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(self.font_size as f32));
        builder.push_default(StyleProperty::Brush(Brush::Solid(INK)));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Source(
            "sans-serif".into(),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

impl TextMeasure for VelloSurface {
    fn text_width(&mut self, text: &str) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout(text).width() as f64
    }
}

impl DrawingSurface for VelloSurface {
    fn clear(&mut self) {
        self.scene.reset();
        self.path = BezPath::new();
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn begin_path(&mut self) {
        self.path = BezPath::new();
    }

    fn move_to(&mut self, point: Point) {
        self.path.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        if self.path.elements().is_empty() {
            self.path.move_to(point);
        } else {
            self.path.line_to(point);
        }
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, sweep_angle: f64) {
        append_arc(&mut self.path, center, radius, start_angle, sweep_angle);
    }

    fn stroke(&mut self) {
        if self.path.elements().is_empty() {
            return;
        }
        let stroke = Stroke::new(self.line_width);
        self.scene
            .stroke(&stroke, Affine::scale(self.scale), INK, None, &self.path);
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        if text.is_empty() {
            return;
        }
        let layout = self.layout(text);
        let brush = Brush::Solid(INK);

        // Parley puts y = 0 at the top of the first line; shift so its
        // baseline lands on origin.y.
        let first_baseline = layout
            .lines()
            .next()
            .map(|line| line.metrics().baseline as f64)
            .unwrap_or(0.0);
        let text_transform = Affine::scale(self.scale)
            * Affine::translate((origin.x, origin.y - first_baseline));

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if glyphs.is_empty() {
                    continue;
                }
                self.scene
                    .draw_glyphs(run.font())
                    .brush(&brush)
                    .hint(true)
                    .transform(text_transform)
                    .glyph_transform(glyph_xform)
                    .font_size(run.font_size())
                    .normalized_coords(run.normalized_coords())
                    .draw(Fill::NonZero, glyphs.into_iter());
            }
        }
    }
}

//! Headless surface that records draw calls.

use crate::surface::{DrawingSurface, append_arc};
use kurbo::{BezPath, Point};
use shapepad_core::{ApproxTextMeasure, TextMeasure};

/// One visible drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetLineWidth(f64),
    SetFontSize(f64),
    /// A stroked path and the width it was stroked with.
    Stroke { path: BezPath, width: f64 },
    FillText {
        text: String,
        origin: Point,
        font_size: f64,
    },
}

/// Surface that keeps a list of [`DrawCommand`]s instead of pixels.
///
/// `clear` drops everything recorded before it, like erasing a canvas.
/// Text is measured with [`ApproxTextMeasure`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    path: BezPath,
    line_width: f64,
    measure: ApproxTextMeasure,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl TextMeasure for RecordingSurface {
    fn text_width(&mut self, text: &str) -> f64 {
        self.measure.text_width(text)
    }
}

impl DrawingSurface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.clear();
        self.path = BezPath::new();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
        self.commands.push(DrawCommand::SetLineWidth(width));
    }

    fn set_font_size(&mut self, size: f64) {
        self.measure.font_size = size;
        self.commands.push(DrawCommand::SetFontSize(size));
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
        self.commands.push(DrawCommand::Stroke {
            path: self.path.clone(),
            width: self.line_width,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Point) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            origin,
            font_size: self.measure.font_size,
        });
    }
}

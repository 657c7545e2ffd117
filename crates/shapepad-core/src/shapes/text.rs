//! Text label shape.

use super::{ShapeError, ShapeId, ShapeKind, ensure_finite};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Source of text widths for hit-testing and bounds.
///
/// Rendering surfaces implement this with their active font metrics.
pub trait TextMeasure {
    /// Width of `text` when drawn with the surface's current font.
    fn text_width(&mut self, text: &str) -> f64;
}

/// Width estimate for when no font is loaded (headless use, tests).
#[derive(Debug, Clone, Copy)]
pub struct ApproxTextMeasure {
    pub font_size: f64,
}

impl ApproxTextMeasure {
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }
}

impl Default for ApproxTextMeasure {
    fn default() -> Self {
        Self::new(Text::DEFAULT_FONT_SIZE)
    }
}

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&mut self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_size * 0.6
    }
}

/// A text label drawn with its baseline starting at `(x, y)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    /// The text content.
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Text {
    /// Default font size in pixels.
    pub const DEFAULT_FONT_SIZE: f64 = 10.0;
    /// Half height of the band that picks a label, above and below its baseline.
    pub const HIT_HALF_HEIGHT: f64 = 10.0;

    /// Create a new text label.
    pub fn new(id: ShapeId, text: impl Into<String>, position: Point) -> Self {
        Self {
            id,
            text: text.into(),
            x: position.x,
            y: position.y,
        }
    }

    pub(crate) fn check(position: Point) -> Result<(), ShapeError> {
        ensure_finite(ShapeKind::Text, &[position.x, position.y])
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Bounds of the pick band for a label `width` wide.
    pub fn bounds(&self, width: f64) -> Rect {
        Rect::new(
            self.x,
            self.y - Self::HIT_HALF_HEIGHT,
            self.x + width,
            self.y + Self::HIT_HALF_HEIGHT,
        )
    }

    /// Hit if `point` lies in the band `[x, x + width] × [y - 10, y + 10]`.
    pub fn hit_test(&self, point: Point, width: f64) -> Option<Vec2> {
        let inside = point.x >= self.x
            && point.x <= self.x + width
            && point.y >= self.y - Self::HIT_HALF_HEIGHT
            && point.y <= self.y + Self::HIT_HALF_HEIGHT;
        inside.then(|| point - self.position())
    }
}

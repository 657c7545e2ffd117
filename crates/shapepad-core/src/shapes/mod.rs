//! Shape definitions for the editor.

mod circle;
mod polyline;
mod text;

pub use circle::Circle;
pub use polyline::Polyline;
pub use text::{ApproxTextMeasure, Text, TextMeasure};

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shape construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("Polyline needs at least one point")]
    EmptyPolyline,
    #[error("Circle radius must be positive, got {0}")]
    NonPositiveRadius(f64),
    #[error("Non-finite coordinate in {0} shape")]
    NonFinite(ShapeKind),
    #[error("No shape ids left to allocate")]
    IdsExhausted,
}

/// The three shape variants, without their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Text,
    Polyline,
    Circle,
}

impl ShapeKind {
    /// Name used in ids and in the document `type` field.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Text => "text",
            ShapeKind::Polyline => "polyline",
            ShapeKind::Circle => "circle",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unique identifier for shapes, e.g. `circle_3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(String);

impl ShapeId {
    /// Build the id for the `counter`-th allocated shape of `kind`.
    pub fn new(kind: ShapeKind, counter: u64) -> Self {
        Self(format!("{}_{}", kind.name(), counter))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric suffix of the id, if it has one (`text_5` -> `5`).
    pub fn counter(&self) -> Option<u64> {
        self.0
            .rsplit_once('_')
            .and_then(|(_, suffix)| suffix.parse().ok())
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShapeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Reject NaN and infinities in user supplied geometry.
fn ensure_finite(kind: ShapeKind, values: &[f64]) -> Result<(), ShapeError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ShapeError::NonFinite(kind))
    }
}

/// A shape on the drawing surface.
///
/// Serialized with an internal `type` tag, so a circle reads
/// `{"type":"circle","id":"circle_3","x":400.0,"y":400.0,"radius":50.0}`.
/// Equality is identity: two shapes are equal when their ids are.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Text(Text),
    Polyline(Polyline),
    Circle(Circle),
}

impl Shape {
    pub fn id(&self) -> &ShapeId {
        match self {
            Shape::Text(s) => &s.id,
            Shape::Polyline(s) => &s.id,
            Shape::Circle(s) => &s.id,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Text(_) => ShapeKind::Text,
            Shape::Polyline(_) => ShapeKind::Polyline,
            Shape::Circle(_) => ShapeKind::Circle,
        }
    }

    /// Check the geometry invariants that constructors enforce.
    ///
    /// Shapes that came from a document skip the constructors, so the
    /// loader runs this on every record.
    pub fn validate(&self) -> Result<(), ShapeError> {
        match self {
            Shape::Text(s) => Text::check(s.position()),
            Shape::Polyline(s) => Polyline::check_points(&s.points),
            Shape::Circle(s) => Circle::check(s.x, s.y, s.radius),
        }
    }

    /// Bounding box. Text needs font metrics for its width.
    pub fn bounds(&self, measure: &mut dyn TextMeasure) -> Rect {
        match self {
            Shape::Text(s) => s.bounds(measure.text_width(&s.text)),
            Shape::Polyline(s) => s.bounds(),
            Shape::Circle(s) => s.bounds(),
        }
    }

    /// Test whether `point` picks this shape.
    ///
    /// Returns the pointer-to-anchor offset on a hit: the text origin,
    /// the circle center, or the polyline vertex that was picked.
    pub fn hit_test(&self, point: Point, measure: &mut dyn TextMeasure) -> Option<Vec2> {
        match self {
            Shape::Text(s) => s.hit_test(point, measure.text_width(&s.text)),
            Shape::Polyline(s) => s.hit_test(point),
            Shape::Circle(s) => s.hit_test(point),
        }
    }

    /// Move the shape so that its anchor lands on `anchor`.
    ///
    /// Text and circles place their origin there. Polylines always anchor
    /// on their first vertex and translate rigidly.
    pub fn move_anchor_to(&mut self, anchor: Point) {
        match self {
            Shape::Text(s) => {
                s.x = anchor.x;
                s.y = anchor.y;
            }
            Shape::Polyline(s) => {
                if let Some(first) = s.points.first().copied() {
                    s.translate(anchor - first);
                }
            }
            Shape::Circle(s) => {
                s.x = anchor.x;
                s.y = anchor.y;
            }
        }
    }

    /// Translate the whole shape by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Text(s) => {
                s.x += delta.x;
                s.y += delta.y;
            }
            Shape::Polyline(s) => s.translate(delta),
            Shape::Circle(s) => {
                s.x += delta.x;
                s.y += delta.y;
            }
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Shape {}

//! Polyline shape.

use super::{ShapeError, ShapeId, ShapeKind, ensure_finite};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An open path through one or more points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyline {
    pub(crate) id: ShapeId,
    /// Vertices in drawing order. Never empty.
    pub points: Vec<Point>,
}

impl Polyline {
    /// Pick radius around each vertex.
    pub const VERTEX_HIT_RADIUS: f64 = 5.0;

    /// Create a polyline. Fails on an empty point list.
    pub fn new(id: ShapeId, points: Vec<Point>) -> Result<Self, ShapeError> {
        Self::check_points(&points)?;
        Ok(Self { id, points })
    }

    pub(crate) fn check_points(points: &[Point]) -> Result<(), ShapeError> {
        if points.is_empty() {
            return Err(ShapeError::EmptyPolyline);
        }
        let coords: Vec<f64> = points.iter().flat_map(|p| [p.x, p.y]).collect();
        ensure_finite(ShapeKind::Polyline, &coords)
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn bounds(&self) -> Rect {
        let first = self.points.first().copied().unwrap_or(Point::ZERO);
        self.points
            .iter()
            .fold(Rect::from_points(first, first), |rect, &p| rect.union_pt(p))
    }

    /// Hit if any vertex is closer than the pick radius.
    ///
    /// Vertices are scanned in order; the offset is measured from the
    /// first vertex that matches.
    pub fn hit_test(&self, point: Point) -> Option<Vec2> {
        self.points
            .iter()
            .find(|vertex| vertex.distance(point) < Self::VERTEX_HIT_RADIUS)
            .map(|&vertex| point - vertex)
    }

    /// Translate every vertex by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}

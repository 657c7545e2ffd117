//! Circle shape.

use super::{ShapeError, ShapeId, ShapeKind, ensure_finite};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A circle outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circle {
    pub(crate) id: ShapeId,
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Strictly positive.
    pub radius: f64,
}

impl Circle {
    /// Create a circle. Fails unless `radius > 0`.
    pub fn new(id: ShapeId, center: Point, radius: f64) -> Result<Self, ShapeError> {
        Self::check(center.x, center.y, radius)?;
        Ok(Self {
            id,
            x: center.x,
            y: center.y,
            radius,
        })
    }

    pub(crate) fn check(x: f64, y: f64, radius: f64) -> Result<(), ShapeError> {
        ensure_finite(ShapeKind::Circle, &[x, y, radius])?;
        if radius <= 0.0 {
            return Err(ShapeError::NonPositiveRadius(radius));
        }
        Ok(())
    }

    pub fn id(&self) -> &ShapeId {
        &self.id
    }

    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x - self.radius,
            self.y - self.radius,
            self.x + self.radius,
            self.y + self.radius,
        )
    }

    /// Hit anywhere on or inside the circle.
    pub fn hit_test(&self, point: Point) -> Option<Vec2> {
        let center = self.center();
        (point.distance(center) <= self.radius).then(|| point - center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle() -> Circle {
        Circle::new("circle_3".into(), Point::new(400.0, 400.0), 50.0).unwrap()
    }

    #[test]
    fn test_radius_must_be_positive() {
        let zero = Circle::new("circle_1".into(), Point::ZERO, 0.0);
        assert!(matches!(zero, Err(ShapeError::NonPositiveRadius(_))));
        let negative = Circle::new("circle_1".into(), Point::ZERO, -3.0);
        assert!(matches!(negative, Err(ShapeError::NonPositiveRadius(_))));
    }

    #[test]
    fn test_infinite_radius_rejected() {
        let result = Circle::new("circle_1".into(), Point::ZERO, f64::INFINITY);
        assert!(matches!(result, Err(ShapeError::NonFinite(ShapeKind::Circle))));
    }

    #[test]
    fn test_hit_center() {
        let offset = circle().hit_test(Point::new(400.0, 400.0)).unwrap();
        assert!(offset.hypot() < f64::EPSILON);
    }

    #[test]
    fn test_hit_edge_inclusive() {
        assert!(circle().hit_test(Point::new(450.0, 400.0)).is_some());
        assert!(circle().hit_test(Point::new(450.001, 400.0)).is_none());
    }

    #[test]
    fn test_offset_from_center() {
        let offset = circle().hit_test(Point::new(420.0, 390.0)).unwrap();
        assert!((offset.x - 20.0).abs() < f64::EPSILON);
        assert!((offset.y + 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        assert_eq!(circle().bounds(), Rect::new(350.0, 350.0, 450.0, 450.0));
    }
}

//! Scene store: the ordered shape collection and its id counter.

use crate::shapes::{
    Circle, Polyline, Shape, ShapeError, ShapeId, ShapeKind, Text, TextMeasure,
};
use kurbo::{Point, Rect};

/// Where `add_text` places a label when no position is given.
pub const DEFAULT_TEXT_POSITION: Point = Point::new(50.0, 50.0);

/// All shapes on the surface, back to front, plus the id counter.
///
/// The scene is the only owner of its shapes. Callers refer to shapes by
/// [`ShapeId`] and mutate them in place through [`Scene::get_mut`].
#[derive(Debug, Clone)]
pub struct Scene {
    /// Z-order: later entries draw on top and are hit-tested first.
    shapes: Vec<Shape>,
    /// Next id counter value. Starts at 1 and only grows.
    next_id: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate the next id and append the shape `build` makes with it.
    ///
    /// The caller guarantees the shape is valid. Ids stop at the counter
    /// value `u64::MAX - 1`; once the counter reaches `u64::MAX` nothing
    /// more can be added.
    pub(crate) fn insert_with(
        &mut self,
        kind: ShapeKind,
        build: impl FnOnce(ShapeId) -> Shape,
    ) -> Result<ShapeId, ShapeError> {
        let next = self.next_id.checked_add(1).ok_or(ShapeError::IdsExhausted)?;
        let id = ShapeId::new(kind, self.next_id);
        self.next_id = next;
        self.shapes.push(build(id.clone()));
        Ok(id)
    }

    /// Append a text label, at [`DEFAULT_TEXT_POSITION`] unless given.
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        position: Option<Point>,
    ) -> Result<ShapeId, ShapeError> {
        let position = position.unwrap_or(DEFAULT_TEXT_POSITION);
        Text::check(position)?;
        self.insert_with(ShapeKind::Text, |id| {
            Shape::Text(Text::new(id, text, position))
        })
    }

    /// Append a polyline. Nothing is stored (and no id is used) on error.
    pub fn add_polyline(&mut self, points: Vec<Point>) -> Result<ShapeId, ShapeError> {
        Polyline::check_points(&points)?;
        self.insert_with(ShapeKind::Polyline, |id| {
            Shape::Polyline(Polyline { id, points })
        })
    }

    /// Append a circle. Nothing is stored (and no id is used) on error.
    pub fn add_circle(&mut self, center: Point, radius: f64) -> Result<ShapeId, ShapeError> {
        Circle::check(center.x, center.y, radius)?;
        self.insert_with(ShapeKind::Circle, |id| {
            Shape::Circle(Circle {
                id,
                x: center.x,
                y: center.y,
                radius,
            })
        })
    }

    /// Remove a shape by id. Returns `None` if it was not in the scene.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        let index = self.position(id)?;
        Some(self.shapes.remove(index))
    }

    /// Discard every shape and install `shapes` in their given order.
    ///
    /// The id counter never moves backwards: it continues from
    /// `max(current, highest loaded id suffix + 1)` so that later
    /// additions cannot collide with loaded ids. A loaded suffix of
    /// `u64::MAX` exhausts the counter.
    pub fn replace_all(&mut self, shapes: Vec<Shape>) {
        let loaded_max = shapes.iter().filter_map(|s| s.id().counter()).max();
        if let Some(max) = loaded_max {
            let after = max.checked_add(1).unwrap_or(u64::MAX);
            self.next_id = self.next_id.max(after);
        }
        self.shapes = shapes;
    }

    /// Remove all shapes. The id counter is kept.
    pub fn clear(&mut self) {
        self.shapes.clear();
    }

    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: &ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    /// Index of a shape in z-order.
    pub fn position(&self, id: &ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id() == id)
    }

    /// Shapes in z-order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape> {
        self.shapes.iter()
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Value the next allocated id will carry.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Union of all shape bounds.
    pub fn bounds(&self, measure: &mut dyn TextMeasure) -> Option<Rect> {
        self.shapes
            .iter()
            .map(|s| s.bounds(measure))
            .reduce(|acc, b| acc.union(b))
    }
}

//! Hit-testing and the drag controller.

use crate::scene::Scene;
use crate::shapes::{ShapeId, TextMeasure};
use kurbo::{Point, Vec2};

/// Result of a successful hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    /// The topmost shape under the pointer.
    pub id: ShapeId,
    /// Pointer position minus the shape's anchor.
    pub offset: Vec2,
}

/// Find the topmost shape under `point`.
///
/// Shapes are scanned front to back (reverse z-order), so the shape drawn
/// last wins when several overlap.
pub fn hit_test(scene: &Scene, point: Point, measure: &mut dyn TextMeasure) -> Option<Hit> {
    scene.iter().rev().find_map(|shape| {
        shape.hit_test(point, measure).map(|offset| Hit {
            id: shape.id().clone(),
            offset,
        })
    })
}

/// The picked shape and where on it the pointer grabbed it.
///
/// Holds the id only; the scene stays the sole owner of the shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub id: ShapeId,
    pub offset: Vec2,
}

impl From<Hit> for Selection {
    fn from(hit: Hit) -> Self {
        Self {
            id: hit.id,
            offset: hit.offset,
        }
    }
}

/// Two-state drag machine: idle without a selection, dragging with one.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    selection: Option<Selection>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit-test `point` and enter dragging on a match.
    ///
    /// A miss clears any previous selection and returns to idle.
    pub fn select(
        &mut self,
        scene: &Scene,
        point: Point,
        measure: &mut dyn TextMeasure,
    ) -> Option<&Selection> {
        self.selection = hit_test(scene, point, measure).map(Selection::from);
        self.selection.as_ref()
    }

    /// Move the selected shape so its anchor follows the pointer.
    ///
    /// Returns `false` while idle or for a non-finite pointer. A selection
    /// whose shape has left the scene is dropped.
    pub fn drag_to(&mut self, scene: &mut Scene, pointer: Point) -> bool {
        let Some(selection) = &self.selection else {
            return false;
        };
        if !pointer.is_finite() {
            return false;
        }
        let Some(shape) = scene.get_mut(&selection.id) else {
            log::debug!("Selected shape {} is gone, releasing drag", selection.id);
            self.selection = None;
            return false;
        };
        shape.move_anchor_to(pointer - selection.offset);
        true
    }

    /// Leave dragging mode. Returns the released selection.
    pub fn deselect(&mut self) -> Option<Selection> {
        self.selection.take()
    }

    /// Drop the selection if it points at `id`.
    pub fn forget(&mut self, id: &ShapeId) {
        if self.selected_id() == Some(id) {
            self.selection = None;
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_id(&self) -> Option<&ShapeId> {
        self.selection.as_ref().map(|s| &s.id)
    }

    pub fn is_dragging(&self) -> bool {
        self.selection.is_some()
    }
}

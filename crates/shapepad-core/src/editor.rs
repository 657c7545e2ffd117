//! Editor session: the scene, the drag state and the redraw flag.

use crate::document::{self, DocumentError};
use crate::input::{EditorKey, KeyEvent, MouseButton, PointerEvent};
use crate::scene::Scene;
use crate::selection::{DragController, Selection};
use crate::shapes::{Circle, Polyline, Shape, ShapeError, ShapeId, ShapeKind, TextMeasure};
use kurbo::Point;

/// Vertices placed by the "Add Polyline" action.
pub const EXAMPLE_POLYLINE: [Point; 3] = [
    Point::new(100.0, 100.0),
    Point::new(200.0, 200.0),
    Point::new(300.0, 100.0),
];
/// Center of the circle placed by the "Add Circle" action.
pub const EXAMPLE_CIRCLE_CENTER: Point = Point::new(400.0, 400.0);
pub const EXAMPLE_CIRCLE_RADIUS: f64 = 50.0;

/// One editing session.
///
/// Every user-facing action goes through here. Mutations raise a redraw
/// request that the shell collects with [`Editor::take_redraw`].
#[derive(Debug, Clone, Default)]
pub struct Editor {
    scene: Scene,
    drag: DragController,
    needs_redraw: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on an existing scene.
    pub fn with_scene(scene: Scene) -> Self {
        Self {
            scene,
            drag: DragController::new(),
            needs_redraw: true,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.drag.selection()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Request a redraw on the next frame.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Return and clear the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Add a text label at the default position.
    pub fn add_text(&mut self, text: impl Into<String>) -> Result<ShapeId, ShapeError> {
        let id = self.scene.add_text(text, None)?;
        log::debug!("Added {}", id);
        self.needs_redraw = true;
        Ok(id)
    }

    pub fn add_polyline(&mut self, points: Vec<Point>) -> Result<ShapeId, ShapeError> {
        let id = self.scene.add_polyline(points)?;
        log::debug!("Added {}", id);
        self.needs_redraw = true;
        Ok(id)
    }

    pub fn add_circle(&mut self, center: Point, radius: f64) -> Result<ShapeId, ShapeError> {
        let id = self.scene.add_circle(center, radius)?;
        log::debug!("Added {}", id);
        self.needs_redraw = true;
        Ok(id)
    }

    /// Add the fixed three-vertex example polyline.
    pub fn add_example_polyline(&mut self) -> Result<ShapeId, ShapeError> {
        let id = self.scene.insert_with(ShapeKind::Polyline, |id| {
            Shape::Polyline(Polyline {
                id,
                points: EXAMPLE_POLYLINE.to_vec(),
            })
        })?;
        log::debug!("Added {}", id);
        self.needs_redraw = true;
        Ok(id)
    }

    /// Add the fixed example circle.
    pub fn add_example_circle(&mut self) -> Result<ShapeId, ShapeError> {
        let id = self.scene.insert_with(ShapeKind::Circle, |id| {
            Shape::Circle(Circle {
                id,
                x: EXAMPLE_CIRCLE_CENTER.x,
                y: EXAMPLE_CIRCLE_CENTER.y,
                radius: EXAMPLE_CIRCLE_RADIUS,
            })
        })?;
        log::debug!("Added {}", id);
        self.needs_redraw = true;
        Ok(id)
    }

    /// Pick the topmost shape under `point`. A miss clears the selection.
    pub fn select(&mut self, point: Point, measure: &mut dyn TextMeasure) -> Option<ShapeId> {
        let had_selection = self.drag.is_dragging();
        match self.drag.select(&self.scene, point, measure) {
            Some(selection) => {
                log::info!("Selected shape: {}", selection.id);
                self.needs_redraw = true;
                Some(selection.id.clone())
            }
            None => {
                log::info!("No shape selected");
                self.needs_redraw |= had_selection;
                None
            }
        }
    }

    /// Move the selected shape to follow the pointer.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let moved = self.drag.drag_to(&mut self.scene, pointer);
        self.needs_redraw |= moved;
        moved
    }

    /// Finish the current move and drop the selection.
    pub fn deselect(&mut self) -> Option<ShapeId> {
        let released = self.drag.deselect()?;
        log::info!("Shape moved and deselected");
        self.needs_redraw = true;
        Some(released.id)
    }

    /// Remove the selected shape from the scene.
    pub fn delete_selected(&mut self) -> Option<Shape> {
        let id = self.drag.deselect()?.id;
        let removed = self.scene.remove(&id);
        if removed.is_some() {
            log::info!("Shape deleted");
            self.needs_redraw = true;
        }
        removed
    }

    /// Encode the scene as a document.
    pub fn save(&self) -> Result<Vec<u8>, DocumentError> {
        document::serialize(&self.scene)
    }

    /// Replace the scene with a document's shapes.
    ///
    /// On error the scene and the selection are untouched. On success any
    /// drag in progress is abandoned. Returns the number of loaded shapes.
    pub fn load(&mut self, bytes: &[u8]) -> Result<usize, DocumentError> {
        let shapes = document::deserialize(bytes)?;
        Ok(self.replace_shapes(shapes))
    }

    /// Install already validated shapes, e.g. from a storage backend.
    pub fn replace_shapes(&mut self, shapes: Vec<Shape>) -> usize {
        let count = shapes.len();
        self.drag.deselect();
        self.scene.replace_all(shapes);
        self.needs_redraw = true;
        log::info!("Shapes loaded: {}", count);
        count
    }

    /// Route a pointer event: left press selects, any move drags.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent, measure: &mut dyn TextMeasure) {
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
            } => {
                self.select(*position, measure);
            }
            PointerEvent::Move { position } => {
                self.drag_to(*position);
            }
            PointerEvent::Down { .. } | PointerEvent::Up { .. } => {}
        }
    }

    /// Route a key event. Returns `true` if the key was consumed.
    pub fn handle_key_event(&mut self, event: &KeyEvent) -> bool {
        let KeyEvent::Pressed(key) = event else {
            return false;
        };
        match key {
            EditorKey::Enter | EditorKey::Escape => self.deselect().is_some(),
            EditorKey::Delete | EditorKey::Backspace => self.delete_selected().is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ApproxTextMeasure;

    fn measure() -> ApproxTextMeasure {
        ApproxTextMeasure::default()
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Down {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn moved(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move {
            position: Point::new(x, y),
        }
    }

    fn circle_center(editor: &Editor, id: &ShapeId) -> Point {
        match editor.scene().get(id) {
            Some(Shape::Circle(c)) => c.center(),
            other => panic!("expected circle, got {other:?}"),
        }
    }

    #[test]
    fn test_actions_allocate_sequential_ids() {
        let mut editor = Editor::new();
        assert_eq!(editor.add_text("hi").unwrap().as_str(), "text_1");
        assert_eq!(editor.add_example_polyline().unwrap().as_str(), "polyline_2");
        assert_eq!(editor.add_example_circle().unwrap().as_str(), "circle_3");
        assert_eq!(editor.scene().len(), 3);
        assert!(editor.take_redraw());
        assert!(!editor.take_redraw());
    }

    #[test]
    fn test_example_shapes_geometry() {
        let mut editor = Editor::new();
        let polyline = editor.add_example_polyline().unwrap();
        let circle = editor.add_example_circle().unwrap();
        let Some(Shape::Polyline(p)) = editor.scene().get(&polyline) else {
            panic!("expected polyline");
        };
        assert_eq!(p.points, EXAMPLE_POLYLINE.to_vec());
        assert_eq!(circle_center(&editor, &circle), Point::new(400.0, 400.0));
    }

    #[test]
    fn test_empty_text_is_allowed() {
        let mut editor = Editor::new();
        let id = editor.add_text("").unwrap();
        assert!(editor.scene().get(&id).is_some());
    }

    #[test]
    fn test_invalid_additions_rejected() {
        let mut editor = Editor::new();
        assert!(editor.add_polyline(Vec::new()).is_err());
        assert!(editor.add_circle(Point::ZERO, -1.0).is_err());
        assert!(editor.scene().is_empty());
        assert!(!editor.take_redraw());
    }

    #[test]
    fn test_pointer_select_then_drag() {
        let mut editor = Editor::new();
        let id = editor.add_example_circle().unwrap();
        editor.take_redraw();

        editor.handle_pointer_event(&down(400.0, 400.0), &mut measure());
        assert!(editor.is_dragging());
        editor.handle_pointer_event(&moved(420.0, 420.0), &mut measure());
        assert_eq!(circle_center(&editor, &id), Point::new(420.0, 420.0));
        assert!(editor.take_redraw());

        // Releasing the button does not end the move.
        editor.handle_pointer_event(
            &PointerEvent::Up {
                position: Point::new(420.0, 420.0),
                button: MouseButton::Left,
            },
            &mut measure(),
        );
        editor.handle_pointer_event(&moved(430.0, 420.0), &mut measure());
        assert_eq!(circle_center(&editor, &id), Point::new(430.0, 420.0));
    }

    #[test]
    fn test_move_without_selection_is_ignored() {
        let mut editor = Editor::new();
        let id = editor.add_example_circle().unwrap();
        editor.take_redraw();
        editor.handle_pointer_event(&moved(10.0, 10.0), &mut measure());
        assert_eq!(circle_center(&editor, &id), Point::new(400.0, 400.0));
        assert!(!editor.take_redraw());
    }

    #[test]
    fn test_right_click_does_not_select() {
        let mut editor = Editor::new();
        editor.add_example_circle().unwrap();
        editor.handle_pointer_event(
            &PointerEvent::Down {
                position: Point::new(400.0, 400.0),
                button: MouseButton::Right,
            },
            &mut measure(),
        );
        assert!(!editor.is_dragging());
    }

    #[test]
    fn test_enter_deselects_and_stops_dragging() {
        let mut editor = Editor::new();
        let id = editor.add_example_circle().unwrap();
        editor.handle_pointer_event(&down(400.0, 400.0), &mut measure());
        editor.handle_pointer_event(&moved(410.0, 400.0), &mut measure());

        assert!(editor.handle_key_event(&KeyEvent::Pressed(EditorKey::Enter)));
        assert!(!editor.is_dragging());
        editor.handle_pointer_event(&moved(500.0, 500.0), &mut measure());
        assert_eq!(circle_center(&editor, &id), Point::new(410.0, 400.0));

        // Nothing left to confirm.
        assert!(!editor.handle_key_event(&KeyEvent::Pressed(EditorKey::Enter)));
    }

    #[test]
    fn test_delete_removes_selected_shape() {
        let mut editor = Editor::new();
        let keep = editor.add_text("keep").unwrap();
        let line = editor.add_example_polyline().unwrap();
        let drop = editor.add_example_circle().unwrap();
        editor.select(Point::new(400.0, 400.0), &mut measure());

        assert!(editor.handle_key_event(&KeyEvent::Pressed(EditorKey::Delete)));
        assert!(editor.scene().get(&drop).is_none());
        assert!(editor.selection().is_none());

        let Some(Shape::Text(text)) = editor.scene().get(&keep) else {
            panic!("expected text");
        };
        assert_eq!(text.text, "keep");
        assert_eq!(text.position(), crate::scene::DEFAULT_TEXT_POSITION);
        let Some(Shape::Polyline(polyline)) = editor.scene().get(&line) else {
            panic!("expected polyline");
        };
        assert_eq!(polyline.points, EXAMPLE_POLYLINE.to_vec());
        assert_eq!(editor.scene().position(&keep), Some(0));
        assert_eq!(editor.scene().position(&line), Some(1));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut editor = Editor::new();
        editor.add_example_circle().unwrap();
        assert!(editor.delete_selected().is_none());
        assert!(!editor.handle_key_event(&KeyEvent::Pressed(EditorKey::Backspace)));
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_key_release_ignored() {
        let mut editor = Editor::new();
        editor.add_example_circle().unwrap();
        editor.select(Point::new(400.0, 400.0), &mut measure());
        assert!(!editor.handle_key_event(&KeyEvent::Released(EditorKey::Delete)));
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut editor = Editor::new();
        editor.add_text("hi").unwrap();
        editor.add_example_polyline().unwrap();
        editor.add_example_circle().unwrap();
        let bytes = editor.save().unwrap();

        let mut restored = Editor::new();
        assert_eq!(restored.load(&bytes).unwrap(), 3);
        let ids: Vec<&str> = restored.scene().iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, ["text_1", "polyline_2", "circle_3"]);
        assert_eq!(restored.add_text("next").unwrap().as_str(), "text_4");
    }

    #[test]
    fn test_load_clears_selection() {
        let mut editor = Editor::new();
        editor.add_example_circle().unwrap();
        let bytes = editor.save().unwrap();
        editor.select(Point::new(400.0, 400.0), &mut measure());
        editor.take_redraw();

        editor.load(&bytes).unwrap();
        assert!(!editor.is_dragging());
        assert!(editor.take_redraw());
    }

    #[test]
    fn test_failed_load_leaves_scene_unchanged() {
        let mut editor = Editor::new();
        let id = editor.add_example_circle().unwrap();
        editor.select(Point::new(400.0, 400.0), &mut measure());

        assert!(matches!(
            editor.load(br#"{"not":"an array"}"#),
            Err(DocumentError::Malformed(_))
        ));
        assert_eq!(editor.scene().len(), 1);
        assert!(editor.scene().get(&id).is_some());
        assert!(editor.is_dragging());
    }

    #[test]
    fn test_load_with_largest_id_exhausts_counter() {
        let mut editor = Editor::new();
        let json = format!(
            r#"[{{"type":"text","id":"text_{}","text":"a","x":0,"y":0}}]"#,
            u64::MAX
        );
        editor.load(json.as_bytes()).unwrap();

        assert_eq!(editor.add_text("b"), Err(ShapeError::IdsExhausted));
        assert_eq!(editor.add_example_circle(), Err(ShapeError::IdsExhausted));
        assert_eq!(editor.scene().len(), 1);
    }

    #[test]
    fn test_load_with_next_to_largest_id_keeps_ids_unique() {
        let mut editor = Editor::new();
        let json = format!(
            r#"[{{"type":"circle","id":"circle_{}","x":0,"y":0,"radius":1}}]"#,
            u64::MAX - 1
        );
        editor.load(json.as_bytes()).unwrap();

        assert_eq!(editor.add_text("b"), Err(ShapeError::IdsExhausted));
        let ids: std::collections::HashSet<_> =
            editor.scene().iter().map(|s| s.id().clone()).collect();
        assert_eq!(ids.len(), editor.scene().len());
    }
}

//! Input state management for pointer and keyboard events.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in surface-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorKey {
    /// Confirm the current drag and deselect.
    Enter,
    /// Delete the selected shape.
    Delete,
    Backspace,
    Escape,
}

impl EditorKey {
    /// Map a key name (`"Enter"`, `"Delete"`, ...) to an editor key.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Enter" | "Return" => Some(EditorKey::Enter),
            "Delete" => Some(EditorKey::Delete),
            "Backspace" => Some(EditorKey::Backspace),
            "Escape" => Some(EditorKey::Escape),
            _ => None,
        }
    }
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(EditorKey),
    Released(EditorKey),
}

/// Tracks the pointer position between events.
///
/// Window systems report button presses without a position, so the shell
/// feeds every move through here and reads the position back on a press.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in surface coordinates.
    pub pointer_position: Point,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.pointer_position = event.position();
    }
}

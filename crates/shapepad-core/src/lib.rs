//! Shapepad Core Library
//!
//! Platform-agnostic shape model, scene store, hit-testing, dragging and
//! persistence for the Shapepad editor.

pub mod document;
pub mod editor;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod storage;

pub use document::DocumentError;
pub use editor::Editor;
pub use input::{EditorKey, InputState, KeyEvent, MouseButton, PointerEvent};
pub use scene::Scene;
pub use selection::{DragController, Hit, Selection, hit_test};
pub use shapes::{ApproxTextMeasure, Shape, ShapeError, ShapeId, ShapeKind, TextMeasure};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

//! Keyboard shortcuts: the key map and its documentation.

use shapepad_core::{EditorKey, KeyEvent};
use winit::event::ElementState;
use winit::keyboard::{Key, NamedKey};

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: EditorKey,
    pub label: &'static str,
    pub description: &'static str,
}

impl Shortcut {
    pub const fn new(key: EditorKey, label: &'static str, description: &'static str) -> Self {
        Self {
            key,
            label,
            description,
        }
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::new(EditorKey::Enter, "Enter", "Finish moving and deselect"),
            Shortcut::new(EditorKey::Escape, "Escape", "Finish moving and deselect"),
            Shortcut::new(EditorKey::Delete, "Delete", "Delete selected shape"),
            Shortcut::new(EditorKey::Backspace, "Backspace", "Delete selected shape"),
        ]
    }

    /// Map a winit logical key to an editor key.
    pub fn editor_key(key: &Key) -> Option<EditorKey> {
        match key {
            Key::Named(NamedKey::Enter) => Some(EditorKey::Enter),
            Key::Named(NamedKey::Escape) => Some(EditorKey::Escape),
            Key::Named(NamedKey::Delete) => Some(EditorKey::Delete),
            Key::Named(NamedKey::Backspace) => Some(EditorKey::Backspace),
            _ => None,
        }
    }

    /// Turn a winit key report into an editor key event.
    ///
    /// Auto-repeats of a held key are dropped so that a held Delete removes
    /// one shape, not one per repeat.
    pub fn key_event(key: &Key, state: ElementState, repeat: bool) -> Option<KeyEvent> {
        if repeat {
            return None;
        }
        let key = Self::editor_key(key)?;
        Some(match state {
            ElementState::Pressed => KeyEvent::Pressed(key),
            ElementState::Released => KeyEvent::Released(key),
        })
    }

    /// One line per shortcut, for the startup log.
    pub fn summary() -> String {
        Self::all()
            .iter()
            .map(|s| format!("{}={}", s.label, s.description))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_labels_match_key_names() {
        for shortcut in ShortcutRegistry::all() {
            assert_eq!(EditorKey::from_name(shortcut.label), Some(shortcut.key));
        }
    }

    #[test]
    fn test_editor_key_mapping() {
        assert_eq!(
            ShortcutRegistry::editor_key(&Key::Named(NamedKey::Enter)),
            Some(EditorKey::Enter)
        );
        assert_eq!(
            ShortcutRegistry::editor_key(&Key::Named(NamedKey::Delete)),
            Some(EditorKey::Delete)
        );
        assert_eq!(ShortcutRegistry::editor_key(&Key::Named(NamedKey::Tab)), None);
        assert_eq!(ShortcutRegistry::editor_key(&Key::Character("a".into())), None);
    }

    #[test]
    fn test_key_event_drops_repeats() {
        let delete = Key::Named(NamedKey::Delete);
        assert_eq!(
            ShortcutRegistry::key_event(&delete, ElementState::Pressed, false),
            Some(KeyEvent::Pressed(EditorKey::Delete))
        );
        assert_eq!(ShortcutRegistry::key_event(&delete, ElementState::Pressed, true), None);
        assert_eq!(
            ShortcutRegistry::key_event(&delete, ElementState::Released, false),
            Some(KeyEvent::Released(EditorKey::Delete))
        );
    }

    #[test]
    fn test_press_after_missed_release_still_acts() {
        // A release swallowed elsewhere (focus loss, an egui text field)
        // must not block the next real press.
        let enter = Key::Named(NamedKey::Enter);
        for _ in 0..2 {
            assert_eq!(
                ShortcutRegistry::key_event(&enter, ElementState::Pressed, false),
                Some(KeyEvent::Pressed(EditorKey::Enter))
            );
        }
    }
}

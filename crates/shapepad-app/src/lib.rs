//! Shapepad Application
//!
//! The native application shell: window, GPU rendering, toolbar, file
//! dialogs and configuration around the core editor.

mod app;
mod config;
mod shortcuts;
mod ui;

pub use app::{App, AppError};
pub use config::{AppConfig, ConfigError, parse_color};
pub use shortcuts::{Shortcut, ShortcutRegistry};
pub use ui::{UiAction, UiState, render_ui};

//! Application configuration.

use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: &'static str, reason: String },
}

/// Parse a CSS hex color like "#fafafa".
pub fn parse_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::from_rgba8(r, g, b, 255))
}

/// Application configuration, stored as JSON.
///
/// Missing keys take their default value, so a file only needs the
/// settings it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Canvas background as `#rrggbb`.
    pub background_color: String,
    pub stroke_width: f64,
    pub font_size: f64,
    /// Reload the previous scene on startup and save it on exit.
    pub restore_last_session: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Shapepad".to_string(),
            width: 1280,
            height: 800,
            background_color: "#ffffff".to_string(),
            stroke_width: shapepad_render::DEFAULT_STROKE_WIDTH,
            font_size: shapepad_render::DEFAULT_FONT_SIZE,
            restore_last_session: false,
        }
    }
}

impl AppConfig {
    /// `<config dir>/shapepad/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("shapepad").join("config.json"))
    }

    /// Load and validate a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration, creating parent directories as needed.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory on this platform, using defaults");
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidSetting {
                key: "width/height",
                reason: format!("window size {}x{} is empty", self.width, self.height),
            });
        }
        if parse_color(&self.background_color).is_none() {
            return Err(ConfigError::InvalidSetting {
                key: "background_color",
                reason: format!("'{}' is not a #rrggbb color", self.background_color),
            });
        }
        for (key, value) in [("stroke_width", self.stroke_width), ("font_size", self.font_size)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidSetting {
                    key,
                    reason: format!("must be positive, got {}", value),
                });
            }
        }
        Ok(())
    }

    /// Background color, white if the stored value does not parse.
    pub fn background(&self) -> Color {
        parse_color(&self.background_color).unwrap_or(Color::WHITE)
    }
}

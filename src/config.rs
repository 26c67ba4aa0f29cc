//! Configuration persistence and tuning constants for snapmark

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Selections must be strictly larger than this in both dimensions
pub const MIN_SELECTION_SIZE: i32 = 10;
/// Arrows shorter than this are discarded
pub const MIN_ARROW_LENGTH: f32 = 10.0;
/// Rectangle annotations must be strictly larger than this in both dimensions
pub const MIN_RECT_SIZE: i32 = 5;
/// Angle between the shaft and each side of the arrowhead (36 degrees)
pub const ARROWHEAD_ANGLE: f32 = std::f32::consts::PI / 5.0;
pub const ARROWHEAD_SCALE: f32 = 4.0;
/// Fraction of the head length the shaft stops short of the tip
pub const ARROWHEAD_OFFSET: f32 = 0.3;
pub const ARROWHEAD_MIN_LENGTH: f32 = 12.0;
pub const TEXT_FONT_SCALE: u32 = 2;
pub const MIN_FONT_SIZE: u32 = 12;
pub const OUTLINE_THICKNESS_OFFSET: u32 = 2;
/// Alpha of the dimming layer outside the selection
pub const OVERLAY_ALPHA: u8 = 120;
pub const SELECTION_BORDER_WIDTH: f32 = 2.0;
pub const MAX_HISTORY: usize = 20;
pub const MIN_THICKNESS: u32 = 1;
pub const MAX_THICKNESS: u32 = 20;
pub const DEFAULT_THICKNESS: u32 = 3;
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 10;

/// Serializable color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ShapeColor {
    pub const BLACK: ShapeColor = ShapeColor::rgb(0, 0, 0);
    pub const WHITE: ShapeColor = ShapeColor::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// WCAG relative luminance in [0, 1]
    pub fn relative_luminance(self) -> f32 {
        fn channel(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.039_28 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Black or white, whichever has the higher contrast ratio against `self`
    pub fn contrasting(self) -> ShapeColor {
        let l = self.relative_luminance();
        let against_white = 1.05 / (l + 0.05);
        let against_black = (l + 0.05) / 0.05;
        if against_white >= against_black {
            ShapeColor::WHITE
        } else {
            ShapeColor::BLACK
        }
    }
}

/// Fixed annotation palette, cycled in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaletteColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
}

impl PaletteColor {
    pub const ALL: [PaletteColor; 5] = [
        PaletteColor::Red,
        PaletteColor::Blue,
        PaletteColor::Green,
        PaletteColor::Yellow,
        PaletteColor::Purple,
    ];

    pub fn color(self) -> ShapeColor {
        match self {
            PaletteColor::Red => ShapeColor::rgb(255, 0, 0),
            PaletteColor::Blue => ShapeColor::rgb(0, 0, 255),
            PaletteColor::Green => ShapeColor::rgb(0, 255, 0),
            PaletteColor::Yellow => ShapeColor::rgb(255, 255, 0),
            PaletteColor::Purple => ShapeColor::rgb(128, 0, 128),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteColor::Red => "Red",
            PaletteColor::Blue => "Blue",
            PaletteColor::Green => "Green",
            PaletteColor::Yellow => "Yellow",
            PaletteColor::Purple => "Purple",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Get the next palette color in the cycle
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// Save location for screenshots (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stroke thickness a new session starts with (1-20)
    pub thickness: u32,
    /// Palette color a new session starts with
    pub color: PaletteColor,
    /// Number of undo snapshots kept
    pub history_capacity: usize,
    /// Seconds an external capture tool may run before it is killed
    pub capture_timeout_secs: u64,
    /// Where saved screenshots go when no explicit path is given
    pub save_location: SaveLocation,
    /// Whether to also copy to clipboard when saving to file
    pub copy_to_clipboard_on_save: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thickness: DEFAULT_THICKNESS,
            color: PaletteColor::Red,
            history_capacity: MAX_HISTORY,
            capture_timeout_secs: DEFAULT_CAPTURE_TIMEOUT_SECS,
            save_location: SaveLocation::Pictures,
            copy_to_clipboard_on_save: false,
        }
    }
}

impl Config {
    /// Path of the config file under the user's config directory
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("snapmark").join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory, not saving config");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Clamp values read from disk into their valid ranges
    pub fn sanitized(mut self) -> Self {
        self.thickness = self.thickness.clamp(MIN_THICKNESS, MAX_THICKNESS);
        self.history_capacity = self.history_capacity.max(1);
        self.capture_timeout_secs = self.capture_timeout_secs.max(1);
        self
    }

    pub fn capture_timeout(&self) -> Duration {
        Duration::from_secs(self.capture_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        let mut color = PaletteColor::Red;
        for _ in 0..PaletteColor::ALL.len() {
            color = color.next();
        }
        assert_eq!(color, PaletteColor::Red);
        assert_eq!(PaletteColor::Purple.next(), PaletteColor::Red);
    }

    #[test]
    fn test_outline_contrast() {
        assert_eq!(ShapeColor::WHITE.contrasting(), ShapeColor::BLACK);
        assert_eq!(ShapeColor::BLACK.contrasting(), ShapeColor::WHITE);
        assert_eq!(PaletteColor::Yellow.color().contrasting(), ShapeColor::BLACK);
        assert_eq!(PaletteColor::Blue.color().contrasting(), ShapeColor::WHITE);
        assert_eq!(PaletteColor::Purple.color().contrasting(), ShapeColor::WHITE);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            thickness: 7,
            color: PaletteColor::Green,
            save_location: SaveLocation::Documents,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_clamps_and_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "thickness": 99, "history_capacity": 0 }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.thickness, MAX_THICKNESS);
        assert_eq!(config.history_capacity, 1);
        assert_eq!(config.capture_timeout_secs, DEFAULT_CAPTURE_TIMEOUT_SECS);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}

//! Game configuration resource.
//!
//! Manages settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [map]
//! dir = data/maps
//! level = 0
//! tile_size = 16
//!
//! [physics]
//! gravity = 0.1
//! terminal_velocity = 5.0
//!
//! [render]
//! width = 320
//! height = 240
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::resources::tilemap::DEFAULT_TILE_SIZE;

/// Default safe values for startup
const DEFAULT_MAP_DIR: &str = "data/maps";
const DEFAULT_LEVEL: u32 = 0;
const DEFAULT_GRAVITY: f32 = 0.1;
const DEFAULT_TERMINAL_VELOCITY: f32 = 5.0;
const DEFAULT_RENDER_WIDTH: u32 = 320;
const DEFAULT_RENDER_HEIGHT: u32 = 240;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Directory holding `<level>.json` map files.
    pub map_dir: PathBuf,
    /// Level loaded at startup.
    pub level: u32,
    /// Tile size for new, empty maps.
    pub tile_size: u32,
    /// Downward velocity gained per frame.
    pub gravity: f32,
    /// Maximum falling speed in pixels per frame.
    pub terminal_velocity: f32,
    /// Internal render width in pixels.
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            map_dir: PathBuf::from(DEFAULT_MAP_DIR),
            level: DEFAULT_LEVEL,
            tile_size: DEFAULT_TILE_SIZE,
            gravity: DEFAULT_GRAVITY,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [map] section
        if let Some(dir) = config.get("map", "dir") {
            self.map_dir = PathBuf::from(dir);
        }
        if let Some(level) = config.getuint("map", "level").ok().flatten() {
            self.level = level as u32;
        }
        if let Some(tile_size) = config.getuint("map", "tile_size").ok().flatten() {
            if tile_size > 0 {
                self.tile_size = tile_size as u32;
            }
        }

        // [physics] section
        if let Some(gravity) = config.getfloat("physics", "gravity").ok().flatten() {
            self.gravity = gravity as f32;
        }
        if let Some(terminal) = config.getfloat("physics", "terminal_velocity").ok().flatten() {
            self.terminal_velocity = terminal as f32;
        }

        // [render] section
        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        info!(
            "Loaded config: maps in {:?}, level={}, tile_size={}, gravity={}, \
             terminal_velocity={}, render {}x{}",
            self.map_dir,
            self.level,
            self.tile_size,
            self.gravity,
            self.terminal_velocity,
            self.render_width,
            self.render_height
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [map] section
        config.set("map", "dir", Some(self.map_dir.display().to_string()));
        config.set("map", "level", Some(self.level.to_string()));
        config.set("map", "tile_size", Some(self.tile_size.to_string()));

        // [physics] section
        config.set("physics", "gravity", Some(self.gravity.to_string()));
        config.set(
            "physics",
            "terminal_velocity",
            Some(self.terminal_velocity.to_string()),
        );

        // [render] section
        config.set("render", "width", Some(self.render_width.to_string()));
        config.set("render", "height", Some(self.render_height.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Render target size in pixels.
    pub fn render_size(&self) -> (u32, u32) {
        (self.render_width, self.render_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tilerunner-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn defaults_match_platformer_constants() {
        let config = GameConfig::new();
        assert_eq!(config.tile_size, 16);
        assert_eq!(config.gravity, 0.1);
        assert_eq!(config.terminal_velocity, 5.0);
        assert_eq!(config.render_size(), (320, 240));
    }

    #[test]
    fn missing_file_is_an_error_and_keeps_defaults() {
        let mut config = GameConfig::with_path(temp_config("missing"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config, GameConfig::with_path(temp_config("missing")));
    }

    #[test]
    fn partial_file_overrides_only_present_keys() {
        let path = temp_config("partial");
        std::fs::write(&path, "[physics]\ngravity = 0.25\n\n[map]\nlevel = 2\n").unwrap();
        let mut config = GameConfig::with_path(&path);
        let result = config.load_from_file();
        std::fs::remove_file(&path).ok();
        assert!(result.is_ok());
        assert_eq!(config.gravity, 0.25);
        assert_eq!(config.level, 2);
        assert_eq!(config.terminal_velocity, 5.0);
        assert_eq!(config.tile_size, 16);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_config("roundtrip");
        let mut saved = GameConfig::with_path(&path);
        saved.level = 3;
        saved.tile_size = 32;
        saved.terminal_velocity = 7.5;
        saved.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        let result = loaded.load_from_file();
        std::fs::remove_file(&path).ok();
        assert!(result.is_ok());
        assert_eq!(loaded, saved);
    }
}

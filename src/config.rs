//! Tunable gameplay constants. Everything the simulation needs to know about speeds, sizes and
//! thresholds lives in a single `GameConfig` resource so the core never reaches for globals.
//!
//! Native builds read `assets/config/game.ron` once at startup. The file is optional; fields it
//! omits keep their defaults, and a broken file degrades to the defaults with a warning.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub const CONFIG_PATH: &str = "assets/config/game.ron";

/// Inserts the `GameConfig` resource while the app is being assembled, so `Startup` systems
/// (camera sizing, for one) can already read it.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GameConfig::load_or_default(CONFIG_PATH));
    }
}

/// Crop and on-screen widths for one family of sprite strips.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub crop_width: f32,
    pub display_width: f32,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub gravity: f32,
    pub player_speed: f32,
    pub jump_impulse: f32,
    /// Left edge of the band the player walks in; past it the world scrolls instead.
    pub walk_min_x: f32,
    /// Right edge of the walking band.
    pub walk_max_x: f32,
    pub parallax: f32,
    pub strip_height: f32,
    pub stand_frame_cap: u32,
    pub run_frame_cap: u32,
    pub player_start: [f32; 2],
    pub player_height: f32,
    pub stand_sheet: SheetConfig,
    pub run_sheet: SheetConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024.0,
            canvas_height: 576.0,
            gravity: 0.5,
            player_speed: 10.0,
            jump_impulse: 10.0,
            walk_min_x: 100.0,
            walk_max_x: 400.0,
            parallax: 0.66,
            strip_height: 400.0,
            stand_frame_cap: 59,
            run_frame_cap: 29,
            player_start: [100.0, 100.0],
            player_height: 150.0,
            stand_sheet: SheetConfig {
                crop_width: 177.0,
                display_width: 66.0,
            },
            run_sheet: SheetConfig {
                crop_width: 341.0,
                display_width: 127.875,
            },
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl GameConfig {
    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn player_start(&self) -> Vec2 {
        Vec2::from_array(self.player_start)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the config at `path`. A missing file is not an error and yields `Ok(None)`.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text).map(Some)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        if cfg!(target_arch = "wasm32") {
            return Self::default();
        }

        let path = path.as_ref();
        match Self::load(path) {
            Ok(Some(config)) => {
                info!("Loaded game config from '{}'", path.display());
                config
            }
            Ok(None) => Self::default(),
            Err(err) => {
                warn!(
                    "Ignoring game config at '{}' ({}); using defaults.",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width <= 0.0 || self.canvas_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must be positive, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.player_speed <= 0.0 {
            return Err(ConfigError::Invalid("player_speed must be positive".to_owned()));
        }
        if self.strip_height <= 0.0 {
            return Err(ConfigError::Invalid("strip_height must be positive".to_owned()));
        }
        if self.walk_min_x >= self.walk_max_x {
            return Err(ConfigError::Invalid(format!(
                "walk band is inverted: {} >= {}",
                self.walk_min_x, self.walk_max_x
            )));
        }
        Ok(())
    }
}

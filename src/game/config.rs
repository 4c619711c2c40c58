use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::grid::GridBounds;

/// Lowest difficulty level
pub const MIN_LEVEL: u32 = 1;
/// Highest difficulty level; the bonus window formula needs `level < 9`
pub const MAX_LEVEL: u32 = 8;

/// Tick period in milliseconds for levels 1..=8
const LEVEL_TICK_MS: [u64; 8] = [150, 150, 120, 120, 100, 100, 80, 80];

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Playable rows, excluding the separator and status lines
    pub grid_height: u16,
    /// Playable columns
    pub grid_width: u16,
    /// Difficulty level, 1..=8
    pub level: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_height: 20,
            grid_width: 40,
            level: MIN_LEVEL,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Read a JSON config file. Keys that are missing keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(ConfigFile::load(path)?.over(Self::default()))
    }

    /// Copy with the level clamped into 1..=8
    pub fn normalized(&self) -> Self {
        let level = self.level.clamp(MIN_LEVEL, MAX_LEVEL);
        if level != self.level {
            warn!("Level {} out of range, using {}", self.level, level);
        }
        Self {
            level,
            ..self.clone()
        }
    }

    /// Grid bounds, checked to fit the starting snake plus one food
    pub fn bounds(&self) -> Result<GridBounds, GameError> {
        let bounds = GridBounds::new(self.grid_height, self.grid_width)?;
        if bounds.width() < 2 || bounds.area() < 3 {
            return Err(GameError::GridTooSmall {
                height: self.grid_height,
                width: self.grid_width,
            });
        }
        Ok(bounds)
    }

    /// Check that a round can be started with this configuration
    pub fn validate(&self) -> Result<(), GameError> {
        self.bounds().map(|_| ())
    }

    /// Time between game ticks; faster at higher levels
    pub fn tick_interval(&self) -> Duration {
        let index = self.level.clamp(MIN_LEVEL, MAX_LEVEL) - MIN_LEVEL;
        Duration::from_millis(LEVEL_TICK_MS[index as usize])
    }
}

/// Contents of a config file, keeping track of which keys were set
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub grid_height: Option<u16>,
    pub grid_width: Option<u16>,
    pub level: Option<u32>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        serde_json::from_str(&json).with_context(|| format!("Invalid config file {:?}", path))
    }

    /// `base` with every key this file sets replaced
    pub fn over(&self, base: GameConfig) -> GameConfig {
        GameConfig {
            grid_height: self.grid_height.unwrap_or(base.grid_height),
            grid_width: self.grid_width.unwrap_or(base.grid_width),
            level: self.level.unwrap_or(base.level),
        }
    }
}

//! # Runtime Configuration
//!
//! Settings for a play session. Every field has a default, a JSON file can
//! override any subset of them, and command-line flags override the file.

use crate::constants::*;
use crate::{CharacterStats, WarrenError, WarrenResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for a play session.
///
/// # Examples
///
/// ```
/// use warren::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "animal_count": 2 }"#).unwrap();
/// assert_eq!(config.animal_count, 2);
/// assert_eq!(config.turn_delay_ms, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Random seed for level generation and animal behaviour
    pub seed: u64,
    /// Level width in tiles
    pub level_width: u32,
    /// Level height in tiles
    pub level_height: u32,
    /// Number of animals placed in the level
    pub animal_count: u32,
    /// Minimum delay between two turn changes, in milliseconds
    pub turn_delay_ms: u64,
    /// Tile size in pixels
    pub tile_size: f32,
    /// Player health and attack
    pub player_stats: CharacterStats,
    /// Health and attack of every animal
    pub animal_stats: CharacterStats,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            level_width: DEFAULT_LEVEL_WIDTH,
            level_height: DEFAULT_LEVEL_HEIGHT,
            animal_count: DEFAULT_ANIMAL_COUNT,
            turn_delay_ms: DEFAULT_TURN_DELAY_MS,
            tile_size: DEFAULT_TILE_SIZE,
            player_stats: CharacterStats::new(DEFAULT_PLAYER_HEALTH, 3),
            animal_stats: CharacterStats::new(DEFAULT_ANIMAL_HEALTH, 1),
        }
    }
}

impl GameConfig {
    /// Smallest level the generator can carve rooms into.
    pub const MIN_LEVEL_SIZE: u32 = 12;

    /// Loads a configuration file, filling missing fields with defaults.
    pub fn load(path: impl AsRef<Path>) -> WarrenResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the game cannot run with.
    pub fn validate(&self) -> WarrenResult<()> {
        if self.level_width < Self::MIN_LEVEL_SIZE || self.level_height < Self::MIN_LEVEL_SIZE {
            return Err(WarrenError::Config(format!(
                "level must be at least {0}x{0} tiles, got {1}x{2}",
                Self::MIN_LEVEL_SIZE,
                self.level_width,
                self.level_height
            )));
        }
        if self.tile_size <= 0.0 {
            return Err(WarrenError::Config(format!(
                "tile size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.player_stats.max_health == 0 || self.animal_stats.max_health == 0 {
            return Err(WarrenError::Config(
                "characters must start with some health".to_string(),
            ));
        }
        Ok(())
    }

    /// Turn delay as a [`Duration`].
    pub fn turn_delay(&self) -> Duration {
        Duration::from_millis(self.turn_delay_ms)
    }
}

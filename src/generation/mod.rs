//! # Generation Module
//!
//! Procedural level generation.
//!
//! Levels are carved out of solid rock as rectangular rooms joined by
//! corridors. Everything is driven by a seeded [`StdRng`] so a seed always
//! yields the same level.

pub mod dungeon;

pub use dungeon::*;

use crate::game::{Level, Position, TileType};
use crate::{GameConfig, WarrenError, WarrenResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for level generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Level width in tiles
    pub width: u32,
    /// Level height in tiles
    pub height: u32,
    /// Minimum room size, walls included
    pub min_room_size: u32,
    /// Maximum room size, walls included
    pub max_room_size: u32,
    /// Minimum number of rooms attempted
    pub min_rooms: u32,
    /// Maximum number of rooms attempted
    pub max_rooms: u32,
}

impl GenerationConfig {
    /// Creates a default generation configuration for the given seed.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert!(config.min_room_size >= 3);
    /// assert!(config.max_room_size >= config.min_room_size);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: crate::constants::DEFAULT_LEVEL_WIDTH,
            height: crate::constants::DEFAULT_LEVEL_HEIGHT,
            min_room_size: 5,
            max_room_size: 10,
            min_rooms: 5,
            max_rooms: 9,
        }
    }

    /// Creates a configuration for testing with smaller, simpler levels.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            width: 30,
            height: 20,
            min_room_size: 4,
            max_room_size: 6,
            min_rooms: 3,
            max_rooms: 5,
        }
    }

    /// Derives generation settings from the session configuration.
    pub fn from_game_config(config: &GameConfig) -> Self {
        Self {
            width: config.level_width,
            height: config.level_height,
            ..Self::new(config.seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// A rectangular room, walls included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Unique identifier for this room
    pub id: u32,
    /// Top-left corner of the room
    pub top_left: Position,
    /// Width of the room (including walls)
    pub width: u32,
    /// Height of the room (including walls)
    pub height: u32,
}

impl Room {
    /// Creates a new room with the given parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{Room, Position};
    ///
    /// let room = Room::new(1, Position::new(5, 5), 10, 8);
    /// assert_eq!(room.center(), Position::new(10, 9));
    /// assert!(room.contains(Position::new(7, 7)));
    /// ```
    pub fn new(id: u32, top_left: Position, width: u32, height: u32) -> Self {
        Self {
            id,
            top_left,
            width,
            height,
        }
    }

    /// Gets the center position of the room.
    pub fn center(&self) -> Position {
        Position::new(
            self.top_left.x + self.width as i32 / 2,
            self.top_left.y + self.height as i32 / 2,
        )
    }

    /// Checks if a position is inside this room.
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= self.top_left.x
            && pos.y >= self.top_left.y
            && pos.x < self.top_left.x + self.width as i32
            && pos.y < self.top_left.y + self.height as i32
    }

    /// Checks if this room overlaps with another room.
    pub fn overlaps(&self, other: &Room) -> bool {
        !(self.top_left.x >= other.top_left.x + other.width as i32
            || other.top_left.x >= self.top_left.x + self.width as i32
            || self.top_left.y >= other.top_left.y + other.height as i32
            || other.top_left.y >= self.top_left.y + self.height as i32)
    }

    /// Gets all floor positions within this room.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();

        for y in (self.top_left.y + 1)..(self.top_left.y + self.height as i32 - 1) {
            for x in (self.top_left.x + 1)..(self.top_left.x + self.width as i32 - 1) {
                positions.push(Position::new(x, y));
            }
        }

        positions
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WarrenResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> WarrenResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Validates that a level meets basic requirements.
    pub fn validate_level(level: &Level) -> WarrenResult<()> {
        let floor_count = level
            .tiles
            .iter()
            .flat_map(|row| row.iter())
            .filter(|tile| tile.tile_type == TileType::Floor)
            .count();

        if floor_count == 0 {
            return Err(WarrenError::GenerationFailed(
                "Level has no floor tiles".to_string(),
            ));
        }
        if level.is_wall(level.player_spawn.x, level.player_spawn.y) {
            return Err(WarrenError::GenerationFailed(format!(
                "Player spawn {:?} is not on floor",
                level.player_spawn
            )));
        }
        Ok(())
    }
}

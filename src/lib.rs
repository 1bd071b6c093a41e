//! # Warren Roguelike
//!
//! A small turn-based roguelike: a tile-grid burrow explored by a player character
//! and a handful of wandering animals.
//!
//! ## Architecture Overview
//!
//! The heart of the crate is the object lifecycle and turn scheduling core:
//!
//! - **GameObject**: identity, position and the removal flag of everything in the world
//! - **ObjectManager**: spawn/update/remove lifecycle with deferred removal
//! - **TurnObjectManager**: round-robin turn sequencing over the characters
//! - **Controllers**: player input or animal wandering, held in an id-keyed registry
//! - **World**: the current level plus the managers; one `update` is one tick
//! - **Game / GameState**: the run loop driving init/update/draw/destroy
//!
//! Rendering and input are thin macroquad capabilities consumed through the
//! [`Renderer`] and [`InputSource`] traits, so the core runs headless in tests.

pub mod config;
pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod scenes;

// Core module re-exports
pub use config::GameConfig;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use scenes::*;

/// Core error type for the Warren engine.
#[derive(thiserror::Error, Debug)]
pub enum WarrenError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A lifecycle precondition was violated by the caller
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Turn management is active but no character is left to act
    #[error("Turn queue collapsed: no character left to take a turn")]
    TurnQueueCollapsed,

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Configuration is unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type used throughout the Warren codebase.
pub type WarrenResult<T> = Result<T, WarrenError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod constants {
    /// Minimum delay between two turn changes, in milliseconds
    pub const DEFAULT_TURN_DELAY_MS: u64 = 100;

    /// Default level width in tiles
    pub const DEFAULT_LEVEL_WIDTH: u32 = 60;

    /// Default level height in tiles
    pub const DEFAULT_LEVEL_HEIGHT: u32 = 30;

    /// Number of animals placed in a fresh level
    pub const DEFAULT_ANIMAL_COUNT: u32 = 6;

    /// Default player starting health
    pub const DEFAULT_PLAYER_HEALTH: u32 = 30;

    /// Default animal starting health
    pub const DEFAULT_ANIMAL_HEALTH: u32 = 6;

    /// Tile size in pixels
    pub const DEFAULT_TILE_SIZE: f32 = 24.0;
}

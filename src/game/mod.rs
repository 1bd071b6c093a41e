//! # Game Module
//!
//! Core simulation: object lifecycle, turn scheduling, controllers and the world.
//!
//! This module contains the fundamental building blocks of the Warren roguelike:
//! - Game objects and their lifecycle flags
//! - The object manager and its turn-sequencing extension
//! - Character controllers (player input and animal wandering)
//! - Levels, tiles and the world tying them together

pub mod character;
pub mod controller;
pub mod manager;
pub mod object;
pub mod turns;
pub mod world;

pub use character::*;
pub use controller::*;
pub use manager::*;
pub use object::*;
pub use turns::*;
pub use world::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Represents a 2D tile coordinate in the game world.
///
/// # Examples
///
/// ```
/// use warren::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
/// assert_eq!(pos.offset(1, -1), Position::new(11, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the origin position (0, 0).
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns this position shifted by the given deltas.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Unique identifier for game objects.
///
/// Ids come from a process-wide counter and are never reused, so two objects
/// compare equal exactly when their ids do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectId(u64);

impl ObjectId {
    /// Raw numeric value of the id.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates the next unique object id.
pub fn new_object_id() -> ObjectId {
    ObjectId(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Clamps a raw movement intent to {-1, 0, 1}.
pub fn clamp_unit(value: i32) -> i32 {
    value.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.x, 5);
        assert_eq!(pos.y, 10);
        assert_eq!(Position::origin(), Position::new(0, 0));
    }

    #[test]
    fn test_position_offset() {
        let pos = Position::new(5, 10);
        assert_eq!(pos.offset(-1, 0), Position::new(4, 10));
        assert_eq!(pos.offset(2, -3), Position::new(7, 7));
    }

    #[test]
    fn test_object_id_monotonic() {
        let id1 = new_object_id();
        let id2 = new_object_id();
        assert_ne!(id1, id2);
        assert!(id2 > id1);
    }

    #[test]
    fn test_clamp_unit() {
        assert_eq!(clamp_unit(7), 1);
        assert_eq!(clamp_unit(-3), -1);
        assert_eq!(clamp_unit(0), 0);
    }
}

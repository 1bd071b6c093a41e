//! # Rendering Module
//!
//! The camera and the rendering capabilities the simulation draws through.
//! Macroquad implementations live in [`display`].

pub mod display;

pub use display::*;

use crate::game::{GameObject, Level, Position};
use crate::constants::DEFAULT_TILE_SIZE;

/// Draws one kind of game object.
pub trait Renderer {
    fn draw(&self, camera: &Camera, object: &GameObject);
}

/// Draws the tiles of a level.
pub trait LevelRenderer {
    fn draw_level(&self, camera: &Camera, level: &Level);
}

/// Viewport over the tile grid.
///
/// # Examples
///
/// ```
/// use warren::{Camera, Position};
///
/// let mut camera = Camera::new(10, 8, 16.0);
/// camera.center_on(Position::new(20, 20));
/// assert_eq!(camera.viewport_x, 15);
/// assert_eq!(camera.to_screen(Position::new(15, 16)), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Leftmost visible tile column
    pub viewport_x: i32,
    /// Topmost visible tile row
    pub viewport_y: i32,
    /// Viewport width in tiles
    pub width: i32,
    /// Viewport height in tiles
    pub height: i32,
    /// Tile size in pixels
    pub tile_size: f32,
}

impl Camera {
    pub fn new(width: i32, height: i32, tile_size: f32) -> Self {
        Self {
            viewport_x: 0,
            viewport_y: 0,
            width,
            height,
            tile_size,
        }
    }

    /// Centers the viewport on the given tile.
    pub fn center_on(&mut self, position: Position) {
        self.viewport_x = position.x - self.width / 2;
        self.viewport_y = position.y - self.height / 2;
    }

    /// Checks whether a tile falls inside the viewport.
    pub fn is_visible(&self, position: Position) -> bool {
        position.x >= self.viewport_x
            && position.y >= self.viewport_y
            && position.x < self.viewport_x + self.width
            && position.y < self.viewport_y + self.height
    }

    /// Pixel coordinates of a tile's top-left corner.
    pub fn to_screen(&self, position: Position) -> (f32, f32) {
        (
            (position.x - self.viewport_x) as f32 * self.tile_size,
            (position.y - self.viewport_y) as f32 * self.tile_size,
        )
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(40, 25, DEFAULT_TILE_SIZE)
    }
}

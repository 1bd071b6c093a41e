//! # Display Management
//!
//! Macroquad renderers: a coloured square with a glyph per object, and the
//! tile map underneath.

use super::{Camera, LevelRenderer, Renderer};
use crate::game::{GameObject, Level, ObjectKind, Position, TileType};
use macroquad::prelude::*;

/// Draws an object as a glyph on a tinted square.
#[derive(Debug, Clone)]
pub struct GlyphRenderer {
    /// Glyph drawn for characters; props carry their own
    pub glyph: char,
    /// Glyph colour
    pub color: Color,
    /// Square tint behind the glyph
    pub background: Color,
    /// Draw a character's name initial instead of the fixed glyph
    pub name_initial: bool,
}

impl GlyphRenderer {
    pub fn new(glyph: char, color: Color) -> Self {
        Self {
            glyph,
            color,
            background: Color::new(0.0, 0.0, 0.0, 0.0),
            name_initial: false,
        }
    }

    /// Renderer for the player character.
    pub fn player() -> Self {
        Self::new('@', YELLOW)
    }

    /// Renderer for animals.
    pub fn animal() -> Self {
        Self {
            name_initial: true,
            ..Self::new('a', ORANGE)
        }
    }

    /// Renderer for props.
    pub fn prop() -> Self {
        Self::new('*', LIGHTGRAY)
    }
}

impl Renderer for GlyphRenderer {
    fn draw(&self, camera: &Camera, object: &GameObject) {
        if !camera.is_visible(object.position()) {
            return;
        }

        let glyph = match object.kind() {
            ObjectKind::Character(character) if self.name_initial => character
                .name
                .chars()
                .next()
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or(self.glyph),
            ObjectKind::Character(_) => self.glyph,
            ObjectKind::Prop(prop) => prop.glyph,
        };

        let (x, y) = camera.to_screen(object.position());
        let size = camera.tile_size;
        draw_rectangle(x, y, size, size, self.background);
        draw_text(
            &glyph.to_string(),
            x + size * 0.2,
            y + size * 0.8,
            size,
            self.color,
        );
    }
}

/// Draws the level's floor and walls as coloured squares.
#[derive(Debug, Clone)]
pub struct TileMapRenderer {
    pub floor_color: Color,
    pub wall_color: Color,
}

impl Default for TileMapRenderer {
    fn default() -> Self {
        Self {
            floor_color: Color::new(0.15, 0.12, 0.10, 1.0),
            wall_color: Color::new(0.45, 0.35, 0.25, 1.0),
        }
    }
}

impl LevelRenderer for TileMapRenderer {
    fn draw_level(&self, camera: &Camera, level: &Level) {
        for screen_y in 0..camera.height {
            for screen_x in 0..camera.width {
                let position = Position::new(
                    camera.viewport_x + screen_x,
                    camera.viewport_y + screen_y,
                );
                let Some(tile) = level.get_tile(position) else {
                    continue;
                };

                let color = match tile.tile_type {
                    TileType::Floor => self.floor_color,
                    TileType::Wall => self.wall_color,
                };
                let (x, y) = camera.to_screen(position);
                draw_rectangle(x, y, camera.tile_size, camera.tile_size, color);
            }
        }
    }
}

//! # Input Module
//!
//! The input capability consumed by the player controller, and its macroquad
//! implementation.

use macroquad::prelude::*;

/// Logical keys the game cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Quit,
}

/// Anything that can answer "is this key held down right now".
///
/// The player controller receives one of these at construction, so tests can
/// script input without a window.
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Keyboard input read from macroquad.
///
/// Arrow keys and WASD map onto the four directions; with Vi keys enabled,
/// `hjkl` do as well.
#[derive(Debug, Clone)]
pub struct MacroquadInput {
    /// Whether to enable Vi-style movement keys (hjkl)
    pub vi_keys_enabled: bool,
}

impl Default for MacroquadInput {
    fn default() -> Self {
        Self::new()
    }
}

impl MacroquadInput {
    /// Creates a new input source with Vi keys enabled.
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    fn key_codes(&self, key: Key) -> &'static [KeyCode] {
        match (key, self.vi_keys_enabled) {
            (Key::Up, true) => &[KeyCode::Up, KeyCode::W, KeyCode::K],
            (Key::Up, false) => &[KeyCode::Up, KeyCode::W],
            (Key::Down, true) => &[KeyCode::Down, KeyCode::S, KeyCode::J],
            (Key::Down, false) => &[KeyCode::Down, KeyCode::S],
            (Key::Left, true) => &[KeyCode::Left, KeyCode::A, KeyCode::H],
            (Key::Left, false) => &[KeyCode::Left, KeyCode::A],
            (Key::Right, true) => &[KeyCode::Right, KeyCode::D, KeyCode::L],
            (Key::Right, false) => &[KeyCode::Right, KeyCode::D],
            (Key::Quit, _) => &[KeyCode::Escape],
        }
    }
}

impl InputSource for MacroquadInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.key_codes(key).iter().any(|&code| is_key_down(code))
    }
}

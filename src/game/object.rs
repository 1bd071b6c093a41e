//! # Game Objects
//!
//! The base unit managed by the object managers: identity, position, lifecycle
//! flags, and the kind-specific data for characters and props.

use super::{new_object_id, ObjectId, Position, WorldId};
use crate::{WarrenError, WarrenResult};
use log::debug;
use serde::{Deserialize, Serialize};

/// Combat-relevant numbers for a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    /// Health the character starts with
    pub max_health: u32,
    /// Damage dealt by a bump attack
    pub attack: u32,
}

impl CharacterStats {
    /// Creates a new stat block.
    pub fn new(max_health: u32, attack: u32) -> Self {
        Self { max_health, attack }
    }
}

/// Who a character is, for rendering and bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterRole {
    /// The character steered by the human
    Player,
    /// A wandering creature
    Animal,
}

/// Character-specific state carried by a [`GameObject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
    pub role: CharacterRole,
    pub health: u32,
    pub max_health: u32,
    pub attack: u32,
}

impl Character {
    /// Creates a character at full health.
    pub fn new(name: impl Into<String>, role: CharacterRole, stats: CharacterStats) -> Self {
        Self {
            name: name.into(),
            role,
            health: stats.max_health,
            max_health: stats.max_health,
            attack: stats.attack,
        }
    }

    /// Checks whether the character still has health left.
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Applies damage, saturating at zero. Returns true if this blow was lethal.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.is_alive();
        self.health = self.health.saturating_sub(amount);
        was_alive && !self.is_alive()
    }
}

/// Static scenery that lives in the object collection but never takes turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prop {
    pub name: String,
    pub glyph: char,
}

impl Prop {
    /// Creates a new prop.
    pub fn new(name: impl Into<String>, glyph: char) -> Self {
        Self {
            name: name.into(),
            glyph,
        }
    }
}

/// Kind-specific payload of a game object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Character(Character),
    Prop(Prop),
}

/// Tag used to look up the renderer for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderKind {
    Player,
    Animal,
    Prop,
}

/// A thing living in the world.
///
/// Objects are created detached. They become part of a world when an
/// [`ObjectManager`](super::ObjectManager) spawns them, which binds the world and
/// calls [`GameObject::init`]. From then on [`GameObject::update`] may be called
/// once per tick until [`GameObject::remove`] flags the object, after which the
/// manager drops it at the end of the current pass.
#[derive(Debug, Clone)]
pub struct GameObject {
    id: ObjectId,
    position: Position,
    kind: ObjectKind,
    world: Option<WorldId>,
    initialized: bool,
    removed: bool,
    dirty: bool,
}

impl GameObject {
    /// Creates a detached object with a freshly allocated id.
    pub fn new(position: Position, kind: ObjectKind) -> Self {
        Self {
            id: new_object_id(),
            position,
            kind,
            world: None,
            initialized: false,
            removed: false,
            dirty: true,
        }
    }

    /// Creates a detached character object.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::{CharacterRole, CharacterStats, GameObject, Position};
    ///
    /// let rabbit = GameObject::character(
    ///     "Rabbit",
    ///     CharacterRole::Animal,
    ///     CharacterStats::new(4, 1),
    ///     Position::new(2, 3),
    /// );
    /// assert!(rabbit.is_character());
    /// assert!(!rabbit.is_initialized());
    /// ```
    pub fn character(
        name: impl Into<String>,
        role: CharacterRole,
        stats: CharacterStats,
        position: Position,
    ) -> Self {
        Self::new(
            position,
            ObjectKind::Character(Character::new(name, role, stats)),
        )
    }

    /// Creates a detached prop object.
    pub fn prop(name: impl Into<String>, glyph: char, position: Position) -> Self {
        Self::new(position, ObjectKind::Prop(Prop::new(name, glyph)))
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the object, marking it dirty if the position actually changed.
    pub fn set_position(&mut self, position: Position) {
        if self.position != position {
            self.position = position;
            self.dirty = true;
        }
    }

    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    pub fn is_character(&self) -> bool {
        matches!(self.kind, ObjectKind::Character(_))
    }

    pub fn as_character(&self) -> Option<&Character> {
        match &self.kind {
            ObjectKind::Character(character) => Some(character),
            ObjectKind::Prop(_) => None,
        }
    }

    /// Mutable access to the character payload. Marks the object dirty.
    pub fn as_character_mut(&mut self) -> Option<&mut Character> {
        match &mut self.kind {
            ObjectKind::Character(character) => {
                self.dirty = true;
                Some(character)
            }
            ObjectKind::Prop(_) => None,
        }
    }

    /// Tag for renderer lookup.
    pub fn render_kind(&self) -> RenderKind {
        match &self.kind {
            ObjectKind::Character(character) => match character.role {
                CharacterRole::Player => RenderKind::Player,
                CharacterRole::Animal => RenderKind::Animal,
            },
            ObjectKind::Prop(_) => RenderKind::Prop,
        }
    }

    /// World this object was spawned into, if any.
    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    pub(crate) fn attach(&mut self, world: WorldId) {
        self.world = Some(world);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_removed(&self) -> bool {
        self.removed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// One-time initialization, run by the manager right after spawning.
    pub fn init(&mut self) -> WarrenResult<()> {
        if self.world.is_none() {
            return Err(WarrenError::Precondition(format!(
                "object {} initialized before being spawned into a world",
                self.id
            )));
        }
        if self.removed {
            return Err(WarrenError::Precondition(format!(
                "object {} initialized after removal",
                self.id
            )));
        }
        if self.initialized {
            return Err(WarrenError::Precondition(format!(
                "object {} initialized twice",
                self.id
            )));
        }
        self.initialized = true;
        Ok(())
    }

    /// Per-tick update. Characters out of health flag themselves for removal.
    pub fn update(&mut self) -> WarrenResult<()> {
        if self.removed {
            return Err(WarrenError::Precondition(format!(
                "object {} updated after removal",
                self.id
            )));
        }
        if !self.initialized {
            return Err(WarrenError::Precondition(format!(
                "object {} updated before being spawned",
                self.id
            )));
        }

        if let ObjectKind::Character(character) = &self.kind {
            if !character.is_alive() {
                debug!("{} ({}) has no health left", character.name, self.id);
                self.remove();
            }
        }
        Ok(())
    }

    /// Flags the object for removal. Returns false if it was already flagged.
    pub fn remove(&mut self) -> bool {
        if self.removed {
            return false;
        }
        self.removed = true;
        true
    }
}

impl PartialEq for GameObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GameObject {}

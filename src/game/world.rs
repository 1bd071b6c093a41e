//! # World and Level Representation
//!
//! The tile grid characters move on, and the world tying the current level to
//! the turn manager and the controllers.

use super::{
    new_world_id, AnimalController, CharacterRole, Controller, ControllerId, ControllerRegistry,
    GameObject, ObjectId, PlayerController, Position, TurnObjectManager, TurnOutcome, WorldId,
};
use crate::{GameConfig, WarrenError, WarrenResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Kinds of tile a level is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    Floor,
    Wall,
}

impl TileType {
    /// Checks whether characters can stand on this tile.
    pub fn is_passable(self) -> bool {
        matches!(self, TileType::Floor)
    }
}

/// A single tile of the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub tile_type: TileType,
}

impl Tile {
    pub fn new(tile_type: TileType) -> Self {
        Self { tile_type }
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }
}

/// A rectangular grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    /// Tiles indexed as `tiles[y][x]`
    pub tiles: Vec<Vec<Tile>>,
    /// Where the player character enters the level
    pub player_spawn: Position,
}

impl Level {
    /// Creates a level made entirely of walls, ready to be carved.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TileType::Wall)
    }

    /// Creates a level made entirely of one tile type.
    pub fn filled(width: u32, height: u32, tile_type: TileType) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::new(tile_type); width as usize]; height as usize],
            player_spawn: Position::origin(),
        }
    }

    /// Builds a level from ASCII rows: `#` is wall, `.` is floor.
    ///
    /// # Examples
    ///
    /// ```
    /// use warren::Level;
    ///
    /// let level = Level::from_rows(&["#####", "#...#", "#####"]).unwrap();
    /// assert_eq!(level.width, 5);
    /// assert!(level.is_wall(0, 1));
    /// assert!(!level.is_wall(2, 1));
    /// ```
    pub fn from_rows(rows: &[&str]) -> WarrenResult<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        if width == 0 {
            return Err(WarrenError::InvalidState("level has no tiles".to_string()));
        }

        let mut tiles = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(WarrenError::InvalidState(format!(
                    "row {} has {} tiles, expected {}",
                    y,
                    row.chars().count(),
                    width
                )));
            }
            let tile_row = row
                .chars()
                .map(|glyph| match glyph {
                    '#' => Ok(Tile::wall()),
                    '.' => Ok(Tile::floor()),
                    other => Err(WarrenError::InvalidState(format!(
                        "unknown tile glyph {:?} in row {}",
                        other, y
                    ))),
                })
                .collect::<WarrenResult<Vec<_>>>()?;
            tiles.push(tile_row);
        }

        Ok(Self {
            width: width as u32,
            height: rows.len() as u32,
            tiles,
            player_spawn: Position::origin(),
        })
    }

    /// Checks whether a position lies on the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }

    /// Pulls a position back onto the grid. An empty grid leaves it as is.
    pub fn clamp(&self, position: Position) -> Position {
        if self.width == 0 || self.height == 0 {
            return position;
        }
        Position::new(
            position.x.clamp(0, self.width as i32 - 1),
            position.y.clamp(0, self.height as i32 - 1),
        )
    }

    pub fn get_tile(&self, position: Position) -> Option<&Tile> {
        if !self.in_bounds(position) {
            return None;
        }
        self.tiles
            .get(position.y as usize)
            .and_then(|row| row.get(position.x as usize))
    }

    pub fn set_tile(&mut self, position: Position, tile: Tile) -> WarrenResult<()> {
        if !self.in_bounds(position) {
            return Err(WarrenError::InvalidState(format!(
                "position {:?} is outside the level",
                position
            )));
        }
        self.tiles[position.y as usize][position.x as usize] = tile;
        Ok(())
    }

    /// Checks for a wall. Anything off the grid counts as wall.
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.get_tile(Position::new(x, y))
            .map_or(true, |tile| !tile.tile_type.is_passable())
    }

    /// All passable positions, row by row.
    pub fn floor_positions(&self) -> Vec<Position> {
        let mut positions = Vec::new();
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                if tile.tile_type.is_passable() {
                    positions.push(Position::new(x as i32, y as i32));
                }
            }
        }
        positions
    }
}

const ANIMAL_NAMES: &[&str] = &["Rabbit", "Badger", "Fox", "Hedgehog", "Mole", "Weasel"];

/// The current level together with everything living in it.
///
/// One [`World::update`] is one simulation tick.
#[derive(Debug)]
pub struct World {
    id: WorldId,
    level: Level,
    manager: TurnObjectManager,
    controllers: ControllerRegistry,
    ticks: u64,
}

impl World {
    /// Creates a world on the given level with a bound turn manager.
    pub fn new(level: Level, turn_delay: Duration) -> WarrenResult<Self> {
        if level.width == 0 || level.height == 0 {
            return Err(WarrenError::InvalidState(format!(
                "level must not be empty, got {}x{}",
                level.width, level.height
            )));
        }
        let id = new_world_id();
        let mut manager = TurnObjectManager::new(turn_delay);
        manager.init(id)?;
        Ok(Self {
            id,
            level,
            manager,
            controllers: ControllerRegistry::new(),
            ticks: 0,
        })
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn manager(&self) -> &TurnObjectManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut TurnObjectManager {
        &mut self.manager
    }

    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    pub fn controllers_mut(&mut self) -> &mut ControllerRegistry {
        &mut self.controllers
    }

    /// Number of ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn objects(&self) -> &[GameObject] {
        self.manager.objects().objects()
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.manager.objects().get(id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.manager.objects().contains(id)
    }

    /// Spawns an object into this world.
    pub fn spawn(&mut self, object: GameObject) -> WarrenResult<ObjectId> {
        self.manager.spawn(object)
    }

    /// Spawns a character and hands it to a newly registered controller.
    pub fn spawn_controlled(
        &mut self,
        object: GameObject,
        controller: impl Into<Controller>,
    ) -> WarrenResult<(ObjectId, ControllerId)> {
        let character = self.spawn(object)?;
        let controller = self.controllers.register(controller);
        self.take_control(controller, Some(character))?;
        Ok((character, controller))
    }

    /// Points a controller at one of this world's characters, or at nothing.
    pub fn take_control(
        &mut self,
        controller: ControllerId,
        character: Option<ObjectId>,
    ) -> WarrenResult<()> {
        if let Some(id) = character {
            let is_live_character = self
                .get(id)
                .is_some_and(|object| object.is_character() && !object.is_removed());
            if !is_live_character {
                return Err(WarrenError::Precondition(format!(
                    "{} is not a live character of this world",
                    id
                )));
            }
        }
        self.controllers.take_control(controller, character)
    }

    /// Flags an object for removal at the end of the next tick's update pass.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.manager.remove(id)
    }

    /// Deals damage to a character from outside the turn flow.
    ///
    /// Returns true if the blow was lethal; the character drops out on the next tick.
    pub fn damage(&mut self, id: ObjectId, amount: u32) -> WarrenResult<bool> {
        let character = self
            .manager
            .objects_mut()
            .get_mut(id)
            .and_then(GameObject::as_character_mut)
            .ok_or_else(|| WarrenError::InvalidState(format!("{} is not a character", id)))?;
        Ok(character.take_damage(amount))
    }

    /// Runs one simulation tick.
    pub fn update(&mut self, now: Instant) -> WarrenResult<TurnOutcome> {
        self.ticks += 1;
        self.manager.update(&self.level, &mut self.controllers, now)
    }

    /// Places the player at the level's spawn point and scatters animals over
    /// free floor tiles. Returns the player character's id.
    pub fn populate(
        &mut self,
        player: PlayerController,
        config: &GameConfig,
        rng: &mut StdRng,
    ) -> WarrenResult<ObjectId> {
        let spawn = self.level.player_spawn;
        if self.level.is_wall(spawn.x, spawn.y) {
            return Err(WarrenError::InvalidState(format!(
                "player spawn {:?} is not floor",
                spawn
            )));
        }

        let hero =
            GameObject::character("Player", CharacterRole::Player, config.player_stats, spawn);
        let (player_id, _) = self.spawn_controlled(hero, player)?;

        let mut free: Vec<Position> = self
            .level
            .floor_positions()
            .into_iter()
            .filter(|&position| position != spawn)
            .collect();
        free.shuffle(rng);

        let count = (config.animal_count as usize).min(free.len());
        for (index, position) in free.into_iter().take(count).enumerate() {
            let name = ANIMAL_NAMES[index % ANIMAL_NAMES.len()];
            let animal =
                GameObject::character(name, CharacterRole::Animal, config.animal_stats, position);
            let (id, _) = self.spawn_controlled(animal, AnimalController::new(rng.gen()))?;
            debug!("Placed {} {} at {:?}", name, id, position);
        }

        info!("Populated world with the player and {} animals", count);
        Ok(player_id)
    }
}

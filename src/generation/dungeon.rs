//! # Dungeon Generation
//!
//! Room-and-corridor levels: rooms are placed at random without overlapping,
//! then each room is joined to the next by an L-shaped corridor.

use super::{utils, GenerationConfig, Generator, Room};
use crate::game::{Level, Position, Tile};
use crate::{WarrenError, WarrenResult};
use log::{debug, info};
use rand::{rngs::StdRng, Rng};

/// Primary level generator using the room-and-corridor algorithm.
///
/// # Examples
///
/// ```
/// use warren::{utils, GenerationConfig, Generator, RoomCorridorGenerator};
///
/// let config = GenerationConfig::for_testing(7);
/// let mut rng = utils::create_rng(&config);
/// let level = RoomCorridorGenerator::new().generate(&config, &mut rng).unwrap();
/// assert!(!level.is_wall(level.player_spawn.x, level.player_spawn.y));
/// ```
#[derive(Debug, Clone)]
pub struct RoomCorridorGenerator {
    /// Maximum attempts to place a room before giving up
    pub max_placement_attempts: u32,
}

impl RoomCorridorGenerator {
    /// Creates a new generator with default settings.
    pub fn new() -> Self {
        Self {
            max_placement_attempts: 100,
        }
    }

    /// Places rooms until the rolled count is reached or attempts run out.
    fn place_rooms(
        &self,
        level: &mut Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> WarrenResult<Vec<Room>> {
        let mut rooms = Vec::new();
        let room_count = rng.gen_range(config.min_rooms..=config.max_rooms);

        for room_id in 0..room_count {
            if let Some(room) = self.try_place_room(level, config, rng, room_id, &rooms) {
                self.carve_room(level, &room)?;
                rooms.push(room);
            }
        }

        if rooms.is_empty() {
            return Err(WarrenError::GenerationFailed(
                "Failed to place any rooms".to_string(),
            ));
        }

        Ok(rooms)
    }

    /// Attempts to place a single room.
    fn try_place_room(
        &self,
        level: &Level,
        config: &GenerationConfig,
        rng: &mut StdRng,
        room_id: u32,
        existing_rooms: &[Room],
    ) -> Option<Room> {
        for _ in 0..self.max_placement_attempts {
            let width = rng.gen_range(config.min_room_size..=config.max_room_size);
            let height = rng.gen_range(config.min_room_size..=config.max_room_size);
            let x = rng.gen_range(1..(level.width - width) as i32);
            let y = rng.gen_range(1..(level.height - height) as i32);
            let room = Room::new(room_id, Position::new(x, y), width, height);

            if !existing_rooms.iter().any(|existing| room.overlaps(existing)) {
                return Some(room);
            }
        }

        debug!("Gave up placing room {}", room_id);
        None
    }

    /// Carves out a room's interior.
    fn carve_room(&self, level: &mut Level, room: &Room) -> WarrenResult<()> {
        for pos in room.floor_positions() {
            level.set_tile(pos, Tile::floor())?;
        }
        Ok(())
    }

    /// Carves an L-shaped corridor, randomly choosing which leg comes first.
    fn carve_l_corridor(
        &self,
        level: &mut Level,
        start: Position,
        end: Position,
        rng: &mut StdRng,
    ) -> WarrenResult<()> {
        let corner = if rng.gen_bool(0.5) {
            Position::new(end.x, start.y)
        } else {
            Position::new(start.x, end.y)
        };
        self.carve_straight(level, start, corner)?;
        self.carve_straight(level, corner, end)
    }

    fn carve_straight(&self, level: &mut Level, from: Position, to: Position) -> WarrenResult<()> {
        let (dx, dy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
        let mut current = from;
        level.set_tile(current, Tile::floor())?;
        while current != to {
            current = current.offset(dx, dy);
            level.set_tile(current, Tile::floor())?;
        }
        Ok(())
    }
}

impl Default for RoomCorridorGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator<Level> for RoomCorridorGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> WarrenResult<Level> {
        if config.min_room_size < 3 || config.min_room_size > config.max_room_size {
            return Err(WarrenError::GenerationFailed(format!(
                "Invalid room size range {}..={}",
                config.min_room_size, config.max_room_size
            )));
        }
        if config.width < config.max_room_size + 2 || config.height < config.max_room_size + 2 {
            return Err(WarrenError::GenerationFailed(format!(
                "Level {}x{} is too small for rooms up to {}",
                config.width, config.height, config.max_room_size
            )));
        }
        if config.min_rooms == 0 || config.min_rooms > config.max_rooms {
            return Err(WarrenError::GenerationFailed(format!(
                "Invalid room count range {}..={}",
                config.min_rooms, config.max_rooms
            )));
        }

        let mut level = Level::new(config.width, config.height);
        let rooms = self.place_rooms(&mut level, config, rng)?;

        for pair in rooms.windows(2) {
            self.carve_l_corridor(&mut level, pair[0].center(), pair[1].center(), rng)?;
        }
        level.player_spawn = rooms[0].center();

        self.validate(&level, config)?;
        info!(
            "{} generated a {}x{} level with {} rooms",
            self.generator_type(),
            level.width,
            level.height,
            rooms.len()
        );
        Ok(level)
    }

    fn validate(&self, content: &Level, config: &GenerationConfig) -> WarrenResult<()> {
        if content.width != config.width || content.height != config.height {
            return Err(WarrenError::GenerationFailed(
                "Level dimensions do not match the configuration".to_string(),
            ));
        }
        utils::validate_level(content)
    }

    fn generator_type(&self) -> &'static str {
        "RoomCorridorGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashSet, VecDeque};

    fn generate(seed: u64) -> Level {
        let config = GenerationConfig::for_testing(seed);
        let mut rng = utils::create_rng(&config);
        RoomCorridorGenerator::new()
            .generate(&config, &mut rng)
            .unwrap()
    }

    #[test]
    fn test_generation_is_deterministic() {
        assert_eq!(generate(1234), generate(1234));
    }

    #[test]
    fn test_border_stays_solid() {
        let level = generate(77);
        for x in 0..level.width as i32 {
            assert!(level.is_wall(x, 0));
            assert!(level.is_wall(x, level.height as i32 - 1));
        }
        for y in 0..level.height as i32 {
            assert!(level.is_wall(0, y));
            assert!(level.is_wall(level.width as i32 - 1, y));
        }
    }

    #[test]
    fn test_all_floor_reachable_from_spawn() {
        for seed in [3, 17, 99, 2024] {
            let level = generate(seed);
            let floor: HashSet<_> = level.floor_positions().into_iter().collect();

            let mut seen = HashSet::from([level.player_spawn]);
            let mut frontier = VecDeque::from([level.player_spawn]);
            while let Some(pos) = frontier.pop_front() {
                for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
                    let next = pos.offset(dx, dy);
                    if floor.contains(&next) && seen.insert(next) {
                        frontier.push_back(next);
                    }
                }
            }
            assert_eq!(seen.len(), floor.len(), "seed {} left unreachable floor", seed);
        }
    }

    #[test]
    fn test_rejects_undersized_level() {
        let config = GenerationConfig {
            width: 6,
            height: 6,
            ..GenerationConfig::for_testing(1)
        };
        let mut rng = utils::create_rng(&config);
        assert!(RoomCorridorGenerator::new()
            .generate(&config, &mut rng)
            .is_err());
    }
}

//! # Character Turns
//!
//! What a character does when its turn comes up: ask its controller for
//! intent, then attack or step one tile orthogonally against the level.

use super::{
    clamp_unit, ControllerRegistry, GameObject, Level, ObjectId, ObjectManager, Position,
    TurnQueue,
};
use crate::{WarrenError, WarrenResult};
use log::{debug, warn};
use std::time::Instant;

/// What happened during one turn-manager update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// No character has ever joined the turn queue
    Idle,
    /// The turn delay has not elapsed yet
    Waiting,
    /// The character gave up its turn
    Passed(ObjectId),
    /// The character stepped to a new tile and ended its turn
    Moved {
        character: ObjectId,
        from: Position,
        to: Position,
    },
    /// The character bumped into another character and ended its turn
    Attacked {
        attacker: ObjectId,
        target: ObjectId,
        damage: u32,
        lethal: bool,
    },
    /// Nothing happened; the character keeps the turn and is polled again
    Stayed(ObjectId),
}

impl TurnOutcome {
    /// Checks whether this outcome handed the turn to the next character.
    pub fn ended_turn(&self) -> bool {
        matches!(
            self,
            TurnOutcome::Passed(_) | TurnOutcome::Moved { .. } | TurnOutcome::Attacked { .. }
        )
    }
}

/// Resolves raw controller intent into a single orthogonal step.
///
/// Each axis is clamped to {-1, 0, 1}; horizontal intent wins over vertical.
///
/// # Examples
///
/// ```
/// use warren::resolve_step;
///
/// assert_eq!(resolve_step(5, -2), (1, 0));
/// assert_eq!(resolve_step(0, -2), (0, -1));
/// assert_eq!(resolve_step(0, 0), (0, 0));
/// ```
pub fn resolve_step(raw_x: i32, raw_y: i32) -> (i32, i32) {
    let dx = clamp_unit(raw_x);
    let dy = if dx != 0 { 0 } else { clamp_unit(raw_y) };
    (dx, dy)
}

/// Moves an object by one step if the destination is open floor.
///
/// The destination is clamped to the level bounds, so stepping off an edge is a
/// no-op. Returns true only if the position changed.
pub fn move_character(object: &mut GameObject, level: &Level, dx: i32, dy: i32) -> bool {
    if dx == 0 && dy == 0 {
        return false;
    }

    let current = object.position();
    let candidate = level.clamp(current.offset(dx, dy));
    if candidate == current || level.is_wall(candidate.x, candidate.y) {
        return false;
    }

    object.set_position(candidate);
    true
}

/// Runs the active character's turn.
///
/// The controller is polled and given a chance to end the turn itself. Otherwise
/// the resolved step either attacks a character standing in the way or moves;
/// either of those ends the turn. A blocked or empty step leaves the turn with
/// the character so its controller can be polled again next tick.
pub fn update_on_own_turn(
    character: ObjectId,
    objects: &mut ObjectManager,
    turns: &mut TurnQueue,
    controllers: &mut ControllerRegistry,
    level: &Level,
    now: Instant,
) -> WarrenResult<TurnOutcome> {
    let controller = match controllers.controller_of(character) {
        Some(id) => controllers.get_mut(id),
        None => None,
    };
    let Some(controller) = controller else {
        warn!("Character {} has no controller, passing its turn", character);
        turns.end_turn(now);
        return Ok(TurnOutcome::Passed(character));
    };

    controller.poll();
    let turns_before = turns.turns_taken();
    controller.update(turns, now);
    if turns.turns_taken() != turns_before {
        debug!("Character {} passed its turn", character);
        return Ok(TurnOutcome::Passed(character));
    }

    let (dx, dy) = resolve_step(controller.move_input_x(), controller.move_input_y());
    if dx == 0 && dy == 0 {
        return Ok(TurnOutcome::Stayed(character));
    }

    let (from, attack) = {
        let object = objects.get(character).ok_or_else(|| {
            WarrenError::InvalidState(format!("active character {} is not spawned", character))
        })?;
        let attack = object.as_character().map_or(0, |c| c.attack);
        (object.position(), attack)
    };

    let destination = level.clamp(from.offset(dx, dy));
    if destination != from {
        let occupant = objects
            .character_at(destination)
            .map(GameObject::id)
            .filter(|&id| id != character);
        if let Some(target) = occupant {
            let lethal = objects
                .get_mut(target)
                .and_then(GameObject::as_character_mut)
                .map_or(false, |victim| victim.take_damage(attack));
            debug!(
                "Character {} hit {} for {}{}",
                character,
                target,
                attack,
                if lethal { " (lethal)" } else { "" }
            );
            turns.end_turn(now);
            return Ok(TurnOutcome::Attacked {
                attacker: character,
                target,
                damage: attack,
                lethal,
            });
        }
    }

    let object = objects.get_mut(character).ok_or_else(|| {
        WarrenError::InvalidState(format!("active character {} is not spawned", character))
    })?;
    if move_character(object, level, dx, dy) {
        let to = object.position();
        turns.end_turn(now);
        debug!("Character {} moved {:?} -> {:?}", character, from, to);
        Ok(TurnOutcome::Moved {
            character,
            from,
            to,
        })
    } else {
        Ok(TurnOutcome::Stayed(character))
    }
}

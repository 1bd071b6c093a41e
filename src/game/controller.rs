//! # Character Controllers
//!
//! Controllers supply a character's movement intent each time it is polled on
//! the character's turn. The player controller reads an injected
//! [`InputSource`]; the animal controller wanders at random and passes its turn
//! when it rolls no movement at all.
//!
//! Which controller drives which character is tracked by the
//! [`ControllerRegistry`] as a pair of id-keyed maps rather than mutual
//! references.

use super::{ObjectId, TurnQueue};
use crate::input::{InputSource, Key};
use crate::{WarrenError, WarrenResult};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use std::time::Instant;

/// Identifies a controller within a [`ControllerRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u32);

/// Drives a character from keyboard input.
pub struct PlayerController {
    input: Box<dyn InputSource>,
    input_x: i32,
    input_y: i32,
}

impl PlayerController {
    pub fn new(input: Box<dyn InputSource>) -> Self {
        Self {
            input,
            input_x: 0,
            input_y: 0,
        }
    }

    fn sample(&mut self) {
        let axis = |negative: Key, positive: Key| {
            i32::from(self.input.is_key_down(positive)) - i32::from(self.input.is_key_down(negative))
        };
        let x = axis(Key::Left, Key::Right);
        let y = axis(Key::Up, Key::Down);
        self.input_x = x;
        self.input_y = y;
    }
}

impl fmt::Debug for PlayerController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayerController")
            .field("input_x", &self.input_x)
            .field("input_y", &self.input_y)
            .finish()
    }
}

/// Wanders in a random direction each turn.
#[derive(Debug, Clone)]
pub struct AnimalController {
    rng: StdRng,
    input_x: i32,
    input_y: i32,
}

impl AnimalController {
    /// Creates an animal controller with its own seeded random stream.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            input_x: 0,
            input_y: 0,
        }
    }

    fn sample(&mut self) {
        self.input_x = self.rng.gen_range(-1..=1);
        self.input_y = self.rng.gen_range(-1..=1);
    }

    fn wants_to_pass(&self) -> bool {
        self.input_x == 0 && self.input_y == 0
    }
}

/// A source of per-turn intent for one character.
#[derive(Debug)]
pub enum Controller {
    Player(PlayerController),
    Animal(AnimalController),
}

impl Controller {
    /// Samples fresh intent for the upcoming action.
    pub fn poll(&mut self) {
        match self {
            Controller::Player(player) => player.sample(),
            Controller::Animal(animal) => animal.sample(),
        }
    }

    /// Last sampled horizontal intent, one of -1, 0 or 1.
    pub fn move_input_x(&self) -> i32 {
        match self {
            Controller::Player(player) => player.input_x,
            Controller::Animal(animal) => animal.input_x,
        }
    }

    /// Last sampled vertical intent, one of -1, 0 or 1.
    pub fn move_input_y(&self) -> i32 {
        match self {
            Controller::Player(player) => player.input_y,
            Controller::Animal(animal) => animal.input_y,
        }
    }

    /// Gives the controller a chance to act on the turn directly.
    ///
    /// Animals that rolled no movement end their turn here instead of trying
    /// a null move.
    pub fn update(&mut self, turns: &mut TurnQueue, now: Instant) {
        match self {
            Controller::Player(_) => {}
            Controller::Animal(animal) => {
                if animal.wants_to_pass() {
                    turns.end_turn(now);
                }
            }
        }
    }
}

impl From<PlayerController> for Controller {
    fn from(controller: PlayerController) -> Self {
        Controller::Player(controller)
    }
}

impl From<AnimalController> for Controller {
    fn from(controller: AnimalController) -> Self {
        Controller::Animal(controller)
    }
}

/// Owns all controllers and the controller/character pairing.
///
/// A controller drives at most one character and a character is driven by at
/// most one controller; [`ControllerRegistry::take_control`] keeps both maps
/// consistent.
#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<ControllerId, Controller>,
    controlled: HashMap<ControllerId, ObjectId>,
    controller_of: HashMap<ObjectId, ControllerId>,
    next_id: u32,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a controller that does not yet control anything.
    pub fn register(&mut self, controller: impl Into<Controller>) -> ControllerId {
        let id = ControllerId(self.next_id);
        self.next_id += 1;
        self.controllers.insert(id, controller.into());
        id
    }

    /// Removes a controller, releasing the character it controlled.
    pub fn unregister(&mut self, id: ControllerId) -> Option<Controller> {
        if let Some(character) = self.controlled.remove(&id) {
            self.controller_of.remove(&character);
        }
        self.controllers.remove(&id)
    }

    /// Points a controller at a character, or at nothing.
    ///
    /// The controller lets go of its previous character, and a controller that
    /// previously drove the new character loses it.
    pub fn take_control(
        &mut self,
        controller: ControllerId,
        character: Option<ObjectId>,
    ) -> WarrenResult<()> {
        if !self.controllers.contains_key(&controller) {
            return Err(WarrenError::Precondition(format!(
                "unknown controller {:?}",
                controller
            )));
        }

        if let Some(previous) = self.controlled.remove(&controller) {
            self.controller_of.remove(&previous);
        }

        if let Some(character) = character {
            if let Some(displaced) = self.controller_of.insert(character, controller) {
                self.controlled.remove(&displaced);
                debug!(
                    "Controller {:?} took {} over from {:?}",
                    controller, character, displaced
                );
            }
            self.controlled.insert(controller, character);
        }
        Ok(())
    }

    /// Forgets whichever controller drives the given character.
    pub fn release_character(&mut self, character: ObjectId) {
        if let Some(controller) = self.controller_of.remove(&character) {
            self.controlled.remove(&controller);
        }
    }

    /// Character driven by the given controller.
    pub fn controlled_by(&self, controller: ControllerId) -> Option<ObjectId> {
        self.controlled.get(&controller).copied()
    }

    /// Controller driving the given character.
    pub fn controller_of(&self, character: ObjectId) -> Option<ControllerId> {
        self.controller_of.get(&character).copied()
    }

    pub fn get(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    pub fn get_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

//! # Scene Management
//!
//! The run-loop driver. A [`Game`] owns one [`GameState`] and walks it through
//! `init`, any number of ticks, then `destroy`. The window loop in the binary
//! only has to call [`Game::tick`] once per frame.

use crate::game::{ObjectId, TurnOutcome, World};
use crate::rendering::{Camera, LevelRenderer};
use crate::{WarrenError, WarrenResult};
use log::{debug, info};
use std::time::Instant;

/// A screen of the game with its own update and draw passes.
pub trait GameState {
    /// Called once before the first tick.
    fn init(&mut self) -> WarrenResult<()>;

    /// Advances the simulation.
    fn update(&mut self, now: Instant) -> WarrenResult<()>;

    /// Draws the current frame.
    fn draw(&mut self);

    /// Called once when the game shuts down.
    fn destroy(&mut self);

    /// True once this state has nothing left to run.
    fn is_finished(&self) -> bool;
}

/// Normal gameplay: one world followed by a camera on the player.
pub struct PlayState {
    world: World,
    player: ObjectId,
    camera: Camera,
    level_renderer: Option<Box<dyn LevelRenderer>>,
    last_outcome: Option<TurnOutcome>,
}

impl PlayState {
    pub fn new(world: World, player: ObjectId, camera: Camera) -> Self {
        Self {
            world,
            player,
            camera,
            level_renderer: None,
            last_outcome: None,
        }
    }

    /// Draws the level underneath the objects.
    pub fn with_level_renderer(mut self, renderer: Box<dyn LevelRenderer>) -> Self {
        self.level_renderer = Some(renderer);
        self
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player(&self) -> ObjectId {
        self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Outcome of the most recent tick.
    pub fn last_outcome(&self) -> Option<&TurnOutcome> {
        self.last_outcome.as_ref()
    }
}

impl GameState for PlayState {
    fn init(&mut self) -> WarrenResult<()> {
        let player = self.world.get(self.player).ok_or_else(|| {
            WarrenError::InvalidState(format!("player {} is not in the world", self.player))
        })?;
        self.camera.center_on(player.position());
        info!(
            "Play started with {} objects on a {}x{} level",
            self.world.objects().len(),
            self.world.level().width,
            self.world.level().height
        );
        Ok(())
    }

    fn update(&mut self, now: Instant) -> WarrenResult<()> {
        let outcome = self.world.update(now)?;
        if outcome.ended_turn() {
            debug!("{:?}", outcome);
        }
        self.last_outcome = Some(outcome);
        Ok(())
    }

    fn draw(&mut self) {
        if let Some(player) = self.world.get(self.player) {
            self.camera.center_on(player.position());
        }
        if let Some(renderer) = &self.level_renderer {
            renderer.draw_level(&self.camera, self.world.level());
        }
        self.world
            .manager_mut()
            .objects_mut()
            .draw(&self.camera);
    }

    fn destroy(&mut self) {
        info!("Play ended after {} ticks", self.world.ticks());
    }

    fn is_finished(&self) -> bool {
        !self.world.contains(self.player)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Running,
    Destroyed,
}

/// Drives a [`GameState`] through its lifecycle.
pub struct Game<S: GameState> {
    state: S,
    phase: Phase,
    keep_running: bool,
    ticks: u64,
}

impl<S: GameState> Game<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            phase: Phase::Created,
            keep_running: true,
            ticks: 0,
        }
    }

    /// Initializes the state. Allowed exactly once.
    pub fn init(&mut self) -> WarrenResult<()> {
        if self.phase != Phase::Created {
            return Err(WarrenError::Precondition(
                "game was already initialized".to_string(),
            ));
        }
        self.state.init()?;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Runs one update and one draw.
    ///
    /// Returns false once the game has stopped, either through [`Game::stop`]
    /// or because the state finished; nothing is run in that case.
    pub fn tick(&mut self, now: Instant) -> WarrenResult<bool> {
        match self.phase {
            Phase::Created => {
                return Err(WarrenError::Precondition(
                    "tick called before init".to_string(),
                ))
            }
            Phase::Destroyed => {
                return Err(WarrenError::Precondition(
                    "tick called after destroy".to_string(),
                ))
            }
            Phase::Running => {}
        }

        if !self.is_running() {
            return Ok(false);
        }

        self.state.update(now)?;
        self.state.draw();
        self.ticks += 1;

        if self.state.is_finished() {
            info!("State finished after {} ticks", self.ticks);
            self.keep_running = false;
        }
        Ok(self.keep_running)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running && self.keep_running && !self.state.is_finished()
    }

    /// Asks the loop to stop after the current frame.
    pub fn stop(&mut self) {
        self.keep_running = false;
    }

    /// Tears the state down. Allowed once, after init.
    pub fn destroy(&mut self) -> WarrenResult<()> {
        match self.phase {
            Phase::Running => {
                self.state.destroy();
                self.phase = Phase::Destroyed;
                Ok(())
            }
            Phase::Created => Err(WarrenError::Precondition(
                "destroy called before init".to_string(),
            )),
            Phase::Destroyed => Err(WarrenError::Precondition(
                "game was already destroyed".to_string(),
            )),
        }
    }

    /// Ticks completed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

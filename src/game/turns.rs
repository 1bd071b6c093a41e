//! # Turn Management
//!
//! Round-robin turn sequencing over the characters of a world.
//!
//! [`TurnQueue`] holds the order and the active index. [`TurnObjectManager`]
//! layers it over an [`ObjectManager`]: characters join the queue when spawned,
//! leave it when dropped, and once the turn delay has elapsed the active
//! character gets its own-turn update.

use super::{
    update_on_own_turn, ControllerRegistry, GameObject, Level, ObjectId, ObjectManager,
    TurnOutcome, WorldId,
};
use crate::{WarrenError, WarrenResult};
use log::{debug, error, trace};
use std::time::{Duration, Instant};

/// Ordered turn queue with a cyclic active index.
#[derive(Debug, Clone)]
pub struct TurnQueue {
    entries: Vec<ObjectId>,
    index: usize,
    last_turn_change: Option<Instant>,
    turn_delay: Duration,
    turns_taken: u64,
}

impl TurnQueue {
    /// Creates an empty queue gated by the given minimum delay between turns.
    pub fn new(turn_delay: Duration) -> Self {
        Self {
            entries: Vec::new(),
            index: 0,
            last_turn_change: None,
            turn_delay,
            turns_taken: 0,
        }
    }

    /// Clears the queue and rewinds the index.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.index = 0;
        self.last_turn_change = None;
        self.turns_taken = 0;
    }

    /// Appends a character to the end of the turn order.
    pub fn push(&mut self, id: ObjectId) {
        self.entries.push(id);
    }

    /// Takes a character out of the turn order, keeping the index on the
    /// character that should act next.
    ///
    /// Removing an entry before the index shifts the index down with it.
    /// Removing the entry at the index leaves the index in place, where the
    /// following character now sits, wrapping to the front if needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use warren::{new_object_id, TurnQueue};
    ///
    /// let (a, b, c) = (new_object_id(), new_object_id(), new_object_id());
    /// let mut queue = TurnQueue::new(Duration::ZERO);
    /// queue.push(a);
    /// queue.push(b);
    /// queue.push(c);
    ///
    /// queue.end_turn(std::time::Instant::now()); // b is up
    /// queue.remove(b);
    /// assert_eq!(queue.current(), Some(c));
    /// ```
    pub fn remove(&mut self, id: ObjectId) -> bool {
        let Some(position) = self.entries.iter().position(|&entry| entry == id) else {
            return false;
        };
        self.entries.remove(position);

        if position < self.index {
            self.index -= 1;
        }
        if self.index >= self.entries.len() {
            self.index = 0;
        }
        true
    }

    /// Hands the turn to the next character, wrapping at the end of the queue.
    pub fn end_turn(&mut self, now: Instant) {
        self.last_turn_change = Some(now);
        self.turns_taken += 1;
        if !self.entries.is_empty() {
            self.index = (self.index + 1) % self.entries.len();
        }
        trace!("Turn {} ended, index now {}", self.turns_taken, self.index);
    }

    /// Character whose turn it currently is.
    pub fn current(&self) -> Option<ObjectId> {
        self.entries.get(self.index).copied()
    }

    /// Checks whether it is the given character's turn.
    pub fn is_characters_turn(&self, id: ObjectId) -> bool {
        self.current() == Some(id)
    }

    /// Checks whether the turn delay has elapsed since the last turn change.
    pub fn is_ready(&self, now: Instant) -> bool {
        match self.last_turn_change {
            Some(changed) => now.saturating_duration_since(changed) >= self.turn_delay,
            None => true,
        }
    }

    pub fn entries(&self) -> &[ObjectId] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of turns ended since the last reset.
    pub fn turns_taken(&self) -> u64 {
        self.turns_taken
    }

    pub fn last_turn_change(&self) -> Option<Instant> {
        self.last_turn_change
    }

    pub fn turn_delay(&self) -> Duration {
        self.turn_delay
    }

    pub fn set_turn_delay(&mut self, turn_delay: Duration) {
        self.turn_delay = turn_delay;
    }
}

/// Object manager that also sequences the turns of its characters.
#[derive(Debug)]
pub struct TurnObjectManager {
    objects: ObjectManager,
    turns: TurnQueue,
    active: bool,
}

impl TurnObjectManager {
    /// Creates an unbound manager with the given turn delay.
    pub fn new(turn_delay: Duration) -> Self {
        Self {
            objects: ObjectManager::new(),
            turns: TurnQueue::new(turn_delay),
            active: false,
        }
    }

    /// Binds the owning world and resets turn state.
    pub fn init(&mut self, world: WorldId) -> WarrenResult<()> {
        self.objects.init(world)?;
        self.turns.reset();
        self.active = false;
        Ok(())
    }

    /// Spawns an object, enqueueing it for turns if it is a character.
    pub fn spawn(&mut self, object: GameObject) -> WarrenResult<ObjectId> {
        let is_character = object.is_character();
        let id = self.objects.spawn(object)?;
        if is_character {
            self.turns.push(id);
            self.active = true;
            debug!("Character {} joined the turn queue at {}", id, self.turns.len() - 1);
        }
        Ok(id)
    }

    /// Flags an object for removal at the end of the next update pass.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.objects.remove(id)
    }

    /// Ends the active character's turn.
    pub fn end_turn(&mut self, now: Instant) {
        self.turns.end_turn(now);
    }

    pub fn is_characters_turn(&self, id: ObjectId) -> bool {
        self.turns.is_characters_turn(id)
    }

    /// Runs one tick: the object update pass, then, if the turn delay has
    /// elapsed, the active character's own-turn update.
    ///
    /// Once a character has joined the queue, the queue running dry is fatal and
    /// reported as [`WarrenError::TurnQueueCollapsed`].
    pub fn update(
        &mut self,
        level: &Level,
        controllers: &mut ControllerRegistry,
        now: Instant,
    ) -> WarrenResult<TurnOutcome> {
        for object in self.objects.update()? {
            self.forget(&object, controllers);
        }

        if !self.active {
            return Ok(TurnOutcome::Idle);
        }
        if !self.turns.is_ready(now) {
            trace!("Turn delay not yet elapsed");
            return Ok(TurnOutcome::Waiting);
        }

        let active = self.resolve_active(controllers)?;
        update_on_own_turn(
            active,
            &mut self.objects,
            &mut self.turns,
            controllers,
            level,
            now,
        )
    }

    /// Finds the character at the turn index, evicting removed entries on the way.
    fn resolve_active(&mut self, controllers: &mut ControllerRegistry) -> WarrenResult<ObjectId> {
        while let Some(candidate) = self.turns.current() {
            let live = self
                .objects
                .get(candidate)
                .is_some_and(|object| !object.is_removed());
            if live {
                return Ok(candidate);
            }
            debug!("Skipping removed character {} in turn queue", candidate);
            self.turns.remove(candidate);
            controllers.release_character(candidate);
        }

        error!("Turn queue is empty while turn management is active");
        Err(WarrenError::TurnQueueCollapsed)
    }

    fn forget(&mut self, object: &GameObject, controllers: &mut ControllerRegistry) {
        if object.is_character() && self.turns.remove(object.id()) {
            controllers.release_character(object.id());
            debug!(
                "Character {} left the turn queue, index now {}",
                object.id(),
                self.turns.index()
            );
        }
    }

    pub fn objects(&self) -> &ObjectManager {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectManager {
        &mut self.objects
    }

    pub fn turns(&self) -> &TurnQueue {
        &self.turns
    }
}

//! Turn sequencing across spawns, removals and ticks.

use proptest::prelude::*;
use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};
use warren::{
    CharacterRole, CharacterStats, GameObject, InputSource, Key, Level, ObjectId,
    PlayerController, Position, TileType, TurnOutcome, WarrenError, World,
};

/// Input whose held key the test can change between ticks.
#[derive(Clone, Default)]
struct ScriptedInput(Rc<Cell<Option<Key>>>);

impl ScriptedInput {
    fn hold(&self, key: Key) {
        self.0.set(Some(key));
    }

    fn release(&self) {
        self.0.set(None);
    }
}

impl InputSource for ScriptedInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.0.get() == Some(key)
    }
}

fn open_world(size: u32) -> World {
    World::new(Level::filled(size, size, TileType::Floor), Duration::ZERO).unwrap()
}

fn critter(name: &str, x: i32, y: i32) -> GameObject {
    GameObject::character(
        name,
        CharacterRole::Animal,
        CharacterStats::new(3, 1),
        Position::new(x, y),
    )
}

/// Spawns `count` characters without controllers along the top rows; each one
/// passes as soon as its turn comes up.
fn spawn_passers(world: &mut World, count: usize) -> Vec<ObjectId> {
    let width = world.level().width as usize;
    (0..count)
        .map(|i| {
            let object = critter("Passer", (i % width) as i32, (i / width) as i32);
            world.spawn(object).unwrap()
        })
        .collect()
}

#[test]
fn test_three_character_scenario() {
    let mut world = open_world(5);
    let inputs: Vec<ScriptedInput> = (0..3).map(|_| ScriptedInput::default()).collect();

    let mut ids = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        let object = critter("Critter", 0, i as i32);
        let controller = PlayerController::new(Box::new(input.clone()));
        let (id, _) = world.spawn_controlled(object, controller).unwrap();
        ids.push(id);
    }
    let (a, b, c) = (ids[0], ids[1], ids[2]);
    let now = Instant::now();

    assert_eq!(world.manager().turns().index(), 0);
    assert!(world.manager().is_characters_turn(a));

    inputs[0].hold(Key::Right);
    let outcome = world.update(now).unwrap();
    assert_eq!(
        outcome,
        TurnOutcome::Moved {
            character: a,
            from: Position::new(0, 0),
            to: Position::new(1, 0),
        }
    );
    inputs[0].release();
    assert_eq!(world.manager().turns().index(), 1);
    assert!(world.manager().is_characters_turn(b));

    // B is knocked out before its turn resolves.
    assert!(world.damage(b, 10).unwrap());
    let outcome = world.update(now).unwrap();
    assert_eq!(outcome, TurnOutcome::Stayed(c));
    assert!(!world.contains(b));
    assert!(world.manager().is_characters_turn(c));

    let mut order = Vec::new();
    for _ in 0..4 {
        world.manager_mut().end_turn(now);
        order.push(world.manager().turns().current().unwrap());
    }
    assert_eq!(order, vec![a, c, a, c]);
}

#[test]
fn test_passers_cycle_round_robin() {
    let mut world = open_world(5);
    let ids = spawn_passers(&mut world, 3);
    let now = Instant::now();

    for round in 0..9 {
        let outcome = world.update(now).unwrap();
        assert_eq!(outcome, TurnOutcome::Passed(ids[round % 3]));
    }
    assert_eq!(world.manager().turns().turns_taken(), 9);
}

#[test]
fn test_removed_active_character_hands_turn_on() {
    let mut world = open_world(5);
    let ids = spawn_passers(&mut world, 3);
    let now = Instant::now();

    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[0]));
    // ids[1] is up; drop it and the next resolution must select ids[2].
    world.remove(ids[1]);
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[2]));
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[0]));
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[2]));
}

#[test]
fn test_removing_last_in_queue_wraps_to_front() {
    let mut world = open_world(5);
    let ids = spawn_passers(&mut world, 3);
    let now = Instant::now();

    world.update(now).unwrap();
    world.update(now).unwrap();
    assert!(world.manager().is_characters_turn(ids[2]));

    world.remove(ids[2]);
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[0]));
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Passed(ids[1]));
}

#[test]
fn test_removed_objects_stay_until_tick_ends() {
    let mut world = open_world(5);
    let ids = spawn_passers(&mut world, 2);

    assert!(world.remove(ids[1]));
    assert!(!world.remove(ids[1]), "second removal is a no-op");
    assert!(world.contains(ids[1]));
    assert!(world.get(ids[1]).unwrap().is_removed());

    world.update(Instant::now()).unwrap();
    assert!(!world.contains(ids[1]));
    assert_eq!(world.manager().turns().entries(), &[ids[0]]);
}

#[test]
fn test_turn_delay_gates_resolution() {
    let mut world = World::new(
        Level::filled(5, 5, TileType::Floor),
        Duration::from_millis(100),
    )
    .unwrap();
    let ids = spawn_passers(&mut world, 2);
    let base = Instant::now();

    // The first resolution is not delayed.
    assert_eq!(world.update(base).unwrap(), TurnOutcome::Passed(ids[0]));
    assert_eq!(
        world.update(base + Duration::from_millis(50)).unwrap(),
        TurnOutcome::Waiting
    );
    assert_eq!(
        world.update(base + Duration::from_millis(100)).unwrap(),
        TurnOutcome::Passed(ids[1])
    );
}

#[test]
fn test_empty_world_is_idle() {
    let mut world = open_world(5);
    world
        .spawn(GameObject::prop("Stone", '*', Position::new(1, 1)))
        .unwrap();
    assert_eq!(world.update(Instant::now()).unwrap(), TurnOutcome::Idle);
}

#[test]
fn test_last_character_leaving_is_fatal() {
    let mut world = open_world(5);
    let ids = spawn_passers(&mut world, 1);
    world.remove(ids[0]);
    assert!(matches!(
        world.update(Instant::now()),
        Err(WarrenError::TurnQueueCollapsed)
    ));
}

#[test]
fn test_double_spawn_is_rejected() {
    let mut world = open_world(5);
    let object = critter("Twin", 0, 0);
    let twin = object.clone();
    world.spawn(object).unwrap();
    assert!(matches!(
        world.spawn(twin),
        Err(WarrenError::Precondition(_))
    ));
    assert_eq!(world.manager().turns().len(), 1);
}

#[test]
fn test_removed_object_copy_stays_retired() {
    let mut world = open_world(5);
    let stone = GameObject::prop("Stone", '*', Position::new(2, 2));
    let copy = stone.clone();

    let id = world.spawn(stone).unwrap();
    world.remove(id);
    world.update(Instant::now()).unwrap();
    assert!(!world.contains(id));

    assert!(matches!(
        world.spawn(copy),
        Err(WarrenError::Precondition(_))
    ));
}

proptest! {
    #[test]
    fn prop_spawned_ids_are_unique(count in 1usize..40) {
        let mut world = open_world(10);
        let ids = spawn_passers(&mut world, count);
        let unique: HashSet<_> = ids.iter().copied().collect();
        prop_assert_eq!(unique.len(), count);
        prop_assert_eq!(world.objects().len(), count);
    }

    #[test]
    fn prop_turns_cycle_in_spawn_order(count in 1usize..8, rounds in 1usize..4) {
        let mut world = open_world(10);
        let ids = spawn_passers(&mut world, count);
        let now = Instant::now();

        for step in 0..count * rounds {
            let outcome = world.update(now).unwrap();
            prop_assert_eq!(outcome, TurnOutcome::Passed(ids[step % count]));
        }
    }

    #[test]
    fn prop_removal_skips_only_the_removed(
        count in 3usize..8,
        victim in 1usize..7,
        ticks_before in 0usize..12,
    ) {
        let victim = victim % (count - 1) + 1;
        let mut world = open_world(10);
        let ids = spawn_passers(&mut world, count);
        let now = Instant::now();

        for _ in 0..ticks_before {
            world.update(now).unwrap();
        }
        let next_up = ids[ticks_before % count];
        world.remove(ids[victim]);

        let remaining: Vec<ObjectId> = ids
            .iter()
            .copied()
            .filter(|&id| id != ids[victim])
            .collect();
        let first = if next_up == ids[victim] {
            ids[(victim + 1) % count]
        } else {
            next_up
        };
        let start = remaining.iter().position(|&id| id == first).unwrap();

        for step in 0..remaining.len() * 2 {
            let outcome = world.update(now).unwrap();
            let expected = remaining[(start + step) % remaining.len()];
            prop_assert_eq!(outcome, TurnOutcome::Passed(expected));
        }
    }
}

//! Character movement and bump attacks, driven through world ticks.

use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};
use warren::{
    move_character, resolve_step, CharacterRole, CharacterStats, GameObject, InputSource, Key,
    Level, ObjectId, PlayerController, Position, TileType, TurnOutcome, World,
};

/// Input with any number of keys held at once.
#[derive(Clone, Default)]
struct HeldKeys(Rc<RefCell<HashSet<Key>>>);

impl HeldKeys {
    fn hold(&self, keys: &[Key]) {
        let mut held = self.0.borrow_mut();
        held.clear();
        held.extend(keys.iter().copied());
    }
}

impl InputSource for HeldKeys {
    fn is_key_down(&self, key: Key) -> bool {
        self.0.borrow().contains(&key)
    }
}

fn hero(x: i32, y: i32) -> GameObject {
    GameObject::character(
        "Hero",
        CharacterRole::Player,
        CharacterStats::new(10, 3),
        Position::new(x, y),
    )
}

fn spawn_hero(world: &mut World, x: i32, y: i32) -> (ObjectId, HeldKeys) {
    let keys = HeldKeys::default();
    let controller = PlayerController::new(Box::new(keys.clone()));
    let (id, _) = world.spawn_controlled(hero(x, y), controller).unwrap();
    (id, keys)
}

fn position_of(world: &World, id: ObjectId) -> Position {
    world.get(id).unwrap().position()
}

#[test]
fn test_edge_clamps_movement() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 0, 4);
    let now = Instant::now();

    for key in [Key::Left, Key::Down] {
        keys.hold(&[key]);
        assert_eq!(world.update(now).unwrap(), TurnOutcome::Stayed(id));
        assert_eq!(position_of(&world, id), Position::new(0, 4));
    }
}

#[test]
fn test_wall_blocks_without_ending_turn() {
    let level = Level::from_rows(&["...", ".#.", "..."]).unwrap();
    let mut world = World::new(level, Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 1, 0);
    let other = world
        .spawn(GameObject::character(
            "Mole",
            CharacterRole::Animal,
            CharacterStats::new(3, 1),
            Position::new(2, 2),
        ))
        .unwrap();
    let now = Instant::now();

    keys.hold(&[Key::Down]);
    assert_eq!(world.update(now).unwrap(), TurnOutcome::Stayed(id));
    assert_eq!(position_of(&world, id), Position::new(1, 0));
    assert!(world.manager().is_characters_turn(id));
    assert_eq!(world.manager().turns().turns_taken(), 0);

    // Re-polled next tick with new intent.
    keys.hold(&[Key::Left]);
    assert_eq!(
        world.update(now).unwrap(),
        TurnOutcome::Moved {
            character: id,
            from: Position::new(1, 0),
            to: Position::new(0, 0),
        }
    );
    assert!(world.manager().is_characters_turn(other));
}

#[test]
fn test_diagonal_intent_moves_horizontally() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 2, 2);

    keys.hold(&[Key::Right, Key::Down]);
    world.update(Instant::now()).unwrap();
    assert_eq!(position_of(&world, id), Position::new(3, 2));
}

#[test]
fn test_opposing_keys_cancel() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 2, 2);

    keys.hold(&[Key::Left, Key::Right, Key::Up]);
    world.update(Instant::now()).unwrap();
    assert_eq!(position_of(&world, id), Position::new(2, 1));
}

#[test]
fn test_bump_attack_ends_turn_and_kills() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 1, 1);
    let rabbit = world
        .spawn(GameObject::character(
            "Rabbit",
            CharacterRole::Animal,
            CharacterStats::new(3, 1),
            Position::new(2, 1),
        ))
        .unwrap();
    let now = Instant::now();

    keys.hold(&[Key::Right]);
    assert_eq!(
        world.update(now).unwrap(),
        TurnOutcome::Attacked {
            attacker: id,
            target: rabbit,
            damage: 3,
            lethal: true,
        }
    );
    assert_eq!(position_of(&world, id), Position::new(1, 1));
    assert!(world.contains(rabbit));

    // The rabbit drops out on the next pass and the turn comes back around.
    world.update(now).unwrap();
    assert!(!world.contains(rabbit));
    assert!(world.manager().is_characters_turn(id));
}

#[test]
fn test_non_lethal_bump_leaves_target() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (_, keys) = spawn_hero(&mut world, 1, 1);
    let badger = world
        .spawn(GameObject::character(
            "Badger",
            CharacterRole::Animal,
            CharacterStats::new(8, 2),
            Position::new(1, 2),
        ))
        .unwrap();

    keys.hold(&[Key::Down]);
    world.update(Instant::now()).unwrap();
    let health = world.get(badger).and_then(|o| o.as_character()).unwrap().health;
    assert_eq!(health, 5);
    assert!(world.manager().is_characters_turn(badger));
}

#[test]
fn test_moves_mark_objects_dirty() {
    let mut world = World::new(Level::filled(5, 5, TileType::Floor), Duration::ZERO).unwrap();
    let (id, keys) = spawn_hero(&mut world, 0, 0);
    world
        .manager_mut()
        .objects_mut()
        .get_mut(id)
        .unwrap()
        .clear_dirty();

    keys.hold(&[Key::Right]);
    world.update(Instant::now()).unwrap();
    let dirty: Vec<_> = world
        .manager()
        .objects()
        .dirty_objects()
        .map(GameObject::id)
        .collect();
    assert_eq!(dirty, vec![id]);
}

proptest! {
    #[test]
    fn prop_steps_are_orthogonal_units(raw_x in -5i32..=5, raw_y in -5i32..=5) {
        let (dx, dy) = resolve_step(raw_x, raw_y);
        prop_assert!(dx.abs() + dy.abs() <= 1);
        if raw_x != 0 {
            prop_assert_eq!((dx, dy), (raw_x.signum(), 0));
        }
    }

    #[test]
    fn prop_moves_never_leave_the_grid(
        x in 0i32..6,
        y in 0i32..4,
        dx in -1i32..=1,
        dy in -1i32..=1,
    ) {
        let level = Level::filled(6, 4, TileType::Floor);
        let mut object = hero(x, y);
        let moved = move_character(&mut object, &level, dx, dy);
        prop_assert!(level.in_bounds(object.position()));
        prop_assert_eq!(moved, object.position() != Position::new(x, y));
    }
}

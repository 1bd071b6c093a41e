//! # Object Manager
//!
//! Owns the live object collection of a world and drives the spawn, update and
//! deferred-removal lifecycle. Rendering is delegated to renderers registered per
//! [`RenderKind`].

use super::{GameObject, ObjectId, Position, RenderKind};
use crate::rendering::{Camera, Renderer};
use crate::{WarrenError, WarrenResult};
use log::debug;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identifies the world an object manager is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldId(u32);

static NEXT_WORLD_ID: AtomicU32 = AtomicU32::new(1);

/// Allocates a new world id.
pub fn new_world_id() -> WorldId {
    WorldId(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed))
}

/// Live object collection with deferred removal.
///
/// # Examples
///
/// ```
/// use warren::{new_world_id, GameObject, ObjectManager, Position};
///
/// let mut manager = ObjectManager::new();
/// manager.init(new_world_id()).unwrap();
///
/// let id = manager.spawn(GameObject::prop("Stone", '*', Position::new(1, 1))).unwrap();
/// manager.remove(id);
/// assert!(manager.contains(id)); // still there until the pass ends
///
/// manager.update().unwrap();
/// assert!(!manager.contains(id));
/// ```
pub struct ObjectManager {
    world: Option<WorldId>,
    objects: Vec<GameObject>,
    retired: HashSet<ObjectId>,
    renderers: HashMap<RenderKind, Box<dyn Renderer>>,
}

impl ObjectManager {
    /// Creates an unbound manager. Call [`ObjectManager::init`] before spawning.
    pub fn new() -> Self {
        Self {
            world: None,
            objects: Vec::new(),
            retired: HashSet::new(),
            renderers: HashMap::new(),
        }
    }

    /// Binds the owning world. A manager can be bound only once.
    pub fn init(&mut self, world: WorldId) -> WarrenResult<()> {
        if let Some(bound) = self.world {
            return Err(WarrenError::Precondition(format!(
                "object manager already bound to {:?}",
                bound
            )));
        }
        self.world = Some(world);
        Ok(())
    }

    /// World this manager is bound to, if any.
    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    /// Registers and initializes an object.
    ///
    /// Fails if the manager is unbound, if an object with the same id is already
    /// tracked, or if the object (or a copy sharing its id) has been removed before.
    pub fn spawn(&mut self, mut object: GameObject) -> WarrenResult<ObjectId> {
        let world = self.world.ok_or_else(|| {
            WarrenError::Precondition(format!(
                "object {} spawned before the manager was bound to a world",
                object.id()
            ))
        })?;

        let id = object.id();
        if object.is_removed() || self.retired.contains(&id) {
            return Err(WarrenError::Precondition(format!(
                "object {} was removed and cannot be spawned again",
                id
            )));
        }
        if self.contains(id) {
            return Err(WarrenError::Precondition(format!(
                "object {} is already spawned",
                id
            )));
        }

        object.attach(world);
        object.init()?;
        self.objects.push(object);
        debug!("Spawned object {} ({} live)", id, self.objects.len());
        Ok(id)
    }

    /// Runs one update pass, then drops every object flagged for removal.
    ///
    /// Returns the dropped objects so that extensions can forget them too.
    pub fn update(&mut self) -> WarrenResult<Vec<GameObject>> {
        for object in self.objects.iter_mut().filter(|o| !o.is_removed()) {
            object.update()?;
        }

        if !self.objects.iter().any(GameObject::is_removed) {
            return Ok(Vec::new());
        }

        let (removed, live): (Vec<_>, Vec<_>) = std::mem::take(&mut self.objects)
            .into_iter()
            .partition(GameObject::is_removed);
        self.objects = live;

        for object in &removed {
            self.retired.insert(object.id());
            debug!("Dropped removed object {}", object.id());
        }
        Ok(removed)
    }

    /// Flags an object for removal at the end of the next update pass.
    ///
    /// Returns false if the object is unknown or already flagged.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        self.get_mut(id).map(GameObject::remove).unwrap_or(false)
    }

    /// Registers the renderer for one kind of object. The last registration wins.
    pub fn assign_renderer(&mut self, kind: RenderKind, renderer: Box<dyn Renderer>) {
        self.renderers.insert(kind, renderer);
    }

    /// Draws every live object that has a renderer, clearing its dirty flag.
    pub fn draw(&mut self, camera: &Camera) {
        for object in self.objects.iter_mut().filter(|o| !o.is_removed()) {
            if let Some(renderer) = self.renderers.get(&object.render_kind()) {
                renderer.draw(camera, object);
                object.clear_dirty();
            }
        }
    }

    /// Current object collection in spawn order.
    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    /// Live objects changed since they were last drawn.
    pub fn dirty_objects(&self) -> impl Iterator<Item = &GameObject> {
        self.objects
            .iter()
            .filter(|o| !o.is_removed() && o.is_dirty())
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects.iter().find(|o| o.id() == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects.iter_mut().find(|o| o.id() == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// First live character standing on the given tile.
    pub fn character_at(&self, position: Position) -> Option<&GameObject> {
        self.objects
            .iter()
            .find(|o| !o.is_removed() && o.is_character() && o.position() == position)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for ObjectManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ObjectManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectManager")
            .field("world", &self.world)
            .field("objects", &self.objects)
            .field("renderers", &self.renderers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingRenderer {
        drawn: Rc<RefCell<Vec<ObjectId>>>,
    }

    impl Renderer for RecordingRenderer {
        fn draw(&self, _camera: &Camera, object: &GameObject) {
            self.drawn.borrow_mut().push(object.id());
        }
    }

    fn bound_manager() -> ObjectManager {
        let mut manager = ObjectManager::new();
        manager.init(new_world_id()).unwrap();
        manager
    }

    fn stone(x: i32) -> GameObject {
        GameObject::prop("Stone", '*', Position::new(x, 0))
    }

    #[test]
    fn test_spawn_before_init_fails() {
        let mut manager = ObjectManager::new();
        let result = manager.spawn(stone(0));
        assert!(matches!(result, Err(WarrenError::Precondition(_))));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_double_bind_fails() {
        let mut manager = bound_manager();
        assert!(manager.init(new_world_id()).is_err());
    }

    #[test]
    fn test_spawn_initializes_and_binds() {
        let mut manager = bound_manager();
        let id = manager.spawn(stone(0)).unwrap();

        let object = manager.get(id).unwrap();
        assert!(object.is_initialized());
        assert_eq!(object.world(), manager.world());
    }

    #[test]
    fn test_duplicate_spawn_fails() {
        let mut manager = bound_manager();
        let object = stone(0);
        let copy = object.clone();

        manager.spawn(object).unwrap();
        assert!(matches!(
            manager.spawn(copy),
            Err(WarrenError::Precondition(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_removed_object_cannot_be_spawned() {
        let mut manager = bound_manager();
        let mut object = stone(0);
        object.remove();
        assert!(manager.spawn(object).is_err());
    }

    #[test]
    fn test_removal_is_deferred_until_end_of_pass() {
        let mut manager = bound_manager();
        let a = manager.spawn(stone(0)).unwrap();
        let b = manager.spawn(stone(1)).unwrap();
        let c = manager.spawn(stone(2)).unwrap();

        assert!(manager.remove(b));
        assert!(!manager.remove(b));
        assert_eq!(manager.len(), 3);

        let removed = manager.update().unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id(), b);

        let ids: Vec<_> = manager.objects().iter().map(GameObject::id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_draw_skips_unregistered_and_removed() {
        let mut manager = bound_manager();
        let drawn = Rc::new(RefCell::new(Vec::new()));
        manager.assign_renderer(
            RenderKind::Prop,
            Box::new(RecordingRenderer {
                drawn: Rc::clone(&drawn),
            }),
        );

        let kept = manager.spawn(stone(0)).unwrap();
        let gone = manager.spawn(stone(1)).unwrap();
        let hero = manager
            .spawn(GameObject::character(
                "Hero",
                crate::CharacterRole::Player,
                crate::CharacterStats::new(5, 1),
                Position::new(3, 3),
            ))
            .unwrap();
        manager.remove(gone);

        manager.draw(&Camera::default());
        assert_eq!(*drawn.borrow(), vec![kept]);

        // Drawn objects are clean, the unrendered player stays dirty.
        let dirty: Vec<_> = manager.dirty_objects().map(GameObject::id).collect();
        assert_eq!(dirty, vec![hero]);
    }

    #[test]
    fn test_last_renderer_registration_wins() {
        let mut manager = bound_manager();
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        manager.assign_renderer(
            RenderKind::Prop,
            Box::new(RecordingRenderer {
                drawn: Rc::clone(&first),
            }),
        );
        manager.assign_renderer(
            RenderKind::Prop,
            Box::new(RecordingRenderer {
                drawn: Rc::clone(&second),
            }),
        );

        manager.spawn(stone(0)).unwrap();
        manager.draw(&Camera::default());
        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().len(), 1);
    }

    #[test]
    fn test_copy_of_dropped_object_cannot_be_spawned() {
        let mut manager = bound_manager();
        let object = stone(0);
        let copy = object.clone();

        let id = manager.spawn(object).unwrap();
        manager.remove(id);
        manager.update().unwrap();
        assert!(!manager.contains(id));

        assert!(matches!(
            manager.spawn(copy),
            Err(WarrenError::Precondition(_))
        ));
        assert!(manager.is_empty());
    }
}

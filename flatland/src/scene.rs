//! [`Scene`], the container of all entities, and the operations on them which need to see
//! the whole hierarchy.

use core::fmt;

use hashbrown::HashMap;
use manyfmt::{Fmt, Refmt as _};

use crate::math::{FreeVector, LayerMask};
use crate::physics::{self, ConfigurationError, PhysicsConfig, PhysicsStepInfo, RigidBody};
use crate::time::{Clock, Duration, Tick, TickSchedule};
use crate::util::StatusText;

mod dynamics;
mod entity;
pub use entity::*;
mod hierarchy;
mod id;
pub use id::*;
mod name;
pub use name::*;
mod render;
pub use render::*;

#[cfg(test)]
mod tests;

// -------------------------------------------------------------------------------------------------

/// A function called at the start of every [`Scene::step()`], before physics, in the order
/// the hooks were added.
pub type UpdateHook = Box<dyn FnMut(&mut Scene, Tick)>;

/// Storage slot for one entity; the generation distinguishes successive occupants.
#[derive(Debug)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// A collection of named entities, and the simulation that moves them.
///
/// All hierarchy and physics operations go through the scene, addressed by [`EntityId`],
/// since they read or write more than one entity at a time.
pub struct Scene {
    slots: Vec<Slot>,
    /// Indices of empty slots, reused in LIFO order.
    free: Vec<u32>,
    names: HashMap<Name, EntityId>,
    next_anonym: usize,

    current_camera: Option<EntityId>,

    config: PhysicsConfig,
    clock: Clock,
    paused: bool,

    /// Temporarily empty while the hooks are running.
    hooks: Vec<UpdateHook>,
}

impl Scene {
    /// Creates an empty scene with the default [`PhysicsConfig`].
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            names: HashMap::new(),
            next_anonym: 0,
            current_camera: None,
            config: PhysicsConfig::DEFAULT,
            clock: Clock::new(TickSchedule::per_second(60), 0),
            paused: false,
            hooks: Vec::new(),
        }
    }

    /// Creates an empty scene with the given configuration.
    ///
    /// Fails if the configured step rate cannot be turned into a tick schedule.
    pub fn with_config(config: PhysicsConfig) -> Result<Self, ConfigurationError> {
        let mut scene = Self::new();
        scene.set_config(config)?;
        Ok(scene)
    }

    /// Returns the physics configuration in effect.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Replaces the physics configuration. The clock restarts at phase zero with the new
    /// step rate.
    ///
    /// On failure, the scene is unchanged.
    pub fn set_config(&mut self, config: PhysicsConfig) -> Result<(), ConfigurationError> {
        let schedule = config.tick_schedule()?;
        self.config = config;
        self.clock = Clock::new(schedule, 0);
        Ok(())
    }

    /// Returns the clock which determines the length of each step.
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Whether [`Self::step()`] currently skips physics.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes simulated time. While paused, update hooks still run,
    /// with paused [`Tick`]s.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    // --- Registry --------------------------------------------------------------------------------

    /// Inserts a new entity with the given name.
    ///
    /// Fails if an entity with that name already exists, or if the builder specifies a
    /// parent that does not exist.
    pub fn insert(
        &mut self,
        name: impl Into<Name>,
        builder: EntityBuilder,
    ) -> Result<EntityId, InsertError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(InsertError::AlreadyExists(name));
        }
        self.insert_unchecked(name, builder)
    }

    /// Inserts a new entity with a newly assigned [`Name::Anonym`] name.
    pub fn insert_anonymous(&mut self, builder: EntityBuilder) -> Result<EntityId, InsertError> {
        let name = loop {
            let name = Name::Anonym(self.next_anonym);
            self.next_anonym += 1;
            if !self.names.contains_key(&name) {
                break name;
            }
        };
        self.insert_unchecked(name, builder)
    }

    fn insert_unchecked(
        &mut self,
        name: Name,
        builder: EntityBuilder,
    ) -> Result<EntityId, InsertError> {
        let parent = builder.parent;
        if let Some(parent) = parent {
            self.entity(parent)?;
        }
        let entity = builder.into_entity(name.clone());
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.entity = Some(entity);
                EntityId::new(index, slot.generation)
            }
            None => {
                let index = u32::try_from(self.slots.len()).map_err(|_| InsertError::Full)?;
                self.slots.push(Slot {
                    generation: 0,
                    entity: Some(entity),
                });
                EntityId::new(index, 0)
            }
        };
        self.names.insert(name, id);
        if parent.is_some() {
            self.attach(id, parent)?;
        }
        log::trace!("inserted {id:?}");
        Ok(id)
    }

    /// Returns the id of the entity with the given name.
    pub fn lookup(&self, name: &Name) -> Result<EntityId, LookupError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::NotFound(name.clone()))
    }

    /// Returns the entity with the given id.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, LookupError> {
        match self.slots.get(id.index()) {
            Some(Slot {
                generation,
                entity: Some(entity),
            }) if *generation == id.generation() => Ok(entity),
            _ => Err(LookupError::Gone(id)),
        }
    }

    /// Returns the entity with the given id, for modification.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, LookupError> {
        match self.slots.get_mut(id.index()) {
            Some(Slot {
                generation,
                entity: Some(entity),
            }) if *generation == id.generation() => Ok(entity),
            _ => Err(LookupError::Gone(id)),
        }
    }

    /// Returns the rigid body of the entity with the given id.
    pub fn body(&self, id: EntityId) -> Result<&RigidBody, LookupError> {
        Ok(&self.entity(id)?.body)
    }

    /// Returns the rigid body of the entity with the given id, for modification.
    pub fn body_mut(&mut self, id: EntityId) -> Result<&mut RigidBody, LookupError> {
        Ok(&mut self.entity_mut(id)?.body)
    }

    /// Removes an entity from the scene and returns it.
    ///
    /// Its children are attached to its parent (or become roots), keeping their world-space
    /// placement. If it was the current camera, there is no longer a current camera.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, LookupError> {
        let parent = self.entity(id)?.transform.parent();
        let children = self.entity_mut(id)?.transform.take_children();
        if !children.is_empty() {
            log::debug!(
                "reparenting {} children of removed {id:?} to {parent:?}",
                children.len()
            );
        }
        for child in children {
            // The child's parent link still names `id`; point it at the grandparent.
            self.attach(child, parent)?;
        }
        if let Some(parent) = parent {
            self.entity_mut(parent)?.transform.remove_child_link(id);
        }

        let slot = &mut self.slots[id.index()];
        let Some(mut entity) = slot.entity.take() else {
            return Err(LookupError::Gone(id));
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index() as u32);
        self.names.remove(entity.name());
        if self.current_camera == Some(id) {
            self.current_camera = None;
        }
        entity.transform.set_parent_link(None);
        Ok(entity)
    }

    /// Returns the number of entities in the scene.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns whether the scene contains no entities.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over all entities, in order of their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let entity = slot.entity.as_ref()?;
            Some((EntityId::new(index as u32, slot.generation), entity))
        })
    }

    pub(crate) fn ids(&self) -> Vec<EntityId> {
        self.iter().map(|(id, _)| id).collect()
    }

    /// Iterates over the entities whose bodies take part in physics.
    pub fn physics_bodies(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(|(_, entity)| entity.body.uses_physics)
            .map(|(id, _)| id)
    }

    /// Iterates over the non-camera entities which are on every layer in `layers`.
    pub fn entities_on_layers(&self, layers: LayerMask) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(move |(_, entity)| entity.camera.is_none() && entity.layers.contains(layers))
            .map(|(id, _)| id)
    }

    /// Moves every root entity, and hence every entity, by `offset`.
    pub fn move_all(&mut self, offset: FreeVector) {
        for slot in &mut self.slots {
            if let Some(entity) = &mut slot.entity
                && entity.transform.parent().is_none()
            {
                let position = entity.transform.local_position();
                entity.transform.set_local_position(position + offset);
            }
        }
    }

    // --- Cameras ---------------------------------------------------------------------------------

    /// Returns the id of the camera with the given name.
    pub fn camera(&self, name: &Name) -> Result<EntityId, LookupError> {
        let id = self.lookup(name)?;
        match self.entity(id)?.camera {
            Some(_) => Ok(id),
            None => Err(LookupError::NotACamera(id)),
        }
    }

    /// Iterates over all camera entities.
    pub fn cameras(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(|(_, entity)| entity.camera.is_some())
            .map(|(id, _)| id)
    }

    /// Iterates over the camera entities which are on every layer in `layers`.
    pub fn cameras_on_layers(&self, layers: LayerMask) -> impl Iterator<Item = EntityId> + '_ {
        self.iter()
            .filter(move |(_, entity)| entity.camera.is_some() && entity.layers.contains(layers))
            .map(|(id, _)| id)
    }

    /// Returns the camera that [`Self::render_list()`] callers should usually draw from.
    pub fn current_camera(&self) -> Option<EntityId> {
        self.current_camera
    }

    /// Sets the current camera. Fails if `camera` does not exist or is not a camera.
    pub fn set_current_camera(&mut self, camera: EntityId) -> Result<(), LookupError> {
        match self.entity(camera)?.camera {
            Some(_) => {
                self.current_camera = Some(camera);
                Ok(())
            }
            None => Err(LookupError::NotACamera(camera)),
        }
    }

    // --- Stepping --------------------------------------------------------------------------------

    /// Adds a function to be called at the start of every step.
    ///
    /// Hooks may freely modify the scene, including adding more hooks, which will first
    /// run on the following step.
    pub fn add_update_hook(&mut self, hook: impl FnMut(&mut Scene, Tick) + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Returns the number of hooks registered with [`Self::add_update_hook()`].
    pub fn update_hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Advances time by one tick.
    ///
    /// Runs all update hooks, then, unless paused, runs the physics pass: integration of
    /// every body that uses physics, followed by collision detection and response.
    pub fn step(&mut self) -> SceneStepInfo {
        let start_time = std::time::Instant::now();
        let tick = self.clock.advance(self.paused);

        let hooks_run = self.run_update_hooks(tick);

        let physics = if tick.paused() {
            PhysicsStepInfo::default()
        } else {
            physics::step::physics_tick(self, tick)
        };

        SceneStepInfo {
            computation_time: start_time.elapsed(),
            hooks_run,
            paused: tick.paused(),
            physics,
        }
    }

    fn run_update_hooks(&mut self, tick: Tick) -> usize {
        let mut hooks = core::mem::take(&mut self.hooks);
        for hook in &mut hooks {
            hook(self, tick);
        }
        let count = hooks.len();
        let added = core::mem::replace(&mut self.hooks, hooks);
        self.hooks.extend(added);
        count
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            slots: _,
            free: _,
            names: _,
            next_anonym: _,
            current_camera,
            config,
            clock,
            paused,
            hooks,
        } = self;
        fmt.debug_struct("Scene")
            .field("entities", &self.iter().map(|(_, e)| e).collect::<Vec<_>>())
            .field("current_camera", current_camera)
            .field("config", config)
            .field("clock", clock)
            .field("paused", paused)
            .field("hooks", &hooks.len())
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------

/// Performance and activity data returned by [`Scene::step()`].
///
/// The exact contents of this structure are unstable; use only `Debug` formatting to examine
/// its contents unless you have a specific need for one of the values.
#[derive(Clone, Debug, Default, PartialEq)]
#[non_exhaustive]
pub struct SceneStepInfo {
    /// Real time spent in the step.
    pub computation_time: Duration,
    /// Number of update hooks called.
    pub hooks_run: usize,
    /// Whether the tick was paused, so physics did not run.
    pub paused: bool,
    /// What the physics tick did; empty if the step was paused.
    pub physics: PhysicsStepInfo,
}

impl core::ops::AddAssign for SceneStepInfo {
    fn add_assign(&mut self, other: Self) {
        self.computation_time += other.computation_time;
        self.hooks_run += other.hooks_run;
        self.paused |= other.paused;
        self.physics += other.physics;
    }
}

impl Fmt<StatusText> for SceneStepInfo {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>, fopt: &StatusText) -> fmt::Result {
        writeln!(
            fmt,
            "Step {} ({} hooks){}",
            self.computation_time.refmt(fopt),
            self.hooks_run,
            if self.paused { " [paused]" } else { "" }
        )?;
        write!(fmt, "{}", self.physics.refmt(fopt))
    }
}

// -------------------------------------------------------------------------------------------------

/// Failure to find an entity in a [`Scene`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum LookupError {
    /// No entity has this name.
    #[error("no entity named {0}")]
    NotFound(Name),
    /// The entity was removed, or the id came from a different scene.
    #[error("entity {0:?} no longer exists")]
    Gone(EntityId),
    /// The entity exists, but a camera was required.
    #[error("entity {0:?} is not a camera")]
    NotACamera(EntityId),
}

/// Failure of [`Scene::insert()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum InsertError {
    /// An entity with this name is already in the scene.
    #[error("an entity named {0} already exists")]
    AlreadyExists(Name),
    /// The requested parent could not be found.
    #[error("parent of new entity not found")]
    Parent(#[from] LookupError),
    /// The scene has run out of entity ids.
    #[error("scene is full")]
    Full,
}

/// Failure of [`Scene::set_parent()`].
#[derive(Clone, Debug, Eq, Hash, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum HierarchyError {
    /// The new parent is the child itself or one of its descendants.
    #[error("attaching {child:?} to {parent:?} would create a cycle")]
    WouldCycle {
        #[allow(missing_docs)]
        child: EntityId,
        #[allow(missing_docs)]
        parent: EntityId,
    },
    #[allow(missing_docs)]
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

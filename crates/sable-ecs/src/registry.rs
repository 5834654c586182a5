//! The [`Registry`] owns all ECS state: entity signatures, component pools,
//! systems, and the deferred add/kill queues.
//!
//! Mutation is immediate for component data and signatures, but system
//! membership only changes inside [`Registry::update`]. Systems can therefore
//! iterate their entity sets for a whole frame while entities are created,
//! modified or killed; those changes become visible at the next update.

use std::any::{type_name, TypeId};
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::warn;

use crate::component::{Component, ComponentRegistry, ComponentTypeId};
use crate::entity::{Entity, EntityMut, EntityRef};
use crate::observer::{FlushReport, RegistryObserver, TracingObserver};
use crate::pool::{ErasedPool, Pool};
use crate::signature::Signature;
use crate::system::{AsAny, System};
use crate::EcsError;

// ---------------------------------------------------------------------------
// EntityState
// ---------------------------------------------------------------------------

/// Lifecycle of an entity id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntityState {
    /// Created, waiting for the next update to join systems.
    Pending,
    /// Matched into systems by an update.
    Active,
    /// Queued for kill.
    Dying,
    /// Detached from all systems. The id is never reused.
    Dead,
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Owning coordinator of entities, pools, signatures and systems.
///
/// Contract violations (an entity id this registry never created, reading a
/// component the entity does not have, fetching an unregistered system,
/// registering more than 32 component kinds) panic. The `try_*` accessors
/// report the lookup failures as [`EcsError`] instead.
pub struct Registry {
    entity_count: u32,
    /// Indexed by entity id.
    signatures: Vec<Signature>,
    /// Indexed by entity id.
    states: Vec<EntityState>,
    components: ComponentRegistry,
    /// Indexed by `ComponentTypeId`; created lazily on first insert.
    pools: Vec<Option<Box<dyn ErasedPool>>>,
    systems: HashMap<TypeId, Box<dyn System>>,
    to_add: BTreeSet<Entity>,
    to_kill: BTreeSet<Entity>,
    observer: Box<dyn RegistryObserver>,
}

impl Registry {
    /// Create a registry that reports events through [`TracingObserver`].
    pub fn new() -> Self {
        Self::with_observer(TracingObserver)
    }

    /// Create a registry reporting events to `observer`.
    pub fn with_observer<O: RegistryObserver + 'static>(observer: O) -> Self {
        let mut observer: Box<dyn RegistryObserver> = Box::new(observer);
        observer.registry_created();
        Self {
            entity_count: 0,
            signatures: Vec::new(),
            states: Vec::new(),
            components: ComponentRegistry::new(),
            pools: Vec::new(),
            systems: HashMap::new(),
            to_add: BTreeSet::new(),
            to_kill: BTreeSet::new(),
            observer,
        }
    }

    // -- component kinds ----------------------------------------------------

    /// The component identity table.
    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Mutable access to the component identity table, for up-front
    /// registration or for building systems outside [`add_system_with`](Self::add_system_with).
    pub fn components_mut(&mut self) -> &mut ComponentRegistry {
        &mut self.components
    }

    /// Register component kind `T` ahead of first use.
    pub fn register_component<T: Component>(&mut self) -> ComponentTypeId {
        self.components.register::<T>()
    }

    // -- entities -----------------------------------------------------------

    /// Allocate a new entity. It joins systems at the next [`update`](Self::update).
    pub fn create_entity(&mut self) -> Entity {
        let entity = Entity::new(self.entity_count);
        self.entity_count += 1;
        self.signatures.push(Signature::EMPTY);
        self.states.push(EntityState::Pending);
        self.to_add.insert(entity);
        self.observer.entity_created(entity);
        entity
    }

    /// Queue `entity` for removal from every system at the next update.
    ///
    /// Killing an entity twice is a no-op. Component data is left in place.
    #[track_caller]
    pub fn kill_entity(&mut self, entity: Entity) {
        self.check_entity(entity);
        match self.states[entity.index()] {
            EntityState::Dying | EntityState::Dead => {}
            EntityState::Pending | EntityState::Active => {
                self.states[entity.index()] = EntityState::Dying;
                self.to_kill.insert(entity);
                self.observer.entity_killed(entity);
            }
        }
    }

    /// Number of entities ever created. Ids are `0..entity_count`.
    pub fn entity_count(&self) -> usize {
        self.entity_count as usize
    }

    /// Whether `entity` was created here and has not been killed.
    pub fn is_alive(&self, entity: Entity) -> bool {
        matches!(
            self.states.get(entity.index()),
            Some(EntityState::Pending | EntityState::Active)
        )
    }

    /// The entity's current component signature.
    #[track_caller]
    pub fn signature(&self, entity: Entity) -> Signature {
        self.check_entity(entity);
        self.signatures[entity.index()]
    }

    /// Read-only proxy for `entity`.
    #[track_caller]
    pub fn entity(&self, entity: Entity) -> EntityRef<'_> {
        self.check_entity(entity);
        EntityRef::new(self, entity)
    }

    /// Mutable proxy for `entity`.
    #[track_caller]
    pub fn entity_mut(&mut self, entity: Entity) -> EntityMut<'_> {
        self.check_entity(entity);
        EntityMut::new(self, entity)
    }

    /// Entities waiting to join systems, in id order.
    pub fn pending_additions(&self) -> Vec<Entity> {
        self.to_add.iter().copied().collect()
    }

    /// Entities waiting to leave systems, in id order.
    pub fn pending_kills(&self) -> Vec<Entity> {
        self.to_kill.iter().copied().collect()
    }

    // -- components ---------------------------------------------------------

    /// Attach `value` to `entity`, overwriting any previous `T`.
    #[track_caller]
    pub fn add_component<T: Component>(&mut self, entity: Entity, value: T) {
        self.check_entity(entity);
        let id = self.components.id_of::<T>();
        let capacity = self.entity_count as usize;

        let pool = self.pool_mut_or_insert::<T>(id);
        pool.ensure_capacity(capacity);
        pool.set(entity.index(), value);

        self.signatures[entity.index()].set(id);
        self.mark_changed(entity);
        self.observer.component_added(id, entity);
    }

    /// Clear the `T` bit of `entity`. The stored value is left stale in the
    /// pool; the signature alone decides presence.
    #[track_caller]
    pub fn remove_component<T: Component>(&mut self, entity: Entity) {
        self.check_entity(entity);
        let id = self.components.id_of::<T>();
        self.signatures[entity.index()].clear(id);
        self.mark_changed(entity);
        self.observer.component_removed(id, entity);
    }

    #[track_caller]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.check_entity(entity);
        self.components
            .lookup::<T>()
            .is_some_and(|id| self.signatures[entity.index()].test(id))
    }

    /// The `T` attached to `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` does not currently have a `T`.
    #[track_caller]
    pub fn get_component<T: Component>(&self, entity: Entity) -> &T {
        match self.try_get_component::<T>(entity) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Mutable access to the `T` attached to `entity`. Panics like
    /// [`get_component`](Self::get_component).
    #[track_caller]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.try_get_component_mut::<T>(entity) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_get_component<T: Component>(&self, entity: Entity) -> Result<&T, EcsError> {
        let id = self.present_component::<T>(entity)?;
        Ok(self.pool::<T>(id).get(entity.index()))
    }

    pub fn try_get_component_mut<T: Component>(
        &mut self,
        entity: Entity,
    ) -> Result<&mut T, EcsError> {
        let id = self.present_component::<T>(entity)?;
        Ok(self.pool_mut::<T>(id).get_mut(entity.index()))
    }

    // -- systems ------------------------------------------------------------

    /// Register `system`. At most one instance per type is kept: if one is
    /// already registered the new instance is dropped and `false` returned.
    pub fn add_system<S: System>(&mut self, system: S) -> bool {
        match self.systems.entry(TypeId::of::<S>()) {
            Entry::Occupied(_) => {
                warn!(
                    system = system.name(),
                    "system already registered, keeping existing instance"
                );
                false
            }
            Entry::Vacant(slot) => {
                let name = system.name();
                slot.insert(Box::new(system));
                self.observer.system_added(name);
                true
            }
        }
    }

    /// Build a system with access to the component table, so it can declare
    /// its required components, then register it.
    pub fn add_system_with<S, F>(&mut self, build: F) -> bool
    where
        S: System,
        F: FnOnce(&mut ComponentRegistry) -> S,
    {
        let system = build(&mut self.components);
        self.add_system(system)
    }

    /// Unregister and return the `S` instance, if any.
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let system = self.systems.remove(&TypeId::of::<S>())?;
        self.observer.system_removed(system.name());
        system.into_any().downcast::<S>().ok().map(|boxed| *boxed)
    }

    pub fn has_system<S: System>(&self) -> bool {
        self.systems.contains_key(&TypeId::of::<S>())
    }

    /// The registered `S`.
    ///
    /// # Panics
    ///
    /// Panics if no `S` is registered.
    #[track_caller]
    pub fn get_system<S: System>(&self) -> &S {
        match self.try_get_system::<S>() {
            Ok(system) => system,
            Err(err) => panic!("{err}"),
        }
    }

    #[track_caller]
    pub fn get_system_mut<S: System>(&mut self) -> &mut S {
        match self.try_get_system_mut::<S>() {
            Ok(system) => system,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_get_system<S: System>(&self) -> Result<&S, EcsError> {
        self.systems
            .get(&TypeId::of::<S>())
            .and_then(|system| (**system).as_any().downcast_ref::<S>())
            .ok_or(EcsError::UnknownSystem {
                system: type_name::<S>(),
            })
    }

    pub fn try_get_system_mut<S: System>(&mut self) -> Result<&mut S, EcsError> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .and_then(|system| (**system).as_any_mut().downcast_mut::<S>())
            .ok_or(EcsError::UnknownSystem {
                system: type_name::<S>(),
            })
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // -- membership ---------------------------------------------------------

    /// Add `entity` to every system whose required signature is a subset of
    /// the entity's signature, and drop it from systems it no longer matches.
    ///
    /// [`update`](Self::update) calls this for every queued entity. Calling it
    /// directly on a killed entity re-attaches it.
    #[track_caller]
    pub fn add_entity_to_systems(&mut self, entity: Entity) {
        self.check_entity(entity);
        let signature = self.signatures[entity.index()];
        for system in self.systems.values_mut() {
            if signature.contains(system.required_signature()) {
                system.add_entity_to_system(entity);
            } else {
                system.remove_entity_from_system(entity);
            }
        }

        let state = &mut self.states[entity.index()];
        if matches!(*state, EntityState::Pending | EntityState::Dead) {
            *state = EntityState::Active;
        }
    }

    /// Remove `entity` from every system.
    #[track_caller]
    pub fn remove_entity_from_systems(&mut self, entity: Entity) {
        self.check_entity(entity);
        for system in self.systems.values_mut() {
            system.remove_entity_from_system(entity);
        }
    }

    /// Flush the pending queues into system membership.
    ///
    /// Queued additions are matched first, then queued kills are detached, so
    /// an entity created and killed in the same frame never shows up in a
    /// system. With both queues empty this changes nothing.
    pub fn update(&mut self) -> FlushReport {
        let to_add = std::mem::take(&mut self.to_add);
        for &entity in &to_add {
            self.add_entity_to_systems(entity);
        }

        let to_kill = std::mem::take(&mut self.to_kill);
        for &entity in &to_kill {
            self.remove_entity_from_systems(entity);
            self.states[entity.index()] = EntityState::Dead;
        }

        let report = FlushReport {
            added: to_add.len(),
            killed: to_kill.len(),
        };
        self.observer.flushed(report);
        report
    }

    // -- internals ----------------------------------------------------------

    #[track_caller]
    fn check_entity(&self, entity: Entity) {
        assert!(
            entity.id() < self.entity_count,
            "entity {entity} was not created by this registry ({} entities)",
            self.entity_count
        );
    }

    /// Re-queue an active entity so its membership is re-evaluated.
    fn mark_changed(&mut self, entity: Entity) {
        if self.states[entity.index()] == EntityState::Active {
            self.to_add.insert(entity);
        }
    }

    /// Resolve the id of `T` and verify `entity` currently has it.
    fn present_component<T: Component>(&self, entity: Entity) -> Result<ComponentTypeId, EcsError> {
        if entity.id() >= self.entity_count {
            return Err(EcsError::InvalidEntity {
                entity,
                entity_count: self.entity_count,
            });
        }
        let id = self
            .components
            .lookup::<T>()
            .ok_or(EcsError::UnknownComponent {
                component: type_name::<T>(),
            })?;
        if !self.signatures[entity.index()].test(id) {
            return Err(EcsError::MissingComponent {
                entity,
                component: type_name::<T>(),
            });
        }
        Ok(id)
    }

    fn pool<T: Component>(&self, id: ComponentTypeId) -> &Pool<T> {
        self.pools
            .get(id.index())
            .and_then(Option::as_ref)
            .and_then(|pool| (**pool).as_any().downcast_ref::<Pool<T>>())
            .unwrap_or_else(|| Self::missing_pool::<T>(id))
    }

    fn pool_mut<T: Component>(&mut self, id: ComponentTypeId) -> &mut Pool<T> {
        self.pools
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .and_then(|pool| (**pool).as_any_mut().downcast_mut::<Pool<T>>())
            .unwrap_or_else(|| Self::missing_pool::<T>(id))
    }

    fn pool_mut_or_insert<T: Component>(&mut self, id: ComponentTypeId) -> &mut Pool<T> {
        if id.index() >= self.pools.len() {
            self.pools.resize_with(id.index() + 1, || None);
        }
        let pool = self.pools[id.index()]
            .get_or_insert_with(|| Box::new(Pool::<T>::new()) as Box<dyn ErasedPool>);
        (**pool)
            .as_any_mut()
            .downcast_mut::<Pool<T>>()
            .unwrap_or_else(|| Self::missing_pool::<T>(id))
    }

    #[cold]
    fn missing_pool<T: Component>(id: ComponentTypeId) -> ! {
        panic!(
            "no pool of {} for component id {id} although its signature bit is set",
            type_name::<T>()
        )
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        self.observer.registry_dropped();
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("entity_count", &self.entity_count)
            .field("components", &self.components.len())
            .field(
                "pools",
                &self.pools.iter().filter(|pool| pool.is_some()).count(),
            )
            .field("systems", &self.systems.len())
            .field("to_add", &self.to_add)
            .field("to_kill", &self.to_kill)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

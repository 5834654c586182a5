//! Entity handles.
//!
//! An [`Entity`] is a plain numeric id; it carries no data of its own. All
//! state lives in the [`Registry`], indexed by that id.
//!
//! To operate on an entity through its owning registry, borrow a proxy:
//! [`EntityMut`] via [`Registry::entity_mut`] or [`EntityRef`] via
//! [`Registry::entity`]. The proxies forward to the registry's component API
//! with the entity as target.

use std::fmt;

use crate::component::Component;
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A numeric entity identifier.
///
/// Equality, ordering and hashing are defined by the id alone, so entities
/// can live in ordered sets.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    id: u32,
}

impl Entity {
    #[inline]
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    /// The raw id.
    #[inline]
    pub fn id(self) -> u32 {
        self.id
    }

    /// The id as a slot index.
    #[inline]
    pub fn index(self) -> usize {
        self.id as usize
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.id)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

// ---------------------------------------------------------------------------
// EntityRef / EntityMut
// ---------------------------------------------------------------------------

/// Read-only proxy binding an [`Entity`] to its registry.
#[derive(Clone, Copy)]
pub struct EntityRef<'r> {
    registry: &'r Registry,
    entity: Entity,
}

impl<'r> EntityRef<'r> {
    pub(crate) fn new(registry: &'r Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn id(&self) -> u32 {
        self.entity.id()
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.entity)
    }

    pub fn get_component<T: Component>(&self) -> &'r T {
        self.registry.get_component::<T>(self.entity)
    }
}

impl fmt::Debug for EntityRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRef")
            .field("entity", &self.entity)
            .field("signature", &self.registry.signature(self.entity))
            .finish()
    }
}

/// Mutable proxy binding an [`Entity`] to its registry.
///
/// ```
/// use sable_ecs::prelude::*;
///
/// #[derive(Debug, PartialEq)]
/// struct Health(u32);
///
/// let mut registry = Registry::with_observer(NullObserver);
/// let tank = registry.create_entity();
/// registry.entity_mut(tank).add_component(Health(3));
/// assert_eq!(registry.entity(tank).get_component::<Health>(), &Health(3));
/// ```
pub struct EntityMut<'r> {
    registry: &'r mut Registry,
    entity: Entity,
}

impl<'r> EntityMut<'r> {
    pub(crate) fn new(registry: &'r mut Registry, entity: Entity) -> Self {
        Self { registry, entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn id(&self) -> u32 {
        self.entity.id()
    }

    /// Attach (or overwrite) a component. Returns `self` for chaining.
    pub fn add_component<T: Component>(&mut self, value: T) -> &mut Self {
        self.registry.add_component(self.entity, value);
        self
    }

    pub fn remove_component<T: Component>(&mut self) -> &mut Self {
        self.registry.remove_component::<T>(self.entity);
        self
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.registry.has_component::<T>(self.entity)
    }

    pub fn get_component<T: Component>(&self) -> &T {
        self.registry.get_component::<T>(self.entity)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> &mut T {
        self.registry.get_component_mut::<T>(self.entity)
    }

    /// Queue this entity for removal from all systems at the next update.
    pub fn kill(&mut self) {
        self.registry.kill_entity(self.entity);
    }
}

impl fmt::Debug for EntityMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMut")
            .field("entity", &self.entity)
            .field("signature", &self.registry.signature(self.entity))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

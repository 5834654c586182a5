//! Signature-matched systems.
//!
//! A system declares the component kinds it needs once, at construction, by
//! calling [`SystemCore::require_component`]. The registry then keeps the
//! system's entity set in sync at every
//! [`Registry::update`](crate::registry::Registry::update): an entity is a
//! member exactly when its signature is a superset of the system's required
//! signature.
//!
//! Systems embed a [`SystemCore`] and implement [`System`]:
//!
//! ```
//! use sable_ecs::prelude::*;
//!
//! struct Position(f32, f32);
//! struct Velocity(f32, f32);
//!
//! struct MovementSystem {
//!     core: SystemCore,
//! }
//!
//! impl MovementSystem {
//!     fn new(components: &mut ComponentRegistry) -> Self {
//!         let mut core = SystemCore::new();
//!         core.require_component::<Position>(components);
//!         core.require_component::<Velocity>(components);
//!         Self { core }
//!     }
//! }
//!
//! impl System for MovementSystem {
//!     fn core(&self) -> &SystemCore { &self.core }
//!     fn core_mut(&mut self) -> &mut SystemCore { &mut self.core }
//! }
//!
//! let mut registry = Registry::with_observer(NullObserver);
//! registry.add_system_with(MovementSystem::new);
//! assert!(registry.has_system::<MovementSystem>());
//! ```

use std::any::{type_name, Any};
use std::collections::BTreeSet;

use crate::component::{Component, ComponentRegistry};
use crate::entity::Entity;
use crate::signature::Signature;

// ---------------------------------------------------------------------------
// SystemCore
// ---------------------------------------------------------------------------

/// Required signature plus the set of currently matched entities.
#[derive(Debug, Clone, Default)]
pub struct SystemCore {
    required: Signature,
    entities: BTreeSet<Entity>,
}

impl SystemCore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that matched entities must carry component kind `T`.
    pub fn require_component<T: Component>(&mut self, components: &mut ComponentRegistry) {
        let id = components.id_of::<T>();
        self.required.set(id);
    }

    pub fn required_signature(&self) -> Signature {
        self.required
    }

    /// Insert `entity`; no-op if already present.
    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity);
    }

    /// Remove `entity`; no-op if absent.
    pub fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(&entity);
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Owned, id-ordered snapshot of the matched entities.
    ///
    /// Stays valid while the registry is mutated, so a system can iterate it
    /// and write components back through the registry.
    pub fn system_entities(&self) -> Vec<Entity> {
        self.entities.iter().copied().collect()
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Upcast helper so boxed systems can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A behavior unit matched against entity signatures.
///
/// The registry holds at most one instance per concrete type.
pub trait System: AsAny {
    fn core(&self) -> &SystemCore;

    fn core_mut(&mut self) -> &mut SystemCore;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }

    fn required_signature(&self) -> Signature {
        self.core().required_signature()
    }

    fn add_entity_to_system(&mut self, entity: Entity) {
        self.core_mut().add_entity(entity);
    }

    fn remove_entity_from_system(&mut self, entity: Entity) {
        self.core_mut().remove_entity(entity);
    }

    fn system_entities(&self) -> Vec<Entity> {
        self.core().system_entities()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    struct Probe {
        core: SystemCore,
    }

    impl System for Probe {
        fn core(&self) -> &SystemCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut SystemCore {
            &mut self.core
        }
    }

    #[test]
    fn require_component_sets_bits() {
        let mut components = ComponentRegistry::new();
        let mut core = SystemCore::new();
        core.require_component::<A>(&mut components);
        core.require_component::<B>(&mut components);

        let a = components.lookup::<A>().unwrap();
        let b = components.lookup::<B>().unwrap();
        assert!(core.required_signature().test(a));
        assert!(core.required_signature().test(b));
        assert_eq!(core.required_signature().count(), 2);
    }

    #[test]
    fn declaration_order_does_not_matter() {
        let mut components = ComponentRegistry::new();
        components.register::<A>();
        components.register::<B>();

        let mut ab = SystemCore::new();
        ab.require_component::<A>(&mut components);
        ab.require_component::<B>(&mut components);

        let mut ba = SystemCore::new();
        ba.require_component::<B>(&mut components);
        ba.require_component::<A>(&mut components);

        assert_eq!(ab.required_signature(), ba.required_signature());
    }

    #[test]
    fn add_and_remove_are_idempotent() {
        let mut probe = Probe {
            core: SystemCore::new(),
        };
        let e = Entity::new(4);

        probe.add_entity_to_system(e);
        probe.add_entity_to_system(e);
        assert_eq!(probe.system_entities(), vec![e]);

        probe.remove_entity_from_system(e);
        probe.remove_entity_from_system(e);
        assert!(probe.core().is_empty());
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let mut core = SystemCore::new();
        for id in [5, 1, 3] {
            core.add_entity(Entity::new(id));
        }
        let ids: Vec<u32> = core.system_entities().iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn default_name_is_type_name() {
        let probe = Probe {
            core: SystemCore::new(),
        };
        assert!(probe.name().ends_with("Probe"));
    }

    #[test]
    fn boxed_system_downcasts() {
        let boxed: Box<dyn System> = Box::new(Probe {
            core: SystemCore::new(),
        });
        assert!((*boxed).as_any().downcast_ref::<Probe>().is_some());
        assert!(boxed.into_any().downcast::<Probe>().is_ok());
    }
}

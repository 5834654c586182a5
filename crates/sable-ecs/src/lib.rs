//! Sable ECS -- signature-based Entity Component System.
//!
//! Entities are plain ids. Each component kind gets a small id from the
//! [`ComponentRegistry`](component::ComponentRegistry) and a dense
//! [`Pool`](pool::Pool) indexed by entity id. An entity's
//! [`Signature`](signature::Signature) records which kinds it has; a
//! [`System`](system::System) declares the kinds it requires and receives
//! every entity whose signature is a superset. Membership is recomputed only
//! in [`Registry::update`](registry::Registry::update), once per frame.
//!
//! # Quick Start
//!
//! ```
//! use sable_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Position { x: f32, y: f32 }
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Velocity { dx: f32, dy: f32 }
//!
//! struct MovementSystem { core: SystemCore }
//!
//! impl System for MovementSystem {
//!     fn core(&self) -> &SystemCore { &self.core }
//!     fn core_mut(&mut self) -> &mut SystemCore { &mut self.core }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_system_with(|components| {
//!     let mut core = SystemCore::new();
//!     core.require_component::<Position>(components);
//!     core.require_component::<Velocity>(components);
//!     MovementSystem { core }
//! });
//!
//! let tank = registry.create_entity();
//! registry
//!     .entity_mut(tank)
//!     .add_component(Position { x: 1.0, y: 2.0 })
//!     .add_component(Velocity { dx: 5.0, dy: 0.0 });
//!
//! registry.update();
//!
//! let movers = registry.get_system::<MovementSystem>().system_entities();
//! assert_eq!(movers, vec![tank]);
//! assert_eq!(registry.get_component::<Position>(tank).x, 1.0);
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod observer;
pub mod pool;
pub mod registry;
pub mod signature;
pub mod system;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Lookup failures reported by the `try_*` accessors of
/// [`Registry`](registry::Registry). The panicking accessors use the same
/// messages.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The entity id was never handed out by this registry.
    #[error("entity {entity} was not created by this registry ({entity_count} entities)")]
    InvalidEntity {
        entity: entity::Entity,
        entity_count: u32,
    },

    /// The component kind has never been registered or used.
    #[error("component type '{component}' has never been registered")]
    UnknownComponent { component: &'static str },

    /// The entity's signature does not include the component kind.
    #[error("entity {entity} does not have component '{component}'")]
    MissingComponent {
        entity: entity::Entity,
        component: &'static str,
    },

    /// No system of this type is registered.
    #[error("system '{system}' is not registered")]
    UnknownSystem { system: &'static str },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{Component, ComponentRegistry, ComponentTypeId};
    pub use crate::entity::{Entity, EntityMut, EntityRef};
    pub use crate::observer::{FlushReport, NullObserver, RegistryObserver, TracingObserver};
    pub use crate::pool::{ErasedPool, Pool};
    pub use crate::registry::Registry;
    pub use crate::signature::{Signature, MAX_COMPONENTS};
    pub use crate::system::{System, SystemCore};
    pub use crate::EcsError;
}

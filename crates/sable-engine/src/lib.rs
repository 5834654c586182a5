//! Sable Engine -- headless frame driver on top of [`sable_ecs`].
//!
//! This crate wires the ECS registry into a game loop: a fixed-step
//! [`TickLoop`](tick::TickLoop) that flushes the registry and runs system
//! functions every frame, JSON [`config`] loading, `tracing` setup, and a
//! small set of plain components and systems (movement, draw-list
//! collection). Windowing, rendering and input stay outside.
//!
//! # Quick Start
//!
//! ```
//! use sable_engine::prelude::*;
//!
//! let config = GameConfig::default();
//! let mut registry = Registry::with_observer(NullObserver);
//! registry.add_system_with(MovementSystem::new);
//! registry.add_system_with(RenderSystem::new);
//!
//! let tank = registry.create_entity();
//! registry
//!     .entity_mut(tank)
//!     .add_component(TransformComponent::at(10.0, 20.0))
//!     .add_component(RigidBodyComponent::with_velocity(100.0, 20.0))
//!     .add_component(SpriteComponent::new(32, 32));
//!
//! let mut tick_loop = TickLoop::new(registry, TickConfig { headless: true, ..config.tick });
//! tick_loop.add_system("movement", MovementSystem::update);
//! tick_loop.run_ticks(10);
//!
//! let rects = RenderSystem::draw_list(tick_loop.registry());
//! assert_eq!(rects.len(), 1);
//! assert_eq!(rects[0].width, 32);
//! ```

#![deny(unsafe_code)]

pub mod components;
pub mod config;
pub mod logging;
pub mod systems;
pub mod tick;

/// Re-export the ECS crate for convenience.
pub use sable_ecs;

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use sable_ecs::prelude::*;

    pub use crate::components::{RigidBodyComponent, SpriteComponent, TransformComponent, Vec2};
    pub use crate::config::{ConfigError, GameConfig, TickConfig};
    pub use crate::logging::init_logging;
    pub use crate::systems::{DrawRect, MovementSystem, RenderSystem};
    pub use crate::tick::{SystemFn, TickDiagnostics, TickLoop};
}

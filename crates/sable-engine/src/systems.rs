//! Built-in systems.
//!
//! Each system owns only its [`SystemCore`]; per-frame behavior is an
//! associated function taking the registry, so it can iterate the system's
//! entity snapshot while reading and writing components through the
//! registry. The `update` functions match [`SystemFn`](crate::tick::SystemFn)
//! and can be handed straight to a [`TickLoop`](crate::tick::TickLoop).

use sable_ecs::prelude::*;
use tracing::trace;

use crate::components::{RigidBodyComponent, SpriteComponent, TransformComponent};

// ---------------------------------------------------------------------------
// MovementSystem
// ---------------------------------------------------------------------------

/// Integrates position by velocity.
#[derive(Debug)]
pub struct MovementSystem {
    core: SystemCore,
}

impl MovementSystem {
    pub fn new(components: &mut ComponentRegistry) -> Self {
        let mut core = SystemCore::new();
        core.require_component::<TransformComponent>(components);
        core.require_component::<RigidBodyComponent>(components);
        Self { core }
    }

    /// Advance every matched entity by `velocity * dt`.
    pub fn update(registry: &mut Registry, dt: f64) {
        for entity in registry.get_system::<MovementSystem>().system_entities() {
            let velocity = registry.get_component::<RigidBodyComponent>(entity).velocity;
            let transform = registry.get_component_mut::<TransformComponent>(entity);
            transform.position = transform.position + velocity * dt;
            trace!(
                entity = entity.id(),
                x = transform.position.x,
                y = transform.position.y,
                "moved"
            );
        }
    }
}

impl System for MovementSystem {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

// ---------------------------------------------------------------------------
// RenderSystem
// ---------------------------------------------------------------------------

/// Destination rectangle for one sprite, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRect {
    pub entity: Entity,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Collects what the presentation layer should draw this frame.
#[derive(Debug)]
pub struct RenderSystem {
    core: SystemCore,
}

impl RenderSystem {
    pub fn new(components: &mut ComponentRegistry) -> Self {
        let mut core = SystemCore::new();
        core.require_component::<TransformComponent>(components);
        core.require_component::<SpriteComponent>(components);
        Self { core }
    }

    /// One rectangle per matched entity, in entity order. Sprite size is
    /// multiplied by the transform scale; positions truncate toward zero.
    pub fn draw_list(registry: &Registry) -> Vec<DrawRect> {
        registry
            .get_system::<RenderSystem>()
            .core()
            .entities()
            .map(|entity| {
                let transform = registry.get_component::<TransformComponent>(entity);
                let sprite = registry.get_component::<SpriteComponent>(entity);
                DrawRect {
                    entity,
                    x: transform.position.x as i32,
                    y: transform.position.y as i32,
                    width: (f64::from(sprite.width) * transform.scale.x) as u32,
                    height: (f64::from(sprite.height) * transform.scale.y) as u32,
                }
            })
            .collect()
    }
}

impl System for RenderSystem {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

//! Diagnostic hooks.
//!
//! The registry reports lifecycle and mutation events to a
//! [`RegistryObserver`] instead of logging directly. The default observer,
//! [`TracingObserver`], turns them into `tracing` events; embedders can
//! install their own with [`Registry::with_observer`](crate::registry::Registry::with_observer).

use tracing::{debug, info};

use crate::component::ComponentTypeId;
use crate::entity::Entity;

/// Counts produced by one [`Registry::update`](crate::registry::Registry::update).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entities drained from the add queue.
    pub added: usize,
    /// Entities drained from the kill queue.
    pub killed: usize,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.killed == 0
    }
}

/// Receives registry events. Every method defaults to a no-op.
pub trait RegistryObserver {
    fn registry_created(&mut self) {}

    fn registry_dropped(&mut self) {}

    fn entity_created(&mut self, _entity: Entity) {}

    fn entity_killed(&mut self, _entity: Entity) {}

    fn component_added(&mut self, _component: ComponentTypeId, _entity: Entity) {}

    fn component_removed(&mut self, _component: ComponentTypeId, _entity: Entity) {}

    fn system_added(&mut self, _name: &'static str) {}

    fn system_removed(&mut self, _name: &'static str) {}

    fn flushed(&mut self, _report: FlushReport) {}
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl RegistryObserver for NullObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RegistryObserver for TracingObserver {
    fn registry_created(&mut self) {
        info!("registry created");
    }

    fn registry_dropped(&mut self) {
        info!("registry dropped");
    }

    fn entity_created(&mut self, entity: Entity) {
        debug!(entity = entity.id(), "entity created");
    }

    fn entity_killed(&mut self, entity: Entity) {
        debug!(entity = entity.id(), "entity queued for kill");
    }

    fn component_added(&mut self, component: ComponentTypeId, entity: Entity) {
        info!(
            component = component.index(),
            entity = entity.id(),
            "component added to entity"
        );
    }

    fn component_removed(&mut self, component: ComponentTypeId, entity: Entity) {
        info!(
            component = component.index(),
            entity = entity.id(),
            "component removed from entity"
        );
    }

    fn system_added(&mut self, name: &'static str) {
        info!(system = name, "system added");
    }

    fn system_removed(&mut self, name: &'static str) {
        info!(system = name, "system removed");
    }

    fn flushed(&mut self, report: FlushReport) {
        if !report.is_empty() {
            debug!(
                added = report.added,
                killed = report.killed,
                "flushed pending entities"
            );
        }
    }
}

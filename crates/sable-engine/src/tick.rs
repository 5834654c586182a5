//! Frame loop driving a [`Registry`].
//!
//! Each tick:
//!
//! 1. [`Registry::update`] flushes entities created, changed or killed since
//!    the previous tick into system membership.
//! 2. All registered system functions run in registration order with the
//!    fixed time step.
//! 3. The tick counter advances.
//!
//! # Example
//!
//! ```
//! use sable_engine::prelude::*;
//!
//! let mut registry = Registry::with_observer(NullObserver);
//! registry.add_system_with(MovementSystem::new);
//!
//! let tank = registry.create_entity();
//! registry
//!     .entity_mut(tank)
//!     .add_component(TransformComponent::at(0.0, 0.0))
//!     .add_component(RigidBodyComponent::with_velocity(60.0, 0.0));
//!
//! let config = TickConfig { fixed_dt: 1.0 / 60.0, headless: true, ..Default::default() };
//! let mut tick_loop = TickLoop::new(registry, config);
//! tick_loop.add_system("movement", MovementSystem::update);
//!
//! tick_loop.run_ticks(60);
//! assert_eq!(tick_loop.tick_count(), 60);
//! let x = tick_loop.registry().get_component::<TransformComponent>(tank).position.x;
//! assert!((x - 60.0).abs() < 1e-9);
//! ```

use std::time::{Duration, Instant};

use sable_ecs::observer::FlushReport;
use sable_ecs::registry::Registry;
use tracing::debug;

use crate::config::TickConfig;

/// Per-frame behavior: reads and writes components through the registry.
pub type SystemFn = fn(&mut Registry, f64);

/// Timing for the last tick.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Wall-clock time per system, in execution order.
    pub system_times: Vec<(String, Duration)>,
    /// Time spent in [`Registry::update`].
    pub flush_time: Duration,
    /// What the flush drained.
    pub flush: FlushReport,
    /// Total time for the tick.
    pub total_time: Duration,
}

#[derive(Debug)]
struct RegisteredSystem {
    name: String,
    func: SystemFn,
}

/// Fixed-step frame loop.
pub struct TickLoop {
    registry: Registry,
    systems: Vec<RegisteredSystem>,
    tick_counter: u64,
    config: TickConfig,
    last_diagnostics: TickDiagnostics,
}

impl TickLoop {
    /// Create a loop around `registry`.
    ///
    /// # Panics
    ///
    /// Panics if `config.fixed_dt` is not positive and finite.
    pub fn new(registry: Registry, config: TickConfig) -> Self {
        assert!(
            config.fixed_dt > 0.0 && config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            config.fixed_dt
        );
        Self {
            registry,
            systems: Vec::new(),
            tick_counter: 0,
            config,
            last_diagnostics: TickDiagnostics::default(),
        }
    }

    /// Register a system function, run after those registered earlier.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system(&mut self, name: &str, func: SystemFn) {
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func,
        });
    }

    /// Run one frame: flush, then every system in order.
    pub fn tick(&mut self) -> FlushReport {
        let tick_start = Instant::now();

        let flush_start = Instant::now();
        let flush = self.registry.update();
        let flush_time = flush_start.elapsed();

        let mut system_times = Vec::with_capacity(self.systems.len());
        for system in &self.systems {
            let sys_start = Instant::now();
            (system.func)(&mut self.registry, self.config.fixed_dt);
            system_times.push((system.name.clone(), sys_start.elapsed()));
        }

        self.tick_counter += 1;
        self.last_diagnostics = TickDiagnostics {
            system_times,
            flush_time,
            flush,
            total_time: tick_start.elapsed(),
        };
        flush
    }

    /// Run `count` ticks back to back, without pacing.
    pub fn run_ticks(&mut self, count: u64) {
        for _ in 0..count {
            self.tick();
        }
    }

    /// Run `count` ticks, sleeping after each one as the frame limit asks.
    ///
    /// In headless mode this is the same as [`run_ticks`](Self::run_ticks).
    pub fn run_frames(&mut self, count: u64) {
        for _ in 0..count {
            let frame_start = Instant::now();
            self.tick();
            if let Some(wait) = self.config.time_to_wait(frame_start.elapsed()) {
                debug!(tick = self.tick_counter, ?wait, "pacing frame");
                std::thread::sleep(wait);
            }
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// Simulation time in seconds, `tick_count * fixed_dt`.
    pub fn sim_time(&self) -> f64 {
        self.tick_counter as f64 * self.config.fixed_dt
    }

    pub fn config(&self) -> &TickConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access for setup and for spawning between ticks.
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Consume the loop, returning its registry.
    pub fn into_registry(self) -> Registry {
        self.registry
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// System names in execution order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }
}

impl std::fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickLoop")
            .field("tick_counter", &self.tick_counter)
            .field("systems", &self.system_names())
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Headless demo: one tank driving across the screen.
//!
//! Usage: `sable [config.json]`. Logging follows `RUST_LOG` (default `info`).

use anyhow::Context;
use sable_engine::prelude::*;
use tracing::info;

/// Frames to simulate before exiting.
const FRAMES: u64 = 120;

fn main() -> anyhow::Result<()> {
    init_logging("info");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::from_path(&path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => GameConfig::default(),
    };
    info!(
        width = config.window_width,
        height = config.window_height,
        fullscreen = config.fullscreen,
        fps_limit = config.tick.fps_limit,
        "starting"
    );

    let mut registry = Registry::new();
    registry.add_system_with(MovementSystem::new);
    registry.add_system_with(RenderSystem::new);

    let tank = registry.create_entity();
    registry
        .entity_mut(tank)
        .add_component(TransformComponent::at(10.0, 20.0))
        .add_component(RigidBodyComponent::with_velocity(100.0, 20.0))
        .add_component(SpriteComponent::new(32, 32));

    let mut tick_loop = TickLoop::new(registry, config.tick.clone());
    tick_loop.add_system("movement", MovementSystem::update);
    tick_loop.run_frames(FRAMES);

    let diagnostics = tick_loop.last_diagnostics();
    info!(
        ticks = tick_loop.tick_count(),
        sim_time = tick_loop.sim_time(),
        last_tick = ?diagnostics.total_time,
        "simulation finished"
    );

    for rect in RenderSystem::draw_list(tick_loop.registry()) {
        info!(
            entity = rect.entity.id(),
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "draw"
        );
    }
    Ok(())
}

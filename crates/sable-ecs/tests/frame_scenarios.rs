//! Frame-level scenarios driven through the public API, the way a game loop
//! uses the registry: create and decorate entities, flush, then let systems
//! walk their entity sets.

use sable_ecs::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct Position {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Velocity {
    vx: f64,
    vy: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct Sprite {
    width: u32,
    height: u32,
}

struct MovementSystem {
    core: SystemCore,
}

impl MovementSystem {
    fn new(components: &mut ComponentRegistry) -> Self {
        let mut core = SystemCore::new();
        core.require_component::<Position>(components);
        core.require_component::<Velocity>(components);
        Self { core }
    }

    fn run(registry: &mut Registry, dt: f64) {
        for entity in registry.get_system::<MovementSystem>().system_entities() {
            let velocity = registry.get_component::<Velocity>(entity).clone();
            let position = registry.get_component_mut::<Position>(entity);
            position.x += velocity.vx * dt;
            position.y += velocity.vy * dt;
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

struct SpriteSystem {
    core: SystemCore,
}

impl SpriteSystem {
    fn new(components: &mut ComponentRegistry) -> Self {
        let mut core = SystemCore::new();
        core.require_component::<Sprite>(components);
        Self { core }
    }
}

impl System for SpriteSystem {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

fn registry() -> Registry {
    Registry::with_observer(NullObserver)
}

#[test]
fn component_ids_are_stable_for_the_registry() {
    let mut registry = registry();
    let first = registry.components_mut().id_of::<Velocity>();
    registry.add_system_with(MovementSystem::new);
    let e = registry.create_entity();
    registry.add_component(e, Velocity { vx: 0.0, vy: 0.0 });
    assert_eq!(registry.components().lookup::<Velocity>(), Some(first));
    assert_eq!(registry.components_mut().id_of::<Velocity>(), first);
}

#[test]
fn explicit_registration_fixes_ids_up_front() {
    let mut registry = registry();
    let sprite = registry.register_component::<Sprite>();
    let position = registry.register_component::<Position>();
    registry.add_system_with(MovementSystem::new);

    assert_eq!(sprite.index(), 0);
    assert_eq!(position.index(), 1);
    assert_eq!(
        registry.components().lookup::<Velocity>().map(|id| id.index()),
        Some(2)
    );
}

#[test]
fn tank_scenario() {
    let mut registry = registry();
    let tank = registry.create_entity();
    registry
        .entity_mut(tank)
        .add_component(Position { x: 1.0, y: 2.0 })
        .add_component(Velocity { vx: 5.0, vy: 0.0 });
    registry.add_system_with(MovementSystem::new);

    registry.update();

    assert_eq!(
        registry.get_system::<MovementSystem>().system_entities(),
        vec![tank]
    );
    assert_eq!(registry.get_component::<Position>(tank).x, 1.0);

    MovementSystem::run(&mut registry, 0.5);
    assert_eq!(
        registry.get_component::<Position>(tank),
        &Position { x: 3.5, y: 2.0 }
    );
}

#[test]
fn matching_is_independent_of_creation_order() {
    let mut registry = registry();
    registry.add_system_with(SpriteSystem::new);

    let e1 = registry.create_entity();
    let e2 = registry.create_entity();
    let e3 = registry.create_entity();
    registry.add_component(e3, Sprite { width: 1, height: 1 });
    registry.add_component(e2, Position { x: 0.0, y: 0.0 });
    registry.add_component(e1, Sprite { width: 2, height: 2 });

    registry.update();
    assert_eq!(
        registry.get_system::<SpriteSystem>().system_entities(),
        vec![e1, e3]
    );
}

#[test]
fn entity_in_several_systems() {
    let mut registry = registry();
    registry.add_system_with(MovementSystem::new);
    registry.add_system_with(SpriteSystem::new);

    let e = registry.create_entity();
    registry
        .entity_mut(e)
        .add_component(Position { x: 0.0, y: 0.0 })
        .add_component(Velocity { vx: 1.0, vy: 1.0 })
        .add_component(Sprite { width: 32, height: 32 });
    registry.update();

    assert!(registry.get_system::<MovementSystem>().core().contains(e));
    assert!(registry.get_system::<SpriteSystem>().core().contains(e));

    registry.entity_mut(e).kill();
    registry.update();
    assert!(registry.get_system::<MovementSystem>().core().is_empty());
    assert!(registry.get_system::<SpriteSystem>().core().is_empty());
}

#[test]
fn spawning_during_a_frame_is_deferred() {
    let mut registry = registry();
    registry.add_system_with(SpriteSystem::new);
    let first = registry.create_entity();
    registry.add_component(first, Sprite { width: 1, height: 1 });
    registry.update();

    // Walk the snapshot while spawning more entities.
    let snapshot = registry.get_system::<SpriteSystem>().system_entities();
    for _ in &snapshot {
        let spawned = registry.create_entity();
        registry.add_component(spawned, Sprite { width: 4, height: 4 });
    }
    assert_eq!(
        registry.get_system::<SpriteSystem>().system_entities(),
        snapshot
    );

    registry.update();
    assert_eq!(registry.get_system::<SpriteSystem>().core().len(), 2);
}

#[test]
fn stale_data_survives_removal_but_is_hidden() {
    let mut registry = registry();
    let e = registry.create_entity();
    registry.add_component(e, Sprite { width: 8, height: 8 });
    registry.remove_component::<Sprite>(e);

    assert!(!registry.has_component::<Sprite>(e));
    assert!(matches!(
        registry.try_get_component::<Sprite>(e),
        Err(EcsError::MissingComponent { .. })
    ));
}

#[test]
fn replaced_system_instance_is_kept() {
    let mut registry = registry();
    assert!(registry.add_system_with(SpriteSystem::new));

    let e = registry.create_entity();
    registry.add_component(e, Sprite { width: 1, height: 1 });
    registry.update();

    // A second instance of the same kind is rejected; the populated one stays.
    assert!(!registry.add_system_with(SpriteSystem::new));
    assert_eq!(registry.get_system::<SpriteSystem>().system_entities(), vec![e]);

    let removed = registry.remove_system::<SpriteSystem>().unwrap();
    assert_eq!(removed.core().system_entities(), vec![e]);
    assert_eq!(registry.system_count(), 0);
}

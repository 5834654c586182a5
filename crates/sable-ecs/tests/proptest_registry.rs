//! Property tests for registry operations.
//!
//! Random sequences of entity/component/update operations are applied to a
//! registry and checked against a simple model after every step.

use proptest::prelude::*;
use sable_ecs::prelude::*;

#[derive(Debug, Clone, PartialEq)]
struct A(u32);

#[derive(Debug, Clone, PartialEq)]
struct B(u32);

struct NeedsA {
    core: SystemCore,
}

impl System for NeedsA {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

struct NeedsAB {
    core: SystemCore,
}

impl System for NeedsAB {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }
}

#[derive(Debug, Clone)]
enum Op {
    Create,
    AddA(usize, u32),
    AddB(usize, u32),
    RemoveA(usize),
    RemoveB(usize),
    Kill(usize),
    Update,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Create),
        (0..64usize, any::<u32>()).prop_map(|(i, v)| Op::AddA(i, v)),
        (0..64usize, any::<u32>()).prop_map(|(i, v)| Op::AddB(i, v)),
        (0..64usize).prop_map(Op::RemoveA),
        (0..64usize).prop_map(Op::RemoveB),
        (0..64usize).prop_map(Op::Kill),
        Just(Op::Update),
    ]
}

/// What the test believes about one entity.
#[derive(Debug, Clone, Default)]
struct Model {
    a: Option<u32>,
    b: Option<u32>,
    dead: bool,
}

fn setup() -> Registry {
    let mut registry = Registry::with_observer(NullObserver);
    registry.add_system_with(|components| {
        let mut core = SystemCore::new();
        core.require_component::<A>(components);
        NeedsA { core }
    });
    registry.add_system_with(|components| {
        let mut core = SystemCore::new();
        core.require_component::<B>(components);
        core.require_component::<A>(components);
        NeedsAB { core }
    });
    registry
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn membership_tracks_signatures_at_update(ops in prop::collection::vec(op_strategy(), 1..80)) {
        let mut registry = setup();
        let mut entities: Vec<Entity> = Vec::new();
        let mut model: Vec<Model> = Vec::new();

        for op in ops {
            let before_a = registry.get_system::<NeedsA>().system_entities();
            let before_ab = registry.get_system::<NeedsAB>().system_entities();

            match op {
                Op::Create => {
                    entities.push(registry.create_entity());
                    model.push(Model::default());
                }
                Op::AddA(i, v) if !entities.is_empty() => {
                    let i = i % entities.len();
                    registry.add_component(entities[i], A(v));
                    model[i].a = Some(v);
                }
                Op::AddB(i, v) if !entities.is_empty() => {
                    let i = i % entities.len();
                    registry.entity_mut(entities[i]).add_component(B(v));
                    model[i].b = Some(v);
                }
                Op::RemoveA(i) if !entities.is_empty() => {
                    let i = i % entities.len();
                    registry.remove_component::<A>(entities[i]);
                    model[i].a = None;
                }
                Op::RemoveB(i) if !entities.is_empty() => {
                    let i = i % entities.len();
                    registry.entity_mut(entities[i]).remove_component::<B>();
                    model[i].b = None;
                }
                Op::Kill(i) if !entities.is_empty() => {
                    let i = i % entities.len();
                    registry.kill_entity(entities[i]);
                    model[i].dead = true;
                }
                Op::Update => {
                    registry.update();
                }
                _ => {}
            }

            if matches!(op, Op::Update) {
                // After a flush, membership equals the signature match of
                // every entity that has not been killed.
                let expect_a: Vec<Entity> = entities
                    .iter()
                    .zip(&model)
                    .filter(|(_, m)| !m.dead && m.a.is_some())
                    .map(|(&e, _)| e)
                    .collect();
                let expect_ab: Vec<Entity> = entities
                    .iter()
                    .zip(&model)
                    .filter(|(_, m)| !m.dead && m.a.is_some() && m.b.is_some())
                    .map(|(&e, _)| e)
                    .collect();
                prop_assert_eq!(registry.get_system::<NeedsA>().system_entities(), expect_a);
                prop_assert_eq!(registry.get_system::<NeedsAB>().system_entities(), expect_ab);
            } else {
                // Outside of update, membership never moves.
                prop_assert_eq!(registry.get_system::<NeedsA>().system_entities(), before_a);
                prop_assert_eq!(registry.get_system::<NeedsAB>().system_entities(), before_ab);
            }

            // Component presence and values always follow the model.
            for (&e, m) in entities.iter().zip(&model) {
                prop_assert_eq!(registry.has_component::<A>(e), m.a.is_some());
                prop_assert_eq!(registry.has_component::<B>(e), m.b.is_some());
                if let Some(v) = m.a {
                    prop_assert_eq!(registry.get_component::<A>(e), &A(v));
                }
                if let Some(v) = m.b {
                    prop_assert_eq!(registry.get_component::<B>(e), &B(v));
                }
            }
            prop_assert_eq!(registry.entity_count(), entities.len());
        }
    }

    #[test]
    fn second_update_is_a_no_op(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let mut registry = setup();
        let mut entities: Vec<Entity> = Vec::new();

        for op in ops {
            match op {
                Op::Create => entities.push(registry.create_entity()),
                Op::AddA(i, v) if !entities.is_empty() => {
                    registry.add_component(entities[i % entities.len()], A(v));
                }
                Op::AddB(i, v) if !entities.is_empty() => {
                    registry.add_component(entities[i % entities.len()], B(v));
                }
                Op::Kill(i) if !entities.is_empty() => {
                    registry.kill_entity(entities[i % entities.len()]);
                }
                _ => {}
            }
        }

        registry.update();
        let a = registry.get_system::<NeedsA>().system_entities();
        let ab = registry.get_system::<NeedsAB>().system_entities();

        let report = registry.update();
        prop_assert!(report.is_empty());
        prop_assert_eq!(registry.get_system::<NeedsA>().system_entities(), a);
        prop_assert_eq!(registry.get_system::<NeedsAB>().system_entities(), ab);
    }
}

use behavior_tree::builder::{parallel, sequence};
use behavior_tree::{BehaviorTree, ParallelPolicy};
use combat_core::ai::{action, Action, TargetSelection};
use combat_core::status::EffectCategory;
use combat_core::{
    Affiliation, AreaOrigin, AttributeKind, CombatConfig, CombatEngine, CombatEntity, ControlKind,
    DamageKind, EntityId, EntityStore, Faction, Position, SkillId, SkillLibrary, SkillSchool,
    SkillTemplate, SkillUseError, StatusEffect, TargetMode, UseOutcome,
};

fn library() -> SkillLibrary {
    SkillLibrary::new()
        .with(
            SkillTemplate::builder("fireball", "Fireball")
                .school(SkillSchool::Magical)
                .cost(AttributeKind::Mana, 30.0)
                .cooldown(4.0)
                .cast_time(1.0)
                .range(8.0)
                .damage(DamageKind::Magical, 1.0)
                .build(),
        )
        .with(
            SkillTemplate::builder("nova", "Nova")
                .school(SkillSchool::Magical)
                .target(TargetMode::Area {
                    origin: AreaOrigin::Target,
                    affects: Affiliation::Enemy,
                })
                .range(5.0)
                .effect_range(3.0)
                .falloff(0.5, 0.5)
                .damage(DamageKind::Magical, 1.0)
                .build(),
        )
}

struct Arena {
    engine: CombatEngine,
    mage: EntityId,
    goblins: Vec<EntityId>,
}

fn arena(goblin_positions: &[f64]) -> Arena {
    let mut store = EntityStore::new();
    let mage = store.spawn(
        CombatEntity::new(EntityId(0), "mage", Faction::PLAYER)
            .with_resource(AttributeKind::Health, 100.0)
            .with_resource(AttributeKind::Mana, 50.0)
            .with_attribute(AttributeKind::MagicAttack, 40.0)
            .with_skill("fireball", 1)
            .with_skill("nova", 1),
    );
    let goblins = goblin_positions
        .iter()
        .map(|&x| {
            store.spawn(
                CombatEntity::new(EntityId(0), "goblin", Faction::ENEMY)
                    .with_position(Position::new(x, 0.0))
                    .with_resource(AttributeKind::Health, 100.0),
            )
        })
        .collect::<Vec<_>>();

    let mut engine = CombatEngine::new(Box::new(store), library(), CombatConfig::default());
    engine
        .start_combat(vec![vec![mage], goblins.clone()])
        .unwrap();
    Arena {
        engine,
        mage,
        goblins,
    }
}

#[test]
fn insufficient_mana_changes_nothing() {
    let mut arena = arena(&[2.0]);
    let fireball = SkillId::from("fireball");
    let goblin = arena.goblins[0];
    arena
        .engine
        .world_mut()
        .registry
        .get_mut(arena.mage)
        .unwrap()
        .attributes
        .set_base(AttributeKind::Mana, 10.0);

    let err = arena
        .engine
        .use_skill(arena.mage, &fireball, Some(goblin))
        .unwrap_err();

    assert_eq!(
        err,
        SkillUseError::InsufficientResource {
            kind: AttributeKind::Mana,
            required: 30.0,
            available: 10.0,
        }
    );
    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(10.0));
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(100.0));
    let mage = arena.engine.world().registry.get(arena.mage).unwrap();
    assert!(mage.skill(&fireball).unwrap().is_ready());
    assert!(!mage.is_casting());
}

#[test]
fn cast_completes_after_cast_time() {
    let mut arena = arena(&[2.0]);
    let fireball = SkillId::from("fireball");
    let goblin = arena.goblins[0];

    let outcome = arena
        .engine
        .use_skill(arena.mage, &fireball, Some(goblin))
        .unwrap();
    assert_eq!(outcome, UseOutcome::Casting { remaining: 1.0 });
    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(20.0));

    arena.engine.tick(0.5).unwrap();
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(100.0));

    arena.engine.tick(0.5).unwrap();
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(60.0));
    let mage = arena.engine.world().registry.get(arena.mage).unwrap();
    assert!(!mage.is_casting());
    assert!(mage.flags.acting_skill_id.is_none());
}

#[test]
fn interrupted_cast_refunds_costs_and_cooldown() {
    let mut arena = arena(&[2.0]);
    let fireball = SkillId::from("fireball");
    let goblin = arena.goblins[0];

    arena
        .engine
        .use_skill(arena.mage, &fireball, Some(goblin))
        .unwrap();
    assert!(arena.engine.interrupt_cast(arena.mage));

    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(50.0));
    let mage = arena.engine.world().registry.get(arena.mage).unwrap();
    assert!(mage.skill(&fireball).unwrap().is_ready());
    assert!(!mage.is_casting());

    arena.engine.tick(2.0).unwrap();
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(100.0));
}

#[test]
fn stun_breaks_cast_and_blocks_new_ones() {
    let mut arena = arena(&[2.0]);
    let fireball = SkillId::from("fireball");
    let goblin = arena.goblins[0];

    arena
        .engine
        .use_skill(arena.mage, &fireball, Some(goblin))
        .unwrap();
    let stun = StatusEffect::new("stun", "Stun", EffectCategory::Control(ControlKind::Stun))
        .with_duration(2.0);
    arena
        .engine
        .add_status_effect(arena.mage, stun, Some(goblin))
        .unwrap();

    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(50.0));
    assert_eq!(
        arena.engine.use_skill(arena.mage, &fireball, Some(goblin)),
        Err(SkillUseError::Controlled(ControlKind::Stun))
    );
}

#[test]
fn area_damage_falls_off_on_secondary_targets() {
    let mut arena = arena(&[1.0, 2.0, 10.0]);
    let (primary, secondary, far) = (arena.goblins[0], arena.goblins[1], arena.goblins[2]);

    let outcome = arena
        .engine
        .use_skill(arena.mage, &SkillId::from("nova"), Some(primary))
        .unwrap();

    let UseOutcome::Resolved(resolution) = outcome else {
        panic!("instant skill should resolve, got {outcome:?}");
    };
    assert_eq!(resolution.results.len(), 2);
    assert!(resolution.result_for(primary).unwrap().primary);
    assert_eq!(arena.engine.get_attribute(primary, AttributeKind::Health), Some(60.0));
    assert_eq!(arena.engine.get_attribute(secondary, AttributeKind::Health), Some(80.0));
    assert_eq!(arena.engine.get_attribute(far, AttributeKind::Health), Some(100.0));
}

#[test]
fn out_of_range_target_is_rejected() {
    let mut arena = arena(&[20.0]);
    let err = arena
        .engine
        .use_skill(arena.mage, &SkillId::from("fireball"), Some(arena.goblins[0]))
        .unwrap_err();
    assert!(matches!(err, SkillUseError::OutOfRange { range, .. } if range == 8.0));
    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(50.0));
}

fn give_tree(arena: &mut Arena, tree: BehaviorTree<combat_core::AiNode>) {
    arena
        .engine
        .world_mut()
        .registry
        .get_mut(arena.mage)
        .unwrap()
        .behavior = Some(tree);
}

#[test]
fn cast_abandoned_by_its_tree_is_cancelled() {
    let mut arena = arena(&[2.0]);
    let fireball = SkillId::from("fireball");
    let goblin = arena.goblins[0];
    give_tree(
        &mut arena,
        BehaviorTree::new(sequence(vec![
            action(Action::SelectTarget(TargetSelection::Nearest)),
            parallel(
                ParallelPolicy::RequireOne,
                ParallelPolicy::RequireOne,
                vec![action(Action::use_skill("fireball")), action(Action::wait(0.5))],
            ),
        ])),
    );

    arena.engine.tick(0.1).unwrap();
    let mage = arena.engine.world().registry.get(arena.mage).unwrap();
    assert!(mage.is_casting());
    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(20.0));

    // the wait finishes first and the parallel resets the running cast leaf
    arena.engine.tick(0.5).unwrap();
    let mage = arena.engine.world().registry.get(arena.mage).unwrap();
    assert!(!mage.is_casting());
    assert!(mage.skill(&fireball).unwrap().is_ready());
    assert_eq!(arena.engine.get_attribute(arena.mage, AttributeKind::Mana), Some(50.0));
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(100.0));
}

#[test]
fn manual_cast_survives_an_idle_tree() {
    let mut arena = arena(&[2.0]);
    let goblin = arena.goblins[0];
    give_tree(&mut arena, BehaviorTree::new(action(Action::wait(5.0))));

    arena
        .engine
        .use_skill(arena.mage, &SkillId::from("fireball"), Some(goblin))
        .unwrap();
    arena.engine.tick(0.5).unwrap();
    assert!(arena.engine.world().registry.get(arena.mage).unwrap().is_casting());

    arena.engine.tick(0.5).unwrap();
    assert_eq!(arena.engine.get_attribute(goblin, AttributeKind::Health), Some(60.0));
}

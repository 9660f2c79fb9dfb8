use combat_content::{Archetype, BehaviorKind, effects, skills, standard_library};
use combat_core::{
    ApplyOutcome, AttributeKind, CombatConfig, CombatEngine, CombatMode, CombatPhase, CombatResult,
    DamageKind, EffectId, EntityStore, Faction, Position, SkillId,
};
use strum::IntoEnumIterator;

#[test]
fn every_archetype_skill_is_in_the_library() {
    let library = standard_library();
    for archetype in Archetype::iter() {
        for skill in archetype.skills() {
            assert!(
                library.contains(&SkillId::from(*skill)),
                "{archetype} uses unknown skill {skill}"
            );
        }
    }
}

#[test]
fn archetypes_parse_from_snake_case() {
    assert_eq!("goblin_shaman".parse::<Archetype>().unwrap(), Archetype::GoblinShaman);
    assert_eq!("Warrior".parse::<Archetype>().unwrap(), Archetype::Warrior);
    assert_eq!("melee_brute".parse::<BehaviorKind>().unwrap(), BehaviorKind::MeleeBrute);
}

#[test]
fn built_entity_starts_full() {
    let mut orc = Archetype::Orc.build_ai("orc", Faction::ENEMY, Position::ORIGIN);
    assert!(orc.is_ai_controlled());
    assert_eq!(orc.attributes.get_value(AttributeKind::Health), 180.0);
    assert_eq!(orc.attributes.get_value(AttributeKind::MaxHealth), 180.0);
    assert_eq!(orc.attributes.get_value(AttributeKind::Experience), 60.0);
    assert!(orc.skill(&skills::STUN_BASH.into()).is_some());
}

#[test]
fn poison_preset_stacks_to_three() {
    let poison = effects::poison();
    assert_eq!(poison.max_stacks, 3);
    assert!(poison.is_periodic());
}

#[test]
fn ai_skirmish_reaches_a_result() {
    let mut store = EntityStore::new();
    let heroes = vec![
        store.spawn(Archetype::Warrior.build_ai("warrior", Faction::PLAYER, Position::new(0.0, 0.0))),
        store.spawn(Archetype::Mage.build_ai("mage", Faction::PLAYER, Position::new(-2.0, 0.0))),
    ];
    let enemies = vec![
        store.spawn(Archetype::Goblin.build_ai("goblin", Faction::ENEMY, Position::new(6.0, 0.0))),
        store.spawn(Archetype::Goblin.build_ai("goblin", Faction::ENEMY, Position::new(6.0, 2.0))),
    ];

    let config = CombatConfig::default().with_seed(7).with_mode(CombatMode::RealTime);
    let mut engine = CombatEngine::new(Box::new(store), standard_library(), config);
    engine.start_combat(vec![heroes, enemies]).unwrap();

    for _ in 0..2_000 {
        if engine.is_finished() {
            break;
        }
        engine.tick(0.1).unwrap();
    }

    assert!(engine.is_finished(), "stuck in {:?}", engine.current_phase());
    assert_eq!(engine.combat_result(), CombatResult::Victory);
    assert_eq!(engine.current_phase(), Some(CombatPhase::Victory));
}

#[test]
fn poison_ticks_through_the_engine_and_hits_stack_on_top() {
    let mut store = EntityStore::new();
    let warrior = store.spawn(Archetype::Warrior.build("warrior", Faction::PLAYER, Position::ORIGIN));
    let goblin = store.spawn(Archetype::Goblin.build("goblin", Faction::ENEMY, Position::new(1.0, 0.0)));

    let mut engine = CombatEngine::new(Box::new(store), standard_library(), CombatConfig::default());
    engine.start_combat(vec![vec![warrior], vec![goblin]]).unwrap();

    let outcome = engine
        .add_status_effect(goblin, effects::poison(), Some(warrior))
        .unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied);

    engine.tick(1.0).unwrap();
    engine.tick(1.0).unwrap();
    assert_eq!(engine.get_attribute(goblin, AttributeKind::Health), Some(55.0));

    let hit = engine
        .apply_hit(warrior, goblin, 10.0, DamageKind::True, false)
        .unwrap();
    assert_eq!(hit.health_damage, 10.0);
    assert_eq!(engine.get_attribute(goblin, AttributeKind::Health), Some(45.0));

    let poison = EffectId::from(effects::POISON);
    assert!(engine.remove_status_effect(goblin, &poison));
    assert!(!engine.remove_status_effect(goblin, &poison));
}

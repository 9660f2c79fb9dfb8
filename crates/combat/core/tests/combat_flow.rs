use combat_core::ai::{Action, TargetSelection, action};
use combat_core::machine::Rewards;
use behavior_tree::BehaviorTree;
use behavior_tree::builder::sequence;
use combat_core::{
    AttributeKind, CombatConfig, CombatEngine, CombatEntity, CombatEvent, CombatMode, CombatPhase,
    CombatResult, DamageKind, EntityId, EntityStore, Faction, Position, SkillId, SkillLibrary,
    SkillTemplate, SkillUseError, StateTransitionError, UseOutcome,
};

fn library() -> SkillLibrary {
    SkillLibrary::new().with(
        SkillTemplate::builder("basic_attack", "Basic Attack")
            .range(2.0)
            .damage(DamageKind::Physical, 1.0)
            .build(),
    )
}

fn brute() -> BehaviorTree<combat_core::AiNode> {
    BehaviorTree::new(sequence(vec![
        action(Action::SelectTarget(TargetSelection::Nearest)),
        action(Action::MoveToward { stop_range: 1.5 }),
        action(Action::use_skill("basic_attack")),
    ]))
}

struct Duel {
    engine: CombatEngine,
    hero: EntityId,
    goblin: EntityId,
}

fn duel(mode: CombatMode, goblin_ai: bool, goblin_x: f64) -> Duel {
    let mut store = EntityStore::new();
    let hero = store.spawn(
        CombatEntity::new(EntityId(0), "hero", Faction::PLAYER)
            .with_resource(AttributeKind::Health, 100.0)
            .with_attribute(AttributeKind::Attack, 20.0)
            .with_skill("basic_attack", 1),
    );
    let mut goblin = CombatEntity::new(EntityId(0), "goblin", Faction::ENEMY)
        .with_position(Position::new(goblin_x, 0.0))
        .with_resource(AttributeKind::Health, 100.0)
        .with_attribute(AttributeKind::Attack, 10.0)
        .with_attribute(AttributeKind::MoveSpeed, 2.0)
        .with_attribute(AttributeKind::Experience, 50.0)
        .with_attribute(AttributeKind::Gold, 12.0)
        .with_skill("basic_attack", 1);
    if goblin_ai {
        goblin = goblin.with_behavior(brute());
    }
    let goblin = store.spawn(goblin);

    let config = CombatConfig::default().with_mode(mode);
    let mut engine = CombatEngine::new(Box::new(store), library(), config);
    engine.start_combat(vec![vec![hero], vec![goblin]]).unwrap();
    Duel {
        engine,
        hero,
        goblin,
    }
}

#[test]
fn start_binds_participants() {
    let duel = duel(CombatMode::RealTime, false, 1.0);
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::BattleActive));
    let hero = duel.engine.world().registry.get(duel.hero).unwrap();
    assert!(hero.flags.in_combat);
    assert!(hero.flags.current_combat_id.is_some());
    assert_eq!(duel.engine.world().participants(), &[duel.hero, duel.goblin]);

    let phases: Vec<_> = duel.engine.phase_history().iter().map(|t| t.to).collect();
    assert_eq!(phases, vec![CombatPhase::BattleStart, CombatPhase::BattleActive]);
}

#[test]
fn hits_kill_and_end_in_victory() {
    let mut duel = duel(CombatMode::RealTime, false, 1.0);
    let attack = SkillId::from("basic_attack");

    let outcome = duel
        .engine
        .use_skill(duel.hero, &attack, Some(duel.goblin))
        .unwrap();
    assert!(matches!(outcome, UseOutcome::Resolved(ref r) if r.total_damage() == 20.0));
    assert_eq!(duel.engine.get_attribute(duel.goblin, AttributeKind::Health), Some(80.0));

    for _ in 0..4 {
        duel.engine
            .use_skill(duel.hero, &attack, Some(duel.goblin))
            .unwrap();
    }
    assert!(!duel.engine.world().registry.is_alive(duel.goblin));
    assert!(
        duel.engine
            .drain_events()
            .iter()
            .any(|e| matches!(e, CombatEvent::Died { entity, killer: Some(k) } if *entity == duel.goblin && *k == duel.hero))
    );

    duel.engine.tick(0.1).unwrap();
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::Victory));
    assert_eq!(duel.engine.combat_result(), CombatResult::Victory);
    assert!(
        duel.engine
            .phase_history()
            .iter()
            .any(|t| t.to == CombatPhase::BattleEnd)
    );

    let hero = duel.engine.world().registry.get(duel.hero).unwrap();
    assert!(!hero.flags.in_combat);
    assert_eq!(hero.attributes.peek(AttributeKind::Experience), 50.0);
    assert_eq!(hero.attributes.peek(AttributeKind::Gold), 12.0);

    let report = duel.engine.finish().unwrap();
    assert_eq!(report.result, CombatResult::Victory);
    assert_eq!(report.survivors, vec![duel.hero]);
    assert_eq!(
        report.rewards,
        Some(Rewards {
            recipients: vec![duel.hero],
            experience_each: 50.0,
            gold_each: 12.0,
        })
    );
    assert_eq!(duel.engine.current_phase(), None);
}

#[test]
fn pause_freezes_and_resume_restores() {
    let mut duel = duel(CombatMode::RealTime, false, 1.0);
    let clock = duel.engine.world().clock();

    duel.engine.pause().unwrap();
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::BattlePause));
    assert!(matches!(
        duel.engine.pause(),
        Err(StateTransitionError::InvalidTransition { from: CombatPhase::BattlePause, .. })
    ));
    assert_eq!(
        duel.engine
            .use_skill(duel.hero, &SkillId::from("basic_attack"), Some(duel.goblin)),
        Err(SkillUseError::OutOfTurn)
    );

    duel.engine.tick(1.0).unwrap();
    assert_eq!(duel.engine.world().clock(), clock);

    duel.engine.resume().unwrap();
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::BattleActive));
    assert!(duel.engine.context().unwrap().resume_phase.is_none());
}

#[test]
fn unknown_phase_leaves_engine_untouched() {
    let mut duel = duel(CombatMode::RealTime, false, 1.0);
    let history = duel.engine.phase_history().len();

    let err = duel
        .engine
        .transition_to(CombatPhase::Custom("cutscene"))
        .unwrap_err();

    assert_eq!(err, StateTransitionError::UnknownState(CombatPhase::Custom("cutscene")));
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::BattleActive));
    assert_eq!(duel.engine.phase_history().len(), history);
}

#[test]
fn start_rejects_single_roster_and_running_combat() {
    let mut duel = duel(CombatMode::RealTime, false, 1.0);
    assert_eq!(
        duel.engine.start_combat(vec![vec![duel.hero], vec![]]),
        Err(StateTransitionError::InvalidRosters { count: 1 })
    );
    assert!(matches!(
        duel.engine.start_combat(vec![vec![duel.hero], vec![duel.goblin]]),
        Err(StateTransitionError::InvalidTransition { .. })
    ));
}

#[test]
fn finishing_early_unwinds_participants() {
    let mut duel = duel(CombatMode::RealTime, false, 1.0);
    let report = duel.engine.finish().unwrap();

    assert_eq!(report.result, CombatResult::Unknown);
    assert_eq!(report.survivors, vec![duel.hero, duel.goblin]);
    let goblin = duel.engine.world().registry.get(duel.goblin).unwrap();
    assert!(!goblin.flags.in_combat);
    assert!(duel.engine.world().participants().is_empty());
    assert_eq!(duel.engine.tick(0.1), Err(StateTransitionError::NotStarted));
}

#[test]
fn ai_closes_distance_then_attacks() {
    let mut duel = duel(CombatMode::RealTime, true, 5.0);

    let mut ticks = 0;
    while duel.engine.get_attribute(duel.hero, AttributeKind::Health) == Some(100.0) {
        duel.engine.tick(0.5).unwrap();
        ticks += 1;
        assert!(ticks < 20, "goblin never reached the hero");
    }

    let goblin = duel.engine.world().registry.get(duel.goblin).unwrap();
    assert!(goblin.position.distance(&Position::ORIGIN) <= 1.5 + 1e-9);
    assert_eq!(goblin.ai_target, Some(duel.hero));
    assert_eq!(duel.engine.get_attribute(duel.hero, AttributeKind::Health), Some(90.0));
}

#[test]
fn turn_based_alternates_rosters() {
    let mut duel = duel(CombatMode::TurnBased, true, 1.0);
    let attack = SkillId::from("basic_attack");
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::PlayerTurn));

    assert_eq!(
        duel.engine.use_skill(duel.goblin, &attack, Some(duel.hero)),
        Err(SkillUseError::OutOfTurn)
    );
    duel.engine
        .use_skill(duel.hero, &attack, Some(duel.goblin))
        .unwrap();
    assert_eq!(
        duel.engine.use_skill(duel.hero, &attack, Some(duel.goblin)),
        Err(SkillUseError::OutOfTurn),
        "one action per turn"
    );

    duel.engine.tick(1.0).unwrap();
    assert_eq!(duel.engine.get_attribute(duel.goblin, AttributeKind::Health), Some(80.0));
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::PlayerTurn));

    duel.engine.tick(1.0).unwrap();
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::EnemyTurn));

    duel.engine.tick(1.0).unwrap();
    assert_eq!(duel.engine.get_attribute(duel.hero, AttributeKind::Health), Some(90.0));
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::PlayerTurn));

    let turns: Vec<_> = duel
        .engine
        .phase_history()
        .iter()
        .map(|t| t.to)
        .filter(|p| p.is_turn())
        .collect();
    assert_eq!(
        turns,
        vec![
            CombatPhase::PlayerTurn,
            CombatPhase::PlayerTurn,
            CombatPhase::EnemyTurn,
            CombatPhase::PlayerTurn,
        ]
    );
    assert_eq!(duel.engine.context().unwrap().turn_counter, 3);
}

#[test]
fn end_turn_hands_over_without_acting() {
    let mut duel = duel(CombatMode::TurnBased, true, 1.0);
    assert!(matches!(duel.engine.end_turn(), Ok(())));

    duel.engine.tick(1.0).unwrap();
    assert_eq!(duel.engine.current_phase(), Some(CombatPhase::EnemyTurn));
    assert_eq!(duel.engine.get_attribute(duel.goblin, AttributeKind::Health), Some(100.0));
}

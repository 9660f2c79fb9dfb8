//! Behavior tree templates for AI-controlled archetypes.
//!
//! Trees are rebuilt on every call so each entity owns its progress.

use behavior_tree::builder::{always_succeed, inverter, parallel, selector, sequence};
use behavior_tree::{BehaviorNode, BehaviorTree, ParallelPolicy};
use combat_core::ai::{
    Action, AiNode, Comparison, Condition, EffectMatcher, Subject, TargetSelection, action,
    condition,
};

use crate::effects;
use crate::skills;

/// Stock AI personalities.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BehaviorKind {
    MeleeBrute,
    Caster,
    Healer,
    Skirmisher,
}

impl BehaviorKind {
    pub fn tree(self) -> BehaviorTree<AiNode> {
        BehaviorTree::new(match self {
            Self::MeleeBrute => melee_brute(),
            Self::Caster => caster(),
            Self::Healer => healer(),
            Self::Skirmisher => skirmisher(),
        })
    }
}

fn ready_then_use(skill: &str) -> BehaviorNode<AiNode> {
    sequence(vec![
        condition(Condition::SkillReady(skill.into())),
        action(Action::use_skill(skill)),
    ])
}

fn engage(stop_range: f64) -> BehaviorNode<AiNode> {
    action(Action::MoveToward { stop_range })
}

/// Closes in on the nearest enemy; bashes when it can, swings otherwise.
pub fn melee_brute() -> BehaviorNode<AiNode> {
    sequence(vec![
        action(Action::SelectTarget(TargetSelection::Nearest)),
        engage(1.5),
        selector(vec![
            ready_then_use(skills::STUN_BASH),
            ready_then_use(skills::BASIC_ATTACK),
            action(Action::wait(0.5)),
        ]),
    ])
}

/// Keeps its distance and burns the weakest enemy, falling back to melee
/// when out of mana.
pub fn caster() -> BehaviorNode<AiNode> {
    sequence(vec![
        action(Action::SelectTarget(TargetSelection::LowestHealth)),
        selector(vec![
            sequence(vec![
                inverter(condition(Condition::HasEffect {
                    subject: Subject::Target,
                    matcher: EffectMatcher::Exact(effects::BURN.into()),
                })),
                condition(Condition::TargetDistance {
                    comparison: Comparison::AtMost,
                    distance: 8.0,
                }),
                ready_then_use(skills::FIREBALL),
            ]),
            sequence(vec![engage(1.5), ready_then_use(skills::BASIC_ATTACK)]),
        ]),
    ])
}

/// Mends itself when hurt, otherwise hexes and pokes.
pub fn healer() -> BehaviorNode<AiNode> {
    selector(vec![
        sequence(vec![
            condition(Condition::HealthRatio {
                comparison: Comparison::Below,
                threshold: 0.5,
            }),
            inverter(condition(Condition::HasEffect {
                subject: Subject::Itself,
                matcher: EffectMatcher::Exact(effects::REGENERATION.into()),
            })),
            ready_then_use(skills::MEND),
        ]),
        sequence(vec![
            action(Action::SelectTarget(TargetSelection::Nearest)),
            always_succeed(sequence(vec![
                inverter(condition(Condition::HasEffect {
                    subject: Subject::Target,
                    matcher: EffectMatcher::Prefix("control".into()),
                })),
                condition(Condition::TargetDistance {
                    comparison: Comparison::AtMost,
                    distance: 6.0,
                }),
                ready_then_use(skills::HEX),
            ])),
            engage(1.5),
            ready_then_use(skills::BASIC_ATTACK),
        ]),
    ])
}

/// Poisons while closing in, then keeps striking.
pub fn skirmisher() -> BehaviorNode<AiNode> {
    sequence(vec![
        action(Action::SelectTarget(TargetSelection::LowestHealth)),
        parallel(
            ParallelPolicy::RequireOne,
            ParallelPolicy::RequireAll,
            vec![
                engage(1.5),
                sequence(vec![
                    condition(Condition::TargetDistance {
                        comparison: Comparison::AtMost,
                        distance: 2.0,
                    }),
                    ready_then_use(skills::POISON_STRIKE),
                ]),
            ],
        ),
        selector(vec![
            ready_then_use(skills::POISON_STRIKE),
            ready_then_use(skills::BASIC_ATTACK),
            action(Action::wait(0.5)),
        ]),
    ])
}

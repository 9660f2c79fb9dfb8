//! Combat leaves for the generic behavior-tree engine.
//!
//! Trees are built from [`behavior_tree`] composites with [`AiNode`] leaves
//! and ticked against an [`AiContext`]. Conditions are pure reads; actions
//! keep their own progress and may call back into the world (`use_skill`,
//! movement, targeting).

mod actions;
mod conditions;
mod context;

pub use actions::{Action, TargetSelection};
pub use conditions::{Comparison, Condition, EffectMatcher, Subject};
pub use context::AiContext;

use behavior_tree::{Behavior, BehaviorNode, Status, builder};

use crate::types::SkillId;

#[derive(Clone, Debug, PartialEq)]
pub enum AiNode {
    Condition(Condition),
    Action(Action),
}

impl AiNode {
    /// Returns `true` for a `UseSkill` leaf waiting on a cast of `skill`.
    pub fn tracks_cast(&self, skill: &SkillId) -> bool {
        matches!(self, AiNode::Action(action) if action.tracks_cast(skill))
    }
}

impl<'w> Behavior<AiContext<'w>> for AiNode {
    fn tick(&mut self, ctx: &mut AiContext<'w>) -> Status {
        match self {
            AiNode::Condition(condition) => Status::from_bool(condition.evaluate(ctx)),
            AiNode::Action(action) => action.tick(ctx),
        }
    }

    fn reset(&mut self) {
        if let AiNode::Action(action) = self {
            action.reset();
        }
    }
}

/// Leaf node checking `condition`.
pub fn condition(condition: Condition) -> BehaviorNode<AiNode> {
    builder::leaf(AiNode::Condition(condition))
}

/// Leaf node running `action`.
pub fn action(action: Action) -> BehaviorNode<AiNode> {
    builder::leaf(AiNode::Action(action))
}

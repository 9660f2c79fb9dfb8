use arrayvec::ArrayVec;

use crate::combat::HitReport;
use crate::config::CombatConfig;
use crate::skill::SkillCost;
use crate::status::ApplyOutcome;
use crate::types::{EntityId, Position, SkillId, Tick};

/// Everything a committed skill use needs to resolve or roll back.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastCommitment {
    pub caster: EntityId,
    pub skill: SkillId,
    pub target: Option<EntityId>,
    pub level: u32,
    /// Costs actually deducted, refunded on rollback.
    pub paid: ArrayVec<SkillCost, { CombatConfig::MAX_COST_ENTRIES }>,
    pub committed_at: Tick,
}

/// A cast in flight on its caster.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveCast {
    pub commitment: CastCommitment,
    pub remaining: f64,
    pub interruptible: bool,
}

impl ActiveCast {
    pub fn is_complete(&self) -> bool {
        self.remaining <= behavior_tree::TIME_EPSILON
    }
}

/// Targets gathered for one resolution, in stable roster order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetSet {
    pub origin: Position,
    pub primary: Option<EntityId>,
    pub targets: Vec<EntityId>,
}

impl TargetSet {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_primary(&self, id: EntityId) -> bool {
        self.primary == Some(id)
    }
}

/// What one skill did to one target.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetResult {
    pub target: EntityId,
    pub primary: bool,
    pub hits: Vec<HitReport>,
    pub healed: f64,
    pub statuses: Vec<ApplyOutcome>,
}

impl TargetResult {
    pub fn damage(&self) -> f64 {
        self.hits.iter().map(|h| h.absorbed + h.health_damage).sum()
    }

    pub fn killed(&self) -> bool {
        self.hits.iter().any(|h| h.killed)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillResolution {
    pub caster: EntityId,
    pub skill: SkillId,
    pub resolved_at: Tick,
    pub results: Vec<TargetResult>,
}

impl SkillResolution {
    pub fn result_for(&self, target: EntityId) -> Option<&TargetResult> {
        self.results.iter().find(|r| r.target == target)
    }

    pub fn total_damage(&self) -> f64 {
        self.results.iter().map(TargetResult::damage).sum()
    }
}

/// Result of a successful `use_skill` request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UseOutcome {
    /// Instant skill, fully applied.
    Resolved(SkillResolution),
    /// Committed; resolves when the cast completes.
    Casting { remaining: f64 },
    /// Committed, but nobody was in the area.
    Whiffed,
}

/// How an in-flight cast ended.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastOutcome {
    Resolved(SkillResolution),
    Whiffed { caster: EntityId, skill: SkillId },
    /// Targets vanished under an `Abort` policy; costs and cooldown refunded.
    Aborted { caster: EntityId, skill: SkillId },
}

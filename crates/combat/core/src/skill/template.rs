use arrayvec::ArrayVec;

use crate::attributes::AttributeKind;
use crate::combat::DamageKind;
use crate::config::CombatConfig;
use crate::status::StatusEffect;
use crate::types::{Faction, SkillId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkillSchool {
    /// Blocked by disarm.
    #[default]
    Physical,
    /// Blocked by silence.
    Magical,
    /// Blocked only by stun.
    Utility,
}

/// Which side a target must be on relative to the caster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affiliation {
    #[default]
    Enemy,
    /// Same faction, the caster included.
    Ally,
    Any,
}

impl Affiliation {
    pub fn accepts(self, caster: Faction, target: Faction) -> bool {
        match self {
            Self::Enemy => caster != target,
            Self::Ally => caster == target,
            Self::Any => true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AreaOrigin {
    #[default]
    Caster,
    /// Centered on the explicit target, which must be within `range`.
    Target,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetMode {
    SelfOnly,
    SingleTarget(Affiliation),
    Area { origin: AreaOrigin, affects: Affiliation },
    /// Every living enemy participant, regardless of distance.
    AllEnemies,
    /// Every living allied participant, regardless of distance.
    AllAllies,
}

impl TargetMode {
    pub fn affiliation(&self) -> Affiliation {
        match self {
            Self::SelfOnly | Self::AllAllies => Affiliation::Ally,
            Self::SingleTarget(affiliation) => *affiliation,
            Self::Area { affects, .. } => *affects,
            Self::AllEnemies => Affiliation::Enemy,
        }
    }

    /// Whether resolution needs an explicit target id.
    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            Self::SingleTarget(_)
                | Self::Area {
                    origin: AreaOrigin::Target,
                    ..
                }
        )
    }

    /// Default handling of an empty target set for this kind of targeting.
    pub fn default_empty_policy(&self) -> EmptyTargetPolicy {
        match self {
            Self::Area { .. } => EmptyTargetPolicy::Consume,
            _ => EmptyTargetPolicy::Abort,
        }
    }
}

/// What happens when resolution finds nobody to affect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmptyTargetPolicy {
    /// Refuse before committing; refund if targets vanish mid-cast.
    Abort,
    /// Spend costs and cooldown anyway and report a whiff.
    Consume,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillEffect {
    Damage { kind: DamageKind, coefficient: f64 },
    /// Scales with the caster's `MagicAttack`.
    Heal { coefficient: f64 },
    ApplyStatus { effect: StatusEffect, chance: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelScaling {
    /// Fractional increase per level above 1.
    pub per_level: f64,
}

impl LevelScaling {
    pub const DEFAULT_PER_LEVEL: f64 = 0.2;
}

impl Default for LevelScaling {
    fn default() -> Self {
        Self {
            per_level: Self::DEFAULT_PER_LEVEL,
        }
    }
}

/// Reduced potency for targets other than the primary one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaFalloff {
    pub secondary_damage_multiplier: f64,
    pub secondary_control_chance: f64,
}

impl Default for AreaFalloff {
    fn default() -> Self {
        Self {
            secondary_damage_multiplier: 1.0,
            secondary_control_chance: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCost {
    pub kind: AttributeKind,
    pub amount: f64,
}

/// Presentation hooks fired when a skill commits and when it lands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillCues {
    pub cast_animation: Option<String>,
    pub cast_sfx: Option<String>,
    pub impact_vfx: Option<String>,
    pub impact_sfx: Option<String>,
}

/// Shared, read-only definition of a skill.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillTemplate {
    pub id: SkillId,
    pub name: String,
    pub school: SkillSchool,
    /// Seconds.
    pub cooldown: f64,
    /// Seconds; zero resolves immediately.
    pub cast_time: f64,
    pub interruptible: bool,
    pub costs: ArrayVec<SkillCost, { CombatConfig::MAX_COST_ENTRIES }>,
    pub target: TargetMode,
    /// Maximum caster-to-target distance for explicit targets.
    pub range: f64,
    /// Radius around the area origin.
    pub effect_range: f64,
    pub effects: Vec<SkillEffect>,
    pub scaling: LevelScaling,
    pub falloff: AreaFalloff,
    /// Overrides [`TargetMode::default_empty_policy`].
    pub empty_targets: Option<EmptyTargetPolicy>,
    pub cues: SkillCues,
    pub max_level: u32,
}

impl SkillTemplate {
    pub fn builder(id: impl Into<SkillId>, name: impl Into<String>) -> SkillTemplateBuilder {
        SkillTemplateBuilder::new(id.into(), name.into())
    }

    pub fn empty_target_policy(&self) -> EmptyTargetPolicy {
        self.empty_targets
            .unwrap_or_else(|| self.target.default_empty_policy())
    }

    pub fn cost(&self, kind: AttributeKind) -> f64 {
        self.costs
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.amount)
            .sum()
    }
}

/// Builder for [`SkillTemplate`]. Defaults describe an instant, melee-range
/// physical strike on an enemy with no costs and no effects.
#[derive(Clone, Debug)]
pub struct SkillTemplateBuilder {
    template: SkillTemplate,
}

impl SkillTemplateBuilder {
    fn new(id: SkillId, name: String) -> Self {
        Self {
            template: SkillTemplate {
                id,
                name,
                school: SkillSchool::Physical,
                cooldown: 0.0,
                cast_time: 0.0,
                interruptible: true,
                costs: ArrayVec::new(),
                target: TargetMode::SingleTarget(Affiliation::Enemy),
                range: 2.0,
                effect_range: 0.0,
                effects: Vec::new(),
                scaling: LevelScaling::default(),
                falloff: AreaFalloff::default(),
                empty_targets: None,
                cues: SkillCues::default(),
                max_level: 10,
            },
        }
    }

    pub fn school(mut self, school: SkillSchool) -> Self {
        self.template.school = school;
        self
    }

    pub fn cooldown(mut self, seconds: f64) -> Self {
        self.template.cooldown = seconds;
        self
    }

    pub fn cast_time(mut self, seconds: f64) -> Self {
        self.template.cast_time = seconds;
        self
    }

    pub fn interruptible(mut self, interruptible: bool) -> Self {
        self.template.interruptible = interruptible;
        self
    }

    /// Adds a resource cost. Costs beyond `MAX_COST_ENTRIES` are dropped.
    pub fn cost(mut self, kind: AttributeKind, amount: f64) -> Self {
        if self.template.costs.try_push(SkillCost { kind, amount }).is_err() {
            tracing::warn!(skill = %self.template.id, %kind, "cost table full, cost dropped");
        }
        self
    }

    pub fn target(mut self, target: TargetMode) -> Self {
        self.template.target = target;
        self
    }

    pub fn range(mut self, range: f64) -> Self {
        self.template.range = range;
        self
    }

    pub fn effect_range(mut self, effect_range: f64) -> Self {
        self.template.effect_range = effect_range;
        self
    }

    pub fn effect(mut self, effect: SkillEffect) -> Self {
        self.template.effects.push(effect);
        self
    }

    pub fn damage(self, kind: DamageKind, coefficient: f64) -> Self {
        self.effect(SkillEffect::Damage { kind, coefficient })
    }

    pub fn heal(self, coefficient: f64) -> Self {
        self.effect(SkillEffect::Heal { coefficient })
    }

    pub fn apply_status(self, effect: StatusEffect, chance: f64) -> Self {
        self.effect(SkillEffect::ApplyStatus { effect, chance })
    }

    pub fn scaling(mut self, per_level: f64) -> Self {
        self.template.scaling = LevelScaling { per_level };
        self
    }

    pub fn falloff(mut self, secondary_damage_multiplier: f64, secondary_control_chance: f64) -> Self {
        self.template.falloff = AreaFalloff {
            secondary_damage_multiplier,
            secondary_control_chance,
        };
        self
    }

    pub fn empty_targets(mut self, policy: EmptyTargetPolicy) -> Self {
        self.template.empty_targets = Some(policy);
        self
    }

    pub fn cues(mut self, cues: SkillCues) -> Self {
        self.template.cues = cues;
        self
    }

    pub fn max_level(mut self, max_level: u32) -> Self {
        self.template.max_level = max_level.max(1);
        self
    }

    pub fn build(self) -> SkillTemplate {
        self.template
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_policy_defaults_by_targeting() {
        let single = SkillTemplate::builder("strike", "Strike").build();
        let area = SkillTemplate::builder("nova", "Nova")
            .target(TargetMode::Area {
                origin: AreaOrigin::Caster,
                affects: Affiliation::Enemy,
            })
            .build();
        let forced = SkillTemplate::builder("nova2", "Nova")
            .target(TargetMode::AllEnemies)
            .empty_targets(EmptyTargetPolicy::Consume)
            .build();

        assert_eq!(single.empty_target_policy(), EmptyTargetPolicy::Abort);
        assert_eq!(area.empty_target_policy(), EmptyTargetPolicy::Consume);
        assert_eq!(forced.empty_target_policy(), EmptyTargetPolicy::Consume);
    }

    #[test]
    fn cost_table_is_bounded() {
        let mut builder = SkillTemplate::builder("greedy", "Greedy");
        for _ in 0..CombatConfig::MAX_COST_ENTRIES + 2 {
            builder = builder.cost(AttributeKind::Mana, 1.0);
        }
        let template = builder.build();
        assert_eq!(template.costs.len(), CombatConfig::MAX_COST_ENTRIES);
        assert_eq!(template.cost(AttributeKind::Mana), CombatConfig::MAX_COST_ENTRIES as f64);
    }

    #[test]
    fn affiliation_rules() {
        assert!(Affiliation::Enemy.accepts(Faction(0), Faction(1)));
        assert!(!Affiliation::Enemy.accepts(Faction(0), Faction(0)));
        assert!(Affiliation::Ally.accepts(Faction(2), Faction(2)));
        assert!(Affiliation::Any.accepts(Faction(0), Faction(1)));
    }
}

use crate::ai::AiContext;
use crate::attributes::AttributeKind;
use crate::skill::can_use;
use crate::types::{EffectId, SkillId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Comparison {
    Below,
    AtMost,
    Above,
    AtLeast,
}

impl Comparison {
    pub fn test(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Below => value < threshold,
            Self::AtMost => value <= threshold,
            Self::Above => value > threshold,
            Self::AtLeast => value >= threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subject {
    Itself,
    Target,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectMatcher {
    Exact(EffectId),
    /// Matches an effect family such as `"poison"` for `"poison.weak"`.
    Prefix(String),
}

/// Pure predicates; evaluating one never mutates the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Condition {
    /// `Health / MaxHealth` of the acting entity.
    HealthRatio { comparison: Comparison, threshold: f64 },
    /// Distance to the current target; false without a target.
    TargetDistance { comparison: Comparison, distance: f64 },
    HasEffect { subject: Subject, matcher: EffectMatcher },
    /// The skill passes the validation gate right now.
    SkillReady(SkillId),
    HasTarget,
}

impl Condition {
    pub fn evaluate(&self, ctx: &AiContext<'_>) -> bool {
        let Some(me) = ctx.me() else {
            return false;
        };
        match self {
            Self::HealthRatio {
                comparison,
                threshold,
            } => comparison.test(me.attributes.ratio(AttributeKind::Health), *threshold),
            Self::TargetDistance {
                comparison,
                distance,
            } => ctx
                .target()
                .is_some_and(|t| comparison.test(me.position.distance(&t.position), *distance)),
            Self::HasEffect { subject, matcher } => {
                let subject = match subject {
                    Subject::Itself => Some(me),
                    Subject::Target => ctx.target(),
                };
                subject.is_some_and(|e| match matcher {
                    EffectMatcher::Exact(id) => e.effects.has(id),
                    EffectMatcher::Prefix(prefix) => e.effects.has_prefix(prefix),
                })
            }
            Self::SkillReady(skill) => {
                let (Some(instance), Some(template)) = (me.skill(skill), ctx.world.skills.get(skill))
                else {
                    return false;
                };
                can_use(me, instance, &template).is_ok()
            }
            Self::HasTarget => ctx.target().is_some(),
        }
    }
}

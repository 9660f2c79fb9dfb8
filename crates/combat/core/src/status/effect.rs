use crate::attributes::{AttributeKind, ModifierKind};
use crate::combat::DamageKind;
use crate::status::ControlKind;
use crate::types::{EffectId, EntityId, ModifierId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Polarity {
    /// Buffs and heals.
    Positive,
    /// Debuffs, damage and control.
    #[default]
    Negative,
}

/// What an effect does besides carrying modifiers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectCategory {
    /// Only the bundled modifiers.
    AttributeModifier,
    /// `magnitude × stacks` damage every `interval` seconds.
    DamageOverTime { interval: f64, damage_kind: DamageKind },
    /// `magnitude × stacks` healing every `interval` seconds.
    HealOverTime { interval: f64 },
    Control(ControlKind),
    /// Game-defined tag; behaves like `AttributeModifier`.
    Custom(String),
}

impl EffectCategory {
    pub fn interval(&self) -> Option<f64> {
        match self {
            Self::DamageOverTime { interval, .. } | Self::HealOverTime { interval } => {
                Some(*interval)
            }
            _ => None,
        }
    }

    pub fn control(&self) -> Option<ControlKind> {
        match self {
            Self::Control(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    /// Seconds.
    Finite(f64),
    Infinite,
}

impl EffectDuration {
    pub fn seconds(&self) -> f64 {
        match self {
            Self::Finite(seconds) => *seconds,
            Self::Infinite => f64::INFINITY,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Self::Infinite)
    }
}

/// How a second application of the same effect id is resolved.
///
/// The policy of the effect already present decides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StackPolicy {
    /// Remove the old instance and apply the new one.
    #[default]
    None,
    /// Add a stack up to `max_stacks`.
    Stack,
    /// Extend the remaining time to the longer of both.
    Refresh,
    /// Keep whichever has the larger magnitude; ties keep the existing one.
    TakeStrongest,
    /// Always replace.
    TakeMostRecent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPhase {
    #[default]
    Applying,
    Active,
    Ticking,
    Expiring,
    Removed,
}

/// Attribute modifier bundled with an effect. `value` is the contribution
/// of one stack.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierTemplate {
    pub attribute: AttributeKind,
    pub kind: ModifierKind,
    pub value: f64,
}

impl ModifierTemplate {
    pub fn flat(attribute: AttributeKind, value: f64) -> Self {
        Self {
            attribute,
            kind: ModifierKind::Flat,
            value,
        }
    }

    pub fn percent(attribute: AttributeKind, value: f64) -> Self {
        Self {
            attribute,
            kind: ModifierKind::Percent,
            value,
        }
    }

    pub fn multiplier(attribute: AttributeKind, value: f64) -> Self {
        Self {
            attribute,
            kind: ModifierKind::Final,
            value,
        }
    }
}

/// One ledger entry: the modifier an effect currently has installed and the
/// running total it carries.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppliedModifier {
    pub id: ModifierId,
    pub attribute: AttributeKind,
    pub kind: ModifierKind,
    pub total: f64,
}

impl AppliedModifier {
    /// Folds one more stack of `per_stack` into the running total.
    pub(crate) fn accumulate(&mut self, per_stack: f64) {
        match self.kind {
            ModifierKind::Flat | ModifierKind::Percent => self.total += per_stack,
            ModifierKind::Final => self.total *= per_stack,
        }
    }
}

/// A temporary effect living on one entity.
///
/// Built as a template (usually by content presets) and cloned on every
/// application; the container fills in the instance fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub effect_id: EffectId,
    pub name: String,
    pub category: EffectCategory,
    pub polarity: Polarity,
    pub duration: EffectDuration,
    pub remaining: f64,
    pub stack_policy: StackPolicy,
    pub stacks: u32,
    pub max_stacks: u32,
    pub magnitude: f64,
    pub base_magnitude: f64,
    pub bonus_per_extra_stack: f64,
    pub modifiers: Vec<ModifierTemplate>,
    /// Run the first periodic tick immediately on application.
    pub tick_on_apply: bool,
    pub next_tick_in: f64,
    pub phase: EffectPhase,
    pub source: Option<EntityId>,
    pub(crate) instance: u32,
    pub(crate) applied: Vec<AppliedModifier>,
}

impl StatusEffect {
    pub fn new(effect_id: impl Into<EffectId>, name: impl Into<String>, category: EffectCategory) -> Self {
        let polarity = match category {
            EffectCategory::HealOverTime { .. } => Polarity::Positive,
            _ => Polarity::Negative,
        };
        let next_tick_in = category.interval().unwrap_or(0.0);
        Self {
            effect_id: effect_id.into(),
            name: name.into(),
            category,
            polarity,
            duration: EffectDuration::Finite(0.0),
            remaining: 0.0,
            stack_policy: StackPolicy::None,
            stacks: 1,
            max_stacks: 1,
            magnitude: 0.0,
            base_magnitude: 0.0,
            bonus_per_extra_stack: 0.0,
            modifiers: Vec::new(),
            tick_on_apply: false,
            next_tick_in,
            phase: EffectPhase::Applying,
            source: None,
            instance: 0,
            applied: Vec::new(),
        }
    }

    pub fn with_polarity(mut self, polarity: Polarity) -> Self {
        self.polarity = polarity;
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = EffectDuration::Finite(seconds);
        self.remaining = seconds;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.duration = EffectDuration::Infinite;
        self.remaining = f64::INFINITY;
        self
    }

    pub fn with_stacking(mut self, policy: StackPolicy, max_stacks: u32) -> Self {
        self.stack_policy = policy;
        self.max_stacks = max_stacks.max(1);
        self
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.base_magnitude = magnitude;
        self.magnitude = magnitude;
        self
    }

    pub fn with_bonus_per_extra_stack(mut self, bonus: f64) -> Self {
        self.bonus_per_extra_stack = bonus;
        self
    }

    pub fn with_modifier(mut self, modifier: ModifierTemplate) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_tick_on_apply(mut self) -> Self {
        self.tick_on_apply = true;
        self
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn is_periodic(&self) -> bool {
        self.category.interval().is_some()
    }

    pub fn is_expired(&self) -> bool {
        !self.duration.is_infinite() && self.remaining <= behavior_tree::TIME_EPSILON
    }

    /// Modifiers this effect currently has installed on its owner.
    pub fn applied(&self) -> &[AppliedModifier] {
        &self.applied
    }

    pub(crate) fn modifier_source(&self) -> String {
        format!("effect:{}#{}", self.effect_id, self.instance)
    }

    pub(crate) fn modifier_id(&self, index: usize) -> ModifierId {
        ModifierId::new(format!("{}/{index}", self.modifier_source()))
    }

    /// `base_magnitude + bonus_per_extra_stack × (stacks - 1)`.
    pub(crate) fn rederive_magnitude(&mut self) {
        self.magnitude =
            self.base_magnitude + self.bonus_per_extra_stack * f64::from(self.stacks - 1);
    }

    /// Amount one periodic tick delivers.
    pub fn tick_amount(&self) -> f64 {
        self.magnitude * f64::from(self.stacks)
    }
}

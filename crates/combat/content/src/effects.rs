//! Status effect templates. Each call returns a fresh template the core
//! clones on application.

use combat_core::status::{EffectCategory, ModifierTemplate, Polarity, StackPolicy, StatusEffect};
use combat_core::{AttributeKind, ControlKind, DamageKind};

pub const POISON: &str = "poison.weak";
pub const BURN: &str = "burn";
pub const REGENERATION: &str = "regeneration";
pub const STUN: &str = "control.stun";
pub const SILENCE: &str = "control.silence";
pub const SLOW: &str = "slow";
pub const WAR_CRY: &str = "war_cry";
pub const SHIELD_WALL: &str = "shield_wall";

/// 5 damage every 2s for 6s, stacking up to three times.
pub fn poison() -> StatusEffect {
    StatusEffect::new(
        POISON,
        "Weak Poison",
        EffectCategory::DamageOverTime {
            interval: 2.0,
            damage_kind: DamageKind::True,
        },
    )
    .with_duration(6.0)
    .with_magnitude(5.0)
    .with_stacking(StackPolicy::Stack, 3)
}

pub fn burn() -> StatusEffect {
    StatusEffect::new(
        BURN,
        "Burn",
        EffectCategory::DamageOverTime {
            interval: 1.0,
            damage_kind: DamageKind::Magical,
        },
    )
    .with_duration(4.0)
    .with_magnitude(4.0)
    .with_stacking(StackPolicy::Refresh, 1)
}

pub fn regeneration() -> StatusEffect {
    StatusEffect::new(REGENERATION, "Regeneration", EffectCategory::HealOverTime { interval: 1.0 })
        .with_duration(5.0)
        .with_magnitude(6.0)
        .with_stacking(StackPolicy::TakeStrongest, 1)
        .with_tick_on_apply()
}

pub fn stun(seconds: f64) -> StatusEffect {
    StatusEffect::new(STUN, "Stun", EffectCategory::Control(ControlKind::Stun))
        .with_duration(seconds)
        .with_stacking(StackPolicy::Refresh, 1)
}

pub fn silence(seconds: f64) -> StatusEffect {
    StatusEffect::new(SILENCE, "Silence", EffectCategory::Control(ControlKind::Silence))
        .with_duration(seconds)
        .with_stacking(StackPolicy::Refresh, 1)
}

/// Halves movement speed.
pub fn slow() -> StatusEffect {
    StatusEffect::new(SLOW, "Slow", EffectCategory::AttributeModifier)
        .with_duration(3.0)
        .with_stacking(StackPolicy::Refresh, 1)
        .with_modifier(ModifierTemplate::percent(AttributeKind::MoveSpeed, -0.5))
}

/// +25% attack per stack, two stacks at most.
pub fn war_cry() -> StatusEffect {
    StatusEffect::new(WAR_CRY, "War Cry", EffectCategory::AttributeModifier)
        .with_polarity(Polarity::Positive)
        .with_duration(10.0)
        .with_stacking(StackPolicy::Stack, 2)
        .with_modifier(ModifierTemplate::percent(AttributeKind::Attack, 0.25))
}

pub fn shield_wall() -> StatusEffect {
    StatusEffect::new(SHIELD_WALL, "Shield Wall", EffectCategory::AttributeModifier)
        .with_polarity(Polarity::Positive)
        .with_duration(5.0)
        .with_stacking(StackPolicy::TakeStrongest, 1)
        .with_magnitude(30.0)
        .with_modifier(ModifierTemplate::flat(AttributeKind::Defense, 30.0))
}

use crate::attributes::{AttributeKind, AttributeSet};
use crate::combat::damage::{DamageKind, critical_amount, mitigate};
use crate::config::CombatConfig;
use crate::types::EntityId;

/// What one damage application did to its target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitReport {
    pub target: EntityId,
    pub kind: DamageKind,
    pub is_critical: bool,
    /// Amount after mitigation and crit, before shields.
    pub amount: f64,
    pub absorbed: f64,
    /// Health actually lost; overkill is not subtracted.
    pub health_damage: f64,
    pub remaining_health: f64,
    /// True if this hit took the target from positive health to zero or below.
    pub killed: bool,
}

/// Mitigates `raw` against the target's defense, applies crit, then drains
/// shield and health in that order.
pub fn apply_damage(
    target: &mut AttributeSet,
    raw: f64,
    kind: DamageKind,
    is_critical: bool,
    config: &CombatConfig,
) -> HitReport {
    let defense = kind
        .defense_stat()
        .map(|stat| target.get_value(stat))
        .unwrap_or(0.0);
    let amount = critical_amount(mitigate(raw, kind, defense, config), is_critical, config);

    let shield = target.get_value(AttributeKind::Shield).max(0.0);
    let absorbed = amount.min(shield);
    if absorbed > 0.0 {
        target.add_base(AttributeKind::Shield, -absorbed);
    }

    let health_before = target.get_value(AttributeKind::Health);
    let health_damage = (amount - absorbed).min(health_before.max(0.0));
    if health_damage > 0.0 {
        target.add_base(AttributeKind::Health, -health_damage);
    }
    let remaining_health = target.get_value(AttributeKind::Health);

    HitReport {
        target: target.owner(),
        kind,
        is_critical,
        amount,
        absorbed,
        health_damage,
        remaining_health,
        killed: health_before > 0.0 && remaining_health <= 0.0,
    }
}

/// Restores health up to `MaxHealth`; returns the amount actually healed.
pub fn apply_heal(target: &mut AttributeSet, amount: f64) -> f64 {
    if amount <= 0.0 {
        return 0.0;
    }
    let current = target.get_value(AttributeKind::Health);
    let cap = target.get_value(AttributeKind::MaxHealth);
    let healed = amount.min((cap - current).max(0.0));
    if healed > 0.0 {
        target.add_base(AttributeKind::Health, healed);
    }
    healed
}

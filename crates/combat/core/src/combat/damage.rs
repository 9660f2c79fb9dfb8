use crate::attributes::AttributeKind;
use crate::config::CombatConfig;

/// Damage kind, selecting which stats scale and mitigate it.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DamageKind {
    #[default]
    Physical,
    Magical,
    /// Scales like physical damage, ignores defense entirely.
    True,
}

impl DamageKind {
    /// Caster stat the raw amount scales with.
    pub const fn offense_stat(self) -> AttributeKind {
        match self {
            Self::Physical | Self::True => AttributeKind::Attack,
            Self::Magical => AttributeKind::MagicAttack,
        }
    }

    /// Target stat that mitigates this kind, if any.
    pub const fn defense_stat(self) -> Option<AttributeKind> {
        match self {
            Self::Physical => Some(AttributeKind::Defense),
            Self::Magical => Some(AttributeKind::MagicDefense),
            Self::True => None,
        }
    }
}

/// `stat × coefficient × (1 + per_level × (level - 1))`.
///
/// Levels below 1 are treated as 1.
pub fn raw_amount(stat: f64, coefficient: f64, level: u32, per_level: f64) -> f64 {
    let level = f64::from(level.max(1));
    stat * coefficient * (1.0 + per_level * (level - 1.0))
}

/// Applies defense mitigation.
///
/// Non-positive input deals nothing. Mitigated hits never drop below
/// `config.minimum_damage`. Negative defense is treated as zero.
pub fn mitigate(raw: f64, kind: DamageKind, defense: f64, config: &CombatConfig) -> f64 {
    if raw <= 0.0 {
        return 0.0;
    }
    if kind.defense_stat().is_none() {
        return raw;
    }
    let k = config.mitigation_constant;
    let reduced = raw * k / (k + defense.max(0.0));
    reduced.max(config.minimum_damage)
}

pub fn critical_amount(amount: f64, is_critical: bool, config: &CombatConfig) -> f64 {
    if is_critical {
        amount * config.crit_multiplier
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scaling() {
        assert_eq!(raw_amount(20.0, 1.0, 1, 0.2), 20.0);
        assert_eq!(raw_amount(20.0, 1.5, 3, 0.5), 60.0);
        assert_eq!(raw_amount(20.0, 1.0, 0, 0.2), 20.0);
    }

    #[test]
    fn mitigation_by_kind() {
        let config = CombatConfig::default();
        assert_eq!(mitigate(20.0, DamageKind::Physical, 0.0, &config), 20.0);
        assert_eq!(mitigate(20.0, DamageKind::Physical, 100.0, &config), 10.0);
        assert_eq!(mitigate(20.0, DamageKind::True, 100.0, &config), 20.0);
        // floor kicks in for heavily armored targets
        assert_eq!(mitigate(2.0, DamageKind::Magical, 900.0, &config), 1.0);
        assert_eq!(mitigate(0.0, DamageKind::Magical, 0.0, &config), 0.0);
    }

    #[test]
    fn crit_applies_after_mitigation() {
        let config = CombatConfig::default();
        let mitigated = mitigate(20.0, DamageKind::Physical, 100.0, &config);
        assert_eq!(critical_amount(mitigated, true, &config), 20.0);
        assert_eq!(critical_amount(mitigated, false, &config), 10.0);
    }
}

use std::collections::BTreeMap;

use crate::attributes::AttributeKind;

/// How the active branch advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatMode {
    /// Every participant is updated on every tick.
    #[default]
    RealTime,
    /// Factions alternate turns; upkeep runs once per round.
    TurnBased,
}

/// Lower bounds applied to computed attribute values.
///
/// Kinds absent from the policy are left unclamped.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClampPolicy {
    floors: BTreeMap<AttributeKind, f64>,
}

impl ClampPolicy {
    /// Policy without any floors.
    pub fn unclamped() -> Self {
        Self {
            floors: BTreeMap::new(),
        }
    }

    pub fn with_floor(mut self, kind: AttributeKind, floor: f64) -> Self {
        self.floors.insert(kind, floor);
        self
    }

    pub fn without(mut self, kind: AttributeKind) -> Self {
        self.floors.remove(&kind);
        self
    }

    pub fn floor(&self, kind: AttributeKind) -> Option<f64> {
        self.floors.get(&kind).copied()
    }

    pub fn apply(&self, kind: AttributeKind, value: f64) -> f64 {
        match self.floor(kind) {
            Some(floor) if value < floor => floor,
            _ => value,
        }
    }
}

impl Default for ClampPolicy {
    fn default() -> Self {
        use AttributeKind::*;
        [Health, Mana, Stamina, Shield, Level, Experience, Gold]
            .into_iter()
            .fold(Self::unclamped(), |policy, kind| policy.with_floor(kind, 0.0))
    }
}

/// Combat configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatConfig {
    /// Base seed mixed into every roll.
    pub seed: u64,
    pub mode: CombatMode,
    /// Damage multiplier applied on a critical hit.
    pub crit_multiplier: f64,
    /// `K` in `raw × K / (K + defense)`.
    pub mitigation_constant: f64,
    /// Lower bound for mitigated damage of non-zero hits.
    pub minimum_damage: f64,
    /// Simulated seconds one turn-based round advances durations by.
    pub turn_duration: f64,
    /// Maximum transient phases entered within one update.
    pub max_phase_chain: usize,
    pub clamp: ClampPolicy,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of resource costs a skill template may declare.
    pub const MAX_COST_ENTRIES: usize = 4;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_SEED: u64 = 0;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 2.0;
    pub const DEFAULT_MITIGATION_CONSTANT: f64 = 100.0;
    pub const DEFAULT_MINIMUM_DAMAGE: f64 = 1.0;
    pub const DEFAULT_TURN_DURATION: f64 = 1.0;
    pub const DEFAULT_MAX_PHASE_CHAIN: usize = 8;

    pub fn new() -> Self {
        Self {
            seed: Self::DEFAULT_SEED,
            mode: CombatMode::default(),
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            mitigation_constant: Self::DEFAULT_MITIGATION_CONSTANT,
            minimum_damage: Self::DEFAULT_MINIMUM_DAMAGE,
            turn_duration: Self::DEFAULT_TURN_DURATION,
            max_phase_chain: Self::DEFAULT_MAX_PHASE_CHAIN,
            clamp: ClampPolicy::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_mode(mut self, mode: CombatMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_crit_multiplier(mut self, crit_multiplier: f64) -> Self {
        self.crit_multiplier = crit_multiplier;
        self
    }

    pub fn with_mitigation_constant(mut self, mitigation_constant: f64) -> Self {
        self.mitigation_constant = mitigation_constant;
        self
    }

    pub fn with_minimum_damage(mut self, minimum_damage: f64) -> Self {
        self.minimum_damage = minimum_damage;
        self
    }

    pub fn with_turn_duration(mut self, turn_duration: f64) -> Self {
        self.turn_duration = turn_duration;
        self
    }

    pub fn with_max_phase_chain(mut self, max_phase_chain: usize) -> Self {
        self.max_phase_chain = max_phase_chain;
        self
    }

    pub fn with_clamp(mut self, clamp: ClampPolicy) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn is_turn_based(&self) -> bool {
        self.mode == CombatMode::TurnBased
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_clamp_floors_resources_only() {
        let policy = ClampPolicy::default();
        assert_eq!(policy.apply(AttributeKind::Health, -5.0), 0.0);
        assert_eq!(policy.apply(AttributeKind::Attack, -5.0), -5.0);
        assert_eq!(policy.floor(AttributeKind::Gold), Some(0.0));
    }

    #[test]
    fn builders_override_defaults() {
        let config = CombatConfig::new()
            .with_seed(7)
            .with_mode(CombatMode::TurnBased)
            .with_clamp(ClampPolicy::unclamped());

        assert_eq!(config.seed, 7);
        assert!(config.is_turn_based());
        assert_eq!(config.clamp.floor(AttributeKind::Health), None);
        assert_eq!(config.crit_multiplier, CombatConfig::DEFAULT_CRIT_MULTIPLIER);
    }
}

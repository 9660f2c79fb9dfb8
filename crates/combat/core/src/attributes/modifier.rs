use crate::attributes::AttributeKind;
use crate::types::{ModifierId, ModifierSource, Tick};

/// Stage of the value formula a modifier contributes to.
///
/// ```text
/// value = (base + Σ flat) × (1 + Σ percent) × Π final
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierKind {
    /// Added to the base.
    Flat,
    /// Fraction summed with other percent modifiers (`0.2` = +20%).
    Percent,
    /// Multiplier applied after everything else (`1.5` = ×1.5).
    Final,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModifierLifetime {
    /// Stays until removed explicitly (effects own their modifiers this way).
    #[default]
    Permanent,
    /// Removed by `AttributeSet::tick` once `now >= tick`.
    ExpiresAt(Tick),
}

impl ModifierLifetime {
    pub fn is_expired(&self, now: Tick) -> bool {
        matches!(self, Self::ExpiresAt(at) if *at <= now)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Modifier {
    pub id: ModifierId,
    pub source: ModifierSource,
    pub attribute: AttributeKind,
    pub kind: ModifierKind,
    pub value: f64,
    pub lifetime: ModifierLifetime,
}

impl Modifier {
    pub fn new(
        id: impl Into<ModifierId>,
        source: impl Into<ModifierSource>,
        attribute: AttributeKind,
        kind: ModifierKind,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            attribute,
            kind,
            value,
            lifetime: ModifierLifetime::Permanent,
        }
    }

    pub fn flat(
        id: impl Into<ModifierId>,
        source: impl Into<ModifierSource>,
        attribute: AttributeKind,
        value: f64,
    ) -> Self {
        Self::new(id, source, attribute, ModifierKind::Flat, value)
    }

    pub fn percent(
        id: impl Into<ModifierId>,
        source: impl Into<ModifierSource>,
        attribute: AttributeKind,
        value: f64,
    ) -> Self {
        Self::new(id, source, attribute, ModifierKind::Percent, value)
    }

    pub fn multiplier(
        id: impl Into<ModifierId>,
        source: impl Into<ModifierSource>,
        attribute: AttributeKind,
        value: f64,
    ) -> Self {
        Self::new(id, source, attribute, ModifierKind::Final, value)
    }

    pub fn expires_at(mut self, tick: Tick) -> Self {
        self.lifetime = ModifierLifetime::ExpiresAt(tick);
        self
    }
}

/// Running sums for one attribute, folded in modifier order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ModifierTotals {
    pub flat: f64,
    pub percent: f64,
    pub multiplier: f64,
}

impl ModifierTotals {
    pub fn fold<'a>(modifiers: impl IntoIterator<Item = &'a Modifier>) -> Self {
        modifiers.into_iter().fold(
            Self {
                flat: 0.0,
                percent: 0.0,
                multiplier: 1.0,
            },
            |mut totals, modifier| {
                match modifier.kind {
                    ModifierKind::Flat => totals.flat += modifier.value,
                    ModifierKind::Percent => totals.percent += modifier.value,
                    ModifierKind::Final => totals.multiplier *= modifier.value,
                }
                totals
            },
        )
    }

    pub fn evaluate(&self, base: f64) -> f64 {
        (base + self.flat) * (1.0 + self.percent) * self.multiplier
    }
}

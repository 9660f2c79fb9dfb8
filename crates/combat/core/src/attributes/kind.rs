/// Every value an [`AttributeSet`](super::AttributeSet) can hold.
///
/// Resource kinds (`Health`, `Mana`, `Stamina`) pair with a `Max*` kind that
/// caps restoration. Ordering follows declaration order and drives the order
/// of observer notifications.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttributeKind {
    Health,
    MaxHealth,
    Mana,
    MaxMana,
    Stamina,
    MaxStamina,
    /// Absorbs incoming damage before health.
    Shield,
    Attack,
    MagicAttack,
    Defense,
    MagicDefense,
    /// Probability in `[0, 1]`.
    CritChance,
    /// Distance units per second.
    MoveSpeed,
    Level,
    Experience,
    Gold,
}

impl AttributeKind {
    /// The cap for a depletable resource, if this kind is one.
    pub const fn maximum(self) -> Option<AttributeKind> {
        match self {
            Self::Health => Some(Self::MaxHealth),
            Self::Mana => Some(Self::MaxMana),
            Self::Stamina => Some(Self::MaxStamina),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::{EnumCount, IntoEnumIterator};

    #[test]
    fn kinds_parse_and_iterate() {
        assert_eq!("max_health".parse::<AttributeKind>().ok(), Some(AttributeKind::MaxHealth));
        assert_eq!(AttributeKind::iter().count(), AttributeKind::COUNT);
        assert_eq!(AttributeKind::Mana.maximum(), Some(AttributeKind::MaxMana));
        assert_eq!(AttributeKind::Attack.maximum(), None);
    }
}

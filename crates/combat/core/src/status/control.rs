use bitflags::bitflags;

/// Crowd-control kinds a status effect can impose.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ControlKind {
    /// No skills, no movement.
    Stun,
    /// No magical skills.
    Silence,
    /// No movement.
    Root,
    /// No physical skills.
    Disarm,
}

impl ControlKind {
    /// Whether applying this control breaks an interruptible cast.
    pub const fn interrupts_casts(self) -> bool {
        matches!(self, Self::Stun | Self::Silence)
    }
}

bitflags! {
    /// Union of every control kind currently affecting an entity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ControlFlags: u8 {
        const STUNNED  = 1 << 0;
        const SILENCED = 1 << 1;
        const ROOTED   = 1 << 2;
        const DISARMED = 1 << 3;
    }
}

impl From<ControlKind> for ControlFlags {
    fn from(kind: ControlKind) -> Self {
        match kind {
            ControlKind::Stun => Self::STUNNED,
            ControlKind::Silence => Self::SILENCED,
            ControlKind::Root => Self::ROOTED,
            ControlKind::Disarm => Self::DISARMED,
        }
    }
}

impl ControlFlags {
    pub fn has(self, kind: ControlKind) -> bool {
        self.contains(kind.into())
    }

    /// Stunned or rooted entities cannot move.
    pub fn can_move(self) -> bool {
        !self.intersects(Self::STUNNED | Self::ROOTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_aggregate_kinds() {
        let flags = ControlFlags::from(ControlKind::Root) | ControlKind::Silence.into();
        assert!(flags.has(ControlKind::Root));
        assert!(flags.has(ControlKind::Silence));
        assert!(!flags.has(ControlKind::Stun));
        assert!(!flags.can_move());
        assert!(ControlFlags::empty().can_move());
    }
}

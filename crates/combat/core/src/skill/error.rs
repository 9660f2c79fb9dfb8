use crate::attributes::AttributeKind;
use crate::error::{CombatError, ErrorSeverity};
use crate::status::ControlKind;
use crate::types::SkillId;

/// Why a skill could not be used. Nothing has been spent when this is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SkillUseError {
    #[error("skill on cooldown for another {remaining:.2}s")]
    OnCooldown { remaining: f64 },

    #[error("insufficient {kind}: need {required}, have {available}")]
    InsufficientResource {
        kind: AttributeKind,
        required: f64,
        available: f64,
    },

    #[error("caster cannot act")]
    InvalidCaster,

    #[error("target is missing, dead or of the wrong affiliation")]
    InvalidTarget,

    #[error("no eligible targets in range")]
    NoEligibleTargetsInRange,

    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    #[error("caster is already casting")]
    AlreadyCasting,

    #[error("caster is under {0}")]
    Controlled(ControlKind),

    #[error("target at {distance:.2} is beyond range {range:.2}")]
    OutOfRange { distance: f64, range: f64 },

    #[error("caster's faction is not acting this turn")]
    OutOfTurn,
}

impl CombatError for SkillUseError {
    fn severity(&self) -> ErrorSeverity {
        use SkillUseError::*;
        match self {
            OnCooldown { .. } | InsufficientResource { .. } | AlreadyCasting => {
                ErrorSeverity::Recoverable
            }
            Controlled(_) | OutOfRange { .. } | NoEligibleTargetsInRange | OutOfTurn => {
                ErrorSeverity::Recoverable
            }
            InvalidCaster | InvalidTarget | UnknownSkill(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        use SkillUseError::*;
        match self {
            OnCooldown { .. } => "SKILL_ON_COOLDOWN",
            InsufficientResource { .. } => "SKILL_INSUFFICIENT_RESOURCE",
            InvalidCaster => "SKILL_INVALID_CASTER",
            InvalidTarget => "SKILL_INVALID_TARGET",
            NoEligibleTargetsInRange => "SKILL_NO_ELIGIBLE_TARGETS",
            UnknownSkill(_) => "SKILL_UNKNOWN",
            AlreadyCasting => "SKILL_ALREADY_CASTING",
            Controlled(_) => "SKILL_CONTROLLED",
            OutOfRange { .. } => "SKILL_OUT_OF_RANGE",
            OutOfTurn => "SKILL_OUT_OF_TURN",
        }
    }
}

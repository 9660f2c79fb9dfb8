use crate::error::{CombatError, ErrorSeverity};
use crate::types::EntityId;

/// Raised when an effect targets an entity that cannot receive it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectApplyError {
    #[error("{0} is missing or dead")]
    TargetInvalid(EntityId),
}

impl CombatError for EffectApplyError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TargetInvalid(_) => "EFFECT_TARGET_INVALID",
        }
    }
}

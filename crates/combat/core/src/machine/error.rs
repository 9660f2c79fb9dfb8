use crate::error::{CombatError, ErrorSeverity};
use crate::machine::CombatPhase;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateTransitionError {
    #[error("no handler registered for phase {0}")]
    UnknownState(CombatPhase),

    #[error("cannot go from {from} to {to}")]
    InvalidTransition { from: CombatPhase, to: CombatPhase },

    #[error("no combat in progress")]
    NotStarted,

    #[error("a combat needs at least two non-empty rosters, got {count}")]
    InvalidRosters { count: usize },
}

impl CombatError for StateTransitionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownState(_) => ErrorSeverity::Internal,
            Self::InvalidTransition { .. } | Self::NotStarted | Self::InvalidRosters { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownState(_) => "PHASE_UNKNOWN_STATE",
            Self::InvalidTransition { .. } => "PHASE_INVALID_TRANSITION",
            Self::NotStarted => "PHASE_NOT_STARTED",
            Self::InvalidRosters { .. } => "PHASE_INVALID_ROSTERS",
        }
    }
}

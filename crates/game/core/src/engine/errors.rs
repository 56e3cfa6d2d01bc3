//! Errors surfaced by turn-level engine operations.

use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

/// Errors from operations that act on the turn itself rather than on an intent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("the game is over")]
    GameOver,

    #[error("no agent is currently active")]
    NoActiveAgent,

    #[error("agent {agent} has no action slot left this turn")]
    NoActionsLeft { agent: EntityId },

    #[error("agent {0} not found")]
    UnknownAgent(EntityId),
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::GameOver | TurnError::NoActionsLeft { .. } => ErrorSeverity::Validation,
            TurnError::NoActiveAgent | TurnError::UnknownAgent(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::GameOver => "TURN_GAME_OVER",
            TurnError::NoActiveAgent => "TURN_NO_ACTIVE_AGENT",
            TurnError::NoActionsLeft { .. } => "TURN_NO_ACTIONS_LEFT",
            TurnError::UnknownAgent(_) => "TURN_UNKNOWN_AGENT",
        }
    }
}

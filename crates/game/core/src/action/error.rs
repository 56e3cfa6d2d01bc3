//! Intent validation and parsing errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, Position};

/// Why an intent was refused, either at submission or at resolution.
///
/// A refused intent leaves the world untouched and consumes no action slot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentError {
    #[error("the game is over")]
    GameOver,

    #[error("agent {actor} is not the active agent")]
    NotActive { actor: EntityId },

    #[error("no agent is active")]
    NoActiveAgent,

    #[error("agent {0} not found")]
    ActorNotFound(EntityId),

    #[error("agent {0} is dead")]
    ActorDead(EntityId),

    #[error("agent {actor} has no action slot left this turn")]
    NoActionsLeft { actor: EntityId },

    #[error("cell {cell} is outside the board")]
    OutOfBounds { cell: Position },

    #[error("speak message is empty")]
    EmptyMessage,

    #[error("no path from {from} to {to}")]
    Unreachable { from: Position, to: Position },

    #[error("path of {length} cells exceeds move range {range}")]
    OutOfRange { length: u32, range: u32 },

    #[error("no visible enemy at {cell}")]
    NotVisibleEnemy { cell: Position },

    #[error("no visible teammate at {cell}")]
    NotVisibleTeammate { cell: Position },
}

impl GameError for IntentError {
    fn severity(&self) -> ErrorSeverity {
        use IntentError::*;
        match self {
            // The world may accept a different intent right away.
            Unreachable { .. }
            | OutOfRange { .. }
            | NotVisibleEnemy { .. }
            | NotVisibleTeammate { .. }
            | NoActionsLeft { .. } => ErrorSeverity::Recoverable,

            GameOver | NotActive { .. } | NoActiveAgent | OutOfBounds { .. } | EmptyMessage => {
                ErrorSeverity::Validation
            }

            ActorNotFound(_) | ActorDead(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use IntentError::*;
        match self {
            GameOver => "INTENT_GAME_OVER",
            NotActive { .. } => "INTENT_NOT_ACTIVE",
            NoActiveAgent => "INTENT_NO_ACTIVE_AGENT",
            ActorNotFound(_) => "INTENT_ACTOR_NOT_FOUND",
            ActorDead(_) => "INTENT_ACTOR_DEAD",
            NoActionsLeft { .. } => "INTENT_NO_ACTIONS_LEFT",
            OutOfBounds { .. } => "INTENT_OUT_OF_BOUNDS",
            EmptyMessage => "INTENT_EMPTY_MESSAGE",
            Unreachable { .. } => "INTENT_UNREACHABLE",
            OutOfRange { .. } => "INTENT_OUT_OF_RANGE",
            NotVisibleEnemy { .. } => "INTENT_NOT_VISIBLE_ENEMY",
            NotVisibleTeammate { .. } => "INTENT_NOT_VISIBLE_TEAMMATE",
        }
    }
}

/// Failure to read an intent from its wire form (`MOVE [x, y]`, ...).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntentParseError {
    #[error("empty action")]
    Empty,

    #[error("unknown action keyword '{0}'")]
    UnknownKeyword(String),

    #[error("{keyword} expects a cell like [x, y]")]
    MissingCell { keyword: String },

    #[error("malformed cell '{0}'")]
    MalformedCell(String),

    #[error("SPEAK expects a message after the cell")]
    MissingMessage,

    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

impl GameError for IntentParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use IntentParseError::*;
        match self {
            Empty => "PARSE_EMPTY",
            UnknownKeyword(_) => "PARSE_UNKNOWN_KEYWORD",
            MissingCell { .. } => "PARSE_MISSING_CELL",
            MalformedCell(_) => "PARSE_MALFORMED_CELL",
            MissingMessage => "PARSE_MISSING_MESSAGE",
            TrailingInput(_) => "PARSE_TRAILING_INPUT",
        }
    }
}

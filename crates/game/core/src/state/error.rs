//! State construction and integrity errors.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityRef, Position, Team};

/// Errors raised while building a world, either by hand or by generation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InitializationError {
    #[error("cell {position} is outside the board")]
    OutOfBounds { position: Position },

    #[error("cell {position} is already occupied by {occupant:?}")]
    CellOccupied {
        position: Position,
        occupant: EntityRef,
    },

    #[error("team {team} already has a target")]
    DuplicateTarget { team: Team },

    #[error("board of {available} cells cannot host {required} entities")]
    BoardTooSmall { available: usize, required: usize },

    #[error("no free spawn cell left for team {team}")]
    NoSpawnCell { team: Team },
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        use InitializationError::*;
        match self {
            OutOfBounds { .. } | CellOccupied { .. } | DuplicateTarget { .. } => {
                ErrorSeverity::Validation
            }
            BoardTooSmall { .. } | NoSpawnCell { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        use InitializationError::*;
        match self {
            OutOfBounds { .. } => "INIT_OUT_OF_BOUNDS",
            CellOccupied { .. } => "INIT_CELL_OCCUPIED",
            DuplicateTarget { .. } => "INIT_DUPLICATE_TARGET",
            BoardTooSmall { .. } => "INIT_BOARD_TOO_SMALL",
            NoSpawnCell { .. } => "INIT_NO_SPAWN_CELL",
        }
    }
}

/// Two blocking entities found on the same cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{first:?} and {second:?} both occupy {position}")]
pub struct OccupancyViolation {
    pub position: Position,
    pub first: EntityRef,
    pub second: EntityRef,
}

impl GameError for OccupancyViolation {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "STATE_OCCUPANCY_VIOLATION"
    }
}

//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, world initialization, and the
//! decision service so clients can bubble them up with consistent context.
use std::time::Duration;

use game_core::{EntityId, ErrorSeverity, GameError, InitializationError, Team, TurnError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("no decision provider set for team {team}")]
    ProviderNotSet { team: Team },

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to generate the initial world")]
    InitialState(#[source] InitializationError),

    #[error(transparent)]
    Turn(#[from] TurnError),

    #[error("no agent is active and no winner is declared")]
    NoActiveAgent,

    #[error("agent {0} is not part of the world")]
    UnknownAgent(EntityId),

    #[error("decision service request failed")]
    DecisionTransport(#[from] reqwest::Error),

    #[error("decision service answered with status {status}")]
    DecisionStatus { status: u16 },

    #[error("decision provider failed: {0}")]
    Provider(String),

    #[error("decision timed out after {0:?}")]
    DecisionTimeout(Duration),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Turn(err) => err.severity(),
            RuntimeError::DecisionTransport(_)
            | RuntimeError::DecisionStatus { .. }
            | RuntimeError::Provider(_)
            | RuntimeError::DecisionTimeout(_) => ErrorSeverity::Recoverable,
            RuntimeError::ProviderNotSet { .. } | RuntimeError::InitialState(_) => {
                ErrorSeverity::Validation
            }
            RuntimeError::NoActiveAgent | RuntimeError::UnknownAgent(_) => {
                ErrorSeverity::Internal
            }
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::ProviderNotSet { .. } => "RUNTIME_PROVIDER_NOT_SET",
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::InitialState(_) => "RUNTIME_INITIAL_STATE",
            RuntimeError::Turn(err) => err.error_code(),
            RuntimeError::NoActiveAgent => "RUNTIME_NO_ACTIVE_AGENT",
            RuntimeError::UnknownAgent(_) => "RUNTIME_UNKNOWN_AGENT",
            RuntimeError::DecisionTransport(_) => "DECISION_TRANSPORT",
            RuntimeError::DecisionStatus { .. } => "DECISION_STATUS",
            RuntimeError::Provider(_) => "DECISION_PROVIDER",
            RuntimeError::DecisionTimeout(_) => "DECISION_TIMEOUT",
        }
    }
}

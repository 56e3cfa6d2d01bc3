//! Event types for different topics.

use game_core::{EngineEvent, EntityId, Intent, IntentError};
use serde::{Deserialize, Serialize};

/// Events related to world changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// An intent passed the structural checks and waits in the queue.
    IntentQueued { actor: EntityId, intent: Intent },

    /// An intent was refused before entering the queue.
    IntentRefused { intent: Intent, error: IntentError },

    /// A state change produced by an engine tick.
    Engine(EngineEvent),

    /// The world was regenerated.
    NewGame { seed: u64 },
}

/// Emitted when an agent receives the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub agent: EntityId,
    pub callsign: String,
    /// Current round, starting at 1
    pub round: u32,
}

/// Decision service traffic, one request per action slot attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DecisionEvent {
    Requested {
        agent: EntityId,
        callsign: String,
    },
    Received {
        agent: EntityId,
        thoughts: String,
        action: String,
    },
    /// The provider did not answer in time; the slot is forfeited.
    TimedOut { agent: EntityId, waited_ms: u64 },
    /// The answer could not be parsed into an intent; the slot is forfeited.
    Malformed {
        agent: EntityId,
        action: String,
        error: String,
    },
    /// The provider returned an error; the slot is forfeited.
    Failed { agent: EntityId, error: String },
}

//! Asynchronous abstraction for sourcing agent decisions.
//!
//! Runtime users plug in [`DecisionProvider`] implementations so the match can
//! run against a remote AI service, a local heuristic, or scripted fixtures.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::errors::Result;
use crate::providers::AgentBrief;

/// Answer of the decision service: free-form reasoning plus one action string
/// such as `MOVE [1, 2]` or `SPEAK [0, 3] hold the line`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default)]
    pub thoughts: String,
    pub action: String,
}

impl Decision {
    pub fn new(thoughts: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            thoughts: thoughts.into(),
            action: action.into(),
        }
    }
}

/// Trait for choosing the next action of an agent.
///
/// Implementations are treated as unreliable: the runtime bounds every call
/// with a timeout and parses the returned action itself, so a provider may
/// return anything without corrupting the world.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Decide the next action for the agent described by `brief`.
    async fn decide(&self, brief: &AgentBrief) -> Result<Decision>;
}

//! Decision provider replaying canned answers, for tests and demos.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::AgentBrief;
use crate::api::{Decision, DecisionProvider, Result, RuntimeError};

/// Answers with queued decisions in order, regardless of the brief.
///
/// Once the script runs dry the provider either repeats its fallback or
/// fails, which the runtime treats as a forfeited slot.
#[derive(Debug, Default)]
pub struct ScriptedDecisionProvider {
    script: Mutex<VecDeque<Decision>>,
    fallback: Option<Decision>,
}

impl ScriptedDecisionProvider {
    pub fn new(script: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback: None,
        }
    }

    /// Convenience constructor from bare action strings.
    pub fn from_actions<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(actions.into_iter().map(|a| Decision::new("", a)))
    }

    /// Answer used after the script is exhausted.
    pub fn with_fallback(mut self, fallback: Decision) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisionProvider {
    async fn decide(&self, _brief: &AgentBrief) -> Result<Decision> {
        let next = self
            .script
            .lock()
            .map_err(|_| RuntimeError::Provider("script lock poisoned".to_string()))?
            .pop_front();

        next.or_else(|| self.fallback.clone())
            .ok_or_else(|| RuntimeError::Provider("script exhausted".to_string()))
    }
}

//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! submitting intents, reading snapshots, or streaming events from specific
//! topics. Every mutation funnels through the worker's command channel.
use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{EntityId, GameState, Intent, TickReport};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Queue an intent for the active agent.
    ///
    /// Returns whether the intent was structurally well-formed and queued, not
    /// whether it will succeed; the outcome arrives on [`Topic::GameState`].
    pub async fn submit_intent(&self, intent: Intent, rationale: Option<String>) -> Result<bool> {
        let result = self
            .request(|reply| Command::SubmitIntent {
                intent,
                rationale,
                reply,
            })
            .await?;
        Ok(result.is_ok())
    }

    /// Spend one action slot of the active agent without acting.
    pub async fn forfeit(&self) -> Result<()> {
        self.request(|reply| Command::Forfeit { reply }).await?
    }

    /// Toggle the presentation flag shown while a decision is outstanding.
    pub async fn set_thinking(&self, agent: EntityId, thinking: bool) -> Result<()> {
        self.request(|reply| Command::SetThinking {
            agent,
            thinking,
            reply,
        })
        .await?
    }

    /// Advance the engine by one step.
    pub async fn tick(&self) -> Result<TickReport> {
        self.request(|reply| Command::Tick { reply }).await
    }

    /// Wait until every queued intent and animation has resolved.
    pub async fn settle(&self) -> Result<TickReport> {
        self.request(|reply| Command::Settle { reply }).await
    }

    /// Read-only copy of the world for rendering or decisions.
    pub async fn snapshot(&self) -> Result<GameState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Regenerate the world. Without a seed, the next seed is derived from
    /// the runtime seed and the number of games played.
    pub async fn new_game(&self, seed: Option<u64>) -> Result<GameState> {
        self.request(|reply| Command::NewGame { seed, reply }).await?
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Intents, resolved actions, projectiles, game over
    /// - `Topic::Turn` - Turn hand-overs
    /// - `Topic::Decision` - Decision service requests and answers
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}

//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and drives the match by asking decision providers for one action at a time.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use game_core::{EntityId, GameConfig, GameError, GameState, Intent, Team};

use crate::api::{DecisionProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::{DecisionEvent, Event, EventBus};
use crate::providers::AgentBrief;
use crate::workers::{Command, SimulationWorker, WorkerSettings};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    /// Seed of the first generated world; later games derive from it.
    pub seed: u64,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Upper bound on a single decision request.
    pub decision_timeout: Duration,
    /// Wall-clock pacing of engine ticks. `None` settles instantly.
    pub tick_interval: Option<Duration>,
    /// Rejected intents tolerated before the slot is forfeited.
    pub max_rejections_per_slot: u32,
    pub max_settle_ticks: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            seed: 0,
            event_buffer_size: 100,
            command_buffer_size: 32,
            decision_timeout: Duration::from_secs(15),
            tick_interval: None,
            max_rejections_per_slot: 3,
            max_settle_ticks: 10_000,
        }
    }
}

/// Why a slot was spent without acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForfeitReason {
    Timeout,
    ProviderError,
    Malformed,
    Rejected,
}

/// Result of one [`Runtime::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The intent was queued and resolved successfully.
    Acted { agent: EntityId, intent: Intent },
    Forfeited {
        agent: EntityId,
        reason: ForfeitReason,
    },
    GameOver { winner: Team },
}

/// Summary returned by [`Runtime::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub winner: Option<Team>,
    pub rounds: u32,
    pub actions: usize,
    pub forfeits: usize,
}

/// Main runtime that orchestrates the match
///
/// Design: Runtime owns the worker and coordinates decisions.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    providers: HashMap<Team, Arc<dyn DecisionProvider>>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Set the decision provider for one team
    pub fn set_provider(&mut self, team: Team, provider: impl DecisionProvider + 'static) {
        self.providers.insert(team, Arc::new(provider));
    }

    /// Regenerate the world with fresh spawns.
    pub async fn new_game(&self, seed: Option<u64>) -> Result<GameState> {
        self.handle.new_game(seed).await
    }

    fn provider_for(&self, team: Team) -> Result<Arc<dyn DecisionProvider>> {
        self.providers
            .get(&team)
            .cloned()
            .ok_or(RuntimeError::ProviderNotSet { team })
    }

    fn publish(&self, event: DecisionEvent) {
        self.handle.event_bus().publish(Event::Decision(event));
    }

    /// Fill one action slot of the active agent.
    ///
    /// The agent's provider is asked for a decision. A timeout, a provider
    /// error, or an unparseable answer forfeits the slot. An intent rejected
    /// by the rules is retried with a fresh brief until
    /// `max_rejections_per_slot` is reached, then the slot is forfeited.
    pub async fn step(&mut self) -> Result<StepOutcome> {
        self.handle.settle().await?;
        let mut rejections = 0;

        loop {
            let state = self.handle.snapshot().await?;
            if let Some(winner) = state.winner {
                return Ok(StepOutcome::GameOver { winner });
            }
            let agent = state.turn.active.ok_or(RuntimeError::NoActiveAgent)?;
            let brief = AgentBrief::build(&state, agent, &self.config.game_config)
                .ok_or(RuntimeError::UnknownAgent(agent))?;
            let provider = self.provider_for(brief.team)?;

            let (intent, thoughts) = match self.request_intent(provider.as_ref(), &brief).await? {
                Ok(answer) => answer,
                Err(reason) => return self.forfeit(agent, reason).await,
            };

            self.handle.set_thinking(agent, false).await?;
            let rationale = (!thoughts.trim().is_empty()).then_some(thoughts);
            let logged = brief.historic.len();

            if self.handle.submit_intent(intent.clone(), rationale).await? {
                self.handle.settle().await?;
                let after = self.handle.snapshot().await?;
                let resolved = after
                    .agent(agent)
                    .is_some_and(|a| a.historic.len() > logged);
                if resolved {
                    return Ok(StepOutcome::Acted { agent, intent });
                }
            }

            rejections += 1;
            debug!(
                target: "runtime::decision",
                agent = %agent,
                intent = %intent,
                rejections,
                "intent did not resolve"
            );
            if rejections >= self.config.max_rejections_per_slot {
                return self.forfeit(agent, ForfeitReason::Rejected).await;
            }
        }
    }

    /// Asks the provider, bounded by the decision timeout, and parses the
    /// answer. The inner `Err` names why the slot must be forfeited.
    async fn request_intent(
        &self,
        provider: &dyn DecisionProvider,
        brief: &AgentBrief,
    ) -> Result<std::result::Result<(Intent, String), ForfeitReason>> {
        let agent = brief.agent;
        self.handle.set_thinking(agent, true).await?;
        self.publish(DecisionEvent::Requested {
            agent,
            callsign: brief.callsign.clone(),
        });
        debug!(
            target: "runtime::decision",
            agent = %agent,
            callsign = %brief.callsign,
            options = brief.possible_actions.len(),
            "requesting decision"
        );

        let timeout = self.config.decision_timeout;
        let decision = match tokio::time::timeout(timeout, provider.decide(brief)).await {
            Ok(Ok(decision)) => decision,
            Ok(Err(error)) => {
                warn!(
                    target: "runtime::decision",
                    agent = %agent,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    "decision provider failed: {error}"
                );
                self.publish(DecisionEvent::Failed {
                    agent,
                    error: error.to_string(),
                });
                return Ok(Err(ForfeitReason::ProviderError));
            }
            Err(_) => {
                let error = RuntimeError::DecisionTimeout(timeout);
                warn!(target: "runtime::decision", agent = %agent, "{error}");
                self.publish(DecisionEvent::TimedOut {
                    agent,
                    waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                });
                return Ok(Err(ForfeitReason::Timeout));
            }
        };

        self.publish(DecisionEvent::Received {
            agent,
            thoughts: decision.thoughts.clone(),
            action: decision.action.clone(),
        });

        match decision.action.parse::<Intent>() {
            Ok(intent) => {
                debug!(target: "runtime::decision", agent = %agent, intent = %intent, "decision received");
                Ok(Ok((intent, decision.thoughts)))
            }
            Err(error) => {
                warn!(
                    target: "runtime::decision",
                    agent = %agent,
                    action = %decision.action,
                    "malformed decision: {error}"
                );
                self.publish(DecisionEvent::Malformed {
                    agent,
                    action: decision.action,
                    error: error.to_string(),
                });
                Ok(Err(ForfeitReason::Malformed))
            }
        }
    }

    async fn forfeit(&self, agent: EntityId, reason: ForfeitReason) -> Result<StepOutcome> {
        self.handle.forfeit().await?;
        self.handle.settle().await?;
        Ok(StepOutcome::Forfeited { agent, reason })
    }

    /// Plays until a team wins or, when `max_rounds` is set, the round
    /// counter passes it.
    pub async fn run(&mut self, max_rounds: Option<u32>) -> Result<RunSummary> {
        let mut actions = 0;
        let mut forfeits = 0;

        loop {
            let winner = match self.step().await? {
                StepOutcome::GameOver { winner } => Some(winner),
                StepOutcome::Acted { .. } => {
                    actions += 1;
                    None
                }
                StepOutcome::Forfeited { .. } => {
                    forfeits += 1;
                    None
                }
            };

            let state = self.handle.snapshot().await?;
            let winner = winner.or(state.winner);
            let out_of_rounds = max_rounds.is_some_and(|limit| state.turn.round > limit);
            if winner.is_some() || out_of_rounds {
                let summary = RunSummary {
                    winner,
                    rounds: state.turn.round,
                    actions,
                    forfeits,
                };
                info!(
                    target: "runtime::decision",
                    winner = ?summary.winner,
                    rounds = summary.rounds,
                    actions,
                    forfeits,
                    "match finished"
                );
                return Ok(summary);
            }
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker stops once every handle clone has been dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    state: Option<GameState>,
    providers: HashMap<Team, Arc<dyn DecisionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            state: None,
            providers: HashMap::new(),
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the initial world instead of generating one from the seed
    pub fn initial_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Use one provider for both teams
    pub fn provider(mut self, provider: impl DecisionProvider + 'static) -> Self {
        let provider: Arc<dyn DecisionProvider> = Arc::new(provider);
        for team in [Team::Red, Team::Blue] {
            self.providers.insert(team, Arc::clone(&provider));
        }
        self
    }

    /// Set the provider for one team
    pub fn team_provider(mut self, team: Team, provider: impl DecisionProvider + 'static) -> Self {
        self.providers.insert(team, Arc::new(provider));
        self
    }

    /// Build the runtime and spawn the simulation worker
    pub async fn build(self) -> Result<Runtime> {
        let initial_state = match self.state {
            Some(state) => state,
            None => GameState::generate(&self.config.game_config, self.config.seed)
                .map_err(RuntimeError::InitialState)?,
        };

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let settings = WorkerSettings {
            seed: self.config.seed,
            tick_interval: self.config.tick_interval,
            max_settle_ticks: self.config.max_settle_ticks,
        };
        let sim_worker = SimulationWorker::new(
            initial_state,
            self.config.game_config.clone(),
            settings,
            command_rx,
            event_bus,
        );

        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            config: self.config,
            providers: self.providers,
            sim_worker_handle,
        })
    }
}

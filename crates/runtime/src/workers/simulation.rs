//! Simulation worker that owns the authoritative [`game_core::GameState`].
//!
//! Receives commands from [`crate::RuntimeHandle`], drives the world through
//! [`game_core::GameEngine`], and publishes events to the EventBus.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use game_core::{
    EngineEvent, EntityId, GameConfig, GameEngine, GameError, GameState, Intent, IntentError,
    TickReport, TurnPhase, compute_seed,
};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, GameStateEvent, TurnEvent};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Queue an intent for the active agent.
    SubmitIntent {
        intent: Intent,
        rationale: Option<String>,
        reply: oneshot::Sender<std::result::Result<EntityId, IntentError>>,
    },
    /// Spend one slot of the active agent with no world effect.
    Forfeit { reply: oneshot::Sender<Result<()>> },
    SetThinking {
        agent: EntityId,
        thinking: bool,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Advance exactly one engine step.
    Tick { reply: oneshot::Sender<TickReport> },
    /// Reply once the engine waits for input or the game is over.
    Settle { reply: oneshot::Sender<TickReport> },
    /// Query the current game state (read-only).
    QueryState { reply: oneshot::Sender<GameState> },
    /// Replace the world with a freshly generated one.
    NewGame {
        seed: Option<u64>,
        reply: oneshot::Sender<Result<GameState>>,
    },
}

/// Settings the worker needs beyond the rules themselves.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub seed: u64,
    pub tick_interval: Option<Duration>,
    pub max_settle_ticks: usize,
}

/// Background task that processes gameplay commands.
///
/// The worker is the only place a [`GameEngine`] is ever built, which makes it
/// the single mutator of the world. Without a tick interval the engine only
/// advances on `Tick`/`Settle` commands; with one it advances on its own and
/// `Settle` requests park until the engine is idle.
pub struct SimulationWorker {
    state: GameState,
    config: GameConfig,
    settings: WorkerSettings,
    games: u64,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    waiters: Vec<oneshot::Sender<TickReport>>,
    buffered: Vec<EngineEvent>,
}

fn is_idle(phase: TurnPhase) -> bool {
    matches!(phase, TurnPhase::WaitingForInput | TurnPhase::GameOver)
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

impl SimulationWorker {
    /// Creates a new simulation worker.
    pub fn new(
        state: GameState,
        config: GameConfig,
        settings: WorkerSettings,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        info!(
            target: "runtime::worker",
            seed = settings.seed,
            agents = state.agents.len(),
            obstacles = state.obstacles.len(),
            "simulation worker initialized"
        );

        Self {
            state,
            config,
            settings,
            games: 0,
            command_rx,
            event_bus,
            waiters: Vec::new(),
            buffered: Vec::new(),
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        let mut ticker = self.settings.tick_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                _ = next_tick(&mut ticker) => self.on_interval_tick(),
            }
        }
        debug!(target: "runtime::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::SubmitIntent {
                intent,
                rationale,
                reply,
            } => {
                let result = self.handle_submit(intent, rationale);
                if reply.send(result).is_err() {
                    debug!("SubmitIntent reply channel closed (caller dropped)");
                }
            }
            Command::Forfeit { reply } => {
                let result = self.handle_forfeit();
                if reply.send(result).is_err() {
                    debug!("Forfeit reply channel closed (caller dropped)");
                }
            }
            Command::SetThinking {
                agent,
                thinking,
                reply,
            } => {
                let result = GameEngine::new(&mut self.state, &self.config)
                    .set_thinking(agent, thinking)
                    .map_err(RuntimeError::from);
                if reply.send(result).is_err() {
                    debug!("SetThinking reply channel closed (caller dropped)");
                }
            }
            Command::Tick { reply } => {
                let report = GameEngine::new(&mut self.state, &self.config).tick();
                self.publish_engine_events(&report.events);
                if reply.send(report).is_err() {
                    debug!("Tick reply channel closed (caller dropped)");
                }
            }
            Command::Settle { reply } => self.handle_settle(reply),
            Command::QueryState { reply } => {
                if reply.send(self.state.clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::NewGame { seed, reply } => {
                let result = self.handle_new_game(seed);
                if reply.send(result).is_err() {
                    debug!("NewGame reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_submit(
        &mut self,
        intent: Intent,
        rationale: Option<String>,
    ) -> std::result::Result<EntityId, IntentError> {
        let actor = self.state.turn.active;
        let result = GameEngine::new(&mut self.state, &self.config).submit(intent.clone(), rationale);

        match (result, actor) {
            (Ok(()), Some(actor)) => {
                debug!(target: "runtime::worker", actor = %actor, intent = %intent, "intent queued");
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::IntentQueued { actor, intent }));
                Ok(actor)
            }
            (Ok(()), None) => Err(IntentError::NoActiveAgent),
            (Err(error), _) => {
                debug!(
                    target: "runtime::worker",
                    intent = %intent,
                    code = error.error_code(),
                    severity = error.severity().as_str(),
                    "intent refused: {error}"
                );
                self.event_bus
                    .publish(Event::GameState(GameStateEvent::IntentRefused {
                        intent,
                        error: error.clone(),
                    }));
                Err(error)
            }
        }
    }

    fn handle_forfeit(&mut self) -> Result<()> {
        let event = GameEngine::new(&mut self.state, &self.config).forfeit_action()?;
        self.publish_engine_events(std::slice::from_ref(&event));
        Ok(())
    }

    fn handle_settle(&mut self, reply: oneshot::Sender<TickReport>) {
        if self.settings.tick_interval.is_some() {
            let phase = GameEngine::new(&mut self.state, &self.config).phase();
            if is_idle(phase) {
                let _ = reply.send(TickReport {
                    events: Vec::new(),
                    phase,
                });
            } else {
                self.waiters.push(reply);
            }
            return;
        }

        let mut engine = GameEngine::new(&mut self.state, &self.config);
        let events = engine.settle(self.settings.max_settle_ticks);
        let phase = engine.phase();
        self.publish_engine_events(&events);
        if reply.send(TickReport { events, phase }).is_err() {
            debug!("Settle reply channel closed (caller dropped)");
        }
    }

    fn on_interval_tick(&mut self) {
        let report = GameEngine::new(&mut self.state, &self.config).tick();
        self.publish_engine_events(&report.events);

        if self.waiters.is_empty() {
            return;
        }
        self.buffered.extend(report.events);
        if is_idle(report.phase) {
            let events = std::mem::take(&mut self.buffered);
            for waiter in self.waiters.drain(..) {
                let _ = waiter.send(TickReport {
                    events: events.clone(),
                    phase: report.phase,
                });
            }
        }
    }

    fn handle_new_game(&mut self, seed: Option<u64>) -> Result<GameState> {
        self.games += 1;
        let seed = seed.unwrap_or_else(|| compute_seed(self.settings.seed, self.games, 0, 0));
        let state = GameState::generate(&self.config, seed).map_err(RuntimeError::InitialState)?;

        info!(
            target: "runtime::worker",
            seed,
            game = self.games,
            "new game generated"
        );
        self.state = state;
        self.buffered.clear();

        let phase = GameEngine::new(&mut self.state, &self.config).phase();
        for waiter in self.waiters.drain(..) {
            let _ = waiter.send(TickReport {
                events: Vec::new(),
                phase,
            });
        }

        self.event_bus
            .publish(Event::GameState(GameStateEvent::NewGame { seed }));
        if let Some(active) = self.state.active_agent() {
            self.event_bus.publish(Event::Turn(TurnEvent {
                agent: active.id,
                callsign: active.callsign.clone(),
                round: self.state.turn.round,
            }));
        }
        Ok(self.state.clone())
    }

    /// Routes engine events to their topics. Turn hand-overs go to
    /// [`crate::Topic::Turn`], everything else to the world topic.
    fn publish_engine_events(&self, events: &[EngineEvent]) {
        for event in events {
            match event {
                EngineEvent::TurnStarted { agent, round } => {
                    let callsign = self
                        .state
                        .agent(*agent)
                        .map(|a| a.callsign.clone())
                        .unwrap_or_default();
                    debug!(target: "runtime::worker", agent = %agent, %callsign, round, "turn started");
                    self.event_bus.publish(Event::Turn(TurnEvent {
                        agent: *agent,
                        callsign,
                        round: *round,
                    }));
                    continue;
                }
                EngineEvent::AgentEliminated { agent, team } => {
                    info!(target: "runtime::worker", agent = %agent, %team, "agent eliminated");
                }
                EngineEvent::GameOver { winner } => {
                    info!(
                        target: "runtime::worker",
                        %winner,
                        round = self.state.turn.round,
                        "game over"
                    );
                }
                EngineEvent::IntentRejected { actor, intent, error } => {
                    debug!(
                        target: "runtime::worker",
                        actor = %actor,
                        intent = %intent,
                        severity = error.severity().as_str(),
                        "intent rejected at resolution: {error}"
                    );
                }
                _ => {}
            }
            self.event_bus
                .publish(Event::GameState(GameStateEvent::Engine(event.clone())));
        }
    }
}

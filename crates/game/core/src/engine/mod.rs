//! Turn sequencing and intent resolution.
//!
//! The [`GameEngine`] is the single mutator of [`GameState`]. Intents are
//! queued by [`GameEngine::submit`] and resolved strictly one at a time by
//! [`GameEngine::tick`]: a queued intent only starts once the previous one's
//! walk or projectile flight has fully settled, so results always apply in
//! submission order.

mod errors;
mod turns;

pub use errors::TurnError;

use crate::action::{
    ActionOutcome, ActionTransition, AttackAction, Intent, IntentError, MoveAction, QueuedIntent,
    SpeakAction,
};
use crate::combat::{ProjectileOutcome, step_projectile};
use crate::config::GameConfig;
use crate::state::{
    Animation, EntityId, EntityKind, GameState, HistoricEntry, Position, Team,
};

/// Where the engine stands between ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// The active agent may submit another intent.
    WaitingForInput,
    /// Queued intents wait for resolution.
    ActionPending,
    /// A walk or projectile flight is in progress.
    AnimationPlaying,
    /// Slots are spent; the next tick hands the turn over.
    TurnComplete,
    /// A winner is declared; the world is frozen.
    GameOver,
}

/// State changes produced by one tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineEvent {
    /// A queued intent failed validation at resolution. No slot consumed.
    IntentRejected {
        actor: EntityId,
        intent: Intent,
        error: IntentError,
    },
    /// A queued intent was applied and consumed a slot.
    ActionResolved {
        actor: EntityId,
        intent: Intent,
        action_index: u8,
        outcome: ActionOutcome,
    },
    /// A slot was spent without any world effect.
    ActionForfeited { actor: EntityId, action_index: u8 },
    /// One step of an in-progress walk.
    AgentMoved {
        agent: EntityId,
        from: Position,
        to: Position,
    },
    /// A walk ended before its destination because the next cell was taken.
    MoveInterrupted { agent: EntityId, at: Position },
    ProjectileResolved {
        projectile: EntityId,
        outcome: ProjectileOutcome,
    },
    AgentEliminated { agent: EntityId, team: Team },
    TurnStarted { agent: EntityId, round: u32 },
    GameOver { winner: Team },
}

/// Result of a single [`GameEngine::tick`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub events: Vec<EngineEvent>,
    /// Phase after the tick.
    pub phase: TurnPhase,
}

/// Game engine that owns every world mutation.
///
/// Borrowing the state mutably for the engine's lifetime keeps a single
/// writer; callers build a short-lived engine per operation.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self { state, config }
    }

    pub fn state(&self) -> &GameState {
        self.state
    }

    pub fn phase(&self) -> TurnPhase {
        if self.state.winner.is_some() {
            TurnPhase::GameOver
        } else if self.state.animation.is_some() {
            TurnPhase::AnimationPlaying
        } else if !self.state.pending.is_empty() {
            TurnPhase::ActionPending
        } else if self.turn_finished() {
            TurnPhase::TurnComplete
        } else {
            TurnPhase::WaitingForInput
        }
    }

    /// Action slots the active agent can still fill, counting queued intents.
    pub fn free_slots(&self) -> u8 {
        let used = usize::from(self.state.turn.actions_taken) + self.state.pending.len();
        usize::from(self.config.actions_per_turn)
            .saturating_sub(used)
            .try_into()
            .unwrap_or(u8::MAX)
    }

    /// Queues an intent for the active agent.
    ///
    /// Only structural checks happen here: the game is running, a slot is
    /// free, every named cell is on the board, and speak messages are not
    /// empty. Whether the intent succeeds is decided when it is resolved.
    pub fn submit(&mut self, intent: Intent, rationale: Option<String>) -> Result<(), IntentError> {
        if self.state.winner.is_some() {
            return Err(IntentError::GameOver);
        }
        let actor = self.state.turn.active.ok_or(IntentError::NoActiveAgent)?;
        if self.free_slots() == 0 {
            return Err(IntentError::NoActionsLeft { actor });
        }
        if let Some(cell) = intent.cell() {
            if !self.state.board.contains(cell) {
                return Err(IntentError::OutOfBounds { cell });
            }
        }
        if let Intent::Speak(_, message) = &intent {
            if message.trim().is_empty() {
                return Err(IntentError::EmptyMessage);
            }
        }

        self.state.pending.push_back(QueuedIntent {
            actor,
            intent,
            rationale,
        });
        Ok(())
    }

    /// Spends one slot of the active agent without touching the world.
    ///
    /// Used when a decision never arrives or cannot be parsed. Recorded in
    /// the agent's log as `PASS`.
    pub fn forfeit_action(&mut self) -> Result<EngineEvent, TurnError> {
        if self.state.winner.is_some() {
            return Err(TurnError::GameOver);
        }
        let actor = self.state.turn.active.ok_or(TurnError::NoActiveAgent)?;
        if self.free_slots() == 0 {
            return Err(TurnError::NoActionsLeft { agent: actor });
        }

        let action_index = self.state.turn.actions_taken;
        let turn = self.state.turn.round;
        let agent = self
            .state
            .agent_mut(actor)
            .ok_or(TurnError::UnknownAgent(actor))?;
        agent.thinking = false;
        agent.historic.push(HistoricEntry {
            turn,
            action_index,
            rationale: None,
            action: "PASS".to_string(),
        });
        self.state.turn.actions_taken += 1;
        Ok(EngineEvent::ActionForfeited {
            actor,
            action_index,
        })
    }

    /// Marks whether a decision request for `agent` is outstanding.
    pub fn set_thinking(&mut self, agent: EntityId, thinking: bool) -> Result<(), TurnError> {
        let agent = self
            .state
            .agent_mut(agent)
            .ok_or(TurnError::UnknownAgent(agent))?;
        agent.thinking = thinking;
        Ok(())
    }

    /// Advances the simulation by exactly one step.
    ///
    /// Transient effects decay first. Then, in priority order: the running
    /// walk or projectile advances; otherwise the oldest queued intent is
    /// resolved; otherwise the turn passes if the active agent is done.
    pub fn tick(&mut self) -> TickReport {
        let mut events = Vec::new();
        self.decay_effects();

        if self.state.winner.is_none() {
            if let Some(animation) = self.state.animation {
                self.step_animation(animation, &mut events);
            } else if let Some(queued) = self.state.pending.pop_front() {
                self.resolve(queued, &mut events);
            } else if self.turn_finished() {
                self.advance_turn(&mut events);
            }
        }

        TickReport {
            events,
            phase: self.phase(),
        }
    }

    /// Ticks until the engine waits for input, the game ends, or `max_ticks`
    /// ticks have run. Returns every event produced.
    pub fn settle(&mut self, max_ticks: usize) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        for _ in 0..max_ticks {
            if matches!(
                self.phase(),
                TurnPhase::WaitingForInput | TurnPhase::GameOver
            ) {
                break;
            }
            events.extend(self.tick().events);
        }
        events
    }

    fn decay_effects(&mut self) {
        for effect in &mut self.state.effects {
            effect.remaining_ticks = effect.remaining_ticks.saturating_sub(1);
        }
        self.state.effects.retain(|e| e.remaining_ticks > 0);
    }

    fn resolve(&mut self, queued: QueuedIntent, events: &mut Vec<EngineEvent>) {
        let QueuedIntent {
            actor,
            intent,
            rationale,
        } = queued;

        let result = if self.state.turn.active != Some(actor) {
            Err(IntentError::NotActive { actor })
        } else if self.state.turn.actions_taken >= self.config.actions_per_turn {
            Err(IntentError::NoActionsLeft { actor })
        } else {
            match &intent {
                Intent::Move(cell) => MoveAction::new(actor, *cell).execute(self.state, self.config),
                Intent::Attack(cell) => {
                    AttackAction::new(actor, *cell).execute(self.state, self.config)
                }
                Intent::Speak(cell, message) => {
                    SpeakAction::new(actor, *cell, message.clone()).execute(self.state, self.config)
                }
            }
        };

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(error) => {
                events.push(EngineEvent::IntentRejected {
                    actor,
                    intent,
                    error,
                });
                return;
            }
        };

        let action_index = self.state.turn.actions_taken;
        self.state.turn.actions_taken += 1;
        self.state.nonce += 1;
        self.state.animation = match outcome {
            ActionOutcome::Moved { remaining, .. } if remaining > 0 => {
                Some(Animation::Moving { agent: actor })
            }
            ActionOutcome::Fired { projectile, .. } => Some(Animation::Projectile { id: projectile }),
            _ => None,
        };

        let turn = self.state.turn.round;
        if let Some(agent) = self.state.agent_mut(actor) {
            agent.historic.push(HistoricEntry {
                turn,
                action_index,
                rationale,
                action: intent.to_string(),
            });
        }

        events.push(EngineEvent::ActionResolved {
            actor,
            intent,
            action_index,
            outcome,
        });
        self.evaluate_win(events);
    }

    fn step_animation(&mut self, animation: Animation, events: &mut Vec<EngineEvent>) {
        match animation {
            Animation::Moving { agent } => self.step_walk(agent, events),
            Animation::Projectile { id } => self.step_flight(id, events),
        }
    }

    fn step_walk(&mut self, agent: EntityId, events: &mut Vec<EngineEvent>) {
        let next = self
            .state
            .agent(agent)
            .filter(|a| a.is_alive())
            .and_then(|a| a.path.front().copied().map(|cell| (a.position, cell)));
        let Some((from, to)) = next else {
            self.state.animation = None;
            return;
        };

        let blocked = self.state.occupant_at(to).is_some_and(|occupant| {
            !(occupant.kind == EntityKind::Agent && occupant.id == agent)
        });
        let Some(walker) = self.state.agent_mut(agent) else {
            self.state.animation = None;
            return;
        };

        if blocked {
            walker.path.clear();
            self.state.animation = None;
            events.push(EngineEvent::MoveInterrupted { agent, at: from });
            return;
        }

        walker.path.pop_front();
        walker.position = to;
        let done = walker.path.is_empty();
        events.push(EngineEvent::AgentMoved { agent, from, to });
        if done {
            self.state.animation = None;
        }
    }

    fn step_flight(&mut self, id: EntityId, events: &mut Vec<EngineEvent>) {
        let Some(outcome) = step_projectile(self.state, id, self.config) else {
            self.state.animation = None;
            return;
        };

        if outcome.is_terminal() {
            self.state.animation = None;
        }
        if let ProjectileOutcome::Hit {
            entity,
            eliminated: true,
            ..
        } = &outcome
        {
            if entity.kind == EntityKind::Agent {
                if let Some(agent) = self.state.agent(entity.id) {
                    events.push(EngineEvent::AgentEliminated {
                        agent: agent.id,
                        team: agent.team,
                    });
                }
            }
        }
        let hit = matches!(outcome, ProjectileOutcome::Hit { .. });
        events.push(EngineEvent::ProjectileResolved {
            projectile: id,
            outcome,
        });
        if hit {
            self.evaluate_win(events);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    fn duel() -> (GameState, EntityId, EntityId) {
        let mut state = GameState::empty(Board::new(10), 5);
        let red = state
            .add_agent(Team::Red, Position::new(0, 0), 100)
            .expect("red");
        let blue = state
            .add_agent(Team::Blue, Position::new(5, 5), 100)
            .expect("blue");
        (state, red, blue)
    }

    #[test]
    fn submit_counts_queued_intents_against_slots() {
        let (mut state, _, _) = duel();
        let config = GameConfig::default().with_actions_per_turn(2);
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        engine
            .submit(Intent::Move(Position::new(0, 1)), None)
            .expect("first");
        engine
            .submit(Intent::Move(Position::new(0, 2)), None)
            .expect("second");
        let err = engine
            .submit(Intent::Move(Position::new(0, 3)), None)
            .expect_err("full");
        assert!(matches!(err, IntentError::NoActionsLeft { .. }));
        assert_eq!(engine.phase(), TurnPhase::ActionPending);
    }

    #[test]
    fn submit_rejects_structural_errors() {
        let (mut state, _, _) = duel();
        let config = GameConfig::default();
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        assert_eq!(
            engine.submit(Intent::Move(Position::new(11, 0)), None),
            Err(IntentError::OutOfBounds {
                cell: Position::new(11, 0)
            })
        );
        assert_eq!(
            engine.submit(Intent::Speak(Position::new(1, 0), " ".to_string()), None),
            Err(IntentError::EmptyMessage)
        );
        // Unreachable targets are only discovered at resolution.
        assert_eq!(
            engine.submit(Intent::Attack(Some(Position::new(9, 9))), None),
            Ok(())
        );
    }

    #[test]
    fn failed_intent_consumes_no_slot() {
        let (mut state, red, _) = duel();
        let config = GameConfig::default();
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        engine
            .submit(Intent::Attack(Some(Position::new(9, 9))), None)
            .expect("queued");
        let report = engine.tick();
        assert!(matches!(
            report.events.as_slice(),
            [EngineEvent::IntentRejected {
                error: IntentError::NotVisibleEnemy { .. },
                ..
            }]
        ));
        assert_eq!(report.phase, TurnPhase::WaitingForInput);
        assert_eq!(engine.state().turn.actions_taken, 0);
        assert!(engine.state().agent(red).is_some_and(|a| a.historic.is_empty()));
    }

    #[test]
    fn walk_advances_one_cell_per_tick() {
        let (mut state, red, _) = duel();
        let config = GameConfig::default();
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        engine
            .submit(Intent::Move(Position::new(0, 3)), Some("advance".to_string()))
            .expect("queued");
        let report = engine.tick();
        assert_eq!(report.phase, TurnPhase::AnimationPlaying);
        assert_eq!(engine.state().turn.actions_taken, 1);
        assert_eq!(engine.state().agent(red).map(|a| a.position), Some(Position::new(0, 1)));

        engine.tick();
        engine.tick();
        let agent = engine.state().agent(red).expect("red");
        assert_eq!(agent.position, Position::new(0, 3));
        assert!(agent.path.is_empty());
        assert_eq!(engine.phase(), TurnPhase::WaitingForInput);
        assert_eq!(
            agent.historic,
            vec![HistoricEntry {
                turn: 1,
                action_index: 0,
                rationale: Some("advance".to_string()),
                action: "MOVE [0, 3]".to_string(),
            }]
        );
    }

    #[test]
    fn turn_passes_after_last_slot() {
        let (mut state, red, blue) = duel();
        let config = GameConfig::default().with_actions_per_turn(1);
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();
        assert_eq!(engine.state().turn.active, Some(red));

        let event = engine.forfeit_action().expect("forfeit");
        assert_eq!(
            event,
            EngineEvent::ActionForfeited {
                actor: red,
                action_index: 0
            }
        );
        assert_eq!(engine.phase(), TurnPhase::TurnComplete);

        let report = engine.tick();
        assert_eq!(
            report.events,
            vec![EngineEvent::TurnStarted {
                agent: blue,
                round: 1
            }]
        );
        assert_eq!(engine.state().turn.actions_taken, 0);

        engine.forfeit_action().expect("forfeit");
        let report = engine.tick();
        assert_eq!(
            report.events,
            vec![EngineEvent::TurnStarted {
                agent: red,
                round: 2
            }]
        );
        assert_eq!(
            engine.state().agent(red).map(|a| a.historic[0].action.as_str()),
            Some("PASS")
        );
    }

    #[test]
    fn forfeit_respects_queued_intents() {
        let (mut state, _, _) = duel();
        let config = GameConfig::default().with_actions_per_turn(1);
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        engine
            .submit(Intent::Move(Position::new(1, 0)), None)
            .expect("queued");
        assert!(matches!(
            engine.forfeit_action(),
            Err(TurnError::NoActionsLeft { .. })
        ));
    }

    #[test]
    fn thinking_flag_toggles() {
        let (mut state, red, _) = duel();
        let config = GameConfig::default();
        let mut engine = GameEngine::new(&mut state, &config);
        engine.set_thinking(red, true).expect("known agent");
        assert!(engine.state().agent(red).is_some_and(|a| a.thinking));
        assert_eq!(
            engine.set_thinking(EntityId(999), true),
            Err(TurnError::UnknownAgent(EntityId(999)))
        );
    }

    #[test]
    fn effects_decay_each_tick() {
        let (mut state, red, _) = duel();
        state.effects.push(crate::state::TransientEffect {
            kind: crate::state::EffectKind::Shake { entity: red },
            remaining_ticks: 2,
        });
        let config = GameConfig::default();
        let mut engine = GameEngine::new(&mut state, &config);
        engine.reset_turn_order();

        engine.tick();
        assert_eq!(engine.state().effects.len(), 1);
        engine.tick();
        assert!(engine.state().effects.is_empty());
    }
}

use super::transition::living_actor;
use super::{ActionOutcome, ActionTransition, IntentError};
use crate::config::GameConfig;
use crate::sight::compute_sight;
use crate::state::{
    EffectKind, EntityId, EntityKind, GameState, Message, Position, TransientEffect,
};

/// Deliver a message to a visible teammate.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpeakAction {
    pub actor: EntityId,
    pub recipient_cell: Position,
    pub message: String,
}

impl SpeakAction {
    pub fn new(actor: EntityId, recipient_cell: Position, message: impl Into<String>) -> Self {
        Self {
            actor,
            recipient_cell,
            message: message.into(),
        }
    }

    fn recipient(&self, state: &GameState, config: &GameConfig) -> Result<EntityId, IntentError> {
        let agent = living_actor(state, self.actor)?;
        if self.message.trim().is_empty() {
            return Err(IntentError::EmptyMessage);
        }
        if !state.board.contains(self.recipient_cell) {
            return Err(IntentError::OutOfBounds {
                cell: self.recipient_cell,
            });
        }

        compute_sight(state, self.actor, config)
            .into_iter()
            .filter(|entity| entity.kind == EntityKind::Agent)
            .filter(|entity| state.team_of(*entity) == Some(agent.team))
            .find(|entity| state.position_of(*entity) == Some(self.recipient_cell))
            .map(|entity| entity.id)
            .ok_or(IntentError::NotVisibleTeammate {
                cell: self.recipient_cell,
            })
    }
}

impl ActionTransition for SpeakAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), IntentError> {
        self.recipient(state, config).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<ActionOutcome, IntentError> {
        let recipient = self.recipient(state, config)?;
        let from = living_actor(state, self.actor)?.position;
        let turn = state.turn.round;

        let agent = state
            .agent_mut(recipient)
            .ok_or(IntentError::ActorNotFound(recipient))?;
        agent.messages.push(Message {
            turn,
            sender: self.actor,
            position: from,
            message: self.message.trim().to_string(),
        });

        state.effects.push(TransientEffect {
            kind: EffectKind::Connection {
                from,
                to: self.recipient_cell,
            },
            remaining_ticks: config.connection_ticks,
        });

        Ok(ActionOutcome::Spoke {
            recipient,
            from,
            to: self.recipient_cell,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::state::Team;

    #[test]
    fn delivers_to_visible_teammate() {
        let mut state = GameState::empty(Board::new(10), 0);
        let sender = state
            .add_agent(Team::Blue, Position::new(0, 0), 100)
            .expect("sender");
        let mate = state
            .add_agent(Team::Blue, Position::new(0, 2), 100)
            .expect("mate");
        state.turn.round = 3;

        let outcome = SpeakAction::new(sender, Position::new(0, 2), " push left ")
            .execute(&mut state, &GameConfig::default())
            .expect("speak");

        assert_eq!(
            outcome,
            ActionOutcome::Spoke {
                recipient: mate,
                from: Position::new(0, 0),
                to: Position::new(0, 2),
            }
        );
        let messages = &state.agent(mate).expect("mate").messages;
        assert_eq!(
            messages,
            &vec![Message {
                turn: 3,
                sender,
                position: Position::new(0, 0),
                message: "push left".to_string(),
            }]
        );
        assert_eq!(state.effects.len(), 1);
    }

    #[test]
    fn enemies_and_empty_messages_are_refused() {
        let mut state = GameState::empty(Board::new(10), 0);
        let sender = state
            .add_agent(Team::Blue, Position::new(0, 0), 100)
            .expect("sender");
        state
            .add_agent(Team::Red, Position::new(1, 0), 100)
            .expect("enemy");
        let config = GameConfig::default();

        let err = SpeakAction::new(sender, Position::new(1, 0), "hello")
            .pre_validate(&state, &config)
            .expect_err("enemy");
        assert_eq!(
            err,
            IntentError::NotVisibleTeammate {
                cell: Position::new(1, 0)
            }
        );

        let err = SpeakAction::new(sender, Position::new(1, 0), "   ")
            .pre_validate(&state, &config)
            .expect_err("empty");
        assert_eq!(err, IntentError::EmptyMessage);
    }
}

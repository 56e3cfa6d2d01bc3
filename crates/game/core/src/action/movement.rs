use super::transition::living_actor;
use super::{ActionOutcome, ActionTransition, IntentError};
use crate::config::GameConfig;
use crate::pathfinding::find_path;
use crate::state::{EntityId, GameState, Position};

/// Walk to `destination` along the shortest free route.
///
/// Only a successful route consumes an action. The agent steps onto the first
/// cell on resolution; the rest of the route is walked one cell per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveAction {
    pub actor: EntityId,
    pub destination: Position,
}

impl MoveAction {
    pub fn new(actor: EntityId, destination: Position) -> Self {
        Self { actor, destination }
    }

    /// Route from the actor's cell to the destination, excluding the start.
    pub fn plan(
        &self,
        state: &GameState,
        config: &GameConfig,
    ) -> Result<Vec<Position>, IntentError> {
        let agent = living_actor(state, self.actor)?;
        if !state.board.contains(self.destination) {
            return Err(IntentError::OutOfBounds {
                cell: self.destination,
            });
        }

        let blocked = state.occupied_cells(Some(self.actor));
        let path = find_path(&state.board, agent.position, self.destination, &blocked);
        if path.is_empty() {
            return Err(IntentError::Unreachable {
                from: agent.position,
                to: self.destination,
            });
        }

        if let Some(range) = config.move_range {
            let length = path.len() as u32;
            if length > range {
                return Err(IntentError::OutOfRange { length, range });
            }
        }
        Ok(path)
    }
}

impl ActionTransition for MoveAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), IntentError> {
        self.plan(state, config).map(|_| ())
    }

    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<ActionOutcome, IntentError> {
        let path = self.plan(state, config)?;
        let agent = state
            .agent_mut(self.actor)
            .ok_or(IntentError::ActorNotFound(self.actor))?;
        let from = agent.position;
        let Some((&to, rest)) = path.split_first() else {
            return Err(IntentError::Unreachable {
                from,
                to: self.destination,
            });
        };

        agent.position = to;
        agent.path = rest.iter().copied().collect();

        Ok(ActionOutcome::Moved {
            from,
            to,
            destination: self.destination,
            remaining: agent.path.len(),
        })
    }
}

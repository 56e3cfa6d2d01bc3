use super::{ActionOutcome, IntentError};
use crate::config::GameConfig;
use crate::state::{AgentState, EntityId, GameState};

/// Defines how a concrete action variant mutates game state.
///
/// `pre_validate` sees the state **before** mutation and must stay side-effect
/// free. `apply` may assume `pre_validate` already succeeded.
pub trait ActionTransition {
    /// Entity performing the action.
    fn actor(&self) -> EntityId;

    /// Validates pre-conditions using the state before mutation.
    fn pre_validate(&self, _state: &GameState, _config: &GameConfig) -> Result<(), IntentError> {
        Ok(())
    }

    /// Applies the action by mutating the game state directly.
    fn apply(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<ActionOutcome, IntentError>;

    /// Runs both phases in order.
    fn execute(
        &self,
        state: &mut GameState,
        config: &GameConfig,
    ) -> Result<ActionOutcome, IntentError> {
        self.pre_validate(state, config)?;
        self.apply(state, config)
    }
}

/// Looks up a living actor, mapping absence and death to typed errors.
pub(crate) fn living_actor(state: &GameState, actor: EntityId) -> Result<&AgentState, IntentError> {
    let agent = state
        .agent(actor)
        .ok_or(IntentError::ActorNotFound(actor))?;
    if !agent.is_alive() {
        return Err(IntentError::ActorDead(actor));
    }
    Ok(agent)
}

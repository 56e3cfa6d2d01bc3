use super::transition::living_actor;
use super::{ActionOutcome, ActionTransition, IntentError};
use crate::config::GameConfig;
use crate::env::{PcgRng, RngOracle, compute_seed};
use crate::sight::compute_sight;
use crate::state::{EntityId, EntityKind, GameState, Position, Projectile};

/// Fire a projectile at a visible enemy agent or target, or at a random cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackAction {
    pub actor: EntityId,
    /// `None` requests a wild shot.
    pub target: Option<Position>,
}

impl AttackAction {
    const CONTEXT_WILD_X: u32 = 0;
    const CONTEXT_WILD_Y: u32 = 1;

    pub fn new(actor: EntityId, target: Option<Position>) -> Self {
        Self { actor, target }
    }

    /// Random in-bounds cell drawn from the action's seed.
    fn wild_cell(&self, state: &GameState) -> Position {
        let size = state.board.size;
        let rng = PcgRng;
        let seed_x = compute_seed(state.game_seed, state.nonce, self.actor.0, Self::CONTEXT_WILD_X);
        let seed_y = compute_seed(state.game_seed, state.nonce, self.actor.0, Self::CONTEXT_WILD_Y);
        Position::new(
            rng.range_i32(seed_x, -size, size),
            rng.range_i32(seed_y, -size, size),
        )
    }
}

impl ActionTransition for AttackAction {
    fn actor(&self) -> EntityId {
        self.actor
    }

    fn pre_validate(&self, state: &GameState, config: &GameConfig) -> Result<(), IntentError> {
        let agent = living_actor(state, self.actor)?;
        let Some(cell) = self.target else {
            return Ok(());
        };
        if !state.board.contains(cell) {
            return Err(IntentError::OutOfBounds { cell });
        }

        let enemy = agent.team.opponent();
        let visible = compute_sight(state, self.actor, config)
            .into_iter()
            .filter(|entity| matches!(entity.kind, EntityKind::Agent | EntityKind::Target))
            .filter(|entity| state.team_of(*entity) == Some(enemy))
            .any(|entity| state.position_of(entity) == Some(cell));
        if !visible {
            return Err(IntentError::NotVisibleEnemy { cell });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        _config: &GameConfig,
    ) -> Result<ActionOutcome, IntentError> {
        let origin = living_actor(state, self.actor)?.position;
        let target = match self.target {
            Some(cell) => cell,
            None => self.wild_cell(state),
        };

        let id = state.allocate_entity_id();
        state
            .projectiles
            .push(Projectile::new(id, self.actor, origin, target));

        Ok(ActionOutcome::Fired {
            projectile: id,
            target,
            wild: self.target.is_none(),
        })
    }
}

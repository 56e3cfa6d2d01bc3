//! Seeded world generation.

use super::{GameState, InitializationError, Position, Team};
use crate::config::GameConfig;
use crate::engine::GameEngine;
use crate::env::SeedStream;

fn take(free: &mut Vec<Position>, index: usize) -> Option<Position> {
    (index < free.len()).then(|| free.swap_remove(index))
}

fn chebyshev(a: Position, b: Position) -> u32 {
    a.x.abs_diff(b.x).max(a.y.abs_diff(b.y))
}

impl GameState {
    /// Builds a fresh world from `seed`.
    ///
    /// Targets land on random cells, each team's agents spawn inside the
    /// `spawn_range` square around their own target, and obstacles fill
    /// random remaining cells. The turn order alternates teams and every
    /// agent starts with its sight computed.
    pub fn generate(config: &GameConfig, seed: u64) -> Result<Self, InitializationError> {
        let board = config.board();
        let mut free: Vec<Position> = board.cells().collect();
        let available = free.len();
        let required =
            2 + 2 * usize::from(config.agents_per_team) + usize::from(config.obstacle_count);
        let too_small = InitializationError::BoardTooSmall {
            available,
            required,
        };
        if required > available {
            return Err(too_small);
        }

        let mut rng = SeedStream::new(seed, 0, 0);
        let mut state = GameState::empty(board, seed);

        for team in [Team::Red, Team::Blue] {
            let index = rng.index(free.len());
            let cell = take(&mut free, index).ok_or_else(|| too_small.clone())?;
            state.add_target(team, cell, config.target_life)?;
        }

        for team in [Team::Red, Team::Blue] {
            let anchor = state
                .target_of(team)
                .map(|t| t.position)
                .ok_or(InitializationError::NoSpawnCell { team })?;
            let range = config.spawn_range.unsigned_abs();

            for _ in 0..config.agents_per_team {
                let spawn: Vec<usize> = free
                    .iter()
                    .enumerate()
                    .filter(|(_, cell)| chebyshev(**cell, anchor) <= range)
                    .map(|(i, _)| i)
                    .collect();
                if spawn.is_empty() {
                    return Err(InitializationError::NoSpawnCell { team });
                }
                let index = spawn[rng.index(spawn.len())];
                let cell = take(&mut free, index).ok_or(InitializationError::NoSpawnCell { team })?;
                state.add_agent(team, cell, config.agent_life)?;
            }
        }

        for _ in 0..config.obstacle_count {
            let index = rng.index(free.len());
            let cell = take(&mut free, index).ok_or_else(|| too_small.clone())?;
            state.add_obstacle(cell)?;
        }

        GameEngine::new(&mut state, config).reset_turn_order();
        Ok(state)
    }
}

//! Enumerate the intents an agent can currently perform.
//!
//! The lists feed decision providers: moves to cells reachable within the
//! suggested radius, attacks on every visible enemy agent or target, and
//! speaks to every visible teammate.

use crate::config::GameConfig;
use crate::pathfinding::reachable_cells;
use crate::sight::compute_sight;
use crate::state::{EntityId, EntityKind, GameState, Position};

/// Legal intents grouped by kind. Speak messages are left for the caller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LegalIntents {
    pub moves: Vec<Position>,
    pub attacks: Vec<Position>,
    pub speaks: Vec<Position>,
}

impl LegalIntents {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty() && self.attacks.is_empty() && self.speaks.is_empty()
    }

    /// Wire strings offered to decision providers.
    pub fn to_strings(&self) -> Vec<String> {
        let moves = self.moves.iter().map(|cell| format!("MOVE {cell}"));
        let attacks = self.attacks.iter().map(|cell| format!("ATTACK {cell}"));
        let speaks = self
            .speaks
            .iter()
            .map(|cell| format!("SPEAK {cell} <message>"));
        moves.chain(attacks).chain(speaks).collect()
    }
}

/// Legal intents for `agent` against the current world.
///
/// Returns an empty set for unknown or dead agents.
pub fn legal_intents(state: &GameState, agent: EntityId, config: &GameConfig) -> LegalIntents {
    let Some(actor) = state.agent(agent).filter(|a| a.is_alive()) else {
        return LegalIntents::default();
    };

    let radius = match config.move_range {
        Some(range) => range.min(config.suggested_move_radius),
        None => config.suggested_move_radius,
    };
    let blocked = state.occupied_cells(Some(agent));
    let moves = reachable_cells(&state.board, actor.position, radius, &blocked);

    let mut attacks = Vec::new();
    let mut speaks = Vec::new();
    for entity in compute_sight(state, agent, config) {
        let (Some(team), Some(cell)) = (state.team_of(entity), state.position_of(entity)) else {
            continue;
        };
        if team != actor.team {
            attacks.push(cell);
        } else if entity.kind == EntityKind::Agent {
            speaks.push(cell);
        }
    }

    LegalIntents {
        moves,
        attacks,
        speaks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::state::Team;

    #[test]
    fn lists_moves_attacks_and_speaks() {
        let mut state = GameState::empty(Board::new(10), 0);
        let me = state
            .add_agent(Team::Red, Position::new(0, 0), 100)
            .expect("me");
        state
            .add_agent(Team::Red, Position::new(0, 4), 100)
            .expect("mate");
        state
            .add_agent(Team::Blue, Position::new(4, 0), 100)
            .expect("enemy");
        state
            .add_target(Team::Blue, Position::new(-4, 0), 200)
            .expect("enemy target");
        state
            .add_target(Team::Red, Position::new(0, -4), 200)
            .expect("own target");

        let config = GameConfig::default();
        let legal = legal_intents(&state, me, &config);

        assert_eq!(legal.moves.len(), 24);
        assert_eq!(legal.attacks, vec![Position::new(4, 0), Position::new(-4, 0)]);
        assert_eq!(legal.speaks, vec![Position::new(0, 4)]);

        let strings = legal.to_strings();
        assert!(strings.contains(&"ATTACK [4, 0]".to_string()));
        assert!(strings.contains(&"SPEAK [0, 4] <message>".to_string()));
        assert!(strings.contains(&"MOVE [0, 1]".to_string()));
    }

    #[test]
    fn dead_agent_has_nothing_to_do() {
        let mut state = GameState::empty(Board::new(10), 0);
        let me = state
            .add_agent(Team::Red, Position::new(0, 0), 0)
            .expect("me");
        assert!(legal_intents(&state, me, &GameConfig::default()).is_empty());
    }
}

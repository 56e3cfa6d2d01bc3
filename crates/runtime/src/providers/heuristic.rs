//! Local rule-based decision provider.

use async_trait::async_trait;
use game_core::{Board, Intent, Position};

use super::AgentBrief;
use crate::api::{Decision, DecisionProvider, Result};

/// Picks an action from the brief without any remote call.
///
/// Priority: attack the nearest attackable cell, otherwise close in on the
/// enemy target (or the last place it was seen), otherwise the nearest
/// remembered enemy, otherwise the first legal move. With nothing legal it
/// fires a wild shot.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDecisionProvider;

impl HeuristicDecisionProvider {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core, shared with callers that already hold a brief.
    pub fn choose(&self, brief: &AgentBrief) -> Decision {
        let legal: Vec<Intent> = brief
            .possible_actions
            .iter()
            .filter_map(|action| action.parse().ok())
            .collect();

        let attack = legal
            .iter()
            .filter_map(|intent| match intent {
                Intent::Attack(Some(cell)) => Some(*cell),
                _ => None,
            })
            .min_by_key(|cell| Board::manhattan(brief.position, *cell));
        if let Some(cell) = attack {
            return Decision::new(
                format!("enemy in sight at {cell}, firing"),
                Intent::Attack(Some(cell)).to_string(),
            );
        }

        let moves: Vec<Position> = legal
            .iter()
            .filter_map(|intent| match intent {
                Intent::Move(cell) => Some(*cell),
                _ => None,
            })
            .collect();

        let goal = brief.enemy_target_hint().or_else(|| {
            brief
                .last_pos_seen
                .iter()
                .map(|s| s.position)
                .min_by_key(|cell| Board::manhattan(brief.position, *cell))
        });

        if let Some(goal) = goal {
            let closest = moves
                .iter()
                .copied()
                .min_by_key(|cell| Board::manhattan(*cell, goal));
            if let Some(cell) = closest {
                return Decision::new(
                    format!("advancing toward {goal}"),
                    Intent::Move(cell).to_string(),
                );
            }
        }

        match moves.first() {
            Some(cell) => Decision::new("scouting", Intent::Move(*cell).to_string()),
            None => Decision::new("boxed in, shooting blind", Intent::Attack(None).to_string()),
        }
    }
}

#[async_trait]
impl DecisionProvider for HeuristicDecisionProvider {
    async fn decide(&self, brief: &AgentBrief) -> Result<Decision> {
        Ok(self.choose(brief))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{SightingBrief, TargetBrief};
    use game_core::{EntityId, Team};

    fn brief(actions: &[&str]) -> AgentBrief {
        AgentBrief {
            agent: EntityId(1),
            callsign: "red_0".to_string(),
            team: Team::Red,
            position: Position::new(0, 0),
            life: 100,
            round: 1,
            actions_left: 4,
            friends: Vec::new(),
            enemies: Vec::new(),
            friendly_target: None,
            enemy_target: None,
            obstacles: Vec::new(),
            messages: Vec::new(),
            historic: Vec::new(),
            last_pos_seen: Vec::new(),
            possible_actions: actions.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn nearest_attack_wins() {
        let brief = brief(&["MOVE [0, 1]", "ATTACK [5, 5]", "ATTACK [2, 0]"]);
        assert_eq!(
            HeuristicDecisionProvider.choose(&brief).action,
            "ATTACK [2, 0]"
        );
    }

    #[test]
    fn moves_toward_the_enemy_target() {
        let mut brief = brief(&["MOVE [0, 1]", "MOVE [1, 0]", "MOVE [-1, 0]"]);
        brief.enemy_target = Some(TargetBrief {
            team: Team::Blue,
            position: Position::new(6, 0),
            life: 200,
        });
        assert_eq!(HeuristicDecisionProvider.choose(&brief).action, "MOVE [1, 0]");
    }

    #[test]
    fn remembered_target_guides_movement() {
        let mut brief = brief(&["MOVE [0, 1]", "MOVE [0, -1]"]);
        brief.last_pos_seen.push(SightingBrief {
            name: "target_blue".to_string(),
            position: Position::new(0, -7),
            turn: 2,
        });
        assert_eq!(HeuristicDecisionProvider.choose(&brief).action, "MOVE [0, -1]");
    }

    #[test]
    fn falls_back_to_first_move_then_wild_shot() {
        let b = brief(&["MOVE [0, 1]", "SPEAK [1, 1] <message>"]);
        assert_eq!(HeuristicDecisionProvider.choose(&b).action, "MOVE [0, 1]");

        let b = brief(&[]);
        assert_eq!(HeuristicDecisionProvider.choose(&b).action, "ATTACK");
    }
}

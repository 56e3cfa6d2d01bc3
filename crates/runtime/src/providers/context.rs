//! The serialized view of the world an agent sends to the decision service.

use serde::{Deserialize, Serialize};

use game_core::{
    EntityId, EntityKind, GameConfig, GameState, HistoricEntry, Message, Position, Team,
    compute_sight, legal_intents,
};

/// A visible agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactBrief {
    pub callsign: String,
    pub position: Position,
    pub life: i32,
}

/// A visible target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBrief {
    pub team: Team,
    pub position: Position,
    pub life: i32,
}

/// Last known position of an enemy agent or target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingBrief {
    /// Callsign for agents, `target_<team>` for targets.
    pub name: String,
    pub position: Position,
    pub turn: u32,
}

/// Everything the acting agent knows, plus the actions it may take.
///
/// Only entities inside the agent's current sight are listed; the rest of the
/// world is known through `last_pos_seen` and teammates' messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentBrief {
    pub agent: EntityId,
    pub callsign: String,
    pub team: Team,
    pub position: Position,
    pub life: i32,
    pub round: u32,
    pub actions_left: u8,
    pub friends: Vec<ContactBrief>,
    pub enemies: Vec<ContactBrief>,
    pub friendly_target: Option<TargetBrief>,
    pub enemy_target: Option<TargetBrief>,
    pub obstacles: Vec<Position>,
    pub messages: Vec<Message>,
    pub historic: Vec<HistoricEntry>,
    pub last_pos_seen: Vec<SightingBrief>,
    pub possible_actions: Vec<String>,
}

impl AgentBrief {
    /// Builds the brief for `agent` from a world snapshot.
    ///
    /// Returns `None` when the agent does not exist.
    pub fn build(state: &GameState, agent: EntityId, config: &GameConfig) -> Option<Self> {
        let actor = state.agent(agent)?;

        let mut friends = Vec::new();
        let mut enemies = Vec::new();
        let mut friendly_target = None;
        let mut enemy_target = None;
        let mut obstacles = Vec::new();

        for entity in compute_sight(state, agent, config) {
            match entity.kind {
                EntityKind::Agent => {
                    let Some(other) = state.agent(entity.id) else {
                        continue;
                    };
                    let contact = ContactBrief {
                        callsign: other.callsign.clone(),
                        position: other.position,
                        life: other.life,
                    };
                    if other.team == actor.team {
                        friends.push(contact);
                    } else {
                        enemies.push(contact);
                    }
                }
                EntityKind::Target => {
                    let Some(target) = state.target(entity.id) else {
                        continue;
                    };
                    let brief = TargetBrief {
                        team: target.team,
                        position: target.position,
                        life: target.life,
                    };
                    if target.team == actor.team {
                        friendly_target = Some(brief);
                    } else {
                        enemy_target = Some(brief);
                    }
                }
                EntityKind::Obstacle => {
                    if let Some(obstacle) = state.obstacle(entity.id) {
                        obstacles.push(obstacle.position);
                    }
                }
            }
        }

        let last_pos_seen = actor
            .last_pos_seen
            .iter()
            .filter_map(|(id, seen)| {
                let name = match (state.agent(*id), state.target(*id)) {
                    (Some(other), _) => other.callsign.clone(),
                    (None, Some(target)) => format!("target_{}", target.team),
                    (None, None) => return None,
                };
                Some(SightingBrief {
                    name,
                    position: seen.position,
                    turn: seen.turn,
                })
            })
            .collect();

        let actions_left = if state.turn.active == Some(agent) {
            let used = usize::from(state.turn.actions_taken) + state.pending.len();
            usize::from(config.actions_per_turn)
                .saturating_sub(used)
                .try_into()
                .unwrap_or(u8::MAX)
        } else {
            0
        };

        Some(Self {
            agent,
            callsign: actor.callsign.clone(),
            team: actor.team,
            position: actor.position,
            life: actor.life,
            round: state.turn.round,
            actions_left,
            friends,
            enemies,
            friendly_target,
            enemy_target,
            obstacles,
            messages: actor.messages.clone(),
            historic: actor.historic.clone(),
            last_pos_seen,
            possible_actions: legal_intents(state, agent, config).to_strings(),
        })
    }

    /// Where the enemy target is, or was last seen.
    pub fn enemy_target_hint(&self) -> Option<Position> {
        if let Some(target) = &self.enemy_target {
            return Some(target.position);
        }
        let enemy = format!("target_{}", self.team.opponent());
        self.last_pos_seen
            .iter()
            .filter(|s| s.name == enemy)
            .max_by_key(|s| s.turn)
            .map(|s| s.position)
    }
}

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::{EntityId, EntityRef, Position, Team};

/// A combatant controlled by a human or a decision provider.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentState {
    pub id: EntityId,
    pub team: Team,
    /// Stable human-readable name such as `red_0`.
    pub callsign: String,
    pub position: Position,
    pub life: i32,
    /// Remaining route of an in-progress move, excluding the current cell.
    pub path: VecDeque<Position>,
    /// Entities observed at the start of this agent's latest turn.
    pub sight: BTreeSet<EntityRef>,
    /// Last known cell of every opposing agent or target ever seen.
    pub last_pos_seen: BTreeMap<EntityId, LastSeen>,
    /// Messages received from teammates, oldest first.
    pub messages: Vec<Message>,
    /// Actions this agent resolved, oldest first.
    pub historic: Vec<HistoricEntry>,
    /// Set while a decision request for this agent is outstanding.
    pub thinking: bool,
}

impl AgentState {
    pub fn new(
        id: EntityId,
        team: Team,
        callsign: impl Into<String>,
        position: Position,
        life: i32,
    ) -> Self {
        Self {
            id,
            team,
            callsign: callsign.into(),
            position,
            life,
            path: VecDeque::new(),
            sight: BTreeSet::new(),
            last_pos_seen: BTreeMap::new(),
            messages: Vec::new(),
            historic: Vec::new(),
            thinking: false,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Per-team objective structure. Destroying it ends the game.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetState {
    pub id: EntityId,
    pub team: Team,
    pub position: Position,
    pub life: i32,
}

impl TargetState {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0
    }
}

/// Immovable blocker for movement, sight, and projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleState {
    pub id: EntityId,
    pub position: Position,
}

/// Message delivered by a Speak action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub turn: u32,
    pub sender: EntityId,
    /// Sender's cell when the message was sent.
    pub position: Position,
    pub message: String,
}

/// One resolved (or forfeited) action in an agent's log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoricEntry {
    pub turn: u32,
    /// Zero-based action slot within the turn.
    pub action_index: u8,
    pub rationale: Option<String>,
    /// Wire form of the action, or `PASS` for a forfeited slot.
    pub action: String,
}

/// Last observation of a watched entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LastSeen {
    pub position: Position,
    pub turn: u32,
}

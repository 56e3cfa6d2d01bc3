use super::EntityId;

/// Turn bookkeeping: whose turn it is and how many slots they have used.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// Round counter. Starts at 1 and increments each time `order` wraps.
    pub round: u32,

    /// Index into `order` of the active agent.
    pub index: usize,

    /// Action slots consumed by the active agent this turn.
    pub actions_taken: u8,

    /// Fixed agent order alternating teams. Dead agents stay listed and are
    /// skipped when the turn advances.
    pub order: Vec<EntityId>,

    /// The agent currently allowed to act. `None` only when no agent is alive.
    pub active: Option<EntityId>,
}

impl TurnState {
    pub fn new() -> Self {
        Self {
            round: 1,
            index: 0,
            actions_taken: 0,
            order: Vec::new(),
            active: None,
        }
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

//! Authoritative world state.
//!
//! This module owns the data structures that describe agents, targets,
//! obstacles, projectiles, and turn bookkeeping, plus the helpers to build a
//! world by hand or from a seed. Runtime layers clone or query this state but
//! mutate it exclusively through [`crate::engine::GameEngine`].
mod error;
mod generation;
pub mod types;

use std::collections::{HashSet, VecDeque};

pub use error::{InitializationError, OccupancyViolation};
pub use types::{
    AgentState, Animation, EffectKind, EntityId, EntityKind, EntityRef, HistoricEntry, LastSeen,
    Message, ObstacleState, Position, Projectile, TargetState, Team, TransientEffect, TurnState,
};

use crate::action::QueuedIntent;
use crate::board::Board;

/// Canonical snapshot of the deterministic world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Seed for every random draw. Set once when the world is created.
    pub game_seed: u64,

    /// Count of resolved actions. Mixed into random seeds so each action
    /// draws independently.
    pub nonce: u64,

    /// Sequential id allocator shared by every entity kind. Never reused.
    next_entity_id: u32,

    pub board: Board,
    pub agents: Vec<AgentState>,
    pub targets: Vec<TargetState>,
    pub obstacles: Vec<ObstacleState>,
    pub projectiles: Vec<Projectile>,
    pub effects: Vec<TransientEffect>,
    pub turn: TurnState,

    /// Submitted intents waiting for resolution, oldest first.
    pub pending: VecDeque<QueuedIntent>,

    /// Resolution step in progress. Blocks the queue until it settles.
    pub animation: Option<Animation>,

    /// Set once a team has won. The world is frozen afterwards.
    pub winner: Option<Team>,
}

impl GameState {
    /// Creates an empty world with no entities (for hand-built scenarios).
    pub fn empty(board: Board, game_seed: u64) -> Self {
        Self {
            game_seed,
            nonce: 0,
            next_entity_id: 1,
            board,
            agents: Vec::new(),
            targets: Vec::new(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            turn: TurnState::default(),
            pending: VecDeque::new(),
            animation: None,
            winner: None,
        }
    }

    /// Allocates a new unique EntityId.
    pub fn allocate_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id = self.next_entity_id.wrapping_add(1);
        id
    }

    fn ensure_free(&self, position: Position) -> Result<(), InitializationError> {
        if !self.board.contains(position) {
            return Err(InitializationError::OutOfBounds { position });
        }
        if let Some(occupant) = self.occupant_at(position) {
            return Err(InitializationError::CellOccupied { position, occupant });
        }
        Ok(())
    }

    /// Adds an agent. Its callsign is `<team>_<n>` where `n` counts the team's
    /// agents added before it.
    pub fn add_agent(
        &mut self,
        team: Team,
        position: Position,
        life: i32,
    ) -> Result<EntityId, InitializationError> {
        self.ensure_free(position)?;
        let index = self.agents.iter().filter(|a| a.team == team).count();
        let id = self.allocate_entity_id();
        self.agents.push(AgentState::new(
            id,
            team,
            format!("{team}_{index}"),
            position,
            life,
        ));
        Ok(id)
    }

    pub fn add_target(
        &mut self,
        team: Team,
        position: Position,
        life: i32,
    ) -> Result<EntityId, InitializationError> {
        if self.targets.iter().any(|t| t.team == team) {
            return Err(InitializationError::DuplicateTarget { team });
        }
        self.ensure_free(position)?;
        let id = self.allocate_entity_id();
        self.targets.push(TargetState {
            id,
            team,
            position,
            life,
        });
        Ok(id)
    }

    pub fn add_obstacle(&mut self, position: Position) -> Result<EntityId, InitializationError> {
        self.ensure_free(position)?;
        let id = self.allocate_entity_id();
        self.obstacles.push(ObstacleState { id, position });
        Ok(id)
    }

    // ===== queries =====

    pub fn agent(&self, id: EntityId) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut AgentState> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    pub fn agent_by_callsign(&self, callsign: &str) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.callsign == callsign)
    }

    pub fn target(&self, id: EntityId) -> Option<&TargetState> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn target_of(&self, team: Team) -> Option<&TargetState> {
        self.targets.iter().find(|t| t.team == team)
    }

    pub fn obstacle(&self, id: EntityId) -> Option<&ObstacleState> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn active_agent(&self) -> Option<&AgentState> {
        self.turn.active.and_then(|id| self.agent(id))
    }

    pub fn alive_agents(&self, team: Team) -> impl Iterator<Item = &AgentState> {
        self.agents
            .iter()
            .filter(move |a| a.team == team && a.is_alive())
    }

    /// Team owning an agent or target.
    pub fn team_of(&self, entity: EntityRef) -> Option<Team> {
        match entity.kind {
            EntityKind::Agent => self.agent(entity.id).map(|a| a.team),
            EntityKind::Target => self.target(entity.id).map(|t| t.team),
            EntityKind::Obstacle => None,
        }
    }

    pub fn position_of(&self, entity: EntityRef) -> Option<Position> {
        match entity.kind {
            EntityKind::Agent => self.agent(entity.id).map(|a| a.position),
            EntityKind::Target => self.target(entity.id).map(|t| t.position),
            EntityKind::Obstacle => self.obstacle(entity.id).map(|o| o.position),
        }
    }

    /// Every blocking entity with its cell: living agents, living targets,
    /// then obstacles.
    pub fn blocking_entities(&self) -> impl Iterator<Item = (EntityRef, Position)> + '_ {
        let agents = self
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| (EntityRef::agent(a.id), a.position));
        let targets = self
            .targets
            .iter()
            .filter(|t| t.is_alive())
            .map(|t| (EntityRef::target(t.id), t.position));
        let obstacles = self
            .obstacles
            .iter()
            .map(|o| (EntityRef::obstacle(o.id), o.position));
        agents.chain(targets).chain(obstacles)
    }

    /// Blocking entity standing on `position`, if any.
    pub fn occupant_at(&self, position: Position) -> Option<EntityRef> {
        self.blocking_entities()
            .find(|(_, cell)| *cell == position)
            .map(|(entity, _)| entity)
    }

    /// Cells a mover must route around. The mover's own cell is excluded.
    pub fn occupied_cells(&self, mover: Option<EntityId>) -> HashSet<Position> {
        self.blocking_entities()
            .filter(|(entity, _)| !(entity.kind == EntityKind::Agent && Some(entity.id) == mover))
            .map(|(_, cell)| cell)
            .collect()
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Verifies that no two blocking entities share a cell.
    pub fn check_occupancy(&self) -> Result<(), OccupancyViolation> {
        let mut seen: Vec<(EntityRef, Position)> = Vec::new();
        for (entity, position) in self.blocking_entities() {
            if let Some((first, _)) = seen.iter().find(|(_, cell)| *cell == position) {
                return Err(OccupancyViolation {
                    position,
                    first: *first,
                    second: entity,
                });
            }
            seen.push((entity, position));
        }
        Ok(())
    }
}

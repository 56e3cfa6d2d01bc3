use super::{EngineEvent, GameEngine};
use crate::sight::refresh_agent_sight;
use crate::state::{EntityId, Team};

/// Turn sequencing and win evaluation for GameEngine.
impl<'a> GameEngine<'a> {
    /// Rebuilds the turn order from the current agents and activates the first
    /// living one.
    ///
    /// The order alternates teams (`red_0, blue_0, red_1, ...`); a team with
    /// more agents appends its extras at the end. Every living agent gets its
    /// sight refreshed.
    pub fn reset_turn_order(&mut self) {
        let red: Vec<EntityId> = self.team_ids(Team::Red);
        let blue: Vec<EntityId> = self.team_ids(Team::Blue);
        let longest = red.len().max(blue.len());

        let mut order = Vec::with_capacity(red.len() + blue.len());
        for i in 0..longest {
            order.extend(red.get(i));
            order.extend(blue.get(i));
        }

        let turn = &mut self.state.turn;
        turn.order = order;
        turn.round = 1;
        turn.actions_taken = 0;
        turn.index = 0;
        turn.active = None;

        let first = self
            .state
            .turn
            .order
            .iter()
            .position(|id| self.is_alive(*id));
        if let Some(index) = first {
            self.state.turn.index = index;
            self.state.turn.active = self.state.turn.order.get(index).copied();
        }

        let living: Vec<EntityId> = self
            .state
            .agents
            .iter()
            .filter(|a| a.is_alive())
            .map(|a| a.id)
            .collect();
        for id in living {
            refresh_agent_sight(self.state, id, self.config);
        }
    }

    fn team_ids(&self, team: Team) -> Vec<EntityId> {
        self.state
            .agents
            .iter()
            .filter(|a| a.team == team)
            .map(|a| a.id)
            .collect()
    }

    fn is_alive(&self, id: EntityId) -> bool {
        self.state.agent(id).is_some_and(|a| a.is_alive())
    }

    /// True when the active agent must hand over: its slots are spent or it
    /// is no longer alive.
    pub(super) fn turn_finished(&self) -> bool {
        match self.state.turn.active {
            Some(id) => {
                !self.is_alive(id)
                    || self.state.turn.actions_taken >= self.config.actions_per_turn
            }
            None => false,
        }
    }

    /// Moves the turn to the next living agent in `order`, wrapping and
    /// skipping the dead. The round counter increments when the order wraps.
    pub(super) fn advance_turn(&mut self, events: &mut Vec<EngineEvent>) {
        let len = self.state.turn.order.len();
        let start = self.state.turn.index;

        let next = (1..=len).find_map(|step| {
            let raw = start + step;
            let index = raw % len;
            let id = self.state.turn.order[index];
            self.is_alive(id).then_some((raw >= len, index, id))
        });

        let Some((wrapped, index, agent)) = next else {
            self.state.turn.active = None;
            return;
        };

        let turn = &mut self.state.turn;
        if wrapped {
            turn.round += 1;
        }
        turn.index = index;
        turn.active = Some(agent);
        turn.actions_taken = 0;
        let round = turn.round;

        refresh_agent_sight(self.state, agent, self.config);
        events.push(EngineEvent::TurnStarted { agent, round });
    }

    /// A team loses when all of its agents are dead or its target is
    /// destroyed. Red is checked first.
    fn defeated(&self, team: Team) -> bool {
        let mut agents = self.state.agents.iter().filter(|a| a.team == team).peekable();
        let fielded = agents.peek().is_some();
        let wiped = fielded && agents.all(|a| !a.is_alive());
        let target_down = self.state.target_of(team).is_some_and(|t| !t.is_alive());
        wiped || target_down
    }

    /// Declares a winner if one side is defeated, freezing the world.
    pub(super) fn evaluate_win(&mut self, events: &mut Vec<EngineEvent>) {
        if self.state.winner.is_some() {
            return;
        }
        let winner = if self.defeated(Team::Red) {
            Team::Blue
        } else if self.defeated(Team::Blue) {
            Team::Red
        } else {
            return;
        };

        self.state.winner = Some(winner);
        self.state.pending.clear();
        self.state.projectiles.clear();
        self.state.animation = None;
        for agent in &mut self.state.agents {
            agent.path.clear();
            agent.thinking = false;
        }
        events.push(EngineEvent::GameOver { winner });
    }
}

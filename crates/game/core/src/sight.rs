//! Visibility engine.
//!
//! Sight range is measured in Manhattan distance, inclusive. Occlusion is a
//! ray march from the observer's cell centre toward the candidate in
//! `ray_step` increments: the candidate is hidden when the ray enters another
//! in-range entity's cell box before it enters the candidate's own box.

use std::collections::BTreeSet;

use crate::board::{Board, Point};
use crate::config::GameConfig;
use crate::state::{EntityId, EntityKind, EntityRef, GameState, LastSeen, Position};

const MIN_RAY_STEP: f64 = 0.01;

/// Returns true when the ray from `start` to `end` enters `blocker`'s box
/// before reaching `end`'s box.
fn ray_blocked(start: Position, end: Position, blocker: Position, step: f64) -> bool {
    let from = Point::from(start);
    let to = Point::from(end);
    let length = from.distance(to);
    if length == 0.0 {
        return false;
    }

    let step = step.max(MIN_RAY_STEP);
    let mut k = 0u32;
    loop {
        let point = from.toward(to, step * f64::from(k));
        if point.in_cell(blocker) {
            return true;
        }
        if point.in_cell(end) {
            return false;
        }
        k += 1;
        if step * f64::from(k) > length {
            return false;
        }
    }
}

/// Clear line between two cells given a set of blocking cells.
///
/// Blockers standing on either endpoint are ignored.
pub fn line_of_sight(from: Position, to: Position, blockers: &[Position], step: f64) -> bool {
    blockers
        .iter()
        .filter(|b| **b != from && **b != to)
        .all(|b| !ray_blocked(from, to, *b, step))
}

fn candidates(
    state: &GameState,
    observer: EntityId,
    origin: Position,
    range: u32,
) -> Vec<(EntityRef, Position)> {
    state
        .blocking_entities()
        .filter(|(entity, _)| !(entity.kind == EntityKind::Agent && entity.id == observer))
        .filter(|(_, cell)| Board::manhattan(origin, *cell) <= range)
        .collect()
}

/// Entities the observer can currently see.
///
/// Returns an empty set when the observer is unknown or dead.
pub fn compute_sight(
    state: &GameState,
    observer: EntityId,
    config: &GameConfig,
) -> BTreeSet<EntityRef> {
    let Some(agent) = state.agent(observer).filter(|a| a.is_alive()) else {
        return BTreeSet::new();
    };
    let origin = agent.position;
    let candidates = candidates(state, observer, origin, config.sight_range);

    candidates
        .iter()
        .filter(|(entity, cell)| {
            !candidates
                .iter()
                .filter(|(other, _)| other != entity)
                .any(|(_, blocker)| ray_blocked(origin, *cell, *blocker, config.ray_step))
        })
        .map(|(entity, _)| *entity)
        .collect()
}

/// Board cells the observer can see, for debug overlays.
///
/// Agents and targets do not hide the cell they stand on; obstacles do.
pub fn compute_visible_cells(
    state: &GameState,
    observer: EntityId,
    config: &GameConfig,
) -> BTreeSet<Position> {
    let Some(agent) = state.agent(observer).filter(|a| a.is_alive()) else {
        return BTreeSet::new();
    };
    let origin = agent.position;
    let occluders = candidates(state, observer, origin, config.sight_range);

    state
        .board
        .cells()
        .filter(|cell| Board::manhattan(origin, *cell) <= config.sight_range)
        .filter(|cell| {
            !occluders.iter().any(|(entity, blocker)| {
                if blocker == cell && entity.kind != EntityKind::Obstacle {
                    return false;
                }
                ray_blocked(origin, *cell, *blocker, config.ray_step)
            })
        })
        .collect()
}

/// Recomputes an agent's sight and records every opposing agent or target in
/// it under `last_pos_seen`, stamped with the current round.
pub fn refresh_agent_sight(state: &mut GameState, agent: EntityId, config: &GameConfig) {
    let sight = compute_sight(state, agent, config);
    let Some(team) = state.agent(agent).map(|a| a.team) else {
        return;
    };
    let round = state.turn.round;

    let sightings: Vec<(EntityId, LastSeen)> = sight
        .iter()
        .filter(|entity| state.team_of(**entity) == Some(team.opponent()))
        .filter_map(|entity| {
            state.position_of(*entity).map(|position| {
                (
                    entity.id,
                    LastSeen {
                        position,
                        turn: round,
                    },
                )
            })
        })
        .collect();

    if let Some(observer) = state.agent_mut(agent) {
        observer.sight = sight;
        observer.last_pos_seen.extend(sightings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Team;

    fn world() -> (GameState, EntityId) {
        let mut state = GameState::empty(Board::new(10), 0);
        let observer = state
            .add_agent(Team::Red, Position::new(0, 0), 100)
            .expect("observer");
        (state, observer)
    }

    #[test]
    fn obstacle_on_line_occludes_target() {
        let (mut state, observer) = world();
        let obstacle = state.add_obstacle(Position::new(2, 0)).expect("obstacle");
        let target = state
            .add_target(Team::Blue, Position::new(4, 0), 200)
            .expect("target");

        let sight = compute_sight(&state, observer, &GameConfig::default());
        assert!(sight.contains(&EntityRef::obstacle(obstacle)));
        assert!(!sight.contains(&EntityRef::target(target)));
    }

    #[test]
    fn obstacle_off_line_restores_visibility() {
        let (mut state, observer) = world();
        state.add_obstacle(Position::new(2, 2)).expect("obstacle");
        let target = state
            .add_target(Team::Blue, Position::new(4, 0), 200)
            .expect("target");

        let sight = compute_sight(&state, observer, &GameConfig::default());
        assert!(sight.contains(&EntityRef::target(target)));
    }

    #[test]
    fn range_is_inclusive_manhattan() {
        let (mut state, observer) = world();
        let edge = state
            .add_agent(Team::Blue, Position::new(2, 1), 100)
            .expect("edge");
        let beyond = state
            .add_agent(Team::Blue, Position::new(-2, -2), 100)
            .expect("beyond");

        let config = GameConfig::default().with_sight_range(3);
        let sight = compute_sight(&state, observer, &config);
        assert!(sight.contains(&EntityRef::agent(edge)));
        assert!(!sight.contains(&EntityRef::agent(beyond)));
    }

    #[test]
    fn dead_agents_are_neither_seen_nor_blocking() {
        let (mut state, observer) = world();
        let corpse = state
            .add_agent(Team::Blue, Position::new(2, 0), 100)
            .expect("corpse");
        let target = state
            .add_target(Team::Blue, Position::new(4, 0), 200)
            .expect("target");
        if let Some(agent) = state.agent_mut(corpse) {
            agent.life = 0;
        }

        let sight = compute_sight(&state, observer, &GameConfig::default());
        assert!(!sight.contains(&EntityRef::agent(corpse)));
        assert!(sight.contains(&EntityRef::target(target)));
    }

    #[test]
    fn line_of_sight_ignores_endpoints() {
        let from = Position::new(0, 0);
        let to = Position::new(3, 0);
        assert!(line_of_sight(from, to, &[to, from], 0.1));
        assert!(!line_of_sight(from, to, &[Position::new(1, 0)], 0.1));
        assert!(line_of_sight(from, from, &[Position::new(1, 0)], 0.1));
    }

    #[test]
    fn visible_cells_hide_obstacle_cells_but_not_agents() {
        let (mut state, observer) = world();
        state.add_obstacle(Position::new(2, 0)).expect("obstacle");
        state
            .add_agent(Team::Red, Position::new(0, 2), 100)
            .expect("mate");

        let config = GameConfig::default().with_sight_range(4);
        let cells = compute_visible_cells(&state, observer, &config);
        assert!(cells.contains(&Position::new(0, 0)));
        assert!(cells.contains(&Position::new(1, 0)));
        assert!(!cells.contains(&Position::new(2, 0)));
        assert!(!cells.contains(&Position::new(3, 0)));
        assert!(cells.contains(&Position::new(0, 2)));
        assert!(!cells.contains(&Position::new(0, 3)));
        assert!(!cells.contains(&Position::new(5, 0)));
    }

    #[test]
    fn refresh_records_enemy_sightings() {
        let (mut state, observer) = world();
        let enemy = state
            .add_agent(Team::Blue, Position::new(0, 3), 100)
            .expect("enemy");
        let mate = state
            .add_agent(Team::Red, Position::new(3, 0), 100)
            .expect("mate");
        state.turn.round = 4;

        refresh_agent_sight(&mut state, observer, &GameConfig::default());
        let agent = state.agent(observer).expect("observer");
        assert_eq!(
            agent.last_pos_seen.get(&enemy),
            Some(&LastSeen {
                position: Position::new(0, 3),
                turn: 4
            })
        );
        assert!(!agent.last_pos_seen.contains_key(&mate));
        assert!(agent.sight.contains(&EntityRef::agent(mate)));
    }
}

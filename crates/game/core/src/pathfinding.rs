//! A* pathfinding over the four-connected board.
//!
//! Unit edge cost, Manhattan heuristic. Ties between equal `f` scores prefer
//! the deeper node (higher `g`), then the node pushed first, so the same
//! inputs always yield the same route.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::board::Board;
use crate::state::Position;

/// Node in the A* open set.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathNode {
    cell: Position,
    f: u32,
    g: u32,
    seq: u64,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: invert f and seq, keep g.
        other
            .f
            .cmp(&self.f)
            .then_with(|| self.g.cmp(&other.g))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a shortest route from `start` to `goal`.
///
/// The returned path excludes `start` and ends with `goal`. It is empty when
/// the goal is unreachable, blocked, out of bounds, or equal to `start`.
pub fn find_path(
    board: &Board,
    start: Position,
    goal: Position,
    blocked: &HashSet<Position>,
) -> Vec<Position> {
    if start == goal || !board.contains(goal) || blocked.contains(&goal) {
        return Vec::new();
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_scores: HashMap<Position, u32> = HashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        cell: start,
        f: Board::manhattan(start, goal),
        g: 0,
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.cell == goal {
            return reconstruct_path(&came_from, start, goal);
        }

        // Stale heap entry superseded by a cheaper route.
        if g_scores.get(&current.cell).is_some_and(|&g| current.g > g) {
            continue;
        }

        for neighbor in Board::neighbors4(current.cell) {
            if !board.contains(neighbor) || blocked.contains(&neighbor) {
                continue;
            }

            let tentative_g = current.g + 1;
            let neighbor_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.cell);
                g_scores.insert(neighbor, tentative_g);
                seq += 1;
                open_set.push(PathNode {
                    cell: neighbor,
                    f: tentative_g + Board::manhattan(neighbor, goal),
                    g: tentative_g,
                    seq,
                });
            }
        }
    }

    Vec::new()
}

fn reconstruct_path(
    came_from: &HashMap<Position, Position>,
    start: Position,
    goal: Position,
) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Cells whose shortest route from `start` has length `1..=radius`, in
/// breadth-first discovery order.
pub fn reachable_cells(
    board: &Board,
    start: Position,
    radius: u32,
    blocked: &HashSet<Position>,
) -> Vec<Position> {
    let mut seen: HashSet<Position> = HashSet::from([start]);
    let mut frontier = VecDeque::from([(start, 0u32)]);
    let mut cells = Vec::new();

    while let Some((cell, depth)) = frontier.pop_front() {
        if depth == radius {
            continue;
        }
        for neighbor in Board::neighbors4(cell) {
            if !board.contains(neighbor) || blocked.contains(&neighbor) {
                continue;
            }
            if seen.insert(neighbor) {
                cells.push(neighbor);
                frontier.push_back((neighbor, depth + 1));
            }
        }
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new(10)
    }

    #[test]
    fn open_board_path_has_manhattan_length() {
        let start = Position::new(-3, 2);
        let goal = Position::new(4, -1);
        let path = find_path(&board(), start, goal, &HashSet::new());

        assert_eq!(path.len() as u32, Board::manhattan(start, goal));
        assert_eq!(path.last(), Some(&goal));
        assert!(!path.contains(&start));
    }

    #[test]
    fn path_steps_are_adjacent() {
        let start = Position::new(0, 0);
        let goal = Position::new(3, 3);
        let path = find_path(&board(), start, goal, &HashSet::new());

        let mut prev = start;
        for cell in path {
            assert_eq!(Board::manhattan(prev, cell), 1);
            prev = cell;
        }
    }

    #[test]
    fn blocked_goal_yields_empty_path() {
        let goal = Position::new(2, 0);
        let blocked = HashSet::from([goal]);
        assert!(find_path(&board(), Position::ORIGIN, goal, &blocked).is_empty());
    }

    #[test]
    fn walled_goal_is_unreachable() {
        let goal = Position::new(5, 5);
        let blocked: HashSet<_> = Board::neighbors4(goal).into_iter().collect();
        assert!(find_path(&board(), Position::ORIGIN, goal, &blocked).is_empty());
    }

    #[test]
    fn detours_around_obstacle() {
        let blocked = HashSet::from([Position::ORIGIN]);
        let path = find_path(&board(), Position::new(-2, 0), Position::new(2, 0), &blocked);
        assert_eq!(path.len(), 6);
        assert!(!path.contains(&Position::ORIGIN));
    }

    #[test]
    fn same_inputs_same_route() {
        let blocked = HashSet::from([Position::new(1, 1), Position::new(2, 0)]);
        let a = find_path(&board(), Position::ORIGIN, Position::new(4, 3), &blocked);
        let b = find_path(&board(), Position::ORIGIN, Position::new(4, 3), &blocked);
        assert_eq!(a, b);
    }

    #[test]
    fn start_equals_goal_is_empty() {
        assert!(find_path(&board(), Position::ORIGIN, Position::ORIGIN, &HashSet::new()).is_empty());
    }

    #[test]
    fn reachable_cells_respects_radius_and_blockers() {
        let blocked = HashSet::from([Position::new(1, 0)]);
        let cells = reachable_cells(&board(), Position::ORIGIN, 1, &blocked);
        assert_eq!(
            cells,
            vec![Position::new(0, -1), Position::new(0, 1), Position::new(-1, 0)]
        );

        let open = reachable_cells(&board(), Position::ORIGIN, 2, &HashSet::new());
        assert_eq!(open.len(), 12);
        assert!(!open.contains(&Position::ORIGIN));
    }
}

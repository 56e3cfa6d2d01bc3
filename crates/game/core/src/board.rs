//! Board bounds and grid geometry primitives.

use crate::state::Position;

/// Closed square board `[-size, size]²`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Board {
    pub size: i32,
}

impl Board {
    pub const fn new(size: i32) -> Self {
        Self { size }
    }

    /// Cells per side.
    pub const fn side(&self) -> i32 {
        self.size * 2 + 1
    }

    pub fn contains(&self, cell: Position) -> bool {
        cell.x.abs() <= self.size && cell.y.abs() <= self.size
    }

    /// All cells of the board in row-major order (y outer, x inner).
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        let size = self.size;
        (-size..=size).flat_map(move |y| (-size..=size).map(move |x| Position::new(x, y)))
    }

    pub fn manhattan(a: Position, b: Position) -> u32 {
        a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
    }

    /// Orthogonal neighbours in the order up, down, left, right.
    ///
    /// The result is not filtered against the bounds.
    pub fn neighbors4(cell: Position) -> [Position; 4] {
        [
            Position::new(cell.x, cell.y - 1),
            Position::new(cell.x, cell.y + 1),
            Position::new(cell.x - 1, cell.y),
            Position::new(cell.x + 1, cell.y),
        ]
    }
}

/// Continuous board coordinate used by rays and projectiles.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Half-width of the square a cell occupies.
    pub const CELL_HALF_WIDTH: f64 = 0.5;

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point `t` units along the segment from `self` toward `to`.
    pub fn toward(self, to: Point, t: f64) -> Point {
        let length = self.distance(to);
        if length == 0.0 {
            return self;
        }
        Point::new(
            self.x + (to.x - self.x) / length * t,
            self.y + (to.y - self.y) / length * t,
        )
    }

    /// True when the point lies inside the cell's box (edges included).
    pub fn in_cell(self, cell: Position) -> bool {
        (self.x - f64::from(cell.x)).abs() <= Self::CELL_HALF_WIDTH
            && (self.y - f64::from(cell.y)).abs() <= Self::CELL_HALF_WIDTH
    }
}

impl From<Position> for Point {
    fn from(cell: Position) -> Self {
        Point::new(f64::from(cell.x), f64::from(cell.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let board = Board::new(10);
        assert!(board.contains(Position::new(10, -10)));
        assert!(board.contains(Position::ORIGIN));
        assert!(!board.contains(Position::new(11, 0)));
        assert!(!board.contains(Position::new(0, -11)));
    }

    #[test]
    fn cells_cover_the_square() {
        let board = Board::new(2);
        let cells: Vec<_> = board.cells().collect();
        assert_eq!(cells.len(), 25);
        assert_eq!(cells[0], Position::new(-2, -2));
        assert_eq!(cells[1], Position::new(-1, -2));
        assert_eq!(cells[24], Position::new(2, 2));
    }

    #[test]
    fn neighbors_follow_fixed_order() {
        let n = Board::neighbors4(Position::new(3, 3));
        assert_eq!(
            n,
            [
                Position::new(3, 2),
                Position::new(3, 4),
                Position::new(2, 3),
                Position::new(4, 3),
            ]
        );
    }

    #[test]
    fn manhattan_distance() {
        assert_eq!(Board::manhattan(Position::new(-2, 0), Position::new(2, 3)), 7);
        assert_eq!(Board::manhattan(Position::ORIGIN, Position::ORIGIN), 0);
    }

    #[test]
    fn cell_box_edges_are_inclusive() {
        let cell = Position::new(1, 1);
        assert!(Point::new(0.5, 1.5).in_cell(cell));
        assert!(!Point::new(0.49, 1.0).in_cell(cell));
    }
}

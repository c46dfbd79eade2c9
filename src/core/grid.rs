//! Grid Primitives
//!
//! Integer cell coordinates, continuous positions, and the four
//! cardinal directions used by the decision engine.
//!
//! The game world is a fixed grid. Entities report continuous positions
//! in grid units; every spatial query floors them to the containing cell.

use std::fmt;
use serde::{Serialize, Deserialize};

// =============================================================================
// DIRECTION
// =============================================================================

/// Cardinal movement direction.
///
/// Wire encoding is a single letter (`u`/`d`/`l`/`r`), matching the
/// server's control protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Up (-y).
    #[serde(rename = "u")]
    Up,
    /// Down (+y).
    #[serde(rename = "d")]
    Down,
    /// Left (-x).
    #[serde(rename = "l")]
    Left,
    /// Right (+x).
    #[serde(rename = "r")]
    Right,
}

impl Direction {
    /// All directions in fixed expansion order: up, down, left, right.
    ///
    /// This order is the tie-break for equally ranked search results and
    /// must not change.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset for one step in this direction. Y grows downward.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The opposite direction (used to suppress immediate reversals).
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Single-letter wire encoding.
    pub const fn wire_letter(self) -> &'static str {
        match self {
            Direction::Up => "u",
            Direction::Down => "d",
            Direction::Left => "l",
            Direction::Right => "r",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_letter())
    }
}

// =============================================================================
// GRID CELL
// =============================================================================

/// Integer grid cell coordinate.
///
/// Implements `Ord` so cells can key `BTreeSet`/`BTreeMap` with a
/// deterministic iteration order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPos {
    /// Column index.
    pub x: i32,
    /// Row index.
    pub y: i32,
}

impl GridPos {
    /// Create a new cell coordinate.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent cell one step in `dir`.
    #[inline]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The four adjacent cells, in fixed up/down/left/right order.
    #[inline]
    pub fn neighbors(self) -> [GridPos; 4] {
        [
            self.step(Direction::Up),
            self.step(Direction::Down),
            self.step(Direction::Left),
            self.step(Direction::Right),
        ]
    }

    /// Manhattan distance to another cell.
    #[inline]
    pub const fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// CONTINUOUS POSITION
// =============================================================================

/// Continuous position in grid units.
///
/// Players move smoothly between cells; the wire transmits their position
/// as fixed-point integers scaled by 100 which are converted to floats on
/// ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate in grid units.
    pub x: f64,
    /// Y coordinate in grid units.
    pub y: f64,
}

impl Position {
    /// Create a new position.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The grid cell containing this position (floored coordinates).
    #[inline]
    pub fn cell(self) -> GridPos {
        GridPos::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    /// Manhattan distance to another position.
    #[inline]
    pub fn manhattan(self, other: Self) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<GridPos> for Position {
    fn from(cell: GridPos) -> Self {
        Self::new(f64::from(cell.x), f64::from(cell.y))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_offsets() {
        assert_eq!(Direction::Up.offset(), (0, -1));
        assert_eq!(Direction::Down.offset(), (0, 1));
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (1, 0));
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
        }
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn test_expansion_order_is_fixed() {
        assert_eq!(
            Direction::ALL,
            [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
        );
    }

    #[test]
    fn test_direction_wire_encoding() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, "\"l\"");
        let parsed: Direction = serde_json::from_str("\"d\"").unwrap();
        assert_eq!(parsed, Direction::Down);
    }

    #[test]
    fn test_step_and_neighbors() {
        let cell = GridPos::new(3, 4);
        assert_eq!(cell.step(Direction::Up), GridPos::new(3, 3));
        assert_eq!(cell.step(Direction::Right), GridPos::new(4, 4));
        assert_eq!(
            cell.neighbors(),
            [
                GridPos::new(3, 3),
                GridPos::new(3, 5),
                GridPos::new(2, 4),
                GridPos::new(4, 4),
            ]
        );
    }

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(GridPos::new(0, 0).manhattan(GridPos::new(3, 4)), 7);
        assert_eq!(GridPos::new(5, 5).manhattan(GridPos::new(5, 5)), 0);
        assert!((Position::new(1.5, 2.0).manhattan(Position::new(0.5, 4.0)) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_floors_to_cell() {
        assert_eq!(Position::new(3.7, 2.1).cell(), GridPos::new(3, 2));
        assert_eq!(Position::new(5.0, 7.999).cell(), GridPos::new(5, 7));
    }
}

//! Core type definitions for the simulation.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grid coordinate. `row` is the `x` of the movement formulas, `col` the `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Step one cell in `direction`, or `None` when that leaves a `rows` x `cols` grid.
    pub fn step(&self, direction: Direction, rows: usize, cols: usize) -> Option<Self> {
        let (dr, dc) = direction.to_delta();
        let row = self.row.checked_add_signed(dr)?;
        let col = self.col.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some(Self { row, col })
    }

    pub fn manhattan_distance(&self, other: &Position) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.row, self.col)
    }
}

/// Orthogonal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Enumeration order used by every neighbor lookup.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// `(row, col)` offset
    pub fn to_delta(&self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }
}

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Rock,
    Rabbit,
    Fox,
}

impl CellKind {
    /// Tag used in the textual object list, `None` for empty cells.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            CellKind::Empty => None,
            CellKind::Rock => Some("ROCK"),
            CellKind::Rabbit => Some("RABBIT"),
            CellKind::Fox => Some("FOX"),
        }
    }

    /// Single-character board symbol
    pub fn symbol(&self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Rock => '*',
            CellKind::Rabbit => 'R',
            CellKind::Fox => 'F',
        }
    }

    pub fn is_animal(&self) -> bool {
        matches!(self, CellKind::Rabbit | CellKind::Fox)
    }
}

impl FromStr for CellKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ROCK" => Ok(CellKind::Rock),
            "RABBIT" => Ok(CellKind::Rabbit),
            "FOX" => Ok(CellKind::Fox),
            other => Err(Error::UnknownObject(other.to_string())),
        }
    }
}

impl fmt::Display for CellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag().unwrap_or("EMPTY"))
    }
}

/// State of one grid location.
///
/// `repro_countdown` counts generations left until the occupant may spawn and
/// is meaningful for rabbits and foxes. `food_countdown` counts generations a
/// fox may still go without eating; it stays zero for every other kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    pub repro_countdown: u32,
    pub food_countdown: u32,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        kind: CellKind::Empty,
        repro_countdown: 0,
        food_countdown: 0,
    };

    pub const ROCK: Cell = Cell {
        kind: CellKind::Rock,
        repro_countdown: 0,
        food_countdown: 0,
    };

    pub fn rabbit(repro_countdown: u32) -> Self {
        Self {
            kind: CellKind::Rabbit,
            repro_countdown,
            food_countdown: 0,
        }
    }

    pub fn fox(repro_countdown: u32, food_countdown: u32) -> Self {
        Self {
            kind: CellKind::Fox,
            repro_countdown,
            food_countdown,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == CellKind::Empty
    }

    pub fn is_rock(&self) -> bool {
        self.kind == CellKind::Rock
    }
}

/// One entry of the initial object list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: CellKind,
    pub position: Position,
}

impl Placement {
    pub fn new(kind: CellKind, row: usize, col: usize) -> Self {
        Self {
            kind,
            position: Position::new(row, col),
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_inside_grid() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::North, 3, 3), None);
        assert_eq!(corner.step(Direction::West, 3, 3), None);
        assert_eq!(corner.step(Direction::East, 3, 3), Some(Position::new(0, 1)));
        assert_eq!(corner.step(Direction::South, 3, 3), Some(Position::new(1, 0)));

        let far = Position::new(2, 2);
        assert_eq!(far.step(Direction::South, 3, 3), None);
        assert_eq!(far.step(Direction::East, 3, 3), None);
    }

    #[test]
    fn test_direction_order_and_delta() {
        assert_eq!(
            Direction::ALL,
            [Direction::North, Direction::East, Direction::South, Direction::West]
        );
        assert_eq!(Direction::North.to_delta(), (-1, 0));
        assert_eq!(Direction::East.to_delta(), (0, 1));
        assert_eq!(Direction::South.to_delta(), (1, 0));
        assert_eq!(Direction::West.to_delta(), (0, -1));
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!("RABBIT".parse::<CellKind>().unwrap(), CellKind::Rabbit);
        assert_eq!("FOX".parse::<CellKind>().unwrap(), CellKind::Fox);
        assert_eq!("ROCK".parse::<CellKind>().unwrap(), CellKind::Rock);
        assert!(matches!(
            "WOLF".parse::<CellKind>(),
            Err(Error::UnknownObject(tag)) if tag == "WOLF"
        ));
        assert_eq!(CellKind::Empty.tag(), None);
    }

    #[test]
    fn test_placement_display() {
        let placement = Placement::new(CellKind::Fox, 4, 7);
        assert_eq!(placement.to_string(), "FOX 4 7");
    }

    #[test]
    fn test_manhattan_distance() {
        let a = Position::new(0, 0);
        let b = Position::new(3, 4);
        assert_eq!(a.manhattan_distance(&b), 7);
    }
}

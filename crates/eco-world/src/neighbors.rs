//! Orthogonal neighbor lookup.

use crate::grid::Grid;
use eco_core::{CellKind, Direction, Position};

/// Up to four candidate positions, kept on the stack of the calling worker.
#[derive(Debug, Clone, Copy)]
pub struct Candidates {
    positions: [Position; 4],
    len: usize,
}

impl Candidates {
    pub fn new() -> Self {
        Self {
            positions: [Position::new(0, 0); 4],
            len: 0,
        }
    }

    fn push(&mut self, pos: Position) {
        self.positions[self.len] = pos;
        self.len += 1;
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for Candidates {
    fn default() -> Self {
        Self::new()
    }
}

/// Neighbors of `pos` holding `wanted`, in North, East, South, West order.
pub fn neighbors(grid: &Grid, pos: Position, wanted: CellKind) -> Candidates {
    let mut candidates = Candidates::new();
    for direction in Direction::ALL {
        if let Some(next) = pos.step(direction, grid.rows(), grid.cols()) {
            if grid.kind_at(next) == wanted {
                candidates.push(next);
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use eco_core::Cell;

    #[test]
    fn test_all_four_in_order() {
        let grid = Grid::allocate(3, 3).unwrap();
        let found = neighbors(&grid, Position::new(1, 1), CellKind::Empty);
        assert_eq!(
            found.as_slice(),
            &[
                Position::new(0, 1),
                Position::new(1, 2),
                Position::new(2, 1),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn test_filters_by_kind() {
        let mut grid = Grid::allocate(3, 3).unwrap();
        grid.set(Position::new(0, 1), Cell::rabbit(1));
        grid.set(Position::new(1, 0), Cell::rabbit(1));
        grid.set(Position::new(2, 1), Cell::ROCK);

        let prey = neighbors(&grid, Position::new(1, 1), CellKind::Rabbit);
        assert_eq!(prey.as_slice(), &[Position::new(0, 1), Position::new(1, 0)]);

        let free = neighbors(&grid, Position::new(1, 1), CellKind::Empty);
        assert_eq!(free.as_slice(), &[Position::new(1, 2)]);
    }

    #[test]
    fn test_corners_and_edges_stay_in_bounds() {
        let grid = Grid::allocate(4, 5).unwrap();
        for (pos, _) in grid.iter() {
            let found = neighbors(&grid, pos, CellKind::Empty);
            assert!(found.len() >= 2 && found.len() <= 4);
            for candidate in found.as_slice() {
                assert!(grid.contains(*candidate));
                assert_eq!(pos.manhattan_distance(candidate), 1);
            }
        }

        let corner = neighbors(&grid, Position::new(0, 0), CellKind::Empty);
        assert_eq!(corner.as_slice(), &[Position::new(0, 1), Position::new(1, 0)]);
    }

    #[test]
    fn test_single_cell_grid_has_no_neighbors() {
        let grid = Grid::allocate(1, 1).unwrap();
        assert!(neighbors(&grid, Position::new(0, 0), CellKind::Empty).is_empty());
    }
}

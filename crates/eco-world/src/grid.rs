//! 2D grid buffer for the world.

use eco_core::{Cell, CellKind, Error, Position, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A bounded `rows` x `cols` grid stored row-major in one flat buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Allocate an all-empty grid, reporting allocation failure instead of aborting.
    pub fn allocate(rows: usize, cols: usize) -> Result<Self> {
        let len = rows
            .checked_mul(cols)
            .filter(|&len| len > 0)
            .ok_or(Error::InvalidDimensions { rows, cols })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { cells: len })?;
        cells.resize(len, Cell::EMPTY);

        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Linear index of `pos`: `col + row * cols`
    pub fn index_of(&self, pos: Position) -> usize {
        debug_assert!(self.contains(pos), "{pos:?} outside {}x{}", self.rows, self.cols);
        pos.col + pos.row * self.cols
    }

    pub fn position_of(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    pub fn get(&self, pos: Position) -> &Cell {
        &self.cells[self.index_of(pos)]
    }

    pub fn kind_at(&self, pos: Position) -> CellKind {
        self.get(pos).kind
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        let index = self.index_of(pos);
        self.cells[index] = cell;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Iterator over all cells with positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.position_of(i), cell))
    }

    /// Non-empty cells, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.iter().filter(|(_, cell)| !cell.is_empty())
    }

    /// Clear every non-rock cell.
    pub fn reset(&mut self) {
        self.cells
            .par_iter_mut()
            .filter(|cell| !cell.is_rock())
            .for_each(|cell| *cell = Cell::EMPTY);
    }

    /// Seed this buffer for the next phase.
    ///
    /// Every non-rock cell becomes a copy of the same cell in `source` when that
    /// cell holds `preserve`, and empty otherwise. Rocks are left alone.
    pub fn prepare_for_phase(&mut self, source: &Grid, preserve: CellKind) {
        debug_assert_eq!((self.rows, self.cols), (source.rows, source.cols));

        self.cells
            .par_iter_mut()
            .zip(source.cells.par_iter())
            .filter(|(cell, _)| !cell.is_rock())
            .for_each(|(cell, from)| {
                *cell = if from.kind == preserve {
                    *from
                } else {
                    Cell::EMPTY
                };
            });
    }

    pub fn census(&self) -> Census {
        self.cells.iter().fold(Census::default(), |mut census, cell| {
            match cell.kind {
                CellKind::Rock => census.rocks += 1,
                CellKind::Rabbit => census.rabbits += 1,
                CellKind::Fox => census.foxes += 1,
                CellKind::Empty => {}
            }
            census
        })
    }
}

/// Population counts of one buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub rocks: usize,
    pub rabbits: usize,
    pub foxes: usize,
}

impl Census {
    pub fn animals(&self) -> usize {
        self.rabbits + self.foxes
    }

    /// Every non-empty cell, rocks included
    pub fn objects(&self) -> usize {
        self.rocks + self.animals()
    }
}

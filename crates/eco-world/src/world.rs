//! Double-buffered world state.

use crate::grid::Grid;
use crate::rules::Rules;
use eco_core::{Cell, CellKind, EcosystemConfig, Error, Placement, Position, Result};

/// Owns both buffers and tracks which one is readable.
///
/// Rocks are written into both buffers when placed and are never touched
/// by phase preparation, so the writable buffer always starts a phase with
/// every rock in place.
#[derive(Debug, Clone)]
pub struct World {
    buffers: [Grid; 2],
    current: usize,
    rules: Rules,
}

impl World {
    pub fn allocate(config: &EcosystemConfig) -> Result<Self> {
        config.validate()?;
        let current = Grid::allocate(config.rows, config.cols)?;
        let next = Grid::allocate(config.rows, config.cols)?;

        Ok(Self {
            buffers: [current, next],
            current: 0,
            rules: Rules::from_config(config),
        })
    }

    pub fn rows(&self) -> usize {
        self.current().rows()
    }

    pub fn cols(&self) -> usize {
        self.current().cols()
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Place a new occupant with its initial countdowns.
    pub fn place(&mut self, placement: Placement) -> Result<()> {
        if placement.kind == CellKind::Empty {
            return Err(Error::Config(format!(
                "cannot place an empty cell at {}",
                placement.position
            )));
        }
        let cell = self.rules.newborn(placement.kind);
        self.place_cell(placement.position, cell)
    }

    /// Write `cell` into the readable buffer, mirroring rocks into the writable one.
    ///
    /// A later placement at the same position replaces the earlier one.
    pub fn place_cell(&mut self, pos: Position, cell: Cell) -> Result<()> {
        if !self.current().contains(pos) {
            return Err(Error::OutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }

        let (current, next) = self.split();
        current.set(pos, cell);
        next.set(pos, if cell.is_rock() { Cell::ROCK } else { Cell::EMPTY });
        Ok(())
    }

    pub fn populate<I>(&mut self, placements: I) -> Result<()>
    where
        I: IntoIterator<Item = Placement>,
    {
        placements.into_iter().try_for_each(|p| self.place(p))
    }

    /// The readable buffer
    pub fn current(&self) -> &Grid {
        &self.buffers[self.current]
    }

    /// Readable and writable buffers, borrowed together for one phase.
    pub fn buffers(&mut self) -> (&Grid, &mut Grid) {
        let (current, next) = self.split();
        (&*current, next)
    }

    fn split(&mut self) -> (&mut Grid, &mut Grid) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Exchange buffer roles. No cell is copied.
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Occupied cells of the readable buffer as placements, row-major.
    pub fn objects(&self) -> impl Iterator<Item = Placement> + '_ {
        self.current().occupied().map(|(position, cell)| Placement {
            kind: cell.kind,
            position,
        })
    }
}

//! Lock sharding for the writable buffer.
//!
//! The linear cell index (`col + row * cols`) is cut into contiguous shards,
//! each guarded by one mutex. A [`ShardStrategy`] decides where the cuts go;
//! [`ShardLayout`] validates them once per run and hands out a
//! [`ShardLockManager`] that borrows the writable buffer for a single phase.

use eco_core::{Cell, Error, Position, Result, ShardStrategyKind};
use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::fmt;

/// Decides how the linear index space is partitioned.
pub trait ShardStrategy: fmt::Debug + Send + Sync {
    /// Ascending start offsets of each shard. The first must be `0`.
    fn shard_starts(&self, rows: usize, cols: usize) -> Vec<usize>;
}

/// `shards` equal contiguous runs; the last one absorbs the remainder.
///
/// Matches `shard(index) = min(shards - 1, index / (cells / shards))`. When
/// the grid has fewer cells than requested shards, every cell gets its own.
#[derive(Debug, Clone, Copy)]
pub struct Contiguous {
    pub shards: usize,
}

impl ShardStrategy for Contiguous {
    fn shard_starts(&self, rows: usize, cols: usize) -> Vec<usize> {
        let cells = rows * cols;
        let shards = self.shards.clamp(1, cells.max(1));
        let size = cells / shards;
        (0..shards).map(|k| k * size).collect()
    }
}

/// One shard per row
#[derive(Debug, Clone, Copy)]
pub struct PerRow;

impl ShardStrategy for PerRow {
    fn shard_starts(&self, rows: usize, cols: usize) -> Vec<usize> {
        (0..rows).map(|row| row * cols).collect()
    }
}

/// One shard per cell
#[derive(Debug, Clone, Copy)]
pub struct PerCell;

impl ShardStrategy for PerCell {
    fn shard_starts(&self, rows: usize, cols: usize) -> Vec<usize> {
        (0..rows * cols).collect()
    }
}

/// Build the strategy selected in the run configuration.
pub fn strategy_for(kind: ShardStrategyKind, workers: usize) -> Box<dyn ShardStrategy> {
    match kind {
        ShardStrategyKind::Contiguous => Box::new(Contiguous { shards: workers }),
        ShardStrategyKind::PerRow => Box::new(PerRow),
        ShardStrategyKind::PerCell => Box::new(PerCell),
    }
}

/// Validated shard boundaries for one grid shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardLayout {
    cols: usize,
    cells: usize,
    starts: Vec<usize>,
}

impl ShardLayout {
    pub fn new(strategy: &dyn ShardStrategy, rows: usize, cols: usize) -> Result<Self> {
        let cells = rows * cols;
        let starts = strategy.shard_starts(rows, cols);

        if starts.first() != Some(&0) {
            return Err(Error::Config(format!(
                "{strategy:?} must start its first shard at index 0"
            )));
        }
        if starts.windows(2).any(|w| w[0] >= w[1]) || starts.last().is_some_and(|&s| s >= cells) {
            return Err(Error::Config(format!(
                "{strategy:?} produced empty or unordered shards"
            )));
        }

        Ok(Self {
            cols,
            cells,
            starts,
        })
    }

    pub fn shard_count(&self) -> usize {
        self.starts.len()
    }

    pub fn shard_of(&self, index: usize) -> usize {
        debug_assert!(index < self.cells);
        self.starts.partition_point(|&start| start <= index) - 1
    }

    /// Take the writable buffer for one phase and split it into locked shards.
    pub fn lock<'a>(&'a self, cells: &'a mut [Cell]) -> ShardLockManager<'a> {
        assert_eq!(cells.len(), self.cells, "buffer does not match shard layout");

        let mut shards = Vec::with_capacity(self.starts.len());
        let mut rest = cells;
        let mut offset = 0;
        for &end in self.starts[1..].iter().chain(std::iter::once(&self.cells)) {
            let (shard, tail) = std::mem::take(&mut rest).split_at_mut(end - offset);
            shards.push(Mutex::new(shard));
            rest = tail;
            offset = end;
        }

        ShardLockManager {
            layout: self,
            shards,
        }
    }
}

/// Per-phase lock table over the writable buffer.
///
/// Only cells of the buffer it was built from can be reached, and only
/// through [`ShardLockManager::lock_for`].
pub struct ShardLockManager<'a> {
    layout: &'a ShardLayout,
    shards: Vec<Mutex<&'a mut [Cell]>>,
}

impl<'a> ShardLockManager<'a> {
    /// Lock the shard holding `pos` and return a guard for that one cell.
    pub fn lock_for(&self, pos: Position) -> MappedMutexGuard<'_, Cell> {
        self.lock_index(pos.col + pos.row * self.layout.cols)
    }

    pub fn lock_index(&self, index: usize) -> MappedMutexGuard<'_, Cell> {
        let shard = self.layout.shard_of(index);
        let offset = index - self.layout.starts[shard];
        MutexGuard::map(self.shards[shard].lock(), |cells| &mut cells[offset])
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_contiguous_matches_formula() {
        let (rows, cols, workers) = (5, 7, 4);
        let layout = ShardLayout::new(&Contiguous { shards: workers }, rows, cols).unwrap();
        let size = rows * cols / workers;

        assert_eq!(layout.shard_count(), workers);
        for index in 0..rows * cols {
            assert_eq!(layout.shard_of(index), (workers - 1).min(index / size));
        }
    }

    #[test]
    fn test_more_workers_than_cells() {
        let layout = ShardLayout::new(&Contiguous { shards: 16 }, 2, 3).unwrap();
        assert_eq!(layout.shard_count(), 6);
        for index in 0..6 {
            assert_eq!(layout.shard_of(index), index);
        }
    }

    #[test]
    fn test_single_worker_single_shard() {
        let layout = ShardLayout::new(&Contiguous { shards: 1 }, 3, 3).unwrap();
        assert_eq!(layout.shard_count(), 1);
        assert!((0..9).all(|index| layout.shard_of(index) == 0));
    }

    #[test]
    fn test_per_row_and_per_cell() {
        let rows = ShardLayout::new(&PerRow, 3, 4).unwrap();
        assert_eq!(rows.shard_count(), 3);
        assert_eq!(rows.shard_of(5), 1);

        let cells = ShardLayout::new(&PerCell, 3, 4).unwrap();
        assert_eq!(cells.shard_count(), 12);
        assert_eq!(cells.shard_of(11), 11);
    }

    #[derive(Debug)]
    struct Broken;

    impl ShardStrategy for Broken {
        fn shard_starts(&self, _rows: usize, _cols: usize) -> Vec<usize> {
            vec![0, 3, 3]
        }
    }

    #[test]
    fn test_rejects_empty_shards() {
        assert!(matches!(
            ShardLayout::new(&Broken, 2, 2),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_lock_for_reaches_exact_cell() {
        let layout = ShardLayout::new(&Contiguous { shards: 3 }, 3, 4).unwrap();
        let mut cells = vec![Cell::EMPTY; 12];
        {
            let locks = layout.lock(&mut cells);
            assert_eq!(locks.shard_count(), 3);
            *locks.lock_for(Position::new(2, 1)) = Cell::rabbit(5);
            *locks.lock_for(Position::new(0, 3)) = Cell::ROCK;
        }
        assert_eq!(cells[9], Cell::rabbit(5));
        assert_eq!(cells[3], Cell::ROCK);
    }

    #[test]
    fn test_concurrent_writers_serialize_per_shard() {
        let layout = ShardLayout::new(&Contiguous { shards: 2 }, 4, 4).unwrap();
        let mut cells = vec![Cell::rabbit(0); 16];
        {
            let locks = layout.lock(&mut cells);
            (0..16 * 100).into_par_iter().for_each(|i| {
                let mut cell = locks.lock_index(i % 16);
                cell.repro_countdown += 1;
            });
        }
        assert!(cells.iter().all(|cell| cell.repro_countdown == 100));
    }
}

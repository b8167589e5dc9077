//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{CellKind, Placement};
use serde::{Deserialize, Serialize};

/// Parameters read from the head of an input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcosystemConfig {
    /// Generations a rabbit waits between litters
    pub rabbit_breeding: u32,
    /// Generations a fox waits between litters
    pub fox_breeding: u32,
    /// Generations a fox survives without eating
    pub fox_starvation: u32,
    /// Number of generations to simulate
    pub generations: u64,
    /// Grid rows (`R`)
    pub rows: usize,
    /// Grid columns (`C`)
    pub cols: usize,
}

impl Default for EcosystemConfig {
    fn default() -> Self {
        Self {
            rabbit_breeding: 2,
            fox_breeding: 4,
            fox_starvation: 3,
            generations: 6,
            rows: 5,
            cols: 5,
        }
    }
}

impl EcosystemConfig {
    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 || self.rows.checked_mul(self.cols).is_none() {
            return Err(Error::InvalidDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.fox_starvation == 0 {
            return Err(Error::Config(
                "fox starvation threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

/// How the writable buffer is split into lock shards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShardStrategyKind {
    /// One contiguous shard per worker thread
    #[default]
    Contiguous,
    /// One shard per grid row
    PerRow,
    /// One shard per cell
    PerCell,
}

/// Execution settings that must not change the simulation result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Worker threads used in each phase
    pub workers: usize,
    /// Lock sharding for the writable buffer
    pub shard_strategy: ShardStrategyKind,
    /// Emit a population snapshot every this many generations (0 disables)
    pub census_interval: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            shard_strategy: ShardStrategyKind::default(),
            census_interval: 100,
        }
    }
}

impl RunConfig {
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Seeded random world generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Thresholds and dimensions written into the generated input
    pub ecosystem: EcosystemConfig,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Rock density (0.0 to 1.0)
    pub rock_density: f32,
    /// Rabbit density (0.0 to 1.0)
    pub rabbit_density: f32,
    /// Fox density (0.0 to 1.0)
    pub fox_density: f32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            ecosystem: EcosystemConfig {
                generations: 100,
                rows: 64,
                cols: 64,
                ..Default::default()
            },
            seed: 0,
            rock_density: 0.05,
            rabbit_density: 0.2,
            fox_density: 0.05,
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> Result<()> {
        self.ecosystem.validate()?;
        let densities = [self.rock_density, self.rabbit_density, self.fox_density];
        if densities.iter().any(|d| !(0.0..=1.0).contains(d)) {
            return Err(Error::Config("densities must lie in [0, 1]".to_string()));
        }
        if densities.iter().sum::<f32>() > 1.0 {
            return Err(Error::Config("densities must sum to at most 1".to_string()));
        }
        Ok(())
    }
}

/// A complete initial configuration: parameters plus the object list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub config: EcosystemConfig,
    pub placements: Vec<Placement>,
}

impl Scenario {
    pub fn new(config: EcosystemConfig, placements: Vec<Placement>) -> Self {
        Self { config, placements }
    }

    /// Check parameters and every placement before anything is allocated.
    pub fn validate(&self) -> Result<()> {
        self.config.validate()?;
        for placement in &self.placements {
            let Placement { kind, position } = *placement;
            if kind == CellKind::Empty {
                return Err(Error::Config(format!(
                    "cannot place an empty cell at {position}"
                )));
            }
            if position.row >= self.config.rows || position.col >= self.config.cols {
                return Err(Error::OutOfBounds {
                    row: position.row,
                    col: position.col,
                    rows: self.config.rows,
                    cols: self.config.cols,
                });
            }
        }
        Ok(())
    }
}

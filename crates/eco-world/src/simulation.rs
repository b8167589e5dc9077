//! Generation scheduler.
//!
//! Each generation runs two phases, rabbits first and foxes second. A phase
//! seeds the writable buffer from the readable one, lets the worker pool
//! apply every animal's plan under shard locks, then swaps the buffers. The
//! parallel iterator returning is the barrier between phases.

use crate::conflict::ConflictResolver;
use crate::grid::{Census, Grid};
use crate::rules::Plan;
use crate::shard::{strategy_for, ShardLayout, ShardLockManager};
use crate::world::World;
use eco_core::{CellKind, EcosystemConfig, Error, Placement, Result, RunConfig, Scenario};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, instrument, trace};

pub struct Simulation {
    world: World,
    config: EcosystemConfig,
    run_config: RunConfig,
    layout: ShardLayout,
    resolver: ConflictResolver,
    pool: rayon::ThreadPool,
    generation: u64,
    totals: GenerationStats,
}

impl Simulation {
    /// Validate the scenario, allocate both buffers and place every object.
    pub fn new(scenario: &Scenario, run_config: RunConfig) -> Result<Self> {
        scenario.validate()?;
        let mut world = World::allocate(&scenario.config)?;
        world.populate(scenario.placements.iter().copied())?;
        Self::from_world(world, scenario.config.clone(), run_config)
    }

    /// Run a world that was populated by hand.
    pub fn from_world(world: World, config: EcosystemConfig, run_config: RunConfig) -> Result<Self> {
        run_config.validate()?;

        let strategy = strategy_for(run_config.shard_strategy, run_config.workers);
        let layout = ShardLayout::new(strategy.as_ref(), world.rows(), world.cols())?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(run_config.workers)
            .thread_name(|i| format!("eco-worker-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool(e.to_string()))?;

        debug!(
            workers = run_config.workers,
            shards = layout.shard_count(),
            strategy = ?run_config.shard_strategy,
            "Scheduler ready"
        );

        Ok(Self {
            resolver: ConflictResolver::new(config.fox_starvation),
            world,
            config,
            run_config,
            layout,
            pool,
            generation: 0,
            totals: GenerationStats::default(),
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The readable buffer, i.e. the state after the last completed generation
    pub fn grid(&self) -> &Grid {
        self.world.current()
    }

    pub fn config(&self) -> &EcosystemConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn remaining(&self) -> u64 {
        self.config.generations.saturating_sub(self.generation)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Run every remaining generation.
    #[instrument(skip(self), fields(generations = self.config.generations, workers = self.run_config.workers))]
    pub fn run(&mut self) -> SimulationResult {
        info!(
            "Starting simulation for {} generations on a {}x{} grid",
            self.config.generations, self.config.rows, self.config.cols
        );

        while !self.is_finished() {
            self.step();
        }

        let census = self.grid().census();
        info!(
            event = "run_complete",
            generations = self.generation,
            rocks = census.rocks,
            rabbits = census.rabbits,
            foxes = census.foxes,
            births = self.totals.births(),
            starvations = self.totals.foxes.starvations,
            prey_eaten = self.totals.foxes.prey_eaten,
            "Simulation complete"
        );

        self.result()
    }

    /// Advance exactly one generation.
    pub fn step(&mut self) -> GenerationStats {
        let rabbits = self.run_phase(CellKind::Rabbit);
        let foxes = self.run_phase(CellKind::Fox);
        let stats = GenerationStats {
            generation: self.generation,
            rabbits,
            foxes,
        };
        self.generation += 1;
        self.totals.accumulate(&stats);

        debug!(
            generation = stats.generation,
            rabbit_moves = stats.rabbits.moves,
            rabbit_births = stats.rabbits.births,
            rabbit_collisions = stats.rabbits.collisions,
            fox_moves = stats.foxes.moves,
            fox_births = stats.foxes.births,
            fox_collisions = stats.foxes.collisions,
            prey_eaten = stats.foxes.prey_eaten,
            starvations = stats.foxes.starvations,
            "Generation complete"
        );

        let interval = self.run_config.census_interval;
        if interval > 0 && self.generation % interval == 0 {
            let census = self.grid().census();
            info!(
                event = "population_census",
                generation = self.generation,
                rabbits = census.rabbits,
                foxes = census.foxes,
                "Population snapshot"
            );
        }

        stats
    }

    fn run_phase(&mut self, species: CellKind) -> PhaseStats {
        let carried = match species {
            CellKind::Rabbit => CellKind::Fox,
            _ => CellKind::Rabbit,
        };
        let generation = self.generation;
        let rules = *self.world.rules();
        let resolver = self.resolver;
        let counters = PhaseCounters::default();

        let (current, next) = self.world.buffers();
        let cols = current.cols();

        self.pool.install(|| next.prepare_for_phase(current, carried));

        let locks = self.layout.lock(next.cells_mut());
        self.pool.install(|| {
            current
                .cells()
                .par_iter()
                .enumerate()
                .with_min_len(cols)
                .filter(|(_, cell)| cell.kind == species)
                .for_each(|(index, _)| {
                    let origin = current.position_of(index);
                    match rules.plan(current, origin, generation) {
                        Some(plan) => apply(&locks, &resolver, &plan, &counters),
                        None => {
                            counters.starvations.fetch_add(1, Ordering::Relaxed);
                            trace!(row = origin.row, col = origin.col, generation, "Fox starved");
                        }
                    }
                });
        });
        drop(locks);

        self.world.swap();
        counters.snapshot()
    }

    /// Summary of the readable buffer
    pub fn result(&self) -> SimulationResult {
        SimulationResult {
            config: self.config.clone(),
            generations: self.generation,
            census: self.grid().census(),
            totals: self.totals,
            objects: self.world.objects().collect(),
        }
    }
}

/// Write one plan into the writable buffer.
fn apply(
    locks: &ShardLockManager<'_>,
    resolver: &ConflictResolver,
    plan: &Plan,
    counters: &PhaseCounters,
) {
    if let Some(child) = plan.child {
        let mut slot = locks.lock_for(plan.origin);
        *slot = resolver.resolve(*slot, child);
        counters.births.fetch_add(1, Ordering::Relaxed);
        trace!(row = plan.origin.row, col = plan.origin.col, kind = ?child.kind, "Birth");
    }

    let mut slot = locks.lock_for(plan.destination);
    match (slot.kind, plan.mover.kind) {
        (CellKind::Rabbit, CellKind::Fox) => {
            counters.prey_eaten.fetch_add(1, Ordering::Relaxed);
        }
        (existing, arriving) if existing == arriving => {
            counters.collisions.fetch_add(1, Ordering::Relaxed);
        }
        _ => {}
    }
    *slot = resolver.resolve(*slot, plan.mover);
    drop(slot);

    if plan.moved() {
        counters.moves.fetch_add(1, Ordering::Relaxed);
    }
}

#[derive(Debug, Default)]
struct PhaseCounters {
    moves: AtomicUsize,
    births: AtomicUsize,
    collisions: AtomicUsize,
    prey_eaten: AtomicUsize,
    starvations: AtomicUsize,
}

impl PhaseCounters {
    fn snapshot(&self) -> PhaseStats {
        PhaseStats {
            moves: self.moves.load(Ordering::Relaxed),
            births: self.births.load(Ordering::Relaxed),
            collisions: self.collisions.load(Ordering::Relaxed),
            prey_eaten: self.prey_eaten.load(Ordering::Relaxed),
            starvations: self.starvations.load(Ordering::Relaxed),
        }
    }
}

/// What happened during one phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseStats {
    /// Animals that left their cell
    pub moves: usize,
    pub births: usize,
    /// Same-species arrivals merged into an occupied cell
    pub collisions: usize,
    pub prey_eaten: usize,
    pub starvations: usize,
}

impl PhaseStats {
    fn accumulate(&mut self, other: &PhaseStats) {
        self.moves += other.moves;
        self.births += other.births;
        self.collisions += other.collisions;
        self.prey_eaten += other.prey_eaten;
        self.starvations += other.starvations;
    }
}

/// Both phases of one generation, or running totals when accumulated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: u64,
    pub rabbits: PhaseStats,
    pub foxes: PhaseStats,
}

impl GenerationStats {
    pub fn births(&self) -> usize {
        self.rabbits.births + self.foxes.births
    }

    fn accumulate(&mut self, other: &GenerationStats) {
        self.generation = other.generation;
        self.rabbits.accumulate(&other.rabbits);
        self.foxes.accumulate(&other.foxes);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub config: EcosystemConfig,
    pub generations: u64,
    pub census: Census,
    pub totals: GenerationStats,
    /// Every occupied cell, row-major
    pub objects: Vec<Placement>,
}

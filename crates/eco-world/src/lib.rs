//! World simulation engine.
//!
//! This crate implements the double-buffered grid where rabbits and foxes
//! move, breed and starve, and the lock-sharded scheduler that updates it in
//! parallel with a result that does not depend on the worker count.

pub mod chooser;
pub mod conflict;
pub mod generator;
pub mod grid;
pub mod neighbors;
pub mod rules;
pub mod shard;
pub mod simulation;
pub mod world;

pub use conflict::ConflictResolver;
pub use grid::{Census, Grid};
pub use rules::{Plan, Rules};
pub use shard::{ShardLayout, ShardLockManager, ShardStrategy};
pub use simulation::{GenerationStats, PhaseStats, Simulation, SimulationResult};
pub use world::World;

//! Movement, breeding and starvation rules.
//!
//! A plan is computed from the readable buffer alone. The scheduler applies
//! it to the writable buffer under shard locks.

use crate::chooser::choose;
use crate::grid::Grid;
use crate::neighbors::neighbors;
use eco_core::{Cell, CellKind, EcosystemConfig, Position};

/// What one animal does during its phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub origin: Position,
    /// Newborn left behind at `origin`
    pub child: Option<Cell>,
    pub destination: Position,
    /// The animal as it arrives at `destination`
    pub mover: Cell,
}

impl Plan {
    pub fn moved(&self) -> bool {
        self.origin != self.destination
    }
}

/// Species thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rules {
    pub rabbit_breeding: u32,
    pub fox_breeding: u32,
    pub fox_starvation: u32,
}

impl Rules {
    pub fn from_config(config: &EcosystemConfig) -> Self {
        Self {
            rabbit_breeding: config.rabbit_breeding,
            fox_breeding: config.fox_breeding,
            fox_starvation: config.fox_starvation,
        }
    }

    /// Initial state of a freshly placed or newborn occupant.
    pub fn newborn(&self, kind: CellKind) -> Cell {
        match kind {
            CellKind::Empty => Cell::EMPTY,
            CellKind::Rock => Cell::ROCK,
            CellKind::Rabbit => Cell::rabbit(self.rabbit_breeding),
            CellKind::Fox => Cell::fox(self.fox_breeding, self.fox_starvation),
        }
    }

    /// Plan the move of the animal at `origin`, or `None` if it starves.
    pub fn plan(&self, grid: &Grid, origin: Position, generation: u64) -> Option<Plan> {
        let cell = *grid.get(origin);
        match cell.kind {
            CellKind::Rabbit => Some(self.plan_rabbit(grid, origin, cell, generation)),
            CellKind::Fox => self.plan_fox(grid, origin, cell, generation),
            CellKind::Empty | CellKind::Rock => None,
        }
    }

    fn plan_rabbit(&self, grid: &Grid, origin: Position, cell: Cell, generation: u64) -> Plan {
        let free = neighbors(grid, origin, CellKind::Empty);
        let step = Step::take(
            origin,
            free.as_slice(),
            cell.repro_countdown,
            self.rabbit_breeding,
            generation,
        );

        Plan {
            origin,
            child: step.spawned.then(|| self.newborn(CellKind::Rabbit)),
            destination: step.destination,
            mover: Cell::rabbit(step.repro_countdown),
        }
    }

    fn plan_fox(&self, grid: &Grid, origin: Position, cell: Cell, generation: u64) -> Option<Plan> {
        let prey = neighbors(grid, origin, CellKind::Rabbit);
        let candidates = if !prey.is_empty() {
            prey
        } else if cell.food_countdown <= 1 {
            return None;
        } else {
            neighbors(grid, origin, CellKind::Empty)
        };

        let step = Step::take(
            origin,
            candidates.as_slice(),
            cell.repro_countdown,
            self.fox_breeding,
            generation,
        );
        let food_countdown = if grid.kind_at(step.destination) == CellKind::Rabbit {
            self.fox_starvation
        } else {
            cell.food_countdown - 1
        };

        Some(Plan {
            origin,
            child: step.spawned.then(|| self.newborn(CellKind::Fox)),
            destination: step.destination,
            mover: Cell::fox(step.repro_countdown, food_countdown),
        })
    }
}

/// Destination and breeding outcome shared by both species
struct Step {
    destination: Position,
    repro_countdown: u32,
    spawned: bool,
}

impl Step {
    fn take(
        origin: Position,
        candidates: &[Position],
        repro_countdown: u32,
        breeding: u32,
        generation: u64,
    ) -> Self {
        match choose(candidates, origin, generation) {
            // Nowhere to go: a ready animal waits at 1 so it does not breed in place.
            None => Self {
                destination: origin,
                repro_countdown: repro_countdown.max(1) - 1,
                spawned: false,
            },
            Some(destination) if repro_countdown == 0 => Self {
                destination,
                repro_countdown: breeding,
                spawned: true,
            },
            Some(destination) => Self {
                destination,
                repro_countdown: repro_countdown - 1,
                spawned: false,
            },
        }
    }
}

//! Merging movers into contested destination cells.

use eco_core::{Cell, CellKind};
use std::cmp::Reverse;

/// Order-independent merge applied under the destination's shard lock.
///
/// Between animals of one species the survivor is the lexicographic minimum
/// of `(repro_countdown, Reverse(food_countdown))`, so applying arrivals in
/// any order yields the same cell. A fox that fed this turn carries the full
/// food countdown and therefore never loses a tie on food.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictResolver {
    fox_starvation: u32,
}

impl ConflictResolver {
    pub fn new(fox_starvation: u32) -> Self {
        Self { fox_starvation }
    }

    pub fn resolve(&self, existing: Cell, mover: Cell) -> Cell {
        match (existing.kind, mover.kind) {
            (_, CellKind::Empty) | (_, CellKind::Rock) => existing,
            (CellKind::Empty, _) => mover,
            (CellKind::Rock, _) => existing,
            (CellKind::Rabbit, CellKind::Rabbit) | (CellKind::Fox, CellKind::Fox) => {
                if Self::rank(&mover) < Self::rank(&existing) {
                    mover
                } else {
                    existing
                }
            }
            // prey is eaten
            (CellKind::Rabbit, CellKind::Fox) => Cell {
                food_countdown: self.fox_starvation,
                ..mover
            },
            (CellKind::Fox, CellKind::Rabbit) => existing,
        }
    }

    fn rank(cell: &Cell) -> (u32, Reverse<u32>) {
        (cell.repro_countdown, Reverse(cell.food_countdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOD: u32 = 5;

    fn resolver() -> ConflictResolver {
        ConflictResolver::new(FOOD)
    }

    fn merge_all(cells: &[Cell]) -> Cell {
        cells
            .iter()
            .fold(Cell::EMPTY, |acc, &mover| resolver().resolve(acc, mover))
    }

    #[test]
    fn test_empty_destination_takes_mover() {
        let mover = Cell::rabbit(3);
        assert_eq!(resolver().resolve(Cell::EMPTY, mover), mover);
    }

    #[test]
    fn test_rocks_never_change() {
        assert_eq!(resolver().resolve(Cell::ROCK, Cell::fox(0, 1)), Cell::ROCK);
        assert_eq!(resolver().resolve(Cell::ROCK, Cell::rabbit(0)), Cell::ROCK);
    }

    #[test]
    fn test_rabbits_keep_smaller_countdown() {
        let older = Cell::rabbit(1);
        let younger = Cell::rabbit(4);
        assert_eq!(resolver().resolve(younger, older), older);
        assert_eq!(resolver().resolve(older, younger), older);
    }

    #[test]
    fn test_foxes_break_ties_on_food() {
        let hungry = Cell::fox(2, 1);
        let fed = Cell::fox(2, 4);
        assert_eq!(resolver().resolve(hungry, fed), fed);
        assert_eq!(resolver().resolve(fed, hungry), fed);

        let ready = Cell::fox(0, 1);
        assert_eq!(resolver().resolve(fed, ready), ready);
    }

    #[test]
    fn test_fed_fox_is_not_displaced_on_food() {
        let just_ate = Cell::fox(3, FOOD);
        let other = Cell::fox(3, FOOD - 1);
        assert_eq!(resolver().resolve(just_ate, other), just_ate);
    }

    #[test]
    fn test_fox_eats_rabbit() {
        let merged = resolver().resolve(Cell::rabbit(2), Cell::fox(1, 2));
        assert_eq!(merged, Cell::fox(1, FOOD));
    }

    #[test]
    fn test_rabbit_never_displaces_fox() {
        let fox = Cell::fox(1, 2);
        assert_eq!(resolver().resolve(fox, Cell::rabbit(0)), fox);
    }

    #[test]
    fn test_arrival_order_does_not_matter() {
        let foxes = [Cell::fox(2, 3), Cell::fox(1, 2), Cell::fox(1, 4), Cell::fox(3, 5)];
        let expected = Cell::fox(1, 4);

        let mut order = foxes.to_vec();
        for _ in 0..order.len() {
            order.rotate_left(1);
            assert_eq!(merge_all(&order), expected);
            let mut reversed = order.clone();
            reversed.reverse();
            assert_eq!(merge_all(&reversed), expected);
        }
    }

    #[test]
    fn test_merge_is_idempotent() {
        let fox = Cell::fox(2, 2);
        assert_eq!(resolver().resolve(fox, fox), fox);

        let rabbit = Cell::rabbit(2);
        assert_eq!(resolver().resolve(rabbit, rabbit), rabbit);
    }

    #[test]
    fn test_foxes_contesting_prey_agree() {
        // Both hunters computed the full food countdown from the readable grid.
        let a = Cell::fox(2, FOOD);
        let b = Cell::fox(1, FOOD);
        let prey = Cell::rabbit(0);

        let ab = resolver().resolve(resolver().resolve(prey, a), b);
        let ba = resolver().resolve(resolver().resolve(prey, b), a);
        assert_eq!(ab, ba);
        assert_eq!(ab, b);
    }
}

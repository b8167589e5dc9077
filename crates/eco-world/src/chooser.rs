//! Deterministic destination choice.

use eco_core::Position;

/// Pick `candidates[(row + col + generation) % len]`.
///
/// Every worker evaluating the same origin in the same generation gets the
/// same answer, so only the destination side of a move ever needs a lock.
pub fn choose(candidates: &[Position], origin: Position, generation: u64) -> Option<Position> {
    if candidates.is_empty() {
        return None;
    }
    let key = (origin.row as u64)
        .wrapping_add(origin.col as u64)
        .wrapping_add(generation);
    let index = (key % candidates.len() as u64) as usize;
    Some(candidates[index])
}

//! Wall placement legality.

use crate::connectivity::path_exists;
use crate::{GameState, Orientation, Wall, WallRejection};

/// Checks whether `candidate` may be added to the board in `state`.
///
/// The checks run in a fixed order and the first failure is reported:
/// bounds, exact duplicate, crossing at the same anchor, collinear overlap,
/// and finally connectivity for *every* seated player, not just the one
/// placing the wall. Nothing is mutated; the caller owns `walls_left`.
pub fn validate_placement(
    candidate: &Wall,
    state: &GameState,
) -> Result<(), WallRejection> {
    if !candidate.in_bounds() {
        return Err(WallRejection::OutOfBounds);
    }

    let at_anchor = || state.walls.iter().filter(|w| w.same_anchor(candidate));

    if at_anchor().any(|w| w.orientation == candidate.orientation) {
        return Err(WallRejection::Duplicate);
    }
    if at_anchor().any(|w| w.orientation == candidate.orientation.opposite()) {
        return Err(WallRejection::Crossing);
    }
    if state.walls.iter().any(|w| overlaps(w, candidate)) {
        return Err(WallRejection::Overlap);
    }

    let mut walls = Vec::with_capacity(state.walls.len() + 1);
    walls.extend_from_slice(&state.walls);
    walls.push(*candidate);

    match state
        .players
        .iter()
        .find(|p| !path_exists(p.position, p.destination, &walls))
    {
        Some(stranded) => Err(WallRejection::WouldIsolate(stranded.id)),
        None => Ok(()),
    }
}

/// Boolean form of [`validate_placement`].
pub fn is_valid_placement(candidate: &Wall, state: &GameState) -> bool {
    validate_placement(candidate, state).is_ok()
}

/// Collinear walls of the same orientation must leave a full gap between
/// them: their varying coordinate has to differ by at least 2.
fn overlaps(existing: &Wall, candidate: &Wall) -> bool {
    if existing.orientation != candidate.orientation {
        return false;
    }
    match candidate.orientation {
        Orientation::Horizontal => {
            existing.row == candidate.row
                && existing.col.abs_diff(candidate.col) < 2
        }
        Orientation::Vertical => {
            existing.col == candidate.col
                && existing.row.abs_diff(candidate.row) < 2
        }
    }
}

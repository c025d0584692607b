//! Pawn movement: plain steps, straight jumps, and sidesteps.

use std::collections::BTreeSet;

use crate::board::is_step_blocked;
use crate::{Cell, Direction, GameState, Player};

/// Computes every cell `player` may legally move to in `state`.
///
/// For each direction the adjacent cell is taken if it's free. If another
/// pawn stands there, the cell beyond it is the only option for that
/// direction; when that jump is off the board, walled off, or occupied,
/// the two cells beside the opponent (perpendicular to the jump) are
/// offered instead. A destination is never an occupied cell.
pub fn legal_destinations(player: &Player, state: &GameState) -> BTreeSet<Cell> {
    let walls = &state.walls;
    let from = player.position;
    // A step is usable if no wall cuts it and nobody is standing there.
    let open = |a: Cell, b: Cell| {
        !is_step_blocked(a, b, walls) && state.occupant(b).is_none()
    };

    let mut destinations = BTreeSet::new();

    for dir in Direction::ALL {
        let Some(next) = from.step(dir) else {
            continue;
        };
        if is_step_blocked(from, next, walls) {
            continue;
        }
        if state.occupant(next).is_none() {
            destinations.insert(next);
            continue;
        }

        match next.step(dir).filter(|&far| open(next, far)) {
            Some(far) => {
                destinations.insert(far);
            }
            None => {
                destinations.extend(
                    dir.perpendicular()
                        .into_iter()
                        .filter_map(|side| next.step(side))
                        .filter(|&side| open(next, side)),
                );
            }
        }
    }

    destinations
}

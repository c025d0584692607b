//! Reachability over the wall-cut grid graph.

use std::collections::VecDeque;

use crate::board::{is_step_blocked, BOARD_SIZE};
use crate::{Cell, Direction, Wall};

const SIDE: usize = BOARD_SIZE as usize;

/// Returns `true` if some cell in `destination_row` can be reached from
/// `start` by orthogonal steps that no wall blocks.
///
/// Pawns are not obstacles here, only walls. Breadth-first over at most 81
/// cells; allocates nothing beyond the queue and touches no shared state,
/// so it is safe to call for every player on every placement attempt.
pub fn path_exists(start: Cell, destination_row: u8, walls: &[Wall]) -> bool {
    if !start.is_on_board() {
        return false;
    }

    let mut visited = [[false; SIDE]; SIDE];
    let mut queue = VecDeque::with_capacity(SIDE * SIDE);
    visited[start.row as usize][start.col as usize] = true;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        if cell.row == destination_row {
            return true;
        }
        for dir in Direction::ALL {
            let Some(next) = cell.step(dir) else {
                continue;
            };
            let seen = &mut visited[next.row as usize][next.col as usize];
            if *seen || is_step_blocked(cell, next, walls) {
                continue;
            }
            *seen = true;
            queue.push_back(next);
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cell_reaches_every_row_without_walls() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                for target in 0..BOARD_SIZE {
                    assert!(
                        path_exists(Cell::new(row, col), target, &[]),
                        "({row}, {col}) should reach row {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_start_on_destination_row_is_trivially_connected() {
        let sealed = [Wall::vertical(0, 7), Wall::horizontal(0, 7)];
        assert!(path_exists(Cell::new(0, 8), 0, &sealed));
    }

    #[test]
    fn test_sealed_corner_has_no_path() {
        // (0,8) loses its left neighbour to the vertical wall and its lower
        // neighbour to the horizontal one.
        let sealed = [Wall::vertical(0, 7), Wall::horizontal(0, 7)];
        assert!(!path_exists(Cell::new(0, 8), 8, &sealed));
    }

    #[test]
    fn test_row_of_walls_leaves_a_gap() {
        // Four horizontal walls cover columns 0..=7; column 8 stays open.
        let walls = [
            Wall::horizontal(3, 0),
            Wall::horizontal(3, 2),
            Wall::horizontal(3, 4),
            Wall::horizontal(3, 6),
        ];
        assert!(path_exists(Cell::new(0, 0), 8, &walls));
    }

    #[test]
    fn test_fully_cut_board_has_no_path() {
        // Horizontal walls over columns 0..=7, then a crossed pair at (4,7)
        // turns the column 8 gap into a dead end.
        let walls = [
            Wall::horizontal(3, 0),
            Wall::horizontal(3, 2),
            Wall::horizontal(3, 4),
            Wall::horizontal(3, 6),
            Wall::horizontal(4, 7),
            Wall::vertical(4, 7),
        ];
        // Column 8 at row 4 can't go down (H(4,7)) or left (V(4,7)).
        assert!(!path_exists(Cell::new(0, 0), 8, &walls));
        assert!(path_exists(Cell::new(8, 0), 5, &walls));
    }

    #[test]
    fn test_off_board_start_has_no_path() {
        assert!(!path_exists(Cell::new(9, 0), 0, &[]));
    }
}

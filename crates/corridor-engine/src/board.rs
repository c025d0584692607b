//! Board geometry and the edge-blocking rule.

use crate::{Cell, Orientation, Wall};

/// Cells per side of the board.
pub const BOARD_SIZE: u8 = 9;

/// Wall anchors per side: walls live in the gaps between cells.
pub const WALL_GRID_SIZE: u8 = BOARD_SIZE - 1;

/// Returns `true` if a wall blocks the single step between two adjacent cells.
///
/// A horizontal step `(r, c1) → (r, c2)` crosses the column boundary right
/// of `min(c1, c2)`; a vertical wall anchored in that column at row `r` or
/// `r - 1` covers it. A vertical step `(r1, c) → (r2, c)` crosses the row
/// boundary below `min(r1, r2)`; a horizontal wall anchored in that row at
/// column `c` or `c - 1` covers it. The ±1 window is what gives each wall
/// its two-cell span.
///
/// `from` and `to` must be orthogonally adjacent.
pub fn is_step_blocked(from: Cell, to: Cell, walls: &[Wall]) -> bool {
    if from.row == to.row {
        let boundary = from.col.min(to.col);
        walls.iter().any(|w| {
            w.orientation == Orientation::Vertical
                && w.col == boundary
                && (w.row == from.row || w.row + 1 == from.row)
        })
    } else {
        let boundary = from.row.min(to.row);
        walls.iter().any(|w| {
            w.orientation == Orientation::Horizontal
                && w.row == boundary
                && (w.col == from.col || w.col + 1 == from.col)
        })
    }
}

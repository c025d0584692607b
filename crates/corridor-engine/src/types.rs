//! Value types shared by every part of the engine.
//!
//! These all travel on the wire as part of the game state, so their serde
//! shape is part of the protocol: a [`Cell`] is `{ "row": 4, "col": 0 }`,
//! a [`Wall`] is `{ "row": 3, "col": 3, "orientation": "horizontal" }`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::BOARD_SIZE;
use crate::WALL_GRID_SIZE;

// ---------------------------------------------------------------------------
// PlayerId
// ---------------------------------------------------------------------------

/// A connection-scoped identifier for a participant.
///
/// Newtype over `u64` so it can't be confused with a row, a column, or a
/// seat index. `#[serde(transparent)]` keeps the wire form a plain number.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A square on the 9×9 board.
///
/// Coordinates arriving from clients are not trusted to be on the board;
/// [`Cell::is_on_board`] says whether they are. Cells produced by
/// [`Cell::step`] always are.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn is_on_board(self) -> bool {
        self.row < BOARD_SIZE && self.col < BOARD_SIZE
    }

    /// The neighbouring cell in `dir`, or `None` if that would leave the board.
    pub fn step(self, dir: Direction) -> Option<Cell> {
        let (row, col) = match dir {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row + 1, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col + 1),
        };
        let next = Cell::new(row, col);
        next.is_on_board().then_some(next)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four orthogonal directions a pawn can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in the order the move engine scans them.
    pub const ALL: [Direction; 4] =
        [Self::Up, Self::Down, Self::Left, Self::Right];

    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// The two directions at right angles to this one.
    ///
    /// Used for sidesteps: a blocked vertical jump offers left/right,
    /// a blocked horizontal jump offers up/down.
    pub fn perpendicular(self) -> [Direction; 2] {
        if self.is_vertical() {
            [Self::Left, Self::Right]
        } else {
            [Self::Up, Self::Down]
        }
    }
}

// ---------------------------------------------------------------------------
// Wall
// ---------------------------------------------------------------------------

/// Which way a wall runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Lies along a row boundary; blocks up/down movement.
    Horizontal,
    /// Lies along a column boundary; blocks left/right movement.
    Vertical,
}

impl Orientation {
    pub fn opposite(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// A wall anchored on the 8×8 grid of gap intersections.
///
/// A horizontal wall at `(row, col)` sits below `row` and spans columns
/// `col` and `col + 1`. A vertical wall at `(row, col)` sits right of `col`
/// and spans rows `row` and `row + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wall {
    pub row: u8,
    pub col: u8,
    pub orientation: Orientation,
}

impl Wall {
    pub const fn horizontal(row: u8, col: u8) -> Self {
        Self { row, col, orientation: Orientation::Horizontal }
    }

    pub const fn vertical(row: u8, col: u8) -> Self {
        Self { row, col, orientation: Orientation::Vertical }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < WALL_GRID_SIZE && self.col < WALL_GRID_SIZE
    }

    /// Whether two walls share an anchor, regardless of orientation.
    pub fn same_anchor(&self, other: &Wall) -> bool {
        self.row == other.row && self.col == other.col
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wall at ({}, {})", self.orientation, self.row, self.col)
    }
}

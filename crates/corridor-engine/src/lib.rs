//! Authoritative rules engine for Corridor.
//!
//! Everything in this crate is pure, synchronous computation: no I/O, no
//! async, no knowledge of rooms or connections. The server runs it inside
//! a room actor, and tests drive it directly.
//!
//! ```text
//! Game (turn state machine)
//!   ├── moves::legal_destinations   ← jump / sidestep rules
//!   └── walls::validate_placement   ← bounds, collisions, connectivity
//!         └── connectivity::path_exists
//!               └── board::is_step_blocked
//! ```

mod board;
mod connectivity;
mod error;
mod game;
mod moves;
mod types;
mod walls;

pub use board::{is_step_blocked, BOARD_SIZE, WALL_GRID_SIZE};
pub use connectivity::path_exists;
pub use error::{ActionError, StartError, WallRejection};
pub use game::{
    wall_allowance, Action, Game, GameState, Outcome, Player, MAX_PLAYERS,
    MIN_PLAYERS, SEATS,
};
pub use moves::legal_destinations;
pub use types::{Cell, Direction, Orientation, PlayerId, Wall};
pub use walls::{is_valid_placement, validate_placement};

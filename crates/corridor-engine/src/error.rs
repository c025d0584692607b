//! Rejection reasons produced by the engine.
//!
//! None of these are failures of the server: every one is a definite
//! "no" to a participant's request, reported back to that participant only.

use crate::{Cell, PlayerId};

/// Why a wall placement was refused, in the order the checks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WallRejection {
    #[error("wall anchor is off the board")]
    OutOfBounds,

    #[error("a wall already occupies that slot")]
    Duplicate,

    #[error("wall would cross an existing wall")]
    Crossing,

    #[error("wall would overlap an existing wall")]
    Overlap,

    /// The placement would leave this player with no route to its
    /// destination row.
    #[error("wall would cut player {0} off from its goal")]
    WouldIsolate(PlayerId),
}

/// Why a game action was refused. The game state is untouched in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("it is not your turn")]
    NotYourTurn,

    #[error("illegal move to {0}")]
    IllegalMove(Cell),

    #[error("illegal wall placement: {0}")]
    IllegalWall(#[from] WallRejection),

    #[error("no walls left to place")]
    NoWallsLeft,

    #[error("the game is already over")]
    GameFinished,
}

/// Why a game could not be started with the given participants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartError {
    #[error("at least {min} players are needed to start, have {count}")]
    NotEnoughPlayers { count: usize, min: usize },

    #[error("at most {max} players can be seated, have {count}")]
    TooManyPlayers { count: usize, max: usize },
}

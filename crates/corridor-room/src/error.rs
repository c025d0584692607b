//! Error types for the room layer.

use corridor_engine::ActionError;
use corridor_protocol::PlayerId;

/// Errors that can occur during room operations.
///
/// Every variant is a refusal of one participant's request. The server
/// reports it to that participant only, using [`RoomError::code`] as the
/// wire status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// Room codes must contain at least one non-whitespace character.
    #[error("room code must not be empty")]
    InvalidCode,

    /// Another live room already uses this code.
    #[error("room code {0} is already in use")]
    CodeInUse(String),

    /// No room has this code.
    #[error("room {0} not found")]
    NotFound(String),

    /// The room is full: no more participant slots available.
    #[error("room {0} is full")]
    RoomFull(String),

    /// A participant may be in at most one room at a time.
    #[error("player {player} is already in room {code}")]
    AlreadyInRoom { player: PlayerId, code: String },

    /// The participant is not a member of the room they addressed.
    #[error("player {player} is not in room {code}")]
    NotInRoom { player: PlayerId, code: String },

    /// Only the host may start the game.
    #[error("only the host can start the game")]
    NotHost,

    #[error("at least {min} players are needed to start, have {count}")]
    NotEnoughPlayers { count: usize, min: usize },

    /// The game was already started (or has already finished).
    #[error("the game has already started")]
    AlreadyStarted,

    /// A game action arrived before the host started the game.
    #[error("the game has not started yet")]
    NotStarted,

    /// The room actor has shut down, typically because the room was torn
    /// down while the request was in flight.
    #[error("room {0} is unavailable")]
    Unavailable(String),

    /// The game rejected the action.
    #[error(transparent)]
    Game(#[from] ActionError),
}

impl RoomError {
    /// HTTP-style status reported to the client in an `error` message.
    ///
    /// - 400: the request itself is invalid (illegal move or wall)
    /// - 403: the participant may not do this (wrong turn, not host)
    /// - 404: no such room
    /// - 409: conflicts with current room state
    /// - 503: the room went away mid-request
    pub fn code(&self) -> u16 {
        match self {
            Self::InvalidCode => 400,
            Self::NotFound(_) => 404,
            Self::NotHost | Self::NotInRoom { .. } => 403,
            Self::CodeInUse(_)
            | Self::RoomFull(_)
            | Self::AlreadyInRoom { .. }
            | Self::NotEnoughPlayers { .. }
            | Self::AlreadyStarted
            | Self::NotStarted => 409,
            Self::Unavailable(_) => 503,
            Self::Game(ActionError::NotYourTurn) => 403,
            Self::Game(ActionError::GameFinished) => 409,
            Self::Game(
                ActionError::IllegalMove(_)
                | ActionError::IllegalWall(_)
                | ActionError::NoWallsLeft,
            ) => 400,
        }
    }
}

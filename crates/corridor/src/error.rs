//! Unified error type for the Corridor server.

use corridor_protocol::ProtocolError;
use corridor_room::RoomError;
use corridor_session::SessionError;
use corridor_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum CorridorError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An identity registry error.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A room request was refused.
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl CorridorError {
    /// HTTP-style status for the `error` message sent to the client.
    ///
    /// Undecodable input is the client's fault (400); room refusals carry
    /// their own status; anything else is on the server (500).
    pub fn code(&self) -> u16 {
        match self {
            Self::Protocol(ProtocolError::Decode(_)) => 400,
            Self::Room(e) => e.code(),
            Self::Protocol(_) | Self::Transport(_) | Self::Session(_) => 500,
        }
    }
}

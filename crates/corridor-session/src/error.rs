//! Error types for the session layer.

use corridor_protocol::PlayerId;

/// Errors that can occur while managing connected identities.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No identity is registered for the given player. Usually a
    /// connection that is already being torn down.
    #[error("no session for player {0}")]
    NotFound(PlayerId),

    /// The connection id is already registered.
    /// Connection ids are never reused, so this indicates a server bug.
    #[error("player {0} is already connected")]
    AlreadyConnected(PlayerId),
}

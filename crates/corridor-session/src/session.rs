//! Session types: the server's record of one connected participant.
//!
//! A session tracks:
//! - WHO the participant is (`PlayerId`, derived from the connection id)
//! - WHAT they are called (a free-form nickname)
//! - HOW to reach them (their outbound message queue)
//! - WHEN they connected (for heartbeat timestamps)

use std::time::Instant;

use corridor_protocol::{Participant, PlayerId, ServerMessage};
use tokio::sync::mpsc;

/// Nickname every connection starts with until it sets one.
pub const DEFAULT_NICKNAME: &str = "Anonymous";

/// The sending half of a connection's outbound queue.
///
/// Unbounded so that a room actor never blocks on a slow client. The
/// matching receiver is drained by the connection's writer task, which is
/// the only thing that touches the socket. A send fails only once that
/// task has exited, i.e. the client is gone.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// One connected participant.
#[derive(Debug, Clone)]
pub struct Session {
    pub player_id: PlayerId,
    pub nickname: String,
    pub sender: PlayerSender,
    pub connected_at: Instant,
}

impl Session {
    pub(crate) fn new(player_id: PlayerId, sender: PlayerSender) -> Self {
        Self {
            player_id,
            nickname: DEFAULT_NICKNAME.to_owned(),
            sender,
            connected_at: Instant::now(),
        }
    }

    /// How this participant appears in lobbies and user lists.
    pub fn participant(&self) -> Participant {
        Participant {
            id: self.player_id,
            nickname: self.nickname.clone(),
        }
    }

    /// Queues a message for this participant.
    ///
    /// Returns `false` if the connection's writer has already shut down.
    pub fn send(&self, msg: ServerMessage) -> bool {
        self.sender.send(msg).is_ok()
    }

    /// Milliseconds since this connection was accepted.
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.connected_at.elapsed().as_millis())
            .unwrap_or(u64::MAX)
    }
}

/// Trims a requested nickname, falling back to [`DEFAULT_NICKNAME`] when
/// nothing is left.
pub(crate) fn normalize_nickname(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_NICKNAME.to_owned()
    } else {
        trimmed.to_owned()
    }
}

//! The identity registry: every connection currently attached to the server.
//!
//! # Concurrency note
//!
//! `IdentityRegistry` is NOT thread-safe by itself. It uses a plain
//! `BTreeMap` and the server wraps it in a `tokio::sync::Mutex`. Nothing
//! here awaits, so the lock is never held across I/O.

use std::collections::BTreeMap;

use corridor_protocol::{Participant, PlayerId, ServerMessage};

use crate::session::normalize_nickname;
use crate::{PlayerSender, Session, SessionError};

/// Maps each connected participant to their nickname and outbound queue.
///
/// ## Lifecycle
///
/// ```text
/// register() ──→ set_nickname()* ──→ remove()
///  "Anonymous"       renamed          gone
/// ```
///
/// Keyed by a `BTreeMap` so that [`user_list`](Self::user_list) comes out
/// in connection order (ids are handed out increasing).
#[derive(Debug, Default)]
pub struct IdentityRegistry {
    sessions: BTreeMap<PlayerId, Session>,
}

impl IdentityRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted connection under the default nickname.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the id is taken.
    pub fn register(
        &mut self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<&Session, SessionError> {
        if self.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyConnected(player_id));
        }
        tracing::info!(%player_id, "participant connected");
        Ok(self
            .sessions
            .entry(player_id)
            .or_insert_with(|| Session::new(player_id, sender)))
    }

    /// Changes a participant's nickname and returns the stored form.
    ///
    /// Surrounding whitespace is trimmed; a blank request resets the
    /// participant to the default nickname.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the participant is gone.
    pub fn set_nickname(
        &mut self,
        player_id: PlayerId,
        requested: &str,
    ) -> Result<String, SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        session.nickname = normalize_nickname(requested);
        tracing::debug!(%player_id, nickname = %session.nickname, "nickname set");
        Ok(session.nickname.clone())
    }

    /// Forgets a participant entirely.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if the participant was never
    /// registered or was already removed.
    pub fn remove(
        &mut self,
        player_id: PlayerId,
    ) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::info!(%player_id, "participant disconnected");
        Ok(session)
    }

    pub fn get(&self, player_id: PlayerId) -> Option<&Session> {
        self.sessions.get(&player_id)
    }

    pub fn nickname(&self, player_id: PlayerId) -> Option<&str> {
        self.sessions.get(&player_id).map(|s| s.nickname.as_str())
    }

    /// Everyone connected, in connection order.
    pub fn user_list(&self) -> Vec<Participant> {
        self.sessions.values().map(Session::participant).collect()
    }

    /// Queues `msg` for every connected participant.
    ///
    /// Returns how many queues accepted it. Connections whose writer has
    /// already exited are skipped; they are cleaned up by their own
    /// disconnect path.
    pub fn broadcast(&self, msg: &ServerMessage) -> usize {
        self.sessions
            .values()
            .filter(|s| s.send(msg.clone()))
            .count()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

//! Room directory: creates, tracks, and routes participants to rooms.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use corridor_protocol::{Participant, PlayerId, RoomListEntry};
use corridor_session::PlayerSender;

use crate::room::spawn_room;
use crate::{Departure, RoomConfig, RoomError, RoomHandle, RoomId};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Owns the code → room mapping and the participant → room mapping.
///
/// Not thread-safe by itself; the server keeps it behind a
/// `tokio::sync::Mutex` so that structural changes (create, join, leave,
/// destroy) are serialized. Game traffic does not need the lock: callers
/// clone a [`RoomHandle`] with [`handle`](Self::handle), release the lock,
/// and talk to the actor directly.
pub struct RoomDirectory {
    config: RoomConfig,

    /// Live rooms, keyed by their human-chosen code.
    rooms: HashMap<String, RoomHandle>,

    /// Maps each participant to the code of the room they're in.
    /// A participant can be in at most ONE room at a time.
    player_rooms: HashMap<PlayerId, String>,
}

impl RoomDirectory {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            config: config.normalized(),
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
        }
    }

    fn ensure_roomless(&self, player: PlayerId) -> Result<(), RoomError> {
        match self.player_rooms.get(&player) {
            Some(code) => Err(RoomError::AlreadyInRoom {
                player,
                code: code.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Opens a new room under `code` with `creator` as host.
    ///
    /// Surrounding whitespace is not part of a code.
    ///
    /// # Errors
    /// - [`RoomError::InvalidCode`]: the code is blank
    /// - [`RoomError::CodeInUse`]: a live room already has this code
    /// - [`RoomError::AlreadyInRoom`]: the creator is in another room
    pub fn create(
        &mut self,
        code: &str,
        creator: Participant,
        sender: PlayerSender,
    ) -> Result<RoomId, RoomError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(RoomError::InvalidCode);
        }
        if self.rooms.contains_key(code) {
            return Err(RoomError::CodeInUse(code.to_owned()));
        }
        self.ensure_roomless(creator.id)?;

        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let player_id = creator.id;
        let handle = spawn_room(
            room_id,
            code.to_owned(),
            self.config.clone(),
            creator,
            sender,
        );
        self.rooms.insert(code.to_owned(), handle);
        self.player_rooms.insert(player_id, code.to_owned());
        tracing::info!(%room_id, code, host = %player_id, "room created");
        Ok(room_id)
    }

    /// Adds a participant to an existing room.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`]: no room has this code
    /// - [`RoomError::AlreadyInRoom`]: the participant is in a room already
    /// - [`RoomError::RoomFull`]: the room is at capacity
    pub async fn join(
        &mut self,
        code: &str,
        participant: Participant,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let code = code.trim();
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.to_owned()))?;
        self.ensure_roomless(participant.id)?;

        let player_id = participant.id;
        handle.join(participant, sender).await?;
        self.player_rooms.insert(player_id, code.to_owned());
        Ok(())
    }

    /// Removes a participant from whatever room they are in.
    ///
    /// Returns `Ok(None)` if they weren't in one, which is the normal case
    /// for a disconnect outside any room. A room left empty is destroyed.
    pub async fn leave(
        &mut self,
        player_id: PlayerId,
    ) -> Result<Option<Departure>, RoomError> {
        let Some(code) = self.player_rooms.remove(&player_id) else {
            return Ok(None);
        };
        let Some(handle) = self.rooms.get(&code).cloned() else {
            return Ok(None);
        };

        let departure = match handle.leave(player_id).await {
            Ok(departure) => departure,
            Err(RoomError::Unavailable(_)) => {
                // The actor is already gone; drop what's left of it.
                tracing::warn!(code = %code, "room actor vanished, removing");
                self.remove_room(&code);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if departure.remaining == 0 {
            self.remove_room(&code);
            let _ = handle.shutdown().await;
            tracing::info!(room_id = %handle.room_id(), code = %code, "empty room destroyed");
        }
        Ok(Some(departure))
    }

    /// A handle to the room with this code, for talking to it without
    /// holding the directory lock.
    pub fn handle(&self, code: &str) -> Result<RoomHandle, RoomError> {
        let code = code.trim();
        self.rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(code.to_owned()))
    }

    /// Every room with its participant count, capacity, and phase,
    /// sorted by code. Rooms that fail to respond (shutting down) are
    /// skipped.
    pub async fn list_rooms(&self) -> Vec<RoomListEntry> {
        let mut entries = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(info) = handle.get_info().await {
                entries.push(info.list_entry());
            }
        }
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }

    /// Post-win teardown. Destroys the room only if `code` still refers to
    /// the instance `room_id`; returns whether anything was destroyed.
    ///
    /// The room may already be gone (everyone left) and the code may even
    /// have been reused by a newer room, in which case this is a no-op.
    pub async fn destroy_finished(&mut self, code: &str, room_id: RoomId) -> bool {
        let Some(handle) = self.rooms.get(code) else {
            return false;
        };
        if handle.room_id() != room_id {
            return false;
        }

        let handle = handle.clone();
        self.remove_room(code);
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, code, "finished room torn down");
        true
    }

    fn remove_room(&mut self, code: &str) {
        self.rooms.remove(code);
        self.player_rooms.retain(|_, c| c != code);
    }

    /// The code of the room a participant is in, if any.
    pub fn player_room(&self, player_id: PlayerId) -> Option<&str> {
        self.player_rooms.get(&player_id).map(String::as_str)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomDirectory {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

//! Protocol messages for Corridor's wire format.
//!
//! Every message is one JSON object with a kebab-case `"type"` tag, for
//! example:
//!
//! ```json
//! { "type": "join-room", "code": "abcd" }
//! { "type": "game-action", "code": "abcd",
//!   "action": { "type": "move", "payload": { "row": 1, "col": 4 } } }
//! ```
//!
//! `#[serde(tag = "type")]` produces this "internally tagged" form, which
//! is the easiest shape to switch on in browser JavaScript.

use std::fmt;

use corridor_engine::{Action, GameState, PlayerId};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Recipient: who should receive a message?
// ---------------------------------------------------------------------------

/// Specifies which room members should receive a server message.
///
/// A room actor turns each accepted command into a list of
/// `(Recipient, ServerMessage)` pairs and dispatches them to its members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Every participant in the room.
    All,

    /// One specific participant.
    Player(PlayerId),

    /// Everyone in the room except the given participant.
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room's game.
///
/// Transitions are strictly ordered, with no skipping or going back:
///
/// ```text
/// Open → InProgress → Finished
/// ```
///
/// - **Open**: participants gather in the lobby; no game exists yet.
/// - **InProgress**: a game is running and accepts turn actions.
/// - **Finished**: someone won. Every further action is rejected until
///   the room is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomPhase {
    Open,
    InProgress,
    Finished,
}

impl RoomPhase {
    /// The only phase this one may move to, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Open => Some(Self::InProgress),
            Self::InProgress => Some(Self::Finished),
            Self::Finished => None,
        }
    }

    /// Returns `true` if transitioning to `target` is valid.
    pub fn can_transition_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }
}

impl fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// A connected participant as other clients see them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: PlayerId,
    pub nickname: String,
}

/// The lobby as shown to everyone in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyView {
    pub code: String,
    /// Participants in join order. This is also seat order at game start.
    pub participants: Vec<Participant>,
    pub host: PlayerId,
    pub phase: RoomPhase,
}

/// A summary of a room returned in room listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListEntry {
    pub code: String,
    pub player_count: usize,
    pub max_players: usize,
    pub phase: RoomPhase,
}

// ---------------------------------------------------------------------------
// ClientMessage: client → server
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Set the display name used in lobbies, games, and chat.
    SetIdentity { nickname: String },

    /// Open a new room under a human-chosen code and become its host.
    CreateRoom { code: String },

    /// Enter an existing room.
    JoinRoom { code: String },

    /// Leave whatever room this connection is in.
    LeaveRoom,

    /// List every room on the server.
    ListRooms,

    /// Host only: seat everyone and begin the game.
    StartGame { code: String },

    /// Take a turn.
    GameAction { code: String, action: Action },

    /// Chat with everyone connected to the server.
    SendChatMessage { text: String },

    /// Keep-alive. `client_time` is echoed back for RTT measurement.
    Heartbeat { client_time: u64 },
}

// ---------------------------------------------------------------------------
// ServerMessage: server → client
// ---------------------------------------------------------------------------

/// Everything the server can tell a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First message on every connection: the id this connection plays as.
    Connected { player_id: PlayerId },

    /// Acknowledges `set-identity`.
    IdentitySet { nickname: String },

    /// Everyone connected to the server. Sent to all connections whenever
    /// someone connects, renames, or leaves.
    UserList { users: Vec<Participant> },

    RoomCreated { code: String },

    RoomJoined { code: String },

    RoomLeft { code: String },

    RoomList { rooms: Vec<RoomListEntry> },

    /// Room-wide lobby snapshot after any membership or host change.
    LobbyUpdate { lobby: LobbyView },

    /// Room-wide: the game began. Carries the full initial state.
    GameStarted { state: GameState },

    /// Room-wide: an action was accepted. Carries the full new state.
    #[serde(rename = "game-state")]
    StateUpdated { state: GameState },

    /// Room-wide: somebody reached their destination row. The room is torn
    /// down shortly afterwards.
    GameOver { winner: PlayerId, nickname: String },

    /// Server-wide chat line.
    ChatMessage { nickname: String, text: String },

    /// Reply to `heartbeat`. `server_time` is milliseconds since the
    /// connection was accepted.
    HeartbeatAck { client_time: u64, server_time: u64 },

    /// Sent only to the participant whose request was refused.
    ///
    /// `code` follows HTTP conventions: 400 bad request / illegal action,
    /// 403 not allowed (wrong turn, not host), 404 unknown room,
    /// 409 conflict (code taken, room full, wrong phase).
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================

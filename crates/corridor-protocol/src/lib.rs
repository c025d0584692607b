//! Wire protocol for Corridor.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Messages** ([`ClientMessage`], [`ServerMessage`]): the events that
//!   travel on the wire, one JSON object per WebSocket frame.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! layer (game rules). It doesn't know about connections or rooms; it
//! only knows how to serialize and deserialize messages. Game types such as
//! [`GameState`] come from `corridor-engine` and are re-exported here so
//! that clients of the protocol need only one import.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientMessage) → Room actor (Game)
//! ```

mod codec;
mod error;
mod messages;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use messages::{
    ClientMessage, LobbyView, Participant, Recipient, RoomListEntry,
    RoomPhase, ServerMessage,
};

pub use corridor_engine::{Action, Cell, GameState, Orientation, PlayerId, Wall};

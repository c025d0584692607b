//! # Corridor
//!
//! Authoritative multiplayer server for a turn-based race game on a 9×9
//! board: pawns race to the far edge while walls slow everyone down, and
//! no wall may ever seal a player off from their goal.
//!
//! The server owns all game state. Clients send requests (`create-room`,
//! `game-action`, ...) as JSON over WebSocket; the server validates every
//! one and broadcasts the resulting state to the room.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corridor::prelude::*;
//!
//! # async fn run() -> Result<(), CorridorError> {
//! let server = CorridorServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::CorridorError;
pub use server::{CorridorServer, CorridorServerBuilder, ServerConfig, DEFAULT_PORT};

/// Everything needed to run or talk to a Corridor server.
pub mod prelude {
    pub use crate::{CorridorError, CorridorServer, CorridorServerBuilder, ServerConfig};
    pub use corridor_engine::{Action, Cell, GameState, Orientation, Player, PlayerId, Wall};
    pub use corridor_protocol::{
        ClientMessage, Codec, JsonCodec, LobbyView, Participant, RoomListEntry, RoomPhase,
        ServerMessage,
    };
    pub use corridor_room::{RoomConfig, RoomError};
}

//! Rooms for Corridor.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns its
//! lobby, host, phase, and game. The [`RoomDirectory`] maps human-chosen
//! codes to those actors.
//!
//! # Key types
//!
//! - [`RoomDirectory`]: creates/destroys rooms, routes participants
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomConfig`]: player limits and queue size
//! - [`RoomError`]: every way a room request can be refused

mod config;
mod error;
mod manager;
mod room;

pub use config::RoomConfig;
pub use error::RoomError;
pub use manager::RoomDirectory;
pub use room::{Departure, RoomHandle, RoomId, RoomInfo};

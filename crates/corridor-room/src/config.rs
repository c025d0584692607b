//! Room configuration.

use corridor_engine::{MAX_PLAYERS, MIN_PLAYERS};
use serde::{Deserialize, Serialize};

/// Configuration shared by every room a directory creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Minimum participants required to start the game.
    pub min_players: usize,

    /// Maximum participants allowed in the room. Every participant is
    /// seated when the game starts, so this never exceeds the number of
    /// seats on the board.
    pub max_players: usize,

    /// Capacity of each room actor's command queue. Callers wait when
    /// it is full.
    pub channel_size: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_players: MIN_PLAYERS,
            max_players: MAX_PLAYERS,
            channel_size: 64,
        }
    }
}

impl RoomConfig {
    /// Clamps the player limits to what the board can seat.
    pub fn normalized(mut self) -> Self {
        self.max_players = self.max_players.clamp(MIN_PLAYERS, MAX_PLAYERS);
        self.min_players = self.min_players.clamp(MIN_PLAYERS, self.max_players);
        self.channel_size = self.channel_size.max(1);
        self
    }
}

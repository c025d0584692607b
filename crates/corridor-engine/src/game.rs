//! The per-room game: seating, turn order, action handling, and win detection.

use std::collections::BTreeSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::moves::legal_destinations;
use crate::walls::validate_placement;
use crate::{ActionError, Cell, PlayerId, StartError, Wall};

/// Fewest participants a game can start with.
pub const MIN_PLAYERS: usize = 2;

/// Most participants a room (and therefore a game) can hold.
pub const MAX_PLAYERS: usize = 4;

/// Start cell and destination row for each seat, in join order:
/// top edge, bottom edge, left edge, right edge.
pub const SEATS: [(Cell, u8); MAX_PLAYERS] = [
    (Cell::new(0, 4), 8),
    (Cell::new(8, 4), 0),
    (Cell::new(4, 0), 8),
    (Cell::new(4, 8), 0),
];

/// Walls each player receives: 10 in a two- or three-player game, 5 in a
/// four-player game.
pub fn wall_allowance(player_count: usize) -> u8 {
    if player_count < MAX_PLAYERS { 10 } else { 5 }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// A seated player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub nickname: String,
    /// Current cell. Flattened so the wire form carries `row`/`col` directly.
    #[serde(flatten)]
    pub position: Cell,
    pub walls_left: u8,
    /// Reaching any cell in this row wins.
    pub destination: u8,
}

/// Everything a client needs to render the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Placed walls, oldest first. Only ever grows.
    pub walls: Vec<Wall>,
    /// Seated players in seat order.
    pub players: Vec<Player>,
    /// Seat whose turn it is. Always a valid index into `players`.
    pub turn_index: usize,
}

impl GameState {
    pub fn current_player(&self) -> &Player {
        &self.players[self.turn_index]
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// The player standing on `cell`, if any.
    pub fn occupant(&self, cell: Cell) -> Option<&Player> {
        self.players.iter().find(|p| p.position == cell)
    }
}

// ---------------------------------------------------------------------------
// Actions and outcomes
// ---------------------------------------------------------------------------

/// A turn action. Wire form:
/// `{"type": "move", "payload": {"row": 1, "col": 4}}` or
/// `{"type": "place-wall", "payload": {"row": 3, "col": 3, "orientation": "horizontal"}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum Action {
    Move(Cell),
    PlaceWall(Wall),
}

/// What an accepted action did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action was applied and the turn passed on.
    Continued,
    /// The mover reached its destination row. The game is over.
    Won { winner: PlayerId },
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// One room's authoritative game.
///
/// All mutation goes through [`Game::apply`], which either applies an
/// action completely or rejects it without touching anything.
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    winner: Option<PlayerId>,
}

impl Game {
    /// Seats `participants` (in join order) and picks a random first turn.
    pub fn start<R: Rng>(
        participants: &[(PlayerId, String)],
        rng: &mut R,
    ) -> Result<Self, StartError> {
        let count = participants.len();
        if count < MIN_PLAYERS {
            return Err(StartError::NotEnoughPlayers { count, min: MIN_PLAYERS });
        }
        if count > MAX_PLAYERS {
            return Err(StartError::TooManyPlayers { count, max: MAX_PLAYERS });
        }

        let walls_left = wall_allowance(count);
        let players = participants
            .iter()
            .zip(SEATS)
            .map(|((id, nickname), (position, destination))| Player {
                id: *id,
                nickname: nickname.clone(),
                position,
                walls_left,
                destination,
            })
            .collect();

        Ok(Self::from_state(GameState {
            walls: Vec::new(),
            players,
            turn_index: rng.random_range(0..count),
        }))
    }

    /// Resumes a game from an existing state, e.g. a mid-game position in tests.
    pub fn from_state(state: GameState) -> Self {
        debug_assert!(state.turn_index < state.players.len());
        Self { state, winner: None }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    /// Legal destinations for whoever's turn it is.
    pub fn legal_moves(&self) -> BTreeSet<Cell> {
        legal_destinations(self.state.current_player(), &self.state)
    }

    /// Applies `action` on behalf of `actor`.
    ///
    /// Rejections leave the turn, walls, and positions exactly as they were.
    pub fn apply(
        &mut self,
        actor: PlayerId,
        action: Action,
    ) -> Result<Outcome, ActionError> {
        if self.is_finished() {
            return Err(ActionError::GameFinished);
        }
        if self.state.current_player().id != actor {
            return Err(ActionError::NotYourTurn);
        }

        let seat = self.state.turn_index;
        match action {
            Action::Move(target) => {
                if !self.legal_moves().contains(&target) {
                    return Err(ActionError::IllegalMove(target));
                }
                let player = &mut self.state.players[seat];
                player.position = target;
                if target.row == player.destination {
                    self.winner = Some(actor);
                    return Ok(Outcome::Won { winner: actor });
                }
            }
            Action::PlaceWall(wall) => {
                if self.state.players[seat].walls_left == 0 {
                    return Err(ActionError::NoWallsLeft);
                }
                validate_placement(&wall, &self.state)?;
                self.state.walls.push(wall);
                self.state.players[seat].walls_left -= 1;
            }
        }

        self.state.turn_index = (seat + 1) % self.state.players.len();
        Ok(Outcome::Continued)
    }
}

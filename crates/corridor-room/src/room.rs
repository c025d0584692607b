//! Room actor: an isolated Tokio task that owns one room.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. Commands are processed one at a time, so no
//! two mutations of a room ever interleave, while different rooms run
//! fully in parallel.

use std::collections::HashMap;
use std::fmt;

use corridor_engine::{Action, Game, Outcome, StartError};
use corridor_protocol::{
    LobbyView, Participant, PlayerId, Recipient, RoomListEntry, RoomPhase,
    ServerMessage,
};
use corridor_session::PlayerSender;
use tokio::sync::{mpsc, oneshot};

use crate::{RoomConfig, RoomError};

/// Identifies one room *instance*.
///
/// Codes are chosen by humans and can be reused once a room is gone, so
/// deferred work (post-win teardown) holds on to the `RoomId` to make
/// sure it still targets the room it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in each variant is a "reply channel": the
/// caller sends a command and waits for the response on that channel.
pub(crate) enum RoomCommand {
    Join {
        participant: Participant,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Departure, RoomError>>,
    },

    StartGame {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    GameAction {
        player_id: PlayerId,
        action: Action,
        reply: oneshot::Sender<Result<Outcome, RoomError>>,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    /// Tell everyone the room is closing, then stop.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub code: String,
    pub phase: RoomPhase,
    pub host: PlayerId,
    pub player_count: usize,
    pub max_players: usize,
}

impl RoomInfo {
    /// The summary shown in room listings.
    pub fn list_entry(&self) -> RoomListEntry {
        RoomListEntry {
            code: self.code.clone(),
            player_count: self.player_count,
            max_players: self.max_players,
            phase: self.phase,
        }
    }
}

/// What happened when a participant left a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub code: String,
    /// Participants still in the room. Zero means the room should go.
    pub remaining: usize,
    /// Set when the leaver was host and someone else took over.
    pub new_host: Option<PlayerId>,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone: it's just an `mpsc::Sender` wrapper. The
/// [`RoomDirectory`](crate::RoomDirectory) holds one of these per room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    code: String,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.code.clone())
    }

    /// Sends `cmd` and waits for the actor's reply.
    async fn request<T>(
        &self,
        cmd: RoomCommand,
        reply_rx: oneshot::Receiver<T>,
    ) -> Result<T, RoomError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| self.unavailable())?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Adds a participant to the lobby.
    ///
    /// On success the newcomer receives `room-joined`, then everyone
    /// receives a `lobby-update`.
    pub async fn join(
        &self,
        participant: Participant,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Join { participant, sender, reply }, rx)
            .await?
    }

    /// Removes a participant, handing the host role on if needed.
    pub async fn leave(
        &self,
        player_id: PlayerId,
    ) -> Result<Departure, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Leave { player_id, reply }, rx)
            .await?
    }

    /// Host only: seats everyone and starts the game.
    pub async fn start_game(
        &self,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::StartGame { player_id, reply }, rx)
            .await?
    }

    /// Applies one turn on behalf of `player_id`.
    ///
    /// Rejections change nothing and are broadcast to nobody; the caller
    /// reports them to the actor.
    pub async fn game_action(
        &self,
        player_id: PlayerId,
        action: Action,
    ) -> Result<Outcome, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::GameAction { player_id, action, reply }, rx)
            .await?
    }

    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::GetInfo { reply }, rx).await
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| self.unavailable())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room_id: RoomId,
    code: String,
    config: RoomConfig,
    phase: RoomPhase,
    /// Join order. Seat order at game start, and host succession order.
    participants: Vec<Participant>,
    host: PlayerId,
    senders: HashMap<PlayerId, PlayerSender>,
    game: Option<Game>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, code = %self.code, "room actor started");

        self.dispatch(vec![
            (
                Recipient::Player(self.host),
                ServerMessage::RoomCreated { code: self.code.clone() },
            ),
            (Recipient::All, self.lobby_update()),
        ]);

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join { participant, sender, reply } => {
                    let _ = reply.send(self.handle_join(participant, sender));
                }
                RoomCommand::Leave { player_id, reply } => {
                    let _ = reply.send(self.handle_leave(player_id));
                }
                RoomCommand::StartGame { player_id, reply } => {
                    let _ = reply.send(self.handle_start(player_id));
                }
                RoomCommand::GameAction { player_id, action, reply } => {
                    let _ = reply.send(self.handle_action(player_id, action));
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    self.dispatch(vec![(
                        Recipient::All,
                        ServerMessage::RoomLeft { code: self.code.clone() },
                    )]);
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    fn is_member(&self, player_id: PlayerId) -> bool {
        self.participants.iter().any(|p| p.id == player_id)
    }

    fn not_in_room(&self, player: PlayerId) -> RoomError {
        RoomError::NotInRoom { player, code: self.code.clone() }
    }

    fn handle_join(
        &mut self,
        participant: Participant,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let player_id = participant.id;
        if self.is_member(player_id) {
            return Err(RoomError::AlreadyInRoom {
                player: player_id,
                code: self.code.clone(),
            });
        }
        if self.participants.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        self.participants.push(participant);
        self.senders.insert(player_id, sender);
        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            players = self.participants.len(),
            "player joined"
        );

        self.dispatch(vec![
            (
                Recipient::Player(player_id),
                ServerMessage::RoomJoined { code: self.code.clone() },
            ),
            (Recipient::All, self.lobby_update()),
        ]);
        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<Departure, RoomError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| self.not_in_room(player_id))?;

        // Say goodbye while the leaver's sender is still registered.
        self.dispatch(vec![(
            Recipient::Player(player_id),
            ServerMessage::RoomLeft { code: self.code.clone() },
        )]);
        self.participants.remove(index);
        self.senders.remove(&player_id);

        let mut new_host = None;
        if self.host == player_id {
            if let Some(next) = self.participants.first() {
                self.host = next.id;
                new_host = Some(next.id);
                tracing::info!(room_id = %self.room_id, host = %next.id, "host passed on");
            }
        }

        tracing::info!(
            room_id = %self.room_id,
            %player_id,
            players = self.participants.len(),
            "player left"
        );

        if !self.participants.is_empty() {
            self.dispatch(vec![(Recipient::All, self.lobby_update())]);
        }

        Ok(Departure {
            code: self.code.clone(),
            remaining: self.participants.len(),
            new_host,
        })
    }

    fn handle_start(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if !self.is_member(player_id) {
            return Err(self.not_in_room(player_id));
        }
        if self.host != player_id {
            return Err(RoomError::NotHost);
        }
        if !self.phase.can_transition_to(RoomPhase::InProgress) {
            return Err(RoomError::AlreadyStarted);
        }

        let count = self.participants.len();
        if count < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers {
                count,
                min: self.config.min_players,
            });
        }

        let seated: Vec<(PlayerId, String)> = self
            .participants
            .iter()
            .map(|p| (p.id, p.nickname.clone()))
            .collect();
        let game = Game::start(&seated, &mut rand::rng()).map_err(|e| match e {
            StartError::NotEnoughPlayers { count, min } => {
                RoomError::NotEnoughPlayers { count, min }
            }
            StartError::TooManyPlayers { .. } => {
                RoomError::RoomFull(self.code.clone())
            }
        })?;

        let state = game.state().clone();
        self.game = Some(game);
        self.phase = RoomPhase::InProgress;
        tracing::info!(
            room_id = %self.room_id,
            players = count,
            first = %state.current_player().id,
            "game started"
        );

        self.dispatch(vec![(Recipient::All, ServerMessage::GameStarted { state })]);
        Ok(())
    }

    fn handle_action(
        &mut self,
        player_id: PlayerId,
        action: Action,
    ) -> Result<Outcome, RoomError> {
        if !self.is_member(player_id) {
            return Err(self.not_in_room(player_id));
        }
        let game = self.game.as_mut().ok_or(RoomError::NotStarted)?;

        let outcome = game.apply(player_id, action).inspect_err(|reason| {
            tracing::debug!(%player_id, %reason, "action rejected");
        })?;
        let state = game.state().clone();

        let mut msgs = vec![(Recipient::All, ServerMessage::StateUpdated { state })];
        if let Outcome::Won { winner } = outcome {
            let nickname = self
                .participants
                .iter()
                .find(|p| p.id == winner)
                .map(|p| p.nickname.clone())
                .or_else(|| {
                    self.game
                        .as_ref()
                        .and_then(|g| g.state().player(winner))
                        .map(|p| p.nickname.clone())
                })
                .unwrap_or_default();
            self.phase = RoomPhase::Finished;
            tracing::info!(room_id = %self.room_id, %winner, "game finished");
            msgs.push((Recipient::All, ServerMessage::GameOver { winner, nickname }));
        }

        // Dispatch after releasing the mutable borrow on the game.
        self.dispatch(msgs);
        Ok(outcome)
    }

    fn lobby_update(&self) -> ServerMessage {
        ServerMessage::LobbyUpdate {
            lobby: LobbyView {
                code: self.code.clone(),
                participants: self.participants.clone(),
                host: self.host,
                phase: self.phase,
            },
        }
    }

    /// Dispatches outbound messages to the correct recipients.
    fn dispatch(&self, msgs: Vec<(Recipient, ServerMessage)>) {
        for (recipient, msg) in msgs {
            match recipient {
                Recipient::All => {
                    for p in &self.participants {
                        self.send_to(p.id, msg.clone());
                    }
                }
                Recipient::Player(pid) => self.send_to(pid, msg),
                Recipient::AllExcept(excluded) => {
                    for p in &self.participants {
                        if p.id != excluded {
                            self.send_to(p.id, msg.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends an outbound message to a single participant. Silently drops
    /// it if their connection is already gone.
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            code: self.code.clone(),
            phase: self.phase,
            host: self.host,
            player_count: self.participants.len(),
            max_players: self.config.max_players,
        }
    }
}

/// Spawns a new room actor with `creator` as its first participant and
/// host, and returns a handle to communicate with it.
///
/// The creator receives `room-created` followed by the first
/// `lobby-update` before any other command is processed.
pub(crate) fn spawn_room(
    room_id: RoomId,
    code: String,
    config: RoomConfig,
    creator: Participant,
    sender: PlayerSender,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size);

    let host = creator.id;
    let actor = RoomActor {
        room_id,
        code: code.clone(),
        config,
        phase: RoomPhase::Open,
        participants: vec![creator],
        host,
        senders: HashMap::from([(host, sender)]),
        game: None,
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { room_id, code, sender: tx }
}

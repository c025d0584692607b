//! Per-connection handler: identity, message routing, and cleanup.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register the connection under a fresh `PlayerId`, send `connected`
//!   2. Spawn a writer task that drains the outbound queue onto the socket
//!   3. Loop: receive client messages → dispatch to registry or rooms
//!   4. On exit, leave any room and unregister (via a drop guard)

use std::sync::Arc;

use corridor_engine::Outcome;
use corridor_protocol::{ClientMessage, Codec, Participant, PlayerId, ServerMessage};
use corridor_room::RoomId;
use corridor_session::PlayerSender;
use corridor_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::CorridorError;

/// Drop guard that removes a participant from their room and from the
/// identity registry when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async locks.
struct ConnectionGuard<C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<C>>,
}

impl<C: Codec> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            if let Err(e) = state.rooms.lock().await.leave(player_id).await {
                tracing::warn!(%player_id, error = %e, "leave on disconnect failed");
            }
            let mut identities = state.identities.lock().await;
            if identities.remove(player_id).is_ok() {
                identities.broadcast(&ServerMessage::UserList {
                    users: identities.user_list(),
                });
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<C: Codec>(
    conn: WebSocketConnection,
    state: Arc<ServerState<C>>,
) -> Result<(), CorridorError> {
    let conn = Arc::new(conn);
    let player_id = PlayerId(conn.id().into_inner());
    tracing::debug!(%player_id, peer = %conn.peer_addr(), "handling new connection");

    let (tx, rx) = mpsc::unbounded_channel();
    {
        let mut identities = state.identities.lock().await;
        identities.register(player_id, tx.clone())?;
        // Queued before anyone else can address this connection.
        let _ = tx.send(ServerMessage::Connected { player_id });
        identities.broadcast(&ServerMessage::UserList {
            users: identities.user_list(),
        });
    }
    let _guard = ConnectionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    tokio::spawn(write_loop(Arc::clone(&conn), rx, Arc::clone(&state)));

    loop {
        let received = match state.config.idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, conn.recv()).await {
                Ok(received) => received,
                Err(_) => {
                    tracing::info!(%player_id, "connection timed out");
                    break;
                }
            },
            None => conn.recv().await,
        };
        let data = match received {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let result = match state.codec.decode::<ClientMessage>(&data) {
            Ok(msg) => handle_message(&state, player_id, &tx, msg).await,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode message");
                Err(e.into())
            }
        };
        if let Err(e) = result {
            send_error(&tx, &e);
        }
    }

    // _guard drops here → room leave + unregister fire. The writer exits
    // once every queue sender (registry, room, ours) is gone.
    Ok(())
}

/// Encodes queued messages and writes them to the socket, in order.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    mut rx: mpsc::UnboundedReceiver<ServerMessage>,
    state: Arc<ServerState<C>>,
) {
    let player_id = PlayerId(conn.id().into_inner());
    while let Some(msg) = rx.recv().await {
        let bytes = match state.codec.encode(&msg) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%player_id, error = %e, "failed to encode message");
                continue;
            }
        };
        if let Err(e) = conn.send(&bytes).await {
            tracing::debug!(%player_id, error = %e, "send failed, stopping writer");
            break;
        }
    }
    let _ = conn.close().await;
}

/// Dispatches one decoded client message.
///
/// Success replies and broadcasts are queued by whoever produced them
/// (registry or room actor); an `Err` is reported to this participant only.
async fn handle_message<C: Codec>(
    state: &Arc<ServerState<C>>,
    player_id: PlayerId,
    tx: &PlayerSender,
    msg: ClientMessage,
) -> Result<(), CorridorError> {
    match msg {
        ClientMessage::SetIdentity { nickname } => {
            let mut identities = state.identities.lock().await;
            let nickname = identities.set_nickname(player_id, &nickname)?;
            let _ = tx.send(ServerMessage::IdentitySet { nickname });
            identities.broadcast(&ServerMessage::UserList {
                users: identities.user_list(),
            });
        }

        ClientMessage::CreateRoom { code } => {
            let me = participant(state, player_id).await?;
            state.rooms.lock().await.create(&code, me, tx.clone())?;
        }

        ClientMessage::JoinRoom { code } => {
            let me = participant(state, player_id).await?;
            state
                .rooms
                .lock()
                .await
                .join(&code, me, tx.clone())
                .await?;
        }

        ClientMessage::LeaveRoom => {
            state.rooms.lock().await.leave(player_id).await?;
        }

        ClientMessage::ListRooms => {
            let rooms = state.rooms.lock().await.list_rooms().await;
            let _ = tx.send(ServerMessage::RoomList { rooms });
        }

        ClientMessage::StartGame { code } => {
            // Clone the handle and release the directory before waiting on
            // the room, so other rooms are not held up.
            let handle = state.rooms.lock().await.handle(&code)?;
            handle.start_game(player_id).await?;
        }

        ClientMessage::GameAction { code, action } => {
            let handle = state.rooms.lock().await.handle(&code)?;
            if let Outcome::Won { .. } = handle.game_action(player_id, action).await? {
                schedule_teardown(state, handle.code().to_owned(), handle.room_id());
            }
        }

        ClientMessage::SendChatMessage { text } => {
            let identities = state.identities.lock().await;
            let nickname = identities
                .nickname(player_id)
                .unwrap_or(corridor_session::DEFAULT_NICKNAME)
                .to_owned();
            identities.broadcast(&ServerMessage::ChatMessage { nickname, text });
        }

        ClientMessage::Heartbeat { client_time } => {
            let server_time = state
                .identities
                .lock()
                .await
                .get(player_id)
                .map_or(0, |s| s.uptime_ms());
            let _ = tx.send(ServerMessage::HeartbeatAck { client_time, server_time });
        }
    }
    Ok(())
}

/// This participant as the rooms will show them.
async fn participant<C: Codec>(
    state: &ServerState<C>,
    player_id: PlayerId,
) -> Result<Participant, CorridorError> {
    let identities = state.identities.lock().await;
    let session = identities
        .get(player_id)
        .ok_or(corridor_session::SessionError::NotFound(player_id))?;
    Ok(session.participant())
}

/// Tears a finished room down after the configured delay.
///
/// The room may be gone by then (everyone left) or its code reused;
/// `destroy_finished` checks the instance id and does nothing in that case.
fn schedule_teardown<C: Codec>(state: &Arc<ServerState<C>>, code: String, room_id: RoomId) {
    let state = Arc::clone(state);
    let delay = state.config.teardown_delay;
    tracing::info!(%room_id, code = %code, ?delay, "room teardown scheduled");
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        state.rooms.lock().await.destroy_finished(&code, room_id).await;
    });
}

/// Queues an `error` message for this participant.
fn send_error(tx: &PlayerSender, err: &CorridorError) {
    let _ = tx.send(ServerMessage::Error {
        code: err.code(),
        message: err.to_string(),
    });
}

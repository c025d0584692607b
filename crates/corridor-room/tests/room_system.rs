//! Integration tests for the room system: real room actors driven through
//! the directory, observed through each participant's outbound queue.

use std::time::Duration;

use corridor_engine::{legal_destinations, Action, ActionError, GameState, Outcome, Wall};
use corridor_protocol::{Participant, PlayerId, RoomPhase, ServerMessage};
use corridor_room::{RoomConfig, RoomDirectory, RoomError};
use corridor_session::PlayerSender;
use tokio::sync::mpsc;

type Inbox = mpsc::UnboundedReceiver<ServerMessage>;

fn participant(id: u64) -> Participant {
    Participant { id: PlayerId(id), nickname: format!("player{id}") }
}

fn channel() -> (PlayerSender, Inbox) {
    mpsc::unbounded_channel()
}

/// Waits for the next message on a participant's queue.
async fn next(inbox: &mut Inbox) -> ServerMessage {
    tokio::time::timeout(Duration::from_secs(2), inbox.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("queue closed")
}

/// Everything already queued, without waiting.
fn drain(inbox: &mut Inbox) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = inbox.try_recv() {
        out.push(msg);
    }
    out
}

fn lobby_of(msg: &ServerMessage) -> (Vec<PlayerId>, PlayerId) {
    match msg {
        ServerMessage::LobbyUpdate { lobby } => (
            lobby.participants.iter().map(|p| p.id).collect(),
            lobby.host,
        ),
        other => panic!("expected lobby-update, got {other:?}"),
    }
}

/// Creates room `code` hosted by player 1, then joins players 2..=n.
/// Returns the directory and each participant's inbox (index 0 = player 1),
/// with the setup chatter already drained.
async fn room_with(code: &str, n: u64) -> (RoomDirectory, Vec<Inbox>) {
    let mut directory = RoomDirectory::default();
    let mut inboxes = Vec::new();

    let (tx, rx) = channel();
    directory.create(code, participant(1), tx).unwrap();
    inboxes.push(rx);
    for id in 2..=n {
        let (tx, rx) = channel();
        directory.join(code, participant(id), tx).await.unwrap();
        inboxes.push(rx);
    }
    // Round-trip through the actor so everything it dispatched is queued.
    directory.handle(code).unwrap().get_info().await.unwrap();
    for inbox in &mut inboxes {
        drain(inbox);
    }
    (directory, inboxes)
}

async fn started_state(inbox: &mut Inbox) -> GameState {
    match next(inbox).await {
        ServerMessage::GameStarted { state } => state,
        other => panic!("expected game-started, got {other:?}"),
    }
}

// =========================================================================
// Lobby
// =========================================================================

#[tokio::test]
async fn test_create_sends_created_then_lobby() {
    let mut directory = RoomDirectory::default();
    let (tx, mut rx) = channel();
    directory.create("abcd", participant(1), tx).unwrap();

    assert_eq!(next(&mut rx).await, ServerMessage::RoomCreated { code: "abcd".into() });
    let (members, host) = lobby_of(&next(&mut rx).await);
    assert_eq!(members, vec![PlayerId(1)]);
    assert_eq!(host, PlayerId(1));
    assert_eq!(directory.player_room(PlayerId(1)), Some("abcd"));
}

#[tokio::test]
async fn test_duplicate_and_blank_codes_are_rejected() {
    let (mut directory, _inboxes) = room_with("abcd", 1).await;

    let (tx, _rx) = channel();
    assert_eq!(
        directory.create("abcd", participant(2), tx.clone()),
        Err(RoomError::CodeInUse("abcd".into()))
    );
    assert_eq!(
        directory.create("   ", participant(2), tx),
        Err(RoomError::InvalidCode)
    );
    assert_eq!(directory.room_count(), 1);
}

#[tokio::test]
async fn test_join_unknown_room_is_not_found() {
    let mut directory = RoomDirectory::default();
    let (tx, _rx) = channel();
    let err = directory.join("nope", participant(1), tx).await.unwrap_err();
    assert_eq!(err, RoomError::NotFound("nope".into()));
    assert_eq!(err.code(), 404);
}

#[tokio::test]
async fn test_join_sends_joined_then_lobby_to_everyone() {
    let (mut directory, mut inboxes) = room_with("abcd", 1).await;

    let (tx, mut rx) = channel();
    directory.join("abcd", participant(2), tx).await.unwrap();

    assert_eq!(next(&mut rx).await, ServerMessage::RoomJoined { code: "abcd".into() });
    let (members, _) = lobby_of(&next(&mut rx).await);
    assert_eq!(members, vec![PlayerId(1), PlayerId(2)]);

    let (members, host) = lobby_of(&next(&mut inboxes[0]).await);
    assert_eq!(members, vec![PlayerId(1), PlayerId(2)]);
    assert_eq!(host, PlayerId(1));
}

#[tokio::test]
async fn test_fifth_join_is_rejected_and_lobby_unchanged() {
    let (mut directory, mut inboxes) = room_with("full", 4).await;

    let (tx, mut rx) = channel();
    let err = directory.join("full", participant(5), tx).await.unwrap_err();
    assert_eq!(err, RoomError::RoomFull("full".into()));
    assert_eq!(err.code(), 409);
    assert_eq!(directory.player_room(PlayerId(5)), None);

    let info = directory.handle("full").unwrap().get_info().await.unwrap();
    assert_eq!(info.player_count, 4);
    assert!(drain(&mut rx).is_empty());
    for inbox in &mut inboxes {
        assert!(drain(inbox).is_empty(), "nobody hears about a refused join");
    }
}

#[tokio::test]
async fn test_one_room_per_participant() {
    let (mut directory, _inboxes) = room_with("one", 2).await;

    let (tx, _rx) = channel();
    assert!(matches!(
        directory.create("two", participant(2), tx.clone()),
        Err(RoomError::AlreadyInRoom { .. })
    ));
    assert!(matches!(
        directory.join("one", participant(2), tx).await,
        Err(RoomError::AlreadyInRoom { .. })
    ));
}

#[tokio::test]
async fn test_host_failover_to_earliest_remaining() {
    let (mut directory, mut inboxes) = room_with("abcd", 3).await;

    let departure = directory.leave(PlayerId(1)).await.unwrap().unwrap();
    assert_eq!(departure.remaining, 2);
    assert_eq!(departure.new_host, Some(PlayerId(2)));

    assert_eq!(next(&mut inboxes[0]).await, ServerMessage::RoomLeft { code: "abcd".into() });
    let (members, host) = lobby_of(&next(&mut inboxes[2]).await);
    assert_eq!(members, vec![PlayerId(2), PlayerId(3)]);
    assert_eq!(host, PlayerId(2));

    // A non-host leaving keeps the host.
    let departure = directory.leave(PlayerId(3)).await.unwrap().unwrap();
    assert_eq!(departure.new_host, None);
}

#[tokio::test]
async fn test_last_leave_destroys_room_and_frees_code() {
    let (mut directory, _inboxes) = room_with("abcd", 1).await;

    let departure = directory.leave(PlayerId(1)).await.unwrap().unwrap();
    assert_eq!(departure.remaining, 0);
    assert_eq!(directory.room_count(), 0);

    let (tx, _rx) = channel();
    assert!(directory.create("abcd", participant(7), tx).is_ok());
}

#[tokio::test]
async fn test_leave_outside_any_room_is_noop() {
    let mut directory = RoomDirectory::default();
    assert_eq!(directory.leave(PlayerId(42)).await, Ok(None));
}

#[tokio::test]
async fn test_list_rooms_reports_count_and_phase() {
    let (mut directory, _inboxes) = room_with("b-room", 2).await;
    let (tx, _rx) = channel();
    directory.create("a-room", participant(9), tx).unwrap();
    directory.handle("b-room").unwrap().start_game(PlayerId(1)).await.unwrap();

    let rooms = directory.list_rooms().await;
    assert_eq!(rooms.len(), 2);
    assert_eq!(rooms[0].code, "a-room");
    assert_eq!(rooms[0].player_count, 1);
    assert_eq!(rooms[0].phase, RoomPhase::Open);
    assert_eq!(rooms[1].code, "b-room");
    assert_eq!(rooms[1].player_count, 2);
    assert_eq!(rooms[1].max_players, 4);
    assert_eq!(rooms[1].phase, RoomPhase::InProgress);
}

// =========================================================================
// Starting
// =========================================================================

#[tokio::test]
async fn test_start_requires_host_and_two_players() {
    let (directory, _inboxes) = room_with("solo", 1).await;
    let handle = directory.handle("solo").unwrap();
    assert_eq!(
        handle.start_game(PlayerId(1)).await,
        Err(RoomError::NotEnoughPlayers { count: 1, min: 2 })
    );

    let (directory, _inboxes) = room_with("duo", 2).await;
    let handle = directory.handle("duo").unwrap();
    assert_eq!(handle.start_game(PlayerId(2)).await, Err(RoomError::NotHost));
    assert_eq!(handle.start_game(PlayerId(1)).await, Ok(()));
    assert_eq!(
        handle.start_game(PlayerId(1)).await,
        Err(RoomError::AlreadyStarted)
    );
}

#[tokio::test]
async fn test_start_seats_everyone_in_join_order() {
    let (directory, mut inboxes) = room_with("four", 4).await;
    directory.handle("four").unwrap().start_game(PlayerId(1)).await.unwrap();

    let state = started_state(&mut inboxes[3]).await;
    let ids: Vec<_> = state.players.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![PlayerId(1), PlayerId(2), PlayerId(3), PlayerId(4)]);
    assert!(state.players.iter().all(|p| p.walls_left == 5));
    assert!(state.turn_index < 4);
}

// =========================================================================
// Turns
// =========================================================================

#[tokio::test]
async fn test_action_before_start_is_rejected() {
    let (directory, _inboxes) = room_with("abcd", 2).await;
    let handle = directory.handle("abcd").unwrap();
    let err = handle
        .game_action(PlayerId(1), Action::PlaceWall(Wall::horizontal(0, 0)))
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::NotStarted);
}

#[tokio::test]
async fn test_turn_exclusivity() {
    let (directory, mut inboxes) = room_with("abcd", 2).await;
    let handle = directory.handle("abcd").unwrap();
    handle.start_game(PlayerId(1)).await.unwrap();
    let state = started_state(&mut inboxes[0]).await;
    drain(&mut inboxes[1]);

    let current = state.current_player().id;
    let waiting = state.players.iter().find(|p| p.id != current).unwrap().id;

    let err = handle
        .game_action(waiting, Action::PlaceWall(Wall::horizontal(3, 3)))
        .await
        .unwrap_err();
    assert_eq!(err, RoomError::Game(ActionError::NotYourTurn));
    for inbox in &mut inboxes {
        assert!(drain(inbox).is_empty(), "rejections are not broadcast");
    }

    let outcome = handle
        .game_action(current, Action::PlaceWall(Wall::horizontal(3, 3)))
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Continued);
    match next(&mut inboxes[1]).await {
        ServerMessage::StateUpdated { state } => {
            assert_eq!(state.walls, vec![Wall::horizontal(3, 3)]);
            assert_eq!(state.current_player().id, waiting);
        }
        other => panic!("expected game-state, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_member_cannot_act() {
    let (directory, _inboxes) = room_with("abcd", 2).await;
    let handle = directory.handle("abcd").unwrap();
    handle.start_game(PlayerId(1)).await.unwrap();

    let err = handle
        .game_action(PlayerId(99), Action::PlaceWall(Wall::horizontal(3, 3)))
        .await
        .unwrap_err();
    assert!(matches!(err, RoomError::NotInRoom { .. }));
    assert_eq!(err.code(), 403);
}

// =========================================================================
// Winning and teardown
// =========================================================================

/// Plays greedy moves (closest to the goal row) until someone wins.
#[tokio::test]
async fn test_race_to_win_then_finished_then_teardown() {
    let (mut directory, mut inboxes) = room_with("race", 2).await;
    let handle = directory.handle("race").unwrap();
    let room_id = handle.room_id();
    handle.start_game(PlayerId(1)).await.unwrap();
    let mut state = started_state(&mut inboxes[0]).await;

    let mut winner = None;
    for _ in 0..40 {
        let me = state.current_player().clone();
        let target = legal_destinations(&me, &state)
            .into_iter()
            .min_by_key(|c| c.row.abs_diff(me.destination))
            .unwrap();
        let outcome = handle.game_action(me.id, Action::Move(target)).await.unwrap();

        state = match next(&mut inboxes[0]).await {
            ServerMessage::StateUpdated { state } => state,
            other => panic!("expected game-state, got {other:?}"),
        };
        if let Outcome::Won { winner: w } = outcome {
            winner = Some(w);
            break;
        }
    }
    let winner = winner.expect("greedy race should finish");

    match next(&mut inboxes[0]).await {
        ServerMessage::GameOver { winner: w, nickname } => {
            assert_eq!(w, winner);
            assert_eq!(nickname, format!("player{}", winner.0));
        }
        other => panic!("expected game-over, got {other:?}"),
    }

    let info = handle.get_info().await.unwrap();
    assert_eq!(info.phase, RoomPhase::Finished);
    let loser = state.players.iter().find(|p| p.id != winner).unwrap().id;
    assert_eq!(
        handle
            .game_action(loser, Action::PlaceWall(Wall::horizontal(0, 0)))
            .await,
        Err(RoomError::Game(ActionError::GameFinished))
    );

    assert!(directory.destroy_finished("race", room_id).await);
    assert_eq!(directory.room_count(), 0);
    assert_eq!(directory.player_room(PlayerId(1)), None);

    // Everyone still in the room hears it close, after the game traffic.
    let closed = ServerMessage::RoomLeft { code: "race".into() };
    while next(&mut inboxes[1]).await != closed {}
}

#[tokio::test]
async fn test_destroy_finished_ignores_reused_code() {
    let mut directory = RoomDirectory::new(RoomConfig::default());
    let (tx, _rx) = channel();
    let old_id = directory.create("abcd", participant(1), tx).unwrap();
    directory.leave(PlayerId(1)).await.unwrap();

    let (tx, _rx2) = channel();
    let new_id = directory.create("abcd", participant(2), tx).unwrap();
    assert_ne!(old_id, new_id);

    assert!(!directory.destroy_finished("abcd", old_id).await);
    assert_eq!(directory.room_count(), 1);
    assert!(!directory.destroy_finished("gone", old_id).await);
}

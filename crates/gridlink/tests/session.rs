//! Integration tests for the session orchestrator.
//!
//! These drive a full session actor over an in-memory [`DmLink`] double:
//! the test plays the DM service, feeding inbound frames and observing
//! every outbound frame as raw JSON — the same bytes a real DM would see.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use gridlink::prelude::*;
use gridlink_transport::TransportError;

/// In-memory stand-in for the session WebSocket.
struct MockLink {
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    outbound: mpsc::UnboundedSender<Vec<u8>>,
}

impl DmLink for MockLink {
    async fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.outbound
            .send(data.to_vec())
            .map_err(|_| TransportError::ConnectionClosed("mock receiver gone".into()))
    }

    async fn recv(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        // Dropping the test's sender reads as a clean close.
        Ok(self.inbound.recv().await)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Spawns a session over a mock link. Returns the handle, the DM-side
/// sender (inbound to the session), and the DM-side receiver (outbound
/// from the session).
fn mock_session(
    builder: GameSessionBuilder,
) -> (
    SessionHandle,
    mpsc::UnboundedSender<Vec<u8>>,
    mpsc::UnboundedReceiver<Vec<u8>>,
) {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let link = MockLink {
        inbound: inbound_rx,
        outbound: outbound_tx,
    };
    let handle = builder.spawn_with_link(link).expect("spawn session");
    (handle, inbound_tx, outbound_rx)
}

async fn next_outbound(rx: &mut mpsc::UnboundedReceiver<Vec<u8>>) -> serde_json::Value {
    let bytes = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for outbound message")
        .expect("outbound channel closed");
    serde_json::from_slice(&bytes).expect("outbound frames are JSON")
}

async fn wait_for_state(handle: &SessionHandle, want: LinkState) {
    for _ in 0..500 {
        if handle.link_state().await.unwrap() == want {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("session never reached {want:?}");
}

async fn wait_for_chat_len(handle: &SessionHandle, want: usize) -> Vec<ChatMessage> {
    for _ in 0..500 {
        let chat = handle.chat().await.unwrap();
        if chat.len() >= want {
            return chat;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("chat never reached {want} entries");
}

fn send_json(tx: &mpsc::UnboundedSender<Vec<u8>>, json: &str) {
    tx.send(json.as_bytes().to_vec()).expect("session link alive");
}

// -----------------------------------------------------------------------
// Local interaction → outbound actions
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_placed_token_is_reported_as_add_action() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    handle.place_random_token().await.unwrap();
    let tokens = handle.tokens().await.unwrap();
    assert_eq!(tokens.len(), 1);

    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "player_action");
    assert_eq!(msg["action"]["type"], "add");
    assert_eq!(msg["action"]["character_id"], tokens[0].id.to_string());
    assert_eq!(msg["action"]["position"]["x"], tokens[0].x);
    assert_eq!(msg["action"]["position"]["y"], tokens[0].y);
}

#[tokio::test]
async fn test_clicking_a_token_reports_select() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    handle.place_random_token().await.unwrap();
    let token = handle.tokens().await.unwrap()[0].clone();
    let _add = next_outbound(&mut dm_rx).await;

    handle.click_cell(token.x, token.y).await.unwrap();
    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["action"]["type"], "select");
    assert_eq!(msg["action"]["character_id"], token.id.to_string());
}

#[tokio::test]
async fn test_token_cap_rejection_surfaces_to_the_caller() {
    let config = SessionConfig {
        token_cap: 1,
        ..SessionConfig::default()
    };
    let (handle, _dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new().config(config));

    handle.place_random_token().await.unwrap();
    let err = handle.place_random_token().await.unwrap_err();
    assert!(matches!(
        err,
        GridlinkError::Board(BoardError::MaxTokensReached(1))
    ));
    assert_eq!(handle.tokens().await.unwrap().len(), 1);
}

// -----------------------------------------------------------------------
// Inbound directives
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_dm_move_directive_is_applied_trusted() {
    let (handle, dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    handle.place_random_token().await.unwrap();
    let token = handle.tokens().await.unwrap()[0].clone();
    let target = if token.pos() == (0, 0) { (1, 1) } else { (0, 0) };

    send_json(
        &dm_tx,
        &format!(
            r#"{{"type": "dm_response", "content": "You are dragged away!",
                "move_character": {{"character_id": "{}", "to_x": {}, "to_y": {}}},
                "timestamp": 1700000000.0}}"#,
            token.id, target.0, target.1
        ),
    );

    for _ in 0..500 {
        let tokens = handle.tokens().await.unwrap();
        if tokens[0].pos() == target {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("DM move directive never applied");
}

#[tokio::test]
async fn test_dm_add_directive_places_npc() {
    let (handle, dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    send_json(
        &dm_tx,
        r#"{"type": "dm_response", "content": "A goblin appears!",
            "add_character": {"type": "npc", "x": 3, "y": 1, "label": "Goblin"}}"#,
    );

    for _ in 0..500 {
        let tokens = handle.tokens().await.unwrap();
        if let Some(token) = tokens.first() {
            assert_eq!(token.label, "Goblin");
            assert_eq!(token.pos(), (3, 1));
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("DM add directive never applied");
}

#[tokio::test]
async fn test_narration_reaches_chat_only_in_ai_mode() {
    let (handle, dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    // Before AI control: narration text updates, chat stays empty.
    send_json(
        &dm_tx,
        r#"{"type": "narration", "content": "Mist gathers.", "timestamp": 1.0}"#,
    );
    for _ in 0..500 {
        if handle.narration().await.unwrap().as_deref() == Some("Mist gathers.") {
            break;
        }
        sleep(Duration::from_millis(5)).await;
    }
    assert!(handle.chat().await.unwrap().is_empty());

    // Hand control to the DM; narration now doubles as chat.
    handle.place_random_token().await.unwrap();
    handle.enable_ai_control().await.unwrap();
    send_json(
        &dm_tx,
        r#"{"type": "narration", "content": "Your adventure begins.", "timestamp": 2.0}"#,
    );

    let chat = wait_for_chat_len(&handle, 1).await;
    assert_eq!(chat.last().unwrap().role, Role::Dm);
    assert_eq!(chat.last().unwrap().content, "Your adventure begins.");
}

#[tokio::test]
async fn test_malformed_inbound_is_dropped_and_link_survives() {
    let (handle, dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    send_json(&dm_tx, "this is not json");
    send_json(&dm_tx, r#"{"type": "teleport_party", "destination": "moon"}"#);
    // A well-formed message after the garbage must still be processed.
    send_json(
        &dm_tx,
        r#"{"type": "dm_response", "content": "Still here."}"#,
    );

    let chat = wait_for_chat_len(&handle, 1).await;
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].content, "Still here.");
    assert_eq!(handle.link_state().await.unwrap(), LinkState::Connected);
}

// -----------------------------------------------------------------------
// The dice round-trip
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_dice_request_then_local_roll_round_trip() {
    let (handle, dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    send_json(
        &dm_tx,
        r#"{"type": "dm_response", "request_dice_roll": true, "dice_type": "d20",
            "timestamp": 1700000000.0}"#,
    );

    wait_for_state(&handle, LinkState::AwaitingDiceRoll).await;
    let chat = handle.chat().await.unwrap();
    assert_eq!(chat.len(), 1, "exactly one roll-prompt entry");
    assert!(chat[0].content.contains("d20"));

    let result = handle.roll_dice(None).await.unwrap();
    assert_eq!(result.rolls.len(), 1);
    assert!((1..=20).contains(&result.total));

    assert_eq!(handle.link_state().await.unwrap(), LinkState::Connected);
    let chat = handle.chat().await.unwrap();
    assert_eq!(chat.len(), 2, "exactly one additional user entry");
    assert_eq!(chat[1].role, Role::User);

    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "roll_dice");
    assert_eq!(msg["dice_type"], "d20");
    assert_eq!(msg["result"], result.total);
    assert_eq!(
        msg["individual_rolls"],
        serde_json::json!([result.total])
    );
}

#[tokio::test]
async fn test_roll_without_request_is_rejected() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    let err = handle.roll_dice(None).await.unwrap_err();
    assert!(matches!(err, GridlinkError::NotAwaitingRoll));
    assert!(handle.chat().await.unwrap().is_empty());
    assert!(dm_rx.try_recv().is_err(), "nothing may be sent");
}

#[tokio::test]
async fn test_bad_dice_spec_rolls_nothing_and_keeps_waiting() {
    let (handle, dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    send_json(
        &dm_tx,
        r#"{"type": "dm_response", "request_dice_roll": true, "dice_type": "d20"}"#,
    );
    wait_for_state(&handle, LinkState::AwaitingDiceRoll).await;
    let chat_before = handle.chat().await.unwrap().len();

    let err = handle.roll_dice(Some("banana".into())).await.unwrap_err();
    assert!(matches!(err, GridlinkError::Dice(_)));
    assert_eq!(handle.chat().await.unwrap().len(), chat_before);
    assert_eq!(
        handle.link_state().await.unwrap(),
        LinkState::AwaitingDiceRoll
    );
    assert!(dm_rx.try_recv().is_err());
}

// -----------------------------------------------------------------------
// User input and AI control
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_user_input_logs_and_sends() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    handle.user_input("I want to explore").await.unwrap();
    let chat = handle.chat().await.unwrap();
    assert_eq!(chat.len(), 1);
    assert_eq!(chat[0].role, Role::User);

    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "user_input");
    assert_eq!(msg["content"], "I want to explore");
    assert!(msg.get("dice_roll").is_none());
}

#[tokio::test]
async fn test_user_input_with_roll_attaches_the_payload() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    let result = handle
        .user_input_with_roll("I strike at the troll", "2d6")
        .await
        .unwrap();
    assert_eq!(result.rolls.len(), 2);
    assert!((2..=12).contains(&result.total));

    let chat = handle.chat().await.unwrap();
    assert_eq!(chat.len(), 2, "input entry plus roll entry");
    assert!(chat.iter().all(|m| m.role == Role::User));

    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "user_input");
    assert_eq!(msg["content"], "I strike at the troll");
    assert_eq!(msg["dice_roll"]["type"], "2d6");
    assert_eq!(msg["dice_roll"]["result"], result.total);

    // A spec that doesn't parse rolls nothing and sends nothing.
    let err = handle
        .user_input_with_roll("I flail wildly", "banana")
        .await
        .unwrap_err();
    assert!(matches!(err, GridlinkError::Dice(_)));
    assert_eq!(handle.chat().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_ai_control_requires_a_token() {
    let (handle, _dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    let err = handle.enable_ai_control().await.unwrap_err();
    assert!(matches!(err, GridlinkError::NoTokens));
    assert!(dm_rx.try_recv().is_err());

    handle.place_random_token().await.unwrap();
    let _add = next_outbound(&mut dm_rx).await;
    handle.enable_ai_control().await.unwrap();

    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "ai_control");
    assert_eq!(msg["enabled"], true);
}

// -----------------------------------------------------------------------
// Disconnect semantics
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_clean_close_disconnects_and_sends_become_noops() {
    let (handle, dm_tx, mut dm_rx) = mock_session(GameSessionBuilder::new());

    drop(dm_tx); // DM goes away
    wait_for_state(&handle, LinkState::Disconnected).await;

    // Outbound path must neither error nor transmit.
    handle.user_input("anyone there?").await.unwrap();
    handle.place_random_token().await.unwrap();
    assert!(matches!(
        dm_rx.try_recv(),
        Err(mpsc::error::TryRecvError::Disconnected)
    ));

    // Local play continues: the board is still mutable.
    assert_eq!(handle.tokens().await.unwrap().len(), 1);
    assert_eq!(handle.chat().await.unwrap().len(), 1);
}

// -----------------------------------------------------------------------
// Periodic state push
// -----------------------------------------------------------------------

/// A config with a push interval short enough to fit inside the
/// `next_outbound` timeout under the paused clock.
fn fast_push_config() -> SessionConfig {
    SessionConfig {
        push_interval: Duration::from_secs(2),
        ..SessionConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_periodic_push_sends_full_snapshots() {
    let (handle, _dm_tx, mut dm_rx) =
        mock_session(GameSessionBuilder::new().config(fast_push_config()));
    handle.place_random_token().await.unwrap();
    let _add = next_outbound(&mut dm_rx).await;

    // The paused clock auto-advances; the push fires without real waiting.
    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "get_state");
    assert_eq!(msg["map_id"], "default");
    assert_eq!(msg["tokens"].as_array().unwrap().len(), 1);
    assert!(msg["grid"].is_array());
    assert!(msg["game_state"]["player_positions"].is_object());
    assert_eq!(msg["game_state"]["in_combat"], false);
    // The add action we just performed rides along as last_action.
    assert_eq!(msg["game_state"]["last_action"]["type"], "add");

    // And it keeps coming.
    let msg = next_outbound(&mut dm_rx).await;
    assert_eq!(msg["type"], "get_state");
}

#[tokio::test(start_paused = true)]
async fn test_push_stops_when_the_link_dies() {
    let (handle, dm_tx, mut dm_rx) =
        mock_session(GameSessionBuilder::new().config(fast_push_config()));

    let first = next_outbound(&mut dm_rx).await;
    assert_eq!(first["type"], "get_state");

    drop(dm_tx);
    wait_for_state(&handle, LinkState::Disconnected).await;

    // The mock link is dropped with the push disarmed: the outbound
    // channel closes without further snapshots.
    let rest = tokio::time::timeout(Duration::from_secs(60), dm_rx.recv()).await;
    assert_eq!(rest.expect("channel should close, not time out"), None);
}

// -----------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------

#[tokio::test]
async fn test_select_map_rebuilds_the_board() {
    let (handle, _dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    handle.place_random_token().await.unwrap();
    handle.select_map("sea").await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.map_id, "sea");
    assert_eq!(snapshot.map.width, 8);
    assert!(snapshot.tokens.is_empty(), "map change discards tokens");

    let err = handle.select_map("moon-base").await.unwrap_err();
    assert!(matches!(err, GridlinkError::UnknownMap(_)));
}

#[tokio::test]
async fn test_unknown_starting_map_fails_at_spawn() {
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let (outbound_tx, _outbound_rx) = mpsc::unbounded_channel();
    let link = MockLink {
        inbound: inbound_rx,
        outbound: outbound_tx,
    };
    drop(inbound_tx);

    let result = GameSessionBuilder::new().map("moon-base").spawn_with_link(link);
    assert!(matches!(result, Err(GridlinkError::UnknownMap(_))));
}

#[tokio::test]
async fn test_shutdown_closes_the_session() {
    let (handle, _dm_tx, _dm_rx) = mock_session(GameSessionBuilder::new());

    handle.shutdown().await.unwrap();

    // The actor unwinds; once it's gone every handle call fails Closed.
    for _ in 0..500 {
        match handle.click_cell(0, 0).await {
            Err(GridlinkError::Closed) => return,
            _ => sleep(Duration::from_millis(5)).await,
        }
    }
    panic!("session never closed");
}

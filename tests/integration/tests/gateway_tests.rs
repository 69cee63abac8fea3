//! Gateway Integration Tests
//!
//! Each test starts its own in-process server on an ephemeral port.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use integration_tests::{
    chat_payload, room_payload, sample_candidate, sample_offer, test_config, unique_room,
    TestServer,
};
use serde_json::json;
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// HTTP Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.unwrap();
    let response = server.get("/health").await.unwrap();
    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_service_info() {
    let server = TestServer::start().await.unwrap();
    let info = server.info().await.unwrap();
    assert_eq!(info["mode"], json!("development"));
    assert_eq!(info["rooms"], json!(0));
    assert_eq!(info["connections"], json!(0));
}

#[tokio::test]
async fn test_static_client_with_spa_fallback() {
    let dir = std::env::temp_dir().join(format!("signal-static-{}", unique_room()));
    std::fs::create_dir_all(&dir).unwrap();
    let index = "<!doctype html><title>call</title>";
    std::fs::write(dir.join("index.html"), index).unwrap();

    let config = test_config(&[("STATIC_DIR", dir.to_str().unwrap())]).unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();

    for path in ["/", "/some/route"] {
        let response = server.get(path).await.unwrap();
        assert!(response.status().is_success(), "{path}");
        assert_eq!(response.text().await.unwrap(), index);
    }

    let response = server.get("/health").await.unwrap();
    assert_eq!(response.text().await.unwrap(), "OK");

    let a = server.connect().await.unwrap();
    assert!(!a.connection_id.is_empty());
    a.close().await.unwrap();

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_connected_event_carries_connection_id() {
    let server = TestServer::start().await.unwrap();
    let a = server.connect().await.unwrap();
    let b = server.connect().await.unwrap();

    assert!(!a.connection_id.is_empty());
    assert_ne!(a.connection_id, b.connection_id);
}

#[tokio::test]
async fn test_two_peer_call_lifecycle() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();

    let current = a.join(&room, "A").await.unwrap();
    assert_eq!(current["userIds"], json!([]));

    let current = b.join(&room, "B").await.unwrap();
    assert_eq!(current["userIds"], json!(["A"]));
    assert_eq!(
        current["peers"],
        json!([{"userId": "A", "connectionId": a.connection_id}])
    );

    let joined = a.expect_event("user-connected").await.unwrap();
    assert_eq!(joined["userId"], json!("B"));
    assert_eq!(joined["connectionId"], json!(b.connection_id));

    b.close().await.unwrap();
    let left = a.expect_event("user-disconnected").await.unwrap();
    assert_eq!(left, json!({"userId": "B"}));
    a.expect_silence().await.unwrap();

    server
        .wait_for_info(|info| info["rooms"] == json!(1) && info["connections"] == json!(1))
        .await
        .unwrap();

    a.close().await.unwrap();
    server
        .wait_for_info(|info| info["rooms"] == json!(0) && info["connections"] == json!(0))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_rejoin_excludes_self_and_notifies_again() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    b.join(&room, "B").await.unwrap();
    a.expect_event("user-connected").await.unwrap();

    let current = b.join(&room, "B").await.unwrap();
    assert_eq!(current["userIds"], json!(["A"]));

    let joined = a.expect_event("user-connected").await.unwrap();
    assert_eq!(joined["userId"], json!("B"));
}

#[tokio::test]
async fn test_leave_room() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    b.join(&room, "B").await.unwrap();
    a.expect_event("user-connected").await.unwrap();

    b.send_event("leave-room", room_payload(&room, "B"))
        .await
        .unwrap();
    let left = a.expect_event("user-disconnected").await.unwrap();
    assert_eq!(left["userId"], json!("B"));

    // Disconnecting afterwards announces nothing more
    b.close().await.unwrap();
    a.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_empty_room_can_be_joined_again() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    a.close().await.unwrap();
    server
        .wait_for_info(|info| info["rooms"] == json!(0))
        .await
        .unwrap();

    let mut b = server.connect().await.unwrap();
    let current = b.join(&room, "B").await.unwrap();
    assert_eq!(current["userIds"], json!([]));
}

// ============================================================================
// Signaling Tests
// ============================================================================

#[tokio::test]
async fn test_offer_answer_and_candidates_reach_target_only() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    let mut c = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    b.join(&room, "B").await.unwrap();
    c.join(&room, "C").await.unwrap();
    a.expect_event("user-connected").await.unwrap();
    a.expect_event("user-connected").await.unwrap();
    b.expect_event("user-connected").await.unwrap();

    let offer = sample_offer();
    b.send_event(
        "offer",
        json!({"target": a.connection_id, "sender": "B", "offer": offer}),
    )
    .await
    .unwrap();

    let received = a.expect_event("offer").await.unwrap();
    assert_eq!(received["offer"], offer);
    assert_eq!(received["sender"], json!("B"));
    assert_eq!(received["senderConnectionId"], json!(b.connection_id));

    let answer = json!({"type": "answer", "sdp": "v=0\r\n"});
    a.send_event(
        "answer",
        json!({"target": b.connection_id, "sender": "A", "answer": answer}),
    )
    .await
    .unwrap();
    let received = b.expect_event("answer").await.unwrap();
    assert_eq!(received["answer"], answer);
    assert_eq!(received["sender"], json!("A"));

    let candidate = sample_candidate();
    a.send_event(
        "ice-candidate",
        json!({"target": b.connection_id, "sender": "A", "candidate": candidate}),
    )
    .await
    .unwrap();
    let received = b.expect_event("ice-candidate").await.unwrap();
    assert_eq!(received["candidate"], candidate);

    c.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_signal_to_unknown_target_is_dropped() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event(
        "offer",
        json!({"target": "no-such-connection", "sender": "A", "offer": sample_offer()}),
    )
    .await
    .unwrap();

    a.expect_silence().await.unwrap();
    a.ping().await.unwrap();
}

// ============================================================================
// Chat Tests
// ============================================================================

#[tokio::test]
async fn test_chat_reaches_others_but_not_sender() {
    let server = TestServer::start().await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    b.join(&room, "B").await.unwrap();
    a.expect_event("user-connected").await.unwrap();

    a.send_event("send-message", chat_payload(&room, "A", "hello, B"))
        .await
        .unwrap();

    let received = b.expect_event("receive-message").await.unwrap();
    assert_eq!(received["userId"], json!("A"));
    assert_eq!(received["message"], json!("hello, B"));

    let timestamp = received["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());

    a.expect_silence().await.unwrap();
}

// ============================================================================
// Malformed Input Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_payload_gets_error_and_connection_survives() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_event("join-room", json!({"roomId": "r1"}))
        .await
        .unwrap();
    let error = a.expect_event("error").await.unwrap();
    assert_eq!(error["code"], json!("INVALID_PAYLOAD"));

    a.send_raw(Message::Text("{not json".to_string()))
        .await
        .unwrap();
    let error = a.expect_event("error").await.unwrap();
    assert_eq!(error["code"], json!("INVALID_MESSAGE"));

    a.ping().await.unwrap();
    let info = server.info().await.unwrap();
    assert_eq!(info["rooms"], json!(0));
}

#[tokio::test]
async fn test_binary_frame_closes_with_decode_error() {
    let server = TestServer::start().await.unwrap();
    let mut a = server.connect().await.unwrap();

    a.send_raw(Message::Binary(vec![1, 2, 3])).await.unwrap();
    assert_eq!(a.expect_close().await.unwrap(), Some(4002));
}

#[tokio::test]
async fn test_silent_connection_times_out() {
    let config = test_config(&[
        ("GATEWAY_HEARTBEAT_INTERVAL_MS", "50"),
        ("GATEWAY_HEARTBEAT_TIMEOUT_MS", "200"),
    ])
    .unwrap();
    let server = TestServer::start_with_config(config).await.unwrap();
    let room = unique_room();

    let mut a = server.connect().await.unwrap();
    let mut b = server.connect().await.unwrap();
    a.join(&room, "A").await.unwrap();
    b.join(&room, "B").await.unwrap();
    a.expect_event("user-connected").await.unwrap();

    // Not reading means pings go unanswered
    tokio::time::sleep(std::time::Duration::from_millis(500)).await;
    assert_eq!(b.expect_close().await.unwrap(), Some(4009));
}

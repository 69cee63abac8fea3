//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// A room id no other test uses
pub fn unique_room() -> String {
    format!("room-{}", unique_suffix())
}

/// `join-room` / `leave-room` payload
pub fn room_payload(room_id: &str, user_id: &str) -> Value {
    json!({"roomId": room_id, "userId": user_id})
}

/// `send-message` payload
pub fn chat_payload(room_id: &str, user_id: &str, message: &str) -> Value {
    json!({"roomId": room_id, "userId": user_id, "message": message})
}

/// A session description as a browser would produce it
pub fn sample_offer() -> Value {
    json!({
        "type": "offer",
        "sdp": "v=0\r\no=- 4611731400430051336 2 IN IP4 127.0.0.1\r\ns=-\r\nt=0 0\r\na=group:BUNDLE 0 1\r\n"
    })
}

/// A network candidate as a browser would produce it
pub fn sample_candidate() -> Value {
    json!({
        "candidate": "candidate:842163049 1 udp 1677729535 203.0.113.7 46154 typ srflx raddr 0.0.0.0 rport 0 generation 0",
        "sdpMid": "0",
        "sdpMLineIndex": 0
    })
}

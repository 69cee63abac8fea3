//! Event payload definitions
//!
//! Defines the data structures for each server-to-client event.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use signal_core::{ConnectionId, JoinOutcome, ParticipantId, Peer};

/// Format a server timestamp as ISO-8601 UTC with millisecond precision
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// === Connection Events ===

/// `connected` payload
///
/// Tells the client its own connection id so peers can address signaling to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedEvent {
    pub connection_id: ConnectionId,
}

// === Room Events ===

/// `user-connected` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConnectedEvent {
    pub user_id: ParticipantId,
    pub connection_id: ConnectionId,
}

/// `current-users` payload
///
/// `user_ids` excludes the joiner. `peers` carries the same members with the
/// connection each one can be reached on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUsersEvent {
    pub user_ids: Vec<ParticipantId>,
    pub peers: Vec<Peer>,
}

impl From<&JoinOutcome> for CurrentUsersEvent {
    fn from(outcome: &JoinOutcome) -> Self {
        Self {
            user_ids: outcome.peer_ids(),
            peers: outcome.peers.clone(),
        }
    }
}

/// `user-disconnected` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDisconnectedEvent {
    pub user_id: ParticipantId,
}

// === Chat Events ===

/// `receive-message` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveMessageEvent {
    pub user_id: ParticipantId,
    pub message: String,
    /// Server clock, ISO-8601
    pub timestamp: String,
}

//! Gateway message format
//!
//! Every frame in either direction is a JSON text frame `{"event": ..., "data": ...}`.

use super::{EventName, SignalPayload};
use crate::events::{
    ConnectedEvent, CurrentUsersEvent, ReceiveMessageEvent, UserConnectedEvent,
    UserDisconnectedEvent,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use signal_common::ErrorResponse;
use signal_core::ConnectionId;

/// Gateway message envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayMessage {
    /// Event name
    pub event: EventName,

    /// Event data payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl GatewayMessage {
    /// Create a message from an event name and a serializable payload
    #[must_use]
    pub fn new(event: EventName, data: &impl Serialize) -> Self {
        Self {
            event,
            data: Some(serde_json::to_value(data).unwrap_or_default()),
        }
    }

    /// Create a message without data
    #[must_use]
    pub fn bare(event: EventName) -> Self {
        Self { event, data: None }
    }

    // === Server Messages ===

    /// `connected`, sent once after accept
    #[must_use]
    pub fn connected(payload: &ConnectedEvent) -> Self {
        Self::new(EventName::Connected, payload)
    }

    /// `user-connected`, sent to existing members when someone joins
    #[must_use]
    pub fn user_connected(payload: &UserConnectedEvent) -> Self {
        Self::new(EventName::UserConnected, payload)
    }

    /// `current-users`, sent to the joiner
    #[must_use]
    pub fn current_users(payload: &CurrentUsersEvent) -> Self {
        Self::new(EventName::CurrentUsers, payload)
    }

    /// `user-disconnected`, sent to remaining members when someone leaves
    #[must_use]
    pub fn user_disconnected(payload: &UserDisconnectedEvent) -> Self {
        Self::new(EventName::UserDisconnected, payload)
    }

    /// `receive-message`, chat delivery
    #[must_use]
    pub fn receive_message(payload: &ReceiveMessageEvent) -> Self {
        Self::new(EventName::ReceiveMessage, payload)
    }

    /// Forwarded `offer`/`answer`/`ice-candidate`
    ///
    /// The body is moved into the outgoing frame untouched, next to the sender's
    /// participant id and the connection it was actually received on.
    #[must_use]
    pub fn signal(payload: SignalPayload, sender_connection: &ConnectionId) -> Self {
        let mut data = Map::new();
        data.insert(payload.kind.body_field().to_string(), payload.body);
        data.insert("sender".to_string(), Value::String(payload.sender.into()));
        data.insert(
            "senderConnectionId".to_string(),
            Value::String(sender_connection.to_string()),
        );

        Self {
            event: payload.kind.event(),
            data: Some(Value::Object(data)),
        }
    }

    /// `pong`, heartbeat reply
    #[must_use]
    pub fn pong() -> Self {
        Self::bare(EventName::Pong)
    }

    /// `error`, an inbound event was rejected
    #[must_use]
    pub fn error(payload: &ErrorResponse) -> Self {
        Self::new(EventName::Error, payload)
    }

    // === Parsing Client Messages ===

    /// Decode the data payload into a typed struct
    ///
    /// Missing data decodes as `null` and fails for any struct payload.
    pub fn decode_data<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(self.data.as_ref().unwrap_or(&Value::Null))
    }

    // === Utilities ===

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GatewayMessage(event={})", self.event)
    }
}

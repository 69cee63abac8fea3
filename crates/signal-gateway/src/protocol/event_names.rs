//! Gateway event names
//!
//! Every frame names its event; this enum is the closed set the gateway understands.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Gateway event names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Sent once after accept, carrying the connection id (server only)
    Connected,
    /// Join a room (client only)
    JoinRoom,
    /// Leave a room (client only)
    LeaveRoom,
    /// A participant joined the room (server only)
    UserConnected,
    /// Snapshot of the room for the joiner (server only)
    CurrentUsers,
    /// A participant left the room (server only)
    UserDisconnected,
    /// Session description offer (client/server)
    Offer,
    /// Session description answer (client/server)
    Answer,
    /// Network candidate (client/server)
    IceCandidate,
    /// Chat send (client only)
    SendMessage,
    /// Chat delivery (server only)
    ReceiveMessage,
    /// Application heartbeat (client only)
    Ping,
    /// Heartbeat reply (server only)
    Pong,
    /// Rejected inbound event (server only)
    Error,
}

impl EventName {
    /// Parse an event name from its wire string
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "connected" => Some(Self::Connected),
            "join-room" => Some(Self::JoinRoom),
            "leave-room" => Some(Self::LeaveRoom),
            "user-connected" => Some(Self::UserConnected),
            "current-users" => Some(Self::CurrentUsers),
            "user-disconnected" => Some(Self::UserDisconnected),
            "offer" => Some(Self::Offer),
            "answer" => Some(Self::Answer),
            "ice-candidate" => Some(Self::IceCandidate),
            "send-message" => Some(Self::SendMessage),
            "receive-message" => Some(Self::ReceiveMessage),
            "ping" => Some(Self::Ping),
            "pong" => Some(Self::Pong),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// Get the wire string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::JoinRoom => "join-room",
            Self::LeaveRoom => "leave-room",
            Self::UserConnected => "user-connected",
            Self::CurrentUsers => "current-users",
            Self::UserDisconnected => "user-disconnected",
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "ice-candidate",
            Self::SendMessage => "send-message",
            Self::ReceiveMessage => "receive-message",
            Self::Ping => "ping",
            Self::Pong => "pong",
            Self::Error => "error",
        }
    }

    /// Check if this event can be sent by the client
    #[must_use]
    pub const fn is_client_event(self) -> bool {
        matches!(
            self,
            Self::JoinRoom
                | Self::LeaveRoom
                | Self::Offer
                | Self::Answer
                | Self::IceCandidate
                | Self::SendMessage
                | Self::Ping
        )
    }
}

impl Serialize for EventName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::from_wire(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown event: {value}")))
    }
}

impl std::fmt::Display for EventName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

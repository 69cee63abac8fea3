//! Client payload definitions
//!
//! Payloads are decoded into these types before any state is touched; a frame that
//! fails to decode never reaches the registry.

use super::EventName;
use serde::{de::Error as _, Deserialize, Serialize};
use serde_json::{Map, Value};
use signal_core::{ConnectionId, ParticipantId, RoomId};

/// Payload for `join-room` and `leave-room`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub room_id: RoomId,
    pub user_id: ParticipantId,
}

/// Payload for `send-message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatPayload {
    pub room_id: RoomId,
    pub user_id: ParticipantId,
    pub message: String,
}

/// The three point-to-point signaling events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Offer,
    Answer,
    IceCandidate,
}

impl SignalKind {
    /// Map a signaling event name to its kind
    #[must_use]
    pub const fn from_event(event: EventName) -> Option<Self> {
        match event {
            EventName::Offer => Some(Self::Offer),
            EventName::Answer => Some(Self::Answer),
            EventName::IceCandidate => Some(Self::IceCandidate),
            _ => None,
        }
    }

    /// Event name used in both directions
    #[must_use]
    pub const fn event(self) -> EventName {
        match self {
            Self::Offer => EventName::Offer,
            Self::Answer => EventName::Answer,
            Self::IceCandidate => EventName::IceCandidate,
        }
    }

    /// Name of the field carrying the opaque signaling body
    #[must_use]
    pub const fn body_field(self) -> &'static str {
        match self {
            Self::Offer => "offer",
            Self::Answer => "answer",
            Self::IceCandidate => "candidate",
        }
    }
}

#[derive(Deserialize)]
struct RawSignal {
    target: ConnectionId,
    sender: ParticipantId,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Payload for `offer`, `answer` and `ice-candidate`
///
/// `target` is a connection id. The body is kept as raw JSON and never inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalPayload {
    pub kind: SignalKind,
    pub target: ConnectionId,
    pub sender: ParticipantId,
    pub body: Value,
}

impl SignalPayload {
    /// Decode a signaling payload of the given kind
    pub fn decode(kind: SignalKind, data: &Value) -> Result<Self, serde_json::Error> {
        let RawSignal {
            target,
            sender,
            mut rest,
        } = RawSignal::deserialize(data)?;

        let body = rest
            .remove(kind.body_field())
            .ok_or_else(|| serde_json::Error::missing_field(kind.body_field()))?;

        Ok(Self {
            kind,
            target,
            sender,
            body,
        })
    }
}

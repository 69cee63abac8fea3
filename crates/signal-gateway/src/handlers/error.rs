//! Handler error types

use crate::protocol::EventName;
use signal_common::ErrorResponse;
use signal_core::DomainError;
use thiserror::Error;

/// Handler error type
///
/// Every variant rejects a single inbound event. None of them closes the connection.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Frame was not a valid `{event, data}` envelope
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// Payload did not match the event's schema
    #[error("Invalid payload for {event}: {reason}")]
    InvalidPayload { event: EventName, reason: String },

    /// A server-only event was sent by the client
    #[error("Unexpected event: {0}")]
    UnexpectedEvent(EventName),

    /// Domain error (from the registry)
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl HandlerError {
    /// Build a payload error from a decode failure
    pub fn invalid_payload(event: EventName, err: &serde_json::Error) -> Self {
        Self::InvalidPayload {
            event,
            reason: err.to_string(),
        }
    }

    /// Wire error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) => "INVALID_MESSAGE",
            Self::InvalidPayload { .. } => "INVALID_PAYLOAD",
            Self::UnexpectedEvent(_) => "UNEXPECTED_EVENT",
            Self::Domain(e) => e.code(),
        }
    }

    /// Convert to the `error` event payload
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse::new(self.code(), self.to_string())
    }
}

/// Handler result type
pub type HandlerResult<T> = Result<T, HandlerError>;

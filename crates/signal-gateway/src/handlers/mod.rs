//! Event handlers
//!
//! Handles incoming WebSocket messages based on their event name.

mod chat;
mod error;
mod heartbeat;
mod room;
mod signal;

pub use chat::ChatHandler;
pub use error::{HandlerError, HandlerResult};
pub use heartbeat::HeartbeatHandler;
pub use room::RoomHandler;
pub use signal::SignalHandler;

use crate::connection::Connection;
use crate::protocol::{EventName, GatewayMessage, SignalKind, SignalPayload};
use crate::server::GatewayState;
use serde_json::Value;
use std::sync::Arc;

/// Dispatch incoming client messages to appropriate handlers
pub struct MessageDispatcher;

impl MessageDispatcher {
    /// Parse a text frame and dispatch it
    pub fn dispatch_text(
        state: &GatewayState,
        connection: &Arc<Connection>,
        text: &str,
    ) -> HandlerResult<()> {
        let message = GatewayMessage::from_json(text)
            .map_err(|e| HandlerError::InvalidMessage(e.to_string()))?;
        Self::dispatch(state, connection, message)
    }

    /// Handle an incoming client message
    ///
    /// Payloads are fully decoded before any handler runs, so a rejected event never
    /// touches room state.
    pub fn dispatch(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message: GatewayMessage,
    ) -> HandlerResult<()> {
        let event = message.event;
        if !event.is_client_event() {
            tracing::warn!(
                connection_id = %connection.id(),
                event = %event,
                "Received server-only event from client"
            );
            return Err(HandlerError::UnexpectedEvent(event));
        }

        match event {
            EventName::JoinRoom => {
                let payload = message
                    .decode_data()
                    .map_err(|e| HandlerError::invalid_payload(event, &e))?;
                RoomHandler::join(state, connection, payload)
            }
            EventName::LeaveRoom => {
                let payload = message
                    .decode_data()
                    .map_err(|e| HandlerError::invalid_payload(event, &e))?;
                RoomHandler::leave(state, connection, payload)
            }
            EventName::Offer | EventName::Answer | EventName::IceCandidate => {
                let kind = SignalKind::from_event(event)
                    .ok_or(HandlerError::UnexpectedEvent(event))?;
                let data = message.data.unwrap_or(Value::Null);
                let payload = SignalPayload::decode(kind, &data)
                    .map_err(|e| HandlerError::invalid_payload(event, &e))?;
                SignalHandler::handle(state, connection, payload)
            }
            EventName::SendMessage => {
                let payload = message
                    .decode_data()
                    .map_err(|e| HandlerError::invalid_payload(event, &e))?;
                ChatHandler::handle(state, connection, payload)
            }
            EventName::Ping => HeartbeatHandler::handle(connection),
            // Rejected above by is_client_event
            _ => Err(HandlerError::UnexpectedEvent(event)),
        }
    }
}

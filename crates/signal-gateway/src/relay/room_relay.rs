//! Room relay
//!
//! Turns client events into registry mutations and fans the resulting
//! notifications out through an [`EventSink`].

use super::EventSink;
use crate::events::{
    format_timestamp, ConnectedEvent, CurrentUsersEvent, ReceiveMessageEvent, UserConnectedEvent,
    UserDisconnectedEvent,
};
use crate::protocol::{ChatPayload, GatewayMessage, RoomPayload, SignalPayload};
use chrono::Utc;
use signal_core::{ConnectionId, Departure, DomainError, JoinOutcome, RoomId, RoomRegistry};
use std::sync::Arc;

/// Relays room membership, signaling and chat between connections
#[derive(Clone)]
pub struct RoomRelay {
    registry: Arc<RoomRegistry>,
    sink: Arc<dyn EventSink>,
}

impl RoomRelay {
    /// Create a relay over a registry and an outbound sink
    pub fn new(registry: Arc<RoomRegistry>, sink: Arc<dyn EventSink>) -> Self {
        Self { registry, sink }
    }

    /// Get the room registry
    pub fn registry(&self) -> &Arc<RoomRegistry> {
        &self.registry
    }

    /// Register a freshly accepted connection and greet it with its id
    pub fn connect(&self, connection: &ConnectionId) -> Result<(), DomainError> {
        self.registry.register_connection(connection.clone())?;

        let greeting = GatewayMessage::connected(&ConnectedEvent {
            connection_id: connection.clone(),
        });
        self.sink.send_to(connection, greeting);
        Ok(())
    }

    /// Join a room
    ///
    /// Existing members get `user-connected`; the joiner gets `current-users`.
    pub fn join(
        &self,
        connection: &ConnectionId,
        payload: RoomPayload,
    ) -> Result<JoinOutcome, DomainError> {
        let outcome =
            self.registry
                .join(payload.room_id, payload.user_id, connection.clone())?;

        let announcement = GatewayMessage::user_connected(&UserConnectedEvent {
            user_id: outcome.participant_id.clone(),
            connection_id: connection.clone(),
        });
        self.sink.send_to_all(&outcome.notify, &announcement);

        let snapshot = GatewayMessage::current_users(&CurrentUsersEvent::from(&outcome));
        self.sink.send_to(connection, snapshot);

        tracing::info!(
            connection_id = %connection,
            room_id = %outcome.room_id,
            user_id = %outcome.participant_id,
            room_created = outcome.room_created,
            rejoined = outcome.rejoined,
            peers = outcome.peers.len(),
            "User joined room"
        );
        if let Some(previous) = &outcome.displaced {
            tracing::debug!(
                room_id = %outcome.room_id,
                user_id = %outcome.participant_id,
                previous_connection = %previous,
                "Membership moved to new connection"
            );
        }

        Ok(outcome)
    }

    /// Leave a room explicitly
    ///
    /// Leaving a room the connection is not in is a no-op.
    pub fn leave(&self, connection: &ConnectionId, payload: RoomPayload) -> Option<Departure> {
        let departure = self
            .registry
            .leave(&payload.room_id, &payload.user_id, connection)?;
        self.announce_departure(&departure);

        tracing::info!(
            connection_id = %connection,
            room_id = %departure.room_id,
            user_id = %departure.participant_id,
            "User left room"
        );
        Some(departure)
    }

    /// Forward an offer, answer or ICE candidate to its target connection only
    ///
    /// The body is not inspected. Returns `false` if the target is gone.
    pub fn relay_signal(&self, sender: &ConnectionId, payload: SignalPayload) -> bool {
        let target = payload.target.clone();
        let kind = payload.kind;
        let delivered = self
            .sink
            .send_to(&target, GatewayMessage::signal(payload, sender));

        tracing::debug!(
            connection_id = %sender,
            target = %target,
            event = %kind.event(),
            delivered,
            "Relayed signal"
        );
        delivered
    }

    /// Forward a chat message to every other member of the room
    ///
    /// The sending connection never receives its own message. Returns the number of
    /// recipients the message was queued for.
    pub fn relay_chat(&self, sender: &ConnectionId, payload: ChatPayload) -> usize {
        let Some(fanout) = self.registry.chat(&payload.room_id, sender, Utc::now()) else {
            tracing::debug!(
                connection_id = %sender,
                room_id = %payload.room_id,
                "Chat for unknown room dropped"
            );
            return 0;
        };

        let message = GatewayMessage::receive_message(&ReceiveMessageEvent {
            user_id: payload.user_id,
            message: payload.message,
            timestamp: format_timestamp(fanout.timestamp),
        });
        self.sink.send_to_all(&fanout.recipients, &message)
    }

    /// Remove every membership of a closed connection and notify the affected rooms
    ///
    /// Idempotent.
    pub fn handle_disconnect(&self, connection: &ConnectionId) -> Vec<Departure> {
        let departures = self.registry.disconnect(connection);
        for departure in &departures {
            self.announce_departure(departure);
            tracing::info!(
                connection_id = %connection,
                room_id = %departure.room_id,
                user_id = %departure.participant_id,
                room_deleted = departure.room_deleted,
                "User disconnected from room"
            );
        }
        departures
    }

    /// Deliver an event to every member of a room except one connection
    pub fn broadcast_to_room_except(
        &self,
        room_id: &RoomId,
        exclude: &ConnectionId,
        message: &GatewayMessage,
    ) -> usize {
        let recipients = self.registry.room_recipients(room_id, exclude);
        self.sink.send_to_all(&recipients, message)
    }

    fn announce_departure(&self, departure: &Departure) {
        let message = GatewayMessage::user_disconnected(&UserDisconnectedEvent {
            user_id: departure.participant_id.clone(),
        });
        self.sink.send_to_all(&departure.notify, &message);
    }
}

impl std::fmt::Debug for RoomRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomRelay")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

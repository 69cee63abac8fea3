//! Connection manager
//!
//! Manages all active WebSocket connections using DashMap for thread-safe access.

use super::{Connection, OutboundFrame};
use crate::protocol::GatewayMessage;
use crate::relay::EventSink;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use signal_core::{ConnectionId, DomainError};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Manages all active WebSocket connections
///
/// Uses `DashMap` for concurrent access to connection state.
pub struct ConnectionManager {
    /// Active connections by connection ID
    connections: DashMap<ConnectionId, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Generate a new connection ID
    pub fn generate_id() -> Result<ConnectionId, DomainError> {
        ConnectionId::parse(uuid::Uuid::new_v4().to_string())
    }

    /// Register a new connection under a freshly allocated ID
    pub fn accept(
        &self,
        sender: mpsc::Sender<OutboundFrame>,
    ) -> Result<Arc<Connection>, DomainError> {
        loop {
            let id = Self::generate_id()?;
            if let Entry::Vacant(entry) = self.connections.entry(id.clone()) {
                let connection = Connection::new(id, sender);
                entry.insert(connection.clone());

                tracing::debug!(connection_id = %connection.id(), "Connection added");
                return Ok(connection);
            }
        }
    }

    /// Remove a connection
    ///
    /// Returns the connection only to the first caller; repeated or racing removals
    /// of the same connection get `None`.
    pub fn remove_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        let (_, connection) = self.connections.remove(id)?;
        if !connection.mark_closed() {
            return None;
        }

        tracing::debug!(connection_id = %id, "Connection removed");
        Some(connection)
    }

    /// Get a connection by ID
    pub fn get_connection(&self, id: &ConnectionId) -> Option<Arc<Connection>> {
        self.connections.get(id).map(|r| r.clone())
    }

    /// Send a message to one connection
    ///
    /// A missing, closed or saturated connection is not an error; the message is dropped.
    pub fn send_to(&self, id: &ConnectionId, message: GatewayMessage) -> bool {
        let Some(connection) = self.get_connection(id) else {
            tracing::debug!(connection_id = %id, event = %message.event, "Dropped message for unknown connection");
            return false;
        };

        match connection.send(message) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(connection_id = %id, error = %e, "Dropped outbound message");
                false
            }
        }
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if a connection exists
    pub fn has_connection(&self, id: &ConnectionId) -> bool {
        self.connections.contains_key(id)
    }
}

impl EventSink for ConnectionManager {
    fn send_to(&self, connection: &ConnectionId, message: GatewayMessage) -> bool {
        ConnectionManager::send_to(self, connection, message)
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}

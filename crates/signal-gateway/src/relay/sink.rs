//! Outbound delivery seam between the relay and the transport

use crate::protocol::GatewayMessage;
use signal_core::ConnectionId;

/// Delivers events to live connections
///
/// Delivery is best-effort. A target that no longer exists is not an error.
pub trait EventSink: Send + Sync {
    /// Deliver one event to one connection, returning whether it was queued
    fn send_to(&self, connection: &ConnectionId, message: GatewayMessage) -> bool;

    /// Deliver the same event to several connections, returning how many were queued
    fn send_to_all(&self, connections: &[ConnectionId], message: &GatewayMessage) -> usize {
        connections
            .iter()
            .filter(|id| self.send_to(id, message.clone()))
            .count()
    }
}

//! Heartbeat handler (`ping`)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::GatewayMessage;
use std::sync::Arc;

/// Handles application-level heartbeats
pub struct HeartbeatHandler;

impl HeartbeatHandler {
    /// Reply to a `ping` with a `pong`
    pub fn handle(connection: &Arc<Connection>) -> HandlerResult<()> {
        tracing::trace!(connection_id = %connection.id(), "Ping received");

        if let Err(e) = connection.send(GatewayMessage::pong()) {
            tracing::debug!(
                connection_id = %connection.id(),
                error = %e,
                "Failed to queue pong"
            );
        }
        Ok(())
    }
}

//! Room membership handlers (`join-room`, `leave-room`)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::RoomPayload;
use crate::server::GatewayState;
use std::sync::Arc;

/// Handles joining and leaving rooms
pub struct RoomHandler;

impl RoomHandler {
    /// Handle `join-room`
    pub fn join(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPayload,
    ) -> HandlerResult<()> {
        state.relay().join(connection.id(), payload)?;
        Ok(())
    }

    /// Handle `leave-room`
    pub fn leave(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: RoomPayload,
    ) -> HandlerResult<()> {
        if state.relay().leave(connection.id(), payload).is_none() {
            tracing::debug!(connection_id = %connection.id(), "Leave for room not joined");
        }
        Ok(())
    }
}

//! Chat handler (`send-message`)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::ChatPayload;
use crate::server::GatewayState;
use std::sync::Arc;

/// Relays chat messages to the rest of a room
pub struct ChatHandler;

impl ChatHandler {
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: ChatPayload,
    ) -> HandlerResult<()> {
        let delivered = state.relay().relay_chat(connection.id(), payload);
        tracing::trace!(connection_id = %connection.id(), delivered, "Chat relayed");
        Ok(())
    }
}

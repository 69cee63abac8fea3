//! Signaling handler (`offer`, `answer`, `ice-candidate`)

use super::HandlerResult;
use crate::connection::Connection;
use crate::protocol::SignalPayload;
use crate::server::GatewayState;
use std::sync::Arc;

/// Forwards signaling messages between peers
pub struct SignalHandler;

impl SignalHandler {
    /// Forward a decoded signaling payload to its target
    ///
    /// An unreachable target is not reported back to the sender.
    pub fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        payload: SignalPayload,
    ) -> HandlerResult<()> {
        state.relay().relay_signal(connection.id(), payload);
        Ok(())
    }
}

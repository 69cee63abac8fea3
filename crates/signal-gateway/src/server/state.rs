//! Gateway state
//!
//! Application state for the gateway server.

use crate::connection::ConnectionManager;
use crate::relay::RoomRelay;
use signal_common::{AppConfig, GatewayConfig};
use signal_core::RoomRegistry;
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Connection manager for WebSocket connections
    connection_manager: Arc<ConnectionManager>,
    /// Room relay over the shared registry
    relay: RoomRelay,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        connection_manager: Arc<ConnectionManager>,
        registry: Arc<RoomRegistry>,
        config: AppConfig,
    ) -> Self {
        let relay = RoomRelay::new(registry, connection_manager.clone());
        Self {
            connection_manager,
            relay,
            config: Arc::new(config),
        }
    }

    /// Get the connection manager
    pub fn connection_manager(&self) -> &ConnectionManager {
        &self.connection_manager
    }

    /// Get the room relay
    pub fn relay(&self) -> &RoomRelay {
        &self.relay
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the per-connection gateway settings
    pub fn gateway_config(&self) -> &GatewayConfig {
        &self.config.gateway
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("connection_manager", &self.connection_manager)
            .field("relay", &self.relay)
            .field("config", &"AppConfig")
            .finish()
    }
}

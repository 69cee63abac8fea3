//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod middleware;
mod state;

pub use handler::gateway_handler;
pub use middleware::create_cors_layer;
pub use state::GatewayState;

use crate::connection::ConnectionManager;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use signal_common::{AppConfig, AppError};
use signal_core::RoomRegistry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Create the gateway router
///
/// With a static client directory configured, unmatched paths serve the client and
/// fall back to its `index.html`. Otherwise `/` reports service info.
pub fn create_router(config: &AppConfig) -> Router<GatewayState> {
    let router = Router::new()
        .route("/ws", get(gateway_handler))
        .route("/health", get(health_check));

    match &config.static_files.dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router.route("/", get(service_info)),
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Service info endpoint
async fn service_info(State(state): State<GatewayState>) -> Json<Value> {
    let config = state.config();
    Json(json!({
        "message": format!("{} signaling server", config.app.name),
        "mode": config.app.env.as_str(),
        "rooms": state.relay().registry().room_count(),
        "connections": state.connection_manager().connection_count(),
    }))
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    let config = state.config();
    let cors = create_cors_layer(&config.cors, config.app.env.is_production());

    create_router(config)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub fn create_gateway_state(config: AppConfig) -> Result<GatewayState, AppError> {
    let connection_manager = ConnectionManager::new_shared();
    let registry = Arc::new(RoomRegistry::new());

    if let Some(dir) = &config.static_files.dir {
        if !dir.join("index.html").is_file() {
            tracing::warn!(dir = %dir.display(), "Static directory has no index.html");
        }
    }

    Ok(GatewayState::new(connection_manager, registry, config))
}

/// Run the gateway server on an already bound listener
pub async fn run_server(app: Router, listener: TcpListener) -> Result<(), AppError> {
    let addr = listener.local_addr().map_err(AppError::Server)?;
    tracing::info!("Gateway listening on ws://{}/ws", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    tracing::info!("Gateway stopped");
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.server.address();
    tracing::info!(
        app = %config.app.name,
        env = config.app.env.as_str(),
        "Starting gateway server on {}",
        addr
    );

    // Create gateway state
    let state = create_gateway_state(config)?;

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, listener).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

//! WebSocket handler
//!
//! Handles WebSocket connections and message processing.

use crate::connection::{Connection, OutboundFrame};
use crate::handlers::MessageDispatcher;
use crate::protocol::{CloseCode, GatewayMessage};
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant};

/// How long each side gets to finish the closing handshake before teardown
const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let settings = state.gateway_config().clone();

    // Create message channel for outgoing frames
    let (tx, mut rx) = mpsc::channel::<OutboundFrame>(settings.message_buffer);

    // Register connection
    let connection = match state.connection_manager().accept(tx) {
        Ok(connection) => connection,
        Err(e) => {
            tracing::error!(error = %e, "Failed to allocate connection id");
            return;
        }
    };
    let connection_id = connection.id().clone();

    // Register with the registry and queue the `connected` greeting
    if let Err(e) = state.relay().connect(&connection_id) {
        tracing::error!(connection_id = %connection_id, error = %e, "Failed to register connection");
        state.connection_manager().remove_connection(&connection_id);
        return;
    }

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Spawn task to receive messages from WebSocket
    let state_recv = state.clone();
    let connection_recv = connection.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            connection_recv.record_activity();
            match msg {
                Ok(Message::Text(text)) => {
                    handle_text_message(&state_recv, &connection_recv, &text);
                }
                Ok(Message::Binary(_)) => {
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Binary messages not supported"
                    );
                    return Some(CloseCode::DecodeError);
                }
                Ok(Message::Ping(_) | Message::Pong(_)) => {
                    // Pong replies are handled automatically by axum
                    tracing::trace!(connection_id = %connection_recv.id(), "Transport heartbeat");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(connection_id = %connection_recv.id(), "Client closed connection");
                    return None;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return None;
                }
            }
        }
        None
    });

    // Spawn task to send frames to WebSocket
    let connection_id_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let message = match frame {
                OutboundFrame::Message(msg) => match msg.to_json() {
                    Ok(json) => Message::Text(json),
                    Err(e) => {
                        tracing::error!(
                            connection_id = %connection_id_send,
                            error = %e,
                            "Failed to serialize message"
                        );
                        continue;
                    }
                },
                OutboundFrame::Ping => Message::Ping(Vec::new()),
                OutboundFrame::Close(code) => {
                    let frame = CloseFrame {
                        code: u16::from(code),
                        reason: code.description().into(),
                    };
                    let _ = ws_sink.send(Message::Close(Some(frame))).await;
                    break;
                }
            };

            if ws_sink.send(message).await.is_err() {
                tracing::debug!(
                    connection_id = %connection_id_send,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }

        let _ = ws_sink.close().await;
    });

    // Spawn heartbeat monitoring task
    let connection_hb = connection.clone();
    let period = Duration::from_millis(settings.heartbeat_interval_ms);
    let timeout = Duration::from_millis(settings.heartbeat_timeout_ms);
    let mut heartbeat_task = tokio::spawn(async move {
        let mut check_interval = interval_at(Instant::now() + period, period);

        loop {
            check_interval.tick().await;

            let idle = connection_hb.idle_time();
            if idle > timeout {
                tracing::warn!(
                    connection_id = %connection_hb.id(),
                    idle_ms = idle.as_millis(),
                    "Connection timed out (no traffic)"
                );
                return CloseCode::SessionTimeout;
            }

            if connection_hb.ping().is_err() {
                tracing::trace!(connection_id = %connection_hb.id(), "Ping not queued");
            }
        }
    });

    // Wait for any task to complete
    let (close_code, mut recv_done) = tokio::select! {
        result = &mut recv_task => (result.ok().flatten(), true),
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
            (None, false)
        }
        result = &mut heartbeat_task => (result.ok(), false),
    };
    heartbeat_task.abort();

    // Server-initiated close: flush the close frame, then keep reading until the
    // client answers with its own Close so unread input doesn't reset the socket
    if let Some(code) = close_code {
        tracing::debug!(connection_id = %connection_id, close_code = %code, "Closing connection");
        if connection.close(code).is_ok() {
            let _ = tokio::time::timeout(CLOSE_GRACE, &mut send_task).await;
            if !recv_done {
                recv_done = tokio::time::timeout(CLOSE_GRACE, &mut recv_task)
                    .await
                    .is_ok();
            }
        }
    }

    send_task.abort();

    // A text frame may be mid-dispatch on another worker; let it finish before
    // the connection leaves its rooms
    recv_task.abort();
    if !recv_done {
        let _ = recv_task.await;
    }

    cleanup_connection(&state, &connection);
}

/// Handle a text message from the client
///
/// A rejected event is answered with an `error` event; the connection stays open.
fn handle_text_message(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
    if let Err(e) = MessageDispatcher::dispatch_text(state, connection, text) {
        tracing::debug!(
            connection_id = %connection.id(),
            error = %e,
            "Rejected client event"
        );
        let response = e.to_error_response();
        if connection.send(GatewayMessage::error(&response)).is_err() {
            tracing::debug!(connection_id = %connection.id(), "Failed to queue error event");
        }
    }
}

/// Clean up a connection on disconnect
///
/// Only the first call for a connection does anything.
fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    let Some(connection) = state.connection_manager().remove_connection(connection.id()) else {
        return;
    };

    let departures = state.relay().handle_disconnect(connection.id());

    tracing::info!(
        connection_id = %connection.id(),
        rooms_left = departures.len(),
        dropped_frames = connection.dropped_frames(),
        duration_ms = connection.age().as_millis(),
        "Connection closed"
    );
}

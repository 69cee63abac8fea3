//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers, making HTTP requests,
//! and driving WebSocket clients against the gateway.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use futures_util::{SinkExt, StreamExt};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use signal_common::AppConfig;
use signal_gateway::{create_app, create_gateway_state};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long to wait for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing else is coming
pub const QUIET_PERIOD: Duration = Duration::from_millis(200);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config)?;
        let app = create_app(state);

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket endpoint URL
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Fetch the service info document
    pub async fn info(&self) -> Result<Value> {
        Ok(self.get("/").await?.error_for_status()?.json().await?)
    }

    /// Poll the service info until `check` holds
    pub async fn wait_for_info(&self, check: impl Fn(&Value) -> bool) -> Result<Value> {
        let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
        loop {
            let info = self.info().await?;
            if check(&info) {
                return Ok(info);
            }
            if tokio::time::Instant::now() >= deadline {
                bail!("condition never held, last info: {info}");
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Open a WebSocket client and wait for its `connected` event
    pub async fn connect(&self) -> Result<TestClient> {
        TestClient::connect(&self.ws_url()).await
    }
}

/// An event received from the gateway
#[derive(Debug, Clone)]
pub struct ServerEvent {
    pub event: String,
    pub data: Value,
}

/// WebSocket client speaking the gateway's JSON event protocol
pub struct TestClient {
    ws: WsStream,
    pub connection_id: String,
}

impl TestClient {
    /// Connect and consume the `connected` greeting
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws, _) = connect_async(url).await.context("WebSocket connect failed")?;
        let mut client = Self {
            ws,
            connection_id: String::new(),
        };

        let greeting = client.expect_event("connected").await?;
        client.connection_id = greeting["connectionId"]
            .as_str()
            .context("connected event without connectionId")?
            .to_string();
        Ok(client)
    }

    /// Send an event with a data payload
    pub async fn send_event(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = json!({"event": event, "data": data});
        self.send_raw(Message::Text(frame.to_string())).await
    }

    /// Send an arbitrary frame
    pub async fn send_raw(&mut self, message: Message) -> Result<()> {
        self.ws.send(message).await?;
        Ok(())
    }

    /// Receive the next event, skipping transport pings
    pub async fn recv_event(&mut self) -> Result<ServerEvent> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for event")?
                .context("connection ended")??;

            match frame {
                Message::Text(text) => {
                    let mut value: Value = serde_json::from_str(&text)?;
                    let event = value["event"]
                        .as_str()
                        .context("frame without event")?
                        .to_string();
                    let data = value
                        .get_mut("data")
                        .map(Value::take)
                        .unwrap_or(Value::Null);
                    return Ok(ServerEvent { event, data });
                }
                Message::Ping(_) | Message::Pong(_) => {}
                Message::Close(frame) => bail!("connection closed: {frame:?}"),
                other => bail!("unexpected frame: {other:?}"),
            }
        }
    }

    /// Receive the next event and check its name, returning its data
    pub async fn expect_event(&mut self, event: &str) -> Result<Value> {
        let received = self.recv_event().await?;
        if received.event != event {
            bail!(
                "expected `{event}`, got `{}` with {}",
                received.event,
                received.data
            );
        }
        Ok(received.data)
    }

    /// Assert nothing arrives within the quiet period
    pub async fn expect_silence(&mut self) -> Result<()> {
        match tokio::time::timeout(QUIET_PERIOD, self.recv_event()).await {
            Err(_) => Ok(()),
            Ok(Ok(event)) => bail!("unexpected event `{}`: {}", event.event, event.data),
            Ok(Err(e)) => Err(e),
        }
    }

    /// Read until the server closes the socket, returning the close code
    pub async fn expect_close(&mut self) -> Result<Option<u16>> {
        loop {
            let frame = tokio::time::timeout(RECV_TIMEOUT, self.ws.next())
                .await
                .context("timed out waiting for close")?;

            match frame {
                Some(Ok(Message::Close(frame))) => return Ok(frame.map(|f| u16::from(f.code))),
                Some(Ok(_)) => {}
                Some(Err(_)) | None => return Ok(None),
            }
        }
    }

    /// Join a room and return the `current-users` payload
    pub async fn join(&mut self, room_id: &str, user_id: &str) -> Result<Value> {
        self.send_event("join-room", crate::room_payload(room_id, user_id))
            .await?;
        self.expect_event("current-users").await
    }

    /// Round-trip an application ping
    pub async fn ping(&mut self) -> Result<()> {
        self.ws
            .send(Message::Text(json!({"event": "ping"}).to_string()))
            .await?;
        self.expect_event("pong").await?;
        Ok(())
    }

    /// Close the socket
    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}

/// Create a test configuration
///
/// Starts from defaults; `overrides` are applied as if they were environment variables.
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let vars: HashMap<String, String> = overrides
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {}", e))
}

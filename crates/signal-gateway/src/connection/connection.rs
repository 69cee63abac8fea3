//! Individual WebSocket connection
//!
//! Represents a single WebSocket connection and its outbound queue.

use crate::protocol::{CloseCode, GatewayMessage};
use parking_lot::Mutex;
use signal_core::ConnectionId;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// A frame queued for the socket writer
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// Event to serialize as a text frame
    Message(GatewayMessage),
    /// Transport-level ping
    Ping,
    /// Close the socket with a gateway close code
    Close(CloseCode),
}

/// Why an outbound frame was not queued
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    #[error("connection closed")]
    Closed,
    #[error("outbound queue full")]
    Full,
}

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: ConnectionId,

    /// Channel to the socket writer
    sender: mpsc::Sender<OutboundFrame>,

    /// Set once, when teardown starts
    closed: AtomicBool,

    /// Last frame received from the client
    last_seen: Mutex<Instant>,

    /// Frames dropped because the queue was full
    dropped: AtomicU64,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, sender: mpsc::Sender<OutboundFrame>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id,
            sender,
            closed: AtomicBool::new(false),
            last_seen: Mutex::new(now),
            dropped: AtomicU64::new(0),
            created_at: now,
        })
    }

    /// Get the connection ID
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Queue an event without waiting
    ///
    /// Delivery is fire-and-forget: a full queue drops the frame rather than
    /// blocking the caller.
    pub fn send(&self, message: GatewayMessage) -> Result<(), SendError> {
        self.push(OutboundFrame::Message(message))
    }

    /// Queue a transport-level ping
    pub fn ping(&self) -> Result<(), SendError> {
        self.push(OutboundFrame::Ping)
    }

    /// Ask the writer to close the socket with `code`
    pub fn close(&self, code: CloseCode) -> Result<(), SendError> {
        self.push(OutboundFrame::Close(code))
    }

    fn push(&self, frame: OutboundFrame) -> Result<(), SendError> {
        if self.is_closed() {
            return Err(SendError::Closed);
        }
        self.sender.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                SendError::Full
            }
            mpsc::error::TrySendError::Closed(_) => SendError::Closed,
        })
    }

    /// Mark the connection closed
    ///
    /// Returns `true` only for the first caller, so teardown runs once no matter how
    /// many tasks notice the disconnect.
    pub fn mark_closed(&self) -> bool {
        !self.closed.swap(true, Ordering::AcqRel)
    }

    /// Check if the connection is closed or its writer has gone away
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire) || self.sender.is_closed()
    }

    /// Record traffic from the client
    pub fn record_activity(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    /// Time since the client last sent anything
    pub fn idle_time(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Frames dropped because the queue was full
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .field("created_at", &self.created_at)
            .finish()
    }
}

//! Connection management
//!
//! Tracks live WebSocket connections and delivers outbound frames to them.

mod connection;
mod manager;

pub use connection::{Connection, OutboundFrame, SendError};
pub use manager::ConnectionManager;

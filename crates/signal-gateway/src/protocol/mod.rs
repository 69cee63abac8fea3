//! Gateway protocol definitions
//!
//! Defines the WebSocket protocol: event names, the message envelope, client payloads,
//! and close codes.

mod close_codes;
mod event_names;
mod messages;
mod payloads;

pub use close_codes::CloseCode;
pub use event_names::EventName;
pub use messages::GatewayMessage;
pub use payloads::{ChatPayload, RoomPayload, SignalKind, SignalPayload};

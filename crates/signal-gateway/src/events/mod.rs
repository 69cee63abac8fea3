//! Gateway events
//!
//! Payloads of the events the gateway sends to clients.

mod payloads;

pub use payloads::{
    format_timestamp, ConnectedEvent, CurrentUsersEvent, ReceiveMessageEvent, UserConnectedEvent,
    UserDisconnectedEvent,
};

//! # signal-gateway
//!
//! WebSocket gateway and room relay for peer-to-peer call signaling.

pub mod connection;
pub mod events;
pub mod handlers;
pub mod protocol;
pub mod relay;
pub mod server;

pub use server::{create_app, create_gateway_state, run, GatewayState};

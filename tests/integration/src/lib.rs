//! Integration test utilities for the signaling gateway
//!
//! This crate provides helpers for running end-to-end tests against
//! the HTTP endpoints and the WebSocket gateway.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

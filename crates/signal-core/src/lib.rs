//! # signal-core
//!
//! Domain layer for the signaling relay: identities, the room registry, and domain errors.
//! This crate has zero dependencies on infrastructure (transport, web framework, etc.).

pub mod error;
pub mod registry;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use error::DomainError;
pub use registry::{ChatFanout, Departure, JoinOutcome, Peer, Room, RoomRegistry};
pub use value_objects::{ConnectionId, ParticipantId, RoomId};

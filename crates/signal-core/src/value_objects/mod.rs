//! Value objects - immutable types that represent domain concepts

mod identifiers;

pub use identifiers::{ConnectionId, ParticipantId, RoomId};

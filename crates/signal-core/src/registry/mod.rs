//! Room registry
//!
//! Tracks which participants are in which room and computes notification fan-out.
//! The registry never sends anything itself; callers deliver the returned fan-out.

mod outcome;
mod room;
mod room_registry;

pub use outcome::{ChatFanout, Departure, JoinOutcome, Peer};
pub use room::Room;
pub use room_registry::RoomRegistry;

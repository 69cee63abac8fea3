//! Room relay
//!
//! Applies room events to the registry and delivers the resulting notifications.

mod room_relay;
mod sink;

pub use room_relay::RoomRelay;
pub use sink::EventSink;

//! Domain layer: connection identity and broadcast payloads.

pub mod connection_id;
pub mod payload;

pub use connection_id::ConnectionId;
pub use payload::{Filler, Payload};

//! WebSocket layer: the upgrade hook and per-connection pumps.
//!
//! The endpoint at `/ws` is push-only. Clients receive one text frame per
//! broadcast; anything they send is read and discarded.

pub mod connection;
pub mod handler;

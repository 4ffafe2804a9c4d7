//! # websocket-stress
//!
//! Load-generation harness for real-time push connections.
//!
//! The server accepts many concurrent long-lived WebSocket clients, builds
//! a large synthetic payload on a fixed period and fans it out to every
//! connected client, while tracking connect/disconnect churn.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)          accept hook, inbound/outbound pumps
//!     ├── Monitoring (api/)         /health, /stats, web client
//!     │
//!     ├── LoadGenerator (service/)  periodic payload producer
//!     │
//!     └── Hub (hub/)                live set, single coordination loop,
//!                                   bounded per-connection mailboxes
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod hub;
pub mod service;
pub mod ws;

//! Axum WebSocket upgrade handler: the accept hook of the harness.

use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::StreamExt;

use super::connection::serve_connection;
use crate::app_state::AppState;
use crate::error::HarnessError;
use crate::hub::HubHandle;

/// `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// # Errors
///
/// Returns [`HarnessError::HubClosed`] (503) instead of upgrading when the
/// hub coordination loop is no longer running.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, HarnessError> {
    if state.hub.is_closed() {
        return Err(HarnessError::HubClosed);
    }
    let hub = state.hub.clone();
    let mailbox_capacity = state.config.mailbox_capacity;

    Ok(ws
        .on_failed_upgrade(|e| tracing::debug!(error = %e, "websocket upgrade failed"))
        .on_upgrade(move |socket| on_connection_established(socket, hub, mailbox_capacity)))
}

/// Called once per successful upgrade: wraps the socket in a connection,
/// registers it and pumps it until it closes.
pub async fn on_connection_established(socket: WebSocket, hub: HubHandle, mailbox_capacity: usize) {
    let (sink, stream) = socket.split();
    if let Err(e) = serve_connection(sink, stream, hub, mailbox_capacity).await {
        tracing::warn!(error = %e, "connection dropped before registration");
    }
}

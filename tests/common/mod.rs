//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_test::assert_ok;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use websocket_stress::api;
use websocket_stress::app_state::AppState;
use websocket_stress::config::HarnessConfig;
use websocket_stress::hub::HubHandle;

/// Client socket type used by the tests.
pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Configuration pointing at the repository's `web/` directory.
pub fn test_config() -> HarnessConfig {
    HarnessConfig {
        listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        payload_size: 256,
        mailbox_capacity: 8,
        web_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        ..HarnessConfig::default()
    }
}

/// Serves the full application on an ephemeral port.
pub async fn start_server(hub: HubHandle, config: HarnessConfig) -> SocketAddr {
    let listener = assert_ok!(TcpListener::bind("127.0.0.1:0").await);
    let addr = assert_ok!(listener.local_addr());
    let app = api::build_app(AppState {
        hub,
        config: Arc::new(config),
    });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Opens a WebSocket client against `/ws`.
pub async fn connect(addr: SocketAddr) -> Client {
    let (ws, _response) = assert_ok!(connect_async(format!("ws://{addr}/ws")).await);
    ws
}

/// Polls until the hub reports `expected` live connections.
pub async fn wait_for_live(hub: &HubHandle, expected: usize) {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        while hub.live_count() != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(waited.is_ok(), "live count never reached {expected}");
}

/// Reads the next text frame, skipping control frames.
pub async fn next_text(client: &mut Client) -> Option<String> {
    let read = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(msg) = client.next().await {
            match msg {
                Ok(Message::Text(text)) => return Some(text.as_str().to_owned()),
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => {}
            }
        }
        None
    })
    .await;
    read.ok().flatten()
}

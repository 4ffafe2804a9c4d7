//! websocket-stress server entry point.
//!
//! Starts the hub, the load generator and the Axum HTTP server.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use websocket_stress::api;
use websocket_stress::app_state::AppState;
use websocket_stress::config::HarnessConfig;
use websocket_stress::hub::Hub;
use websocket_stress::service::LoadGenerator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; LOG_FORMAT=json switches to structured output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = Arc::new(HarnessConfig::from_env()?);
    tracing::info!(
        addr = %config.listen_addr,
        web_root = %config.web_root.display(),
        "starting websocket-stress"
    );

    let template = config.index_template();
    if template.exists() {
        tracing::info!(path = %template.display(), "template file found");
    } else {
        tracing::warn!(path = %template.display(), "template file not found");
    }

    // Hub coordination loop and load generator
    let (hub, _hub_task) = Hub::spawn(config.hub_queue_capacity);
    let _generator = LoadGenerator::from_config(hub.clone(), &config).spawn();

    let app = api::build_app(AppState {
        hub,
        config: Arc::clone(&config),
    });

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

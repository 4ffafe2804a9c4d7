//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::HarnessConfig;
use crate::hub::HubHandle;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Submission side of the connection hub.
    pub hub: HubHandle,
    /// Configuration loaded at startup.
    pub config: Arc<HarnessConfig>,
}

//! HTTP endpoint handlers.

pub mod system;
pub mod web;

use axum::Router;

use crate::app_state::AppState;
use crate::config::HarnessConfig;

/// Composes monitoring and web client routes.
pub fn routes(config: &HarnessConfig) -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(web::routes(config))
}

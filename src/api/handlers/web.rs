//! Browser client: the index page and its static assets.

use axum::Router;
use axum::routing::get_service;
use tower_http::services::{ServeDir, ServeFile};

use crate::app_state::AppState;
use crate::config::HarnessConfig;

/// `GET /` serves the index template; `/static/*` serves `web/static`.
pub fn routes(config: &HarnessConfig) -> Router<AppState> {
    Router::new()
        .route("/", get_service(ServeFile::new(config.index_template())))
        .nest_service("/static", ServeDir::new(config.static_dir()))
}

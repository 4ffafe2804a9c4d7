//! HTTP layer: router composition for the WebSocket endpoint, monitoring
//! endpoints and the browser client.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete application router, bound to `state`.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(handlers::routes(&state.config))
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::config::HarnessConfig;
    use crate::hub::Hub;

    fn app(hub: crate::hub::HubHandle) -> Router {
        build_app(AppState {
            hub,
            config: Arc::new(HarnessConfig::default()),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn health_route_is_mounted() {
        let (hub, _task) = Hub::spawn(4);
        let (status, body) = get(app(hub), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn stats_route_reports_empty_hub() {
        let (hub, _task) = Hub::spawn(4);
        let (status, body) = get(app(hub), "/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["live"], 0);
        assert_eq!(body["broadcasts"], 0);
    }

    #[tokio::test]
    async fn ws_route_requires_upgrade() {
        let (hub, _task) = Hub::spawn(4);
        let (status, _) = get(app(hub), "/ws").await;
        assert!(status.is_client_error());
    }
}

//! OpenAPI document for the monitoring endpoints.

use utoipa::OpenApi;

use crate::api::dto::{HealthResponse, StatsResponse};
use crate::api::handlers::system;
use crate::error::{ErrorBody, ErrorResponse};
use crate::hub::HubStats;

/// Generated OpenAPI description, served by Swagger UI.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "websocket-stress",
        description = "Load-generation harness for long-lived WebSocket connections"
    ),
    paths(system::health_handler, system::stats_handler),
    components(schemas(HealthResponse, StatsResponse, HubStats, ErrorResponse, ErrorBody)),
    tags((name = "System", description = "Health and hub statistics"))
)]
pub struct ApiDoc;

use super::state::AppState;
use axum::{routing, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

#[derive(OpenApi)]
#[openapi(
    paths(serve_health),
    components(schemas(HealthReport, HealthStatus)),
    tags((name = "health", description = "Service liveness"))
)]
pub struct HealthApiDoc;

pub fn api() -> Router<AppState> {
    Router::new().route("/", routing::get(serve_health))
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Up,
}

#[derive(Debug, Clone, PartialEq, Eq, ToSchema, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: HealthStatus,
}

#[utoipa::path(
    get,
    path = "/health",
    context_path = "/api",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthReport),
    ),
)]
async fn serve_health() -> Json<HealthReport> {
    Json(HealthReport { status: HealthStatus::Up })
}

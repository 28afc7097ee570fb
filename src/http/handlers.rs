use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::http::server::AppState;
use crate::observability::metrics::EXPOSITION_CONTENT_TYPE;

/// Name reported by `GET /`; also the `app` label of the deployment.
pub const SERVICE_NAME: &str = "selfheal-api";

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub service: &'static str,
    pub status: &'static str,
}

/// `GET /`
pub async fn root() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: SERVICE_NAME,
        status: "running",
    })
}

/// `GET /metrics`
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], state.metrics.render())
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" })))
}

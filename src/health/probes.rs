//! Probe and toggle handlers.
//!
//! Liveness never consults the readiness flag: an orchestrator restarts on
//! liveness failure but only withholds traffic on readiness failure.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub ready: bool,
}

/// `GET /healthz`
pub async fn liveness() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// `GET /readyz`
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, &'static str) {
    if state.readiness.get_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
    }
}

/// `POST /toggle-ready`
pub async fn toggle_ready(State(state): State<AppState>) -> Json<ToggleResponse> {
    let ready = state.readiness.toggle_ready();
    state.metrics.set_ready(ready);
    tracing::info!(ready, "Readiness toggled");
    Json(ToggleResponse { ready })
}

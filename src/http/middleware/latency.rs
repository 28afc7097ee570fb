//! Request latency instrumentation.
//!
//! Every request gets a [`RequestTimer`] the moment it enters the stack. The
//! timer records exactly one observation: on normal completion with the final
//! status, or from `Drop` if the request future is abandoned first (client
//! disconnect), using status 499. Handler panics are turned into 500 responses
//! by `CatchPanicLayer` underneath the timer, so they complete normally.

use std::any::Any;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;

use crate::observability::{LatencyObservation, MetricsRegistry};

/// Status recorded when the client goes away before a response exists.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

/// Guard that records one latency observation per request.
pub struct RequestTimer {
    registry: MetricsRegistry,
    method: String,
    route: String,
    start: Instant,
    recorded: bool,
}

impl RequestTimer {
    pub fn start(registry: MetricsRegistry, method: String, route: String) -> Self {
        Self {
            registry,
            method,
            route,
            start: Instant::now(),
            recorded: false,
        }
    }

    /// Record with the final response status.
    pub fn finish(mut self, status: StatusCode) {
        self.record(status.as_u16());
    }

    fn record(&mut self, status_code: u16) {
        if self.recorded {
            return;
        }
        self.recorded = true;
        self.registry.observe_request(&LatencyObservation {
            method: std::mem::take(&mut self.method),
            route: std::mem::take(&mut self.route),
            status_code,
            duration: self.start.elapsed(),
        });
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        if !self.recorded {
            tracing::debug!(method = %self.method, route = %self.route, "Request abandoned before completion");
            self.record(CLIENT_CLOSED_REQUEST);
        }
    }
}

/// Middleware function: time the rest of the stack.
pub async fn track_latency(State(registry): State<MetricsRegistry>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let timer = RequestTimer::start(registry, method, route);
    let response = next.run(request).await;
    timer.finish(response.status());
    response
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

/// Wrap every route and the fallback of `router` with latency tracking.
///
/// Must be applied after all routes and the fallback are registered.
pub fn instrument<S>(router: Router<S>, registry: MetricsRegistry) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(registry, track_latency))
}

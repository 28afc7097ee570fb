use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::actuator::remediator::{InstanceSelector, Remediator};
use crate::http::server::AppState;
use crate::observability::MetricsRegistry;

/// Confirmation message returned on success.
pub const RESTART_TRIGGERED: &str = "Restart triggered";

/// Outcome of one actuator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationResult {
    pub success: bool,
    pub output_or_error: String,
}

#[derive(Debug, Serialize)]
pub struct RestartResponse {
    pub message: &'static str,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct RestartError {
    pub error: String,
}

impl IntoResponse for RemediationResult {
    fn into_response(self) -> Response {
        if self.success {
            Json(RestartResponse {
                message: RESTART_TRIGGERED,
                output: self.output_or_error,
            })
            .into_response()
        } else {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RestartError {
                    error: self.output_or_error,
                }),
            )
                .into_response()
        }
    }
}

/// Run the remediator once: RECEIVED → EXECUTING → SUCCEEDED | FAILED.
///
/// Never retries; a failure is returned as-is for the caller to act on.
pub async fn trigger_restart(
    remediator: &dyn Remediator,
    selector: &InstanceSelector,
    metrics: &MetricsRegistry,
) -> RemediationResult {
    let requested_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    tracing::info!(
        requested_at,
        instances = %selector,
        command = %remediator.describe(selector),
        "Restart requested"
    );

    match remediator.terminate_instances(selector).await {
        Ok(output) => {
            tracing::info!(
                instances = %selector,
                stdout = %output.stdout.trim_end(),
                stderr = %output.stderr.trim_end(),
                "Restart succeeded"
            );
            metrics.record_remediation("succeeded");
            RemediationResult {
                success: true,
                output_or_error: output.stdout,
            }
        }
        Err(e) => {
            tracing::error!(instances = %selector, error = %e, "Restart failed");
            metrics.record_remediation("failed");
            RemediationResult {
                success: false,
                output_or_error: e.to_string(),
            }
        }
    }
}

/// `POST /restart`
pub async fn restart(State(state): State<AppState>) -> RemediationResult {
    trigger_restart(state.remediator.as_ref(), &state.target, &state.metrics).await
}

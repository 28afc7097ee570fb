//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_request_duration_seconds` (histogram): latency by method, route, code
//! - `selfheal_ready` (gauge): 1 while the readiness flag is set
//! - `selfheal_leak_chunks` / `selfheal_leak_bytes` (gauges): retained leak buffers
//! - `selfheal_remediation_actions_total` (counter): actuator runs by outcome
//! - `selfheal_remediation_last_action_timestamp_seconds` (gauge)
//! - `process_*` (gauges): see [`crate::observability::process`]
//!
//! # Design Decisions
//! - Each [`MetricsRegistry`] owns its own recorder; nothing is installed
//!   globally, so every test can build an isolated registry
//! - Recording goes through `metrics::with_local_recorder`
//! - Rendering only reads; it never resets or refreshes values

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use metrics::Unit;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use thiserror::Error;

/// Name of the request latency histogram.
pub const REQUEST_DURATION: &str = "http_request_duration_seconds";

/// Histogram bucket upper bounds in seconds (5 ms .. 5 s).
pub const REQUEST_DURATION_BUCKETS: &[f64] = &[0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0];

/// Content type of the text exposition format.
pub const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

const READY: &str = "selfheal_ready";
const LEAK_CHUNKS: &str = "selfheal_leak_chunks";
const LEAK_BYTES: &str = "selfheal_leak_bytes";
const REMEDIATION_ACTIONS: &str = "selfheal_remediation_actions_total";
const REMEDIATION_LAST_ACTION: &str = "selfheal_remediation_last_action_timestamp_seconds";

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("failed to build prometheus recorder: {0}")]
    Build(#[from] BuildError),
}

/// One finished request, consumed immediately into the latency histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencyObservation {
    pub method: String,
    pub route: String,
    pub status_code: u16,
    pub duration: Duration,
}

/// Process-wide collector of quantitative observations.
#[derive(Clone)]
pub struct MetricsRegistry {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl MetricsRegistry {
    /// Build a registry with the request histogram buckets configured and all
    /// service metrics described.
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION.to_string()), REQUEST_DURATION_BUCKETS)?
            .build_recorder();
        let handle = recorder.handle();

        let registry = Self {
            recorder: Arc::new(recorder),
            handle,
        };
        registry.describe();
        Ok(registry)
    }

    /// Run `f` with this registry as the active recorder for the `metrics` macros.
    pub fn scoped<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(self.recorder.as_ref(), f)
    }

    fn describe(&self) {
        self.scoped(|| {
            metrics::describe_histogram!(REQUEST_DURATION, Unit::Seconds, "HTTP request duration in seconds");
            metrics::describe_gauge!(READY, "1 when the service reports ready, 0 otherwise");
            metrics::describe_gauge!(LEAK_CHUNKS, "Buffers retained by the leak simulator");
            metrics::describe_gauge!(LEAK_BYTES, Unit::Bytes, "Bytes retained by the leak simulator");
            metrics::describe_counter!(REMEDIATION_ACTIONS, "Remediation actions executed");
            metrics::describe_gauge!(
                REMEDIATION_LAST_ACTION,
                Unit::Seconds,
                "Unix time of the last remediation action"
            );
        });
    }

    /// Record a finished request into the latency histogram.
    pub fn observe_request(&self, observation: &LatencyObservation) {
        let LatencyObservation {
            method,
            route,
            status_code,
            duration,
        } = observation;
        self.scoped(|| {
            metrics::histogram!(
                REQUEST_DURATION,
                "method" => method.clone(),
                "route" => route.clone(),
                "code" => status_code.to_string()
            )
            .record(duration.as_secs_f64());
        });
    }

    pub fn set_ready(&self, ready: bool) {
        self.scoped(|| metrics::gauge!(READY).set(if ready { 1.0 } else { 0.0 }));
    }

    pub fn set_leak_totals(&self, chunks: usize, bytes: u64) {
        self.scoped(|| {
            metrics::gauge!(LEAK_CHUNKS).set(chunks as f64);
            metrics::gauge!(LEAK_BYTES).set(bytes as f64);
        });
    }

    /// Count one actuator run and stamp the time it finished.
    pub fn record_remediation(&self, outcome: &'static str) {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        self.scoped(|| {
            metrics::counter!(REMEDIATION_ACTIONS, "outcome" => outcome).increment(1);
            metrics::gauge!(REMEDIATION_LAST_ACTION).set(now);
        });
    }

    /// Drain pending histogram samples into their buckets.
    pub fn run_upkeep(&self) {
        self.handle.run_upkeep();
    }

    /// Render the full registry in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

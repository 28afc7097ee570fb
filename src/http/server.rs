//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared [`AppState`] (readiness, leak store, metrics, remediator)
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, latency instrumentation)
//! - Serve on a listener until shutdown, with the process collector alongside

use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::actuator::{self, CommandRemediator, InstanceSelector, Remediator};
use crate::config::{LoadConfig, ServiceConfig};
use crate::health::{probes, ReadinessFlag};
use crate::http::handlers;
use crate::http::middleware::instrument;
use crate::http::request::{make_span, propagate_request_id, set_request_id};
use crate::load::{self, LeakStore};
use crate::observability::{MetricsError, MetricsRegistry, ProcessCollector};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("metrics setup failed: {0}")]
    Metrics(#[from] MetricsError),

    #[error("server IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
///
/// Owns every piece of mutable process state, so each instance is isolated.
#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<ReadinessFlag>,
    pub leak_store: Arc<LeakStore>,
    pub metrics: MetricsRegistry,
    pub remediator: Arc<dyn Remediator>,
    pub target: InstanceSelector,
    pub limits: LoadConfig,
}

impl AppState {
    pub fn new(config: &ServiceConfig, metrics: MetricsRegistry, remediator: Arc<dyn Remediator>) -> Self {
        let readiness = Arc::new(ReadinessFlag::new());
        metrics.set_ready(readiness.get_ready());
        metrics.set_leak_totals(0, 0);

        Self {
            readiness,
            leak_store: Arc::new(LeakStore::new()),
            metrics,
            remediator,
            target: InstanceSelector::from(&config.remediation),
            limits: config.load,
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let metrics = state.metrics.clone();

    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/healthz", get(probes::liveness))
        .route("/readyz", get(probes::readiness))
        .route("/toggle-ready", post(probes::toggle_ready))
        .route("/work", get(load::handlers::work))
        .route("/leak", get(load::handlers::leak))
        .route("/metrics", get(handlers::metrics))
        .route("/restart", post(actuator::handlers::restart))
        .fallback(handlers::not_found)
        .with_state(state);

    instrument(router, metrics).layer(
        ServiceBuilder::new()
            .layer(set_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(propagate_request_id()),
    )
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    collector: ProcessCollector,
}

impl HttpServer {
    /// Create a server with a fresh registry and the command-backed remediator.
    pub fn new(config: ServiceConfig) -> Result<Self, ServerError> {
        let metrics = MetricsRegistry::new()?;
        let remediator = Arc::new(CommandRemediator::new(config.remediation.clone()));
        let state = AppState::new(&config, metrics, remediator);
        Ok(Self::with_state(config, state))
    }

    /// Create a server around an existing state (custom remediator, shared registry).
    pub fn with_state(config: ServiceConfig, state: AppState) -> Self {
        let interval = Duration::from_secs(config.observability.process_metrics_interval_secs.max(1));
        let collector = ProcessCollector::new(state.metrics.clone(), interval);
        let router = build_router(state);
        Self {
            router,
            config,
            collector,
        }
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            flavor = ?self.config.runtime.flavor,
            "HTTP server starting"
        );

        tokio::spawn(self.collector.run(shutdown.resubscribe()));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// State with an isolated registry and a remediator that only echoes.
#[cfg(test)]
pub(crate) fn test_state() -> AppState {
    let config = ServiceConfig::default();
    let remediation = crate::config::RemediationConfig {
        command: Some("echo 'pod \"selfheal-api-0\" deleted'".into()),
        ..config.remediation.clone()
    };
    let metrics = MetricsRegistry::new().expect("metrics registry");
    AppState::new(&config, metrics, Arc::new(CommandRemediator::new(remediation)))
}

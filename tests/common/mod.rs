//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use selfheal_api::actuator::{InstanceSelector, RemediationError, RemediationOutput, Remediator};
use selfheal_api::config::ServiceConfig;
use selfheal_api::observability::MetricsRegistry;
use selfheal_api::{AppState, HttpServer, Shutdown};
use selfheal_client::SelfhealClient;
use tokio::net::TcpListener;

/// Remediator returning a canned result and counting calls.
pub struct StubRemediator {
    outcome: Result<String, String>,
    pub calls: AtomicUsize,
}

impl StubRemediator {
    pub fn succeeding(stdout: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(stdout.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(stderr: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(stderr.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Remediator for StubRemediator {
    fn terminate_instances<'a>(
        &'a self,
        _selector: &'a InstanceSelector,
    ) -> BoxFuture<'a, Result<RemediationOutput, RemediationError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match &self.outcome {
            Ok(stdout) => Ok(RemediationOutput {
                stdout: stdout.clone(),
                stderr: String::new(),
            }),
            Err(stderr) => Err(RemediationError::Failed {
                status: Some(1),
                stderr: stderr.clone(),
            }),
        };
        async move { result }.boxed()
    }

    fn describe(&self, selector: &InstanceSelector) -> String {
        format!("stub delete {selector}")
    }
}

/// A server running on an ephemeral port, stopped on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    pub client: SelfhealClient,
    pub http: reqwest::Client,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default config and the given remediator.
pub async fn start_server(remediator: Arc<dyn Remediator>) -> TestServer {
    start_server_with(ServiceConfig::default(), remediator).await
}

/// Start a server with a custom config and the given remediator.
pub async fn start_server_with(config: ServiceConfig, remediator: Arc<dyn Remediator>) -> TestServer {
    let metrics = MetricsRegistry::new().unwrap();
    let state = AppState::new(&config, metrics, remediator);
    let server = HttpServer::with_state(config, state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let http = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();
    let client = SelfhealClient::with_client(http.clone(), &format!("http://{addr}"));

    TestServer {
        addr,
        state,
        client,
        http,
        shutdown,
    }
}

/// Sum of `http_request_duration_seconds_count` samples matching the labels.
pub fn histogram_count(exposition: &str, method: &str, route: &str, code: &str) -> u64 {
    let method = format!("method=\"{method}\"");
    let route = format!("route=\"{route}\"");
    let code = format!("code=\"{code}\"");
    exposition
        .lines()
        .filter(|l| l.starts_with("http_request_duration_seconds_count{"))
        .filter(|l| l.contains(&method) && l.contains(&route) && l.contains(&code))
        .filter_map(|l| l.rsplit(' ').next()?.parse::<u64>().ok())
        .sum()
}

/// Sum of every `http_request_duration_seconds_count` sample.
pub fn total_observations(exposition: &str) -> u64 {
    exposition
        .lines()
        .filter(|l| l.starts_with("http_request_duration_seconds_count{"))
        .filter_map(|l| l.rsplit(' ').next()?.parse::<u64>().ok())
        .sum()
}

/// Value of an unlabeled sample such as `selfheal_leak_chunks 3`.
pub fn gauge_value(exposition: &str, name: &str) -> Option<f64> {
    exposition
        .lines()
        .find_map(|l| l.strip_prefix(name)?.strip_prefix(' ')?.trim().parse().ok())
}

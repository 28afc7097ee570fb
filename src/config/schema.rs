//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Hard ceiling for a single `/work` request, in milliseconds.
pub const WORK_MS_CEILING: u64 = 10_000;

/// Hard ceiling for a single `/leak` request, in megabytes.
pub const LEAK_MB_CEILING: u64 = 200;

/// Root configuration for the service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Async runtime settings.
    pub runtime: RuntimeConfig,

    /// Load simulator limits.
    pub load: LoadConfig,

    /// Remediation actuator settings.
    pub remediation: RemediationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. Overridden by the `PORT` environment variable.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` pair handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Tokio scheduler flavor.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeFlavor {
    /// One worker thread. `/work` stalls every other request while it spins.
    #[default]
    CurrentThread,
    /// Work-stealing pool.
    MultiThread,
}

/// Runtime configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RuntimeConfig {
    pub flavor: RuntimeFlavor,
}

/// Limits applied to the load simulator endpoints.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoadConfig {
    /// Busy duration used when `ms` is missing or unparseable.
    pub default_work_ms: u64,

    /// Upper clamp for `ms`. Must not exceed [`WORK_MS_CEILING`].
    pub max_work_ms: u64,

    /// Allocation size used when `mb` is missing or unparseable.
    pub default_leak_mb: u64,

    /// Upper clamp for `mb`. Must not exceed [`LEAK_MB_CEILING`].
    pub max_leak_mb: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            default_work_ms: 200,
            max_work_ms: WORK_MS_CEILING,
            default_leak_mb: 10,
            max_leak_mb: LEAK_MB_CEILING,
        }
    }
}

/// Remediation actuator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RemediationConfig {
    /// kubectl binary name or path.
    pub kubectl: String,

    /// Namespace the service instances run in.
    pub namespace: String,

    /// Label selector identifying the instances to terminate.
    pub selector: String,

    /// Pass `--force` to the delete.
    pub force: bool,

    /// Pass `--grace-period=<n>` to the delete.
    pub grace_period_secs: Option<u64>,

    /// Shell command run via `sh -c` instead of kubectl.
    ///
    /// `{namespace}` and `{selector}` are substituted before execution.
    pub command: Option<String>,
}

impl Default for RemediationConfig {
    fn default() -> Self {
        Self {
            kubectl: "kubectl".to_string(),
            namespace: "selfheal".to_string(),
            selector: "app=selfheal-api".to_string(),
            force: false,
            grace_period_secs: None,
            command: None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// How often process gauges are refreshed, in seconds.
    pub process_metrics_interval_secs: u64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            process_metrics_interval_secs: 5,
        }
    }
}

//! The remediation capability.
//!
//! A [`Remediator`] terminates every running instance matching a selector.
//! Execution is all-or-nothing from the actuator's point of view: one command,
//! one exit status.

use std::fmt;
use std::process::ExitStatus;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::RemediationConfig;

/// Identity of the instances to terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSelector {
    pub namespace: String,
    pub label_selector: String,
}

impl InstanceSelector {
    pub fn new(namespace: impl Into<String>, label_selector: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            label_selector: label_selector.into(),
        }
    }
}

impl From<&RemediationConfig> for InstanceSelector {
    fn from(config: &RemediationConfig) -> Self {
        Self::new(config.namespace.clone(), config.selector.clone())
    }
}

impl fmt::Display for InstanceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.label_selector)
    }
}

/// Captured output of a successful remediation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemediationOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Errors surfaced verbatim to the caller.
#[derive(Debug, Error)]
pub enum RemediationError {
    /// The command could not be started (missing binary, permission denied).
    #[error("{0}")]
    Spawn(#[from] std::io::Error),

    /// The command ran and exited unsuccessfully.
    #[error("{}", failure_text(.stderr, .status))]
    Failed { status: Option<i32>, stderr: String },
}

impl RemediationError {
    /// Build a [`RemediationError::Failed`] from a finished process.
    pub fn from_exit(status: ExitStatus, stderr: String) -> Self {
        RemediationError::Failed {
            status: status.code(),
            stderr,
        }
    }
}

/// Stderr verbatim; the exit status only when stderr is empty.
fn failure_text(stderr: &str, status: &Option<i32>) -> String {
    if !stderr.is_empty() {
        return stderr.to_string();
    }
    match status {
        Some(code) => format!("command exited with status {code}"),
        None => "command terminated by signal".to_string(),
    }
}

/// Terminates service instances. Implementations must not retry.
pub trait Remediator: Send + Sync {
    fn terminate_instances<'a>(
        &'a self,
        selector: &'a InstanceSelector,
    ) -> BoxFuture<'a, Result<RemediationOutput, RemediationError>>;

    /// Human-readable description of what will run, for logs.
    fn describe(&self, selector: &InstanceSelector) -> String;
}

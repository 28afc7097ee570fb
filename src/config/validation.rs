//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges. All violations are
//! reported, not just the first one.

use thiserror::Error;

use crate::config::schema::{ServiceConfig, LEAK_MB_CEILING, WORK_MS_CEILING};

/// A single semantic problem found in a [`ServiceConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("load.{field} = {value} exceeds the ceiling of {ceiling}")]
    AboveCeiling {
        field: &'static str,
        value: u64,
        ceiling: u64,
    },

    #[error("load.{field} = {value} exceeds load.{max_field} = {max}")]
    DefaultAboveMax {
        field: &'static str,
        value: u64,
        max_field: &'static str,
        max: u64,
    },

    #[error("remediation.{0} must not be empty")]
    EmptyRemediationField(&'static str),

    #[error("observability.process_metrics_interval_secs must be greater than zero")]
    ZeroMetricsInterval,
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let load = &config.load;

    if load.max_work_ms > WORK_MS_CEILING {
        errors.push(ValidationError::AboveCeiling {
            field: "max_work_ms",
            value: load.max_work_ms,
            ceiling: WORK_MS_CEILING,
        });
    }
    if load.max_leak_mb > LEAK_MB_CEILING {
        errors.push(ValidationError::AboveCeiling {
            field: "max_leak_mb",
            value: load.max_leak_mb,
            ceiling: LEAK_MB_CEILING,
        });
    }
    if load.default_work_ms > load.max_work_ms {
        errors.push(ValidationError::DefaultAboveMax {
            field: "default_work_ms",
            value: load.default_work_ms,
            max_field: "max_work_ms",
            max: load.max_work_ms,
        });
    }
    if load.default_leak_mb > load.max_leak_mb {
        errors.push(ValidationError::DefaultAboveMax {
            field: "default_leak_mb",
            value: load.default_leak_mb,
            max_field: "max_leak_mb",
            max: load.max_leak_mb,
        });
    }

    let remediation = &config.remediation;
    match &remediation.command {
        Some(command) if command.trim().is_empty() => {
            errors.push(ValidationError::EmptyRemediationField("command"));
        }
        Some(_) => {}
        None => {
            if remediation.kubectl.trim().is_empty() {
                errors.push(ValidationError::EmptyRemediationField("kubectl"));
            }
        }
    }
    if remediation.namespace.trim().is_empty() {
        errors.push(ValidationError::EmptyRemediationField("namespace"));
    }
    if remediation.selector.trim().is_empty() {
        errors.push(ValidationError::EmptyRemediationField("selector"));
    }

    if config.observability.process_metrics_interval_secs == 0 {
        errors.push(ValidationError::ZeroMetricsInterval);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

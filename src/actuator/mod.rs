//! Remediation actuator.
//!
//! # Data Flow
//! ```text
//! POST /restart
//!     → handlers.rs (log request, timestamp)
//!     → remediator.rs (Remediator trait)
//!     → command.rs (kubectl delete pod -n selfheal -l app=selfheal-api)
//!     → 200 {message, output} | 500 {error}
//! ```
//!
//! # Design Decisions
//! - No retries, no rate limiting, no idempotency key
//! - Concurrent triggers are not serialized
//! - Command errors are passed through verbatim

pub mod command;
pub mod handlers;
pub mod remediator;

pub use command::CommandRemediator;
pub use handlers::{trigger_restart, RemediationResult};
pub use remediator::{InstanceSelector, RemediationError, RemediationOutput, Remediator};

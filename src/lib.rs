//! selfheal-api library.
//!
//! A deliberately degradable service for exercising liveness/readiness probes
//! and a remediation actuator.

pub mod actuator;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load;
pub mod observability;

pub use config::ServiceConfig;
pub use http::{build_router, AppState, HttpServer};
pub use lifecycle::Shutdown;

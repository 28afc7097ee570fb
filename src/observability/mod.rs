//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request middleware, handlers, actuator
//!     → metrics.rs (histogram, counters, service gauges)
//!     → logging.rs (structured log events)
//! Background collector
//!     → process.rs (process gauges on a fixed interval)
//!
//! Consumers:
//!     → GET /metrics (Prometheus scrape)
//!     → stdout (pretty or JSON lines)
//! ```
//!
//! # Design Decisions
//! - Metrics live in an owned registry injected into the router
//! - Request ID flows through trace spans
//! - Scrapes never trigger collection

pub mod logging;
pub mod metrics;
pub mod process;

pub use self::metrics::{LatencyObservation, MetricsError, MetricsRegistry};
pub use self::process::ProcessCollector;

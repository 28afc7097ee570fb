//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → request.rs (assign x-request-id, trace span)
//!     → middleware/latency.rs (start timer, catch panics)
//!     → server.rs router
//!         → health, load, actuator handlers
//!         → handlers.rs (/, /metrics, fallback)
//!     → middleware/latency.rs (record method, route, status)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer, ServerError};

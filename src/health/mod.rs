//! Health subsystem.
//!
//! # Data Flow
//! ```text
//! GET /healthz      → probes.rs → always "ok"
//! GET /readyz       → probes.rs → state.rs (read)
//! POST /toggle-ready → probes.rs → state.rs (atomic flip) → selfheal_ready gauge
//! ```
//!
//! # Design Decisions
//! - Liveness and readiness are decoupled
//! - The flag is an atomic; no locks
//! - Nothing is persisted; a restart resets to ready

pub mod probes;
pub mod state;

pub use state::ReadinessFlag;

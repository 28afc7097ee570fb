//! Load simulators.
//!
//! # Data Flow
//! ```text
//! GET /work?ms= → params.rs (clamp ≤ max_work_ms) → cpu.rs (busy loop)
//! GET /leak?mb= → params.rs (clamp ≤ max_leak_mb) → leak.rs (retain buffer)
//! ```
//!
//! # Design Decisions
//! - Bad input is clamped, never rejected
//! - The busy loop computes; it does not sleep
//! - Leaked buffers are never freed

pub mod cpu;
pub mod handlers;
pub mod leak;
pub mod params;

pub use leak::{LeakReceipt, LeakStore};

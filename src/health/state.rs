//! Readiness flag.
//!
//! # States
//! - Ready: readiness probe answers 200, traffic is routed here
//! - NotReady: readiness probe answers 503, traffic is withheld
//!
//! Starts ready. Only an explicit toggle moves it; only a restart resets it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide readiness flag shared by the probe and toggle endpoints.
#[derive(Debug)]
pub struct ReadinessFlag {
    ready: AtomicBool,
}

impl ReadinessFlag {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
        }
    }

    /// Current value. No side effects.
    pub fn get_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Flip the flag and return the new value.
    ///
    /// A single read-modify-write, so concurrent toggles never lose an update.
    pub fn toggle_ready(&self) -> bool {
        !self.ready.fetch_xor(true, Ordering::SeqCst)
    }
}

impl Default for ReadinessFlag {
    fn default() -> Self {
        Self::new()
    }
}

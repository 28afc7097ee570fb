//! CPU load simulator.
//!
//! Spins on the calling thread until a deadline fixed at entry. It never
//! yields, so on the single-threaded runtime every other request stalls for
//! the duration. That stall is the condition under test.

use std::hint::black_box;
use std::time::{Duration, Instant};

/// Busy-loop for `ms` milliseconds and return the duration honored.
pub fn busy_work(ms: u64) -> u64 {
    let deadline = Instant::now() + Duration::from_millis(ms);
    while Instant::now() < deadline {
        black_box(fastrand::f64().sqrt());
    }
    ms
}

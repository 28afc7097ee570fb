//! Memory leak simulator.
//!
//! Buffers appended here are never released for the life of the process.
//! Memory growth across calls is the defect under test.

use std::sync::Mutex;

/// Byte every leaked buffer is filled with.
pub const FILL_BYTE: u8 = b'a';

const BYTES_PER_MB: usize = 1024 * 1024;

/// Result of a single leak call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeakReceipt {
    pub leaked_mb: u64,
    pub total_chunks: usize,
    pub total_bytes: u64,
}

#[derive(Default)]
struct Retained {
    chunks: Vec<Box<[u8]>>,
    bytes: u64,
}

/// Append-only store of retained buffers.
#[derive(Default)]
pub struct LeakStore {
    inner: Mutex<Retained>,
}

impl LeakStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `mb` megabytes, retain the buffer and report the new totals.
    pub fn leak(&self, mb: u64) -> LeakReceipt {
        // Allocate outside the lock; only the push is serialized.
        let chunk = vec![FILL_BYTE; mb as usize * BYTES_PER_MB].into_boxed_slice();
        let len = chunk.len() as u64;

        let mut retained = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        retained.chunks.push(chunk);
        retained.bytes += len;

        LeakReceipt {
            leaked_mb: mb,
            total_chunks: retained.chunks.len(),
            total_bytes: retained.bytes,
        }
    }

    /// Number of buffers retained so far.
    pub fn chunk_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).chunks.len()
    }

    /// Total bytes retained so far.
    pub fn total_bytes(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).bytes
    }
}

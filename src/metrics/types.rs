// Standard library
use std::sync::atomic::{AtomicU64, Ordering};

// 3rd party crates
use serde::Serialize;

/// Point-in-time view of a pooled executor's counters
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Calls made to the executor
    pub requests: u64,
    /// Calls the downstream executor answered with a response
    pub succeeded: u64,
    /// Calls the downstream executor failed
    pub failed: u64,
    /// Calls given up before admission (cancelled, deadline, gate closed)
    pub rejected: u64,
    /// Concurrency slots handed out
    pub slots_acquired: u64,
    /// Concurrency slots returned
    pub slots_released: u64,
    /// Concurrency slots held right now
    pub in_flight: u64,
}

/// Lock-free request counters, updated on the request path
#[derive(Debug, Default)]
pub struct PoolMetrics {
    requests: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    rejected: AtomicU64,
}

impl PoolMetrics {
    /// Creates a new PoolMetrics with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a call made to the executor
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a response returned by the downstream executor
    pub fn record_success(&self) {
        self.succeeded.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a failure returned by the downstream executor
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a call given up before admission
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Request counters only; slot fields are left at zero.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            requests: self.requests.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            ..PoolStats::default()
        }
    }
}

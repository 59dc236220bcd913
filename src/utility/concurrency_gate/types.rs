// Standard library
use std::sync::atomic::AtomicU64;

// 3rd party crates
use tokio::sync::{Semaphore, SemaphorePermit};

/// Counting gate bounding the number of concurrently held slots.
#[derive(Debug)]
pub struct ConcurrencyGate {
    /// Capacity as configured; `<= 0` means unlimited
    pub(super) capacity: i64,
    /// Present only when the gate is limited
    pub(super) semaphore: Option<Semaphore>,
    /// Slots handed out since construction
    pub(super) acquired: AtomicU64,
    /// Slots returned since construction
    pub(super) released: AtomicU64,
}

/// A held slot. The slot goes back to its gate when this is dropped.
#[must_use = "dropping the slot releases it immediately"]
#[derive(Debug)]
pub struct ConcurrencySlot<'a> {
    pub(super) gate: &'a ConcurrencyGate,
    pub(super) permit: Option<SemaphorePermit<'a>>,
}

// Standard library
use std::sync::atomic::{AtomicU64, Ordering};

// 3rd party crates
use tokio::sync::Semaphore;
use tracing::{debug, trace};

// Current module imports
use super::types::{ConcurrencyGate, ConcurrencySlot};

impl ConcurrencyGate {
    /// Create a gate admitting at most `capacity` holders at once.
    ///
    /// Zero or negative capacities disable the gate.
    pub fn new(capacity: i64) -> Self {
        let semaphore = if capacity > 0 {
            let permits = usize::try_from(capacity)
                .unwrap_or(Semaphore::MAX_PERMITS)
                .min(Semaphore::MAX_PERMITS);
            debug!("Concurrency gate limited to {} slots", permits);
            Some(Semaphore::new(permits))
        } else {
            debug!("Concurrency gate disabled (capacity {})", capacity);
            None
        };

        Self {
            capacity,
            semaphore,
            acquired: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    /// Wait until a slot is free and take it.
    ///
    /// Returns immediately when the gate is disabled. There is no timeout;
    /// dropping the returned future before it resolves takes nothing.
    pub async fn acquire(&self) -> ConcurrencySlot<'_> {
        let permit = match &self.semaphore {
            Some(semaphore) => {
                if semaphore.available_permits() == 0 {
                    trace!("All {} concurrency slots busy, waiting", self.capacity);
                }
                // The semaphore is owned by the gate and never closed.
                semaphore.acquire().await.ok()
            }
            None => None,
        };

        self.acquired.fetch_add(1, Ordering::Release);
        ConcurrencySlot {
            gate: self,
            permit,
        }
    }

    /// Capacity as configured, including non-positive values.
    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn is_limited(&self) -> bool {
        self.semaphore.is_some()
    }

    /// Free slots, or `None` when the gate is disabled.
    pub fn available(&self) -> Option<usize> {
        self.semaphore.as_ref().map(Semaphore::available_permits)
    }

    /// Slots currently held.
    pub fn in_flight(&self) -> u64 {
        let acquired = self.acquired.load(Ordering::Acquire);
        let released = self.released.load(Ordering::Acquire);
        acquired.saturating_sub(released)
    }

    pub fn acquired(&self) -> u64 {
        self.acquired.load(Ordering::Acquire)
    }

    pub fn released(&self) -> u64 {
        self.released.load(Ordering::Acquire)
    }
}

impl ConcurrencySlot<'_> {
    /// Give the slot back. Same as dropping it.
    pub fn release(self) {}
}

impl Drop for ConcurrencySlot<'_> {
    fn drop(&mut self) {
        drop(self.permit.take());
        self.gate.released.fetch_add(1, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_limited_gate_counts_slots() {
        let gate = ConcurrencyGate::new(2);
        assert!(gate.is_limited());
        assert_eq!(gate.available(), Some(2));

        let first = gate.acquire().await;
        let second = gate.acquire().await;
        assert_eq!(gate.available(), Some(0));
        assert_eq!(gate.in_flight(), 2);

        first.release();
        assert_eq!(gate.available(), Some(1));
        drop(second);
        assert_eq!(gate.available(), Some(2));
        assert_eq!(gate.acquired(), gate.released());
    }

    #[tokio::test]
    async fn test_non_positive_capacity_disables_gate() {
        for capacity in [0, -1, i64::MIN] {
            let gate = ConcurrencyGate::new(capacity);
            assert!(!gate.is_limited());
            assert_eq!(gate.available(), None);
            assert_eq!(gate.capacity(), capacity);

            let slots: Vec<_> = futures::future::join_all((0..64).map(|_| gate.acquire())).await;
            assert_eq!(gate.in_flight(), 64);
            drop(slots);
            assert_eq!(gate.in_flight(), 0);
        }
    }

    #[tokio::test]
    async fn test_huge_capacity_is_clamped() {
        let gate = ConcurrencyGate::new(i64::MAX);
        assert_eq!(gate.available(), Some(Semaphore::MAX_PERMITS));
    }

    #[tokio::test(start_paused = true)]
    async fn test_acquire_waits_for_release() {
        let gate = ConcurrencyGate::new(1);
        let held = gate.acquire().await;

        let waiting = tokio::time::timeout(Duration::from_millis(50), gate.acquire()).await;
        assert!(waiting.is_err(), "second acquire should block while the slot is held");
        // The abandoned acquire must not have taken anything.
        assert_eq!(gate.acquired(), 1);

        drop(held);
        let slot = tokio::time::timeout(Duration::from_millis(50), gate.acquire())
            .await
            .expect("slot should be free after release");
        assert_eq!(gate.available(), Some(0));
        drop(slot);
    }
}

// 3rd party crates
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::time::{self, Duration, Instant, MissedTickBehavior};
use tracing::{debug, trace};

// Current module imports
use super::constants::{NANOS_PER_SECOND, TICK_BUFFER};
use super::errors::RateGateClosed;
use super::types::{RateGate, Ticker};

impl RateGate {
    /// Create a gate admitting at most `rate` requests per second.
    ///
    /// Zero or negative rates disable the gate and work anywhere.
    ///
    /// # Panics
    ///
    /// A limited gate spawns its ticker immediately, so a positive `rate`
    /// panics when called outside a Tokio runtime.
    pub fn new(rate: i64) -> Self {
        let ticker = Self::interval_for(rate).map(|interval| {
            let runtime = Handle::try_current()
                .expect("a rate-limited RateGate must be created inside a Tokio runtime");
            let (tx, rx) = mpsc::channel(TICK_BUFFER);
            let task = runtime.spawn(run_ticker(interval, tx));
            debug!(
                "Rate gate limited to {} requests/s (one admission every {:?})",
                rate, interval
            );
            Ticker {
                interval,
                ticks: Mutex::new(rx),
                task,
            }
        });

        if ticker.is_none() {
            debug!("Rate gate disabled (rate {})", rate);
        }

        Self { rate, ticker }
    }

    /// Spacing between admissions for `rate` requests per second.
    ///
    /// Sub-nanosecond remainders are truncated, but the interval never drops
    /// below one nanosecond. Returns `None` for non-positive rates.
    pub fn interval_for(rate: i64) -> Option<Duration> {
        if rate <= 0 {
            return None;
        }
        let nanos = (NANOS_PER_SECOND / rate as u64).max(1);
        Some(Duration::from_nanos(nanos))
    }

    /// Wait for the next admission tick and consume it.
    ///
    /// Returns immediately when the gate is disabled. Dropping the returned
    /// future before it resolves consumes nothing.
    pub async fn wait(&self) -> Result<(), RateGateClosed> {
        let Some(ticker) = &self.ticker else {
            return Ok(());
        };

        let mut ticks = ticker.ticks.lock().await;
        match ticks.recv().await {
            Some(emitted) => {
                trace!("Admitted on tick emitted {:?} ago", emitted.elapsed());
                Ok(())
            }
            None => Err(RateGateClosed),
        }
    }

    /// Stop the ticker and release its timer. Safe to call more than once.
    ///
    /// A tick already buffered can still be claimed; after that every
    /// [`wait`](Self::wait) fails with [`RateGateClosed`].
    pub fn shutdown(&self) {
        if let Some(ticker) = &self.ticker {
            if !ticker.task.is_finished() {
                debug!("Stopping rate gate ticker");
            }
            ticker.task.abort();
        }
    }

    /// Requests per second as configured, including non-positive values.
    pub fn rate(&self) -> i64 {
        self.rate
    }

    pub fn is_limited(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.ticker.as_ref().map(|ticker| ticker.interval)
    }
}

impl Drop for RateGate {
    fn drop(&mut self) {
        if let Some(ticker) = &self.ticker {
            ticker.task.abort();
        }
    }
}

/// Emit one tick per `interval` into `tx` until the receiver goes away.
async fn run_ticker(interval: Duration, tx: mpsc::Sender<Instant>) {
    let mut ticks = time::interval_at(Instant::now() + interval, interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let emitted = ticks.tick().await;
        match tx.try_send(emitted) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => trace!("Admission tick dropped, previous one unclaimed"),
            Err(TrySendError::Closed(_)) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_for() {
        assert_eq!(RateGate::interval_for(0), None);
        assert_eq!(RateGate::interval_for(-5), None);
        assert_eq!(RateGate::interval_for(1), Some(Duration::from_secs(1)));
        assert_eq!(RateGate::interval_for(200), Some(Duration::from_millis(5)));
        // 1s / 3 truncates to 333_333_333ns
        assert_eq!(RateGate::interval_for(3), Some(Duration::from_nanos(333_333_333)));
        assert_eq!(RateGate::interval_for(i64::MAX), Some(Duration::from_nanos(1)));
    }

    #[tokio::test]
    async fn test_disabled_gate_never_waits() {
        for rate in [0, -1] {
            let gate = RateGate::new(rate);
            assert!(!gate.is_limited());
            assert_eq!(gate.interval(), None);
            for _ in 0..1000 {
                gate.wait().await.unwrap();
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_are_spaced_by_interval() {
        let gate = RateGate::new(10);
        let start = Instant::now();

        let mut admitted = Vec::new();
        for _ in 0..5 {
            gate.wait().await.unwrap();
            admitted.push(start.elapsed());
        }

        // First tick comes one interval after construction.
        assert!(admitted[0] >= Duration::from_millis(100));
        for pair in admitted.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(100), "{:?}", admitted);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_gate_keeps_a_single_tick() {
        let gate = RateGate::new(10);
        time::sleep(Duration::from_millis(1050)).await;

        let start = Instant::now();
        gate.wait().await.unwrap();
        assert!(start.elapsed() < Duration::from_millis(100));

        // The other ticks that fired while idle were dropped, so the next
        // admission waits for the 1100ms tick. It lands only 50ms after the
        // buffered one: after an idle period spacing may dip below the
        // interval once, like a ticker with a one-tick buffer.
        gate.wait().await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_waiters_share_ticks() {
        let gate = std::sync::Arc::new(RateGate::new(20));
        let start = Instant::now();

        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let gate = gate.clone();
                tokio::spawn(async move { gate.wait().await })
            })
            .collect();
        for waiter in waiters {
            waiter.await.unwrap().unwrap();
        }

        // Four ticks at 50ms spacing.
        assert!(start.elapsed() >= Duration::from_millis(200));
    }

    /// Yield until the runtime has reaped aborted tasks, or give up.
    async fn alive_tasks_settle_at(expected: usize) -> usize {
        let metrics = Handle::current().metrics();
        for _ in 0..100 {
            if metrics.num_alive_tasks() == expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        metrics.num_alive_tasks()
    }

    #[tokio::test]
    async fn test_drop_stops_ticker_task() {
        let before = Handle::current().metrics().num_alive_tasks();

        let gate = RateGate::new(1);
        assert_eq!(Handle::current().metrics().num_alive_tasks(), before + 1);

        drop(gate);
        assert_eq!(alive_tasks_settle_at(before).await, before);
    }

    #[tokio::test]
    async fn test_shutdown_stops_ticker_task() {
        let before = Handle::current().metrics().num_alive_tasks();

        let gate = RateGate::new(1);
        assert_eq!(Handle::current().metrics().num_alive_tasks(), before + 1);

        gate.shutdown();
        assert_eq!(alive_tasks_settle_at(before).await, before);
        assert!(gate.is_limited());
    }

    #[tokio::test]
    async fn test_disabled_gate_spawns_nothing() {
        let before = Handle::current().metrics().num_alive_tasks();
        let _gate = RateGate::new(0);
        assert_eq!(Handle::current().metrics().num_alive_tasks(), before);
    }

    #[test]
    fn test_disabled_gate_needs_no_runtime() {
        let gate = RateGate::new(-3);
        assert!(!gate.is_limited());
        gate.shutdown();
    }

    #[test]
    #[should_panic(expected = "must be created inside a Tokio runtime")]
    fn test_limited_gate_outside_runtime_panics() {
        let _gate = RateGate::new(10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_closes_gate() {
        let gate = RateGate::new(10);
        gate.shutdown();
        gate.shutdown();
        assert_eq!(gate.wait().await, Err(RateGateClosed));
    }
}

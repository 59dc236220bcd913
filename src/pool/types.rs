// Standard library
use std::fmt;
use std::sync::Arc;

// Project imports
use crate::metrics::PoolMetrics;
use crate::utility::concurrency_gate::ConcurrencyGate;
use crate::utility::rate_limiter::RateGate;

/// An [`Executor`](crate::executor::Executor) wrapped in a concurrency gate
/// and a rate gate.
///
/// The downstream executor is shared, not owned: the caller keeps its own
/// `Arc` and stays in charge of the transport's lifecycle. A `PooledExecutor`
/// is safe to share between tasks without further locking and should be
/// reused rather than rebuilt per request, since the gates only bound the
/// requests that go through the same instance.
pub struct PooledExecutor<E> {
    pub(super) downstream: Arc<E>,
    pub(super) concurrency: ConcurrencyGate,
    pub(super) rate: RateGate,
    pub(super) metrics: PoolMetrics,
}

impl<E> fmt::Debug for PooledExecutor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PooledExecutor")
            .field("downstream", &"<Executor>")
            .field("concurrency", &self.concurrency)
            .field("rate", &self.rate)
            .field("metrics", &self.metrics)
            .finish()
    }
}

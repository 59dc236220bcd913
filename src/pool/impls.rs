// Standard library
use std::future::{self, Future};
use std::sync::Arc;

// 3rd party crates
use async_trait::async_trait;
use reqwest::{Request, Response};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;
use tracing::{debug, trace};

// Project imports
use crate::executor::Executor;
use crate::metrics::{PoolMetrics, PoolStats};
use crate::utility::concurrency_gate::{ConcurrencyGate, ConcurrencySlot};
use crate::utility::rate_limiter::RateGate;

// Current module imports
use super::errors::PoolError;
use super::types::PooledExecutor;

impl<E> PooledExecutor<E>
where
    E: Executor,
{
    /// Wrap `downstream` with both gates.
    ///
    /// `max_concurrent` bounds the requests in flight and
    /// `requests_per_second` bounds how fast they are admitted. Zero or a
    /// negative value disables the corresponding gate.
    ///
    /// # Panics
    ///
    /// When `requests_per_second` is positive the rate gate's ticker is
    /// spawned right away, so this panics outside a Tokio runtime.
    pub fn new(downstream: Arc<E>, max_concurrent: i64, requests_per_second: i64) -> Self {
        debug!(
            "Creating pooled executor (max concurrent: {}, requests/s: {})",
            max_concurrent, requests_per_second
        );

        Self {
            downstream,
            concurrency: ConcurrencyGate::new(max_concurrent),
            rate: RateGate::new(requests_per_second),
            metrics: PoolMetrics::new(),
        }
    }

    /// Run `request` through both gates, then hand it to the downstream
    /// executor.
    ///
    /// Waits as long as it takes to be admitted. The response is returned
    /// as-is with its body unread; closing it is up to the caller. A
    /// downstream failure comes back as [`PoolError::Downstream`] without
    /// any retry.
    pub async fn execute_pooled(&self, request: Request) -> Result<Response, PoolError<E::Error>> {
        self.metrics.record_request();
        let slot = self.admit().await.inspect_err(|_| self.metrics.record_rejection())?;
        self.dispatch(slot, request).await
    }

    /// Like [`execute_pooled`](Self::execute_pooled), but gives up with
    /// [`PoolError::DeadlineElapsed`] if the request has not been admitted by
    /// `deadline`.
    ///
    /// The deadline only covers waiting on the gates. Once admitted, the
    /// downstream call runs to completion under its own timeouts.
    pub async fn execute_with_deadline(
        &self,
        request: Request,
        deadline: Instant,
    ) -> Result<Response, PoolError<E::Error>> {
        self.metrics.record_request();
        let slot = self
            .admit_until(async {
                tokio::time::sleep_until(deadline).await;
                PoolError::DeadlineElapsed
            })
            .await
            .inspect_err(|_| self.metrics.record_rejection())?;
        self.dispatch(slot, request).await
    }

    /// Like [`execute_pooled`](Self::execute_pooled), but gives up with
    /// [`PoolError::Cancelled`] if a shutdown signal arrives on `shutdown`
    /// before the request is admitted.
    ///
    /// A channel whose senders are all gone without sending never cancels.
    pub async fn execute_with_shutdown(
        &self,
        request: Request,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<Response, PoolError<E::Error>> {
        self.metrics.record_request();
        let slot = self
            .admit_until(async move {
                shutdown_signal(shutdown).await;
                PoolError::Cancelled
            })
            .await
            .inspect_err(|_| self.metrics.record_rejection())?;
        self.dispatch(slot, request).await
    }

    /// Gives up with [`PoolError::Cancelled`] on a shutdown signal or with
    /// [`PoolError::DeadlineElapsed`] at `deadline`, whichever comes first
    /// while the request is still waiting for admission.
    pub async fn execute_with_deadline_and_shutdown(
        &self,
        request: Request,
        deadline: Instant,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<Response, PoolError<E::Error>> {
        self.metrics.record_request();
        let slot = self
            .admit_until(async move {
                tokio::select! {
                    _ = shutdown_signal(shutdown) => PoolError::Cancelled,
                    _ = tokio::time::sleep_until(deadline) => PoolError::DeadlineElapsed,
                }
            })
            .await
            .inspect_err(|_| self.metrics.record_rejection())?;
        self.dispatch(slot, request).await
    }

    /// Stop the rate gate's ticker.
    ///
    /// Requests already admitted are unaffected. With a rate limit
    /// configured, later requests fail with [`PoolError::RateGateClosed`].
    pub fn shutdown(&self) {
        self.rate.shutdown();
    }

    pub fn downstream(&self) -> &Arc<E> {
        &self.downstream
    }

    pub fn concurrency_gate(&self) -> &ConcurrencyGate {
        &self.concurrency
    }

    pub fn rate_gate(&self) -> &RateGate {
        &self.rate
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            slots_acquired: self.concurrency.acquired(),
            slots_released: self.concurrency.released(),
            in_flight: self.concurrency.in_flight(),
            ..self.metrics.snapshot()
        }
    }

    /// Take a concurrency slot, then wait for a rate tick while holding it.
    async fn admit(&self) -> Result<ConcurrencySlot<'_>, PoolError<E::Error>> {
        let slot = self.concurrency.acquire().await;
        // On error the slot is dropped here and goes straight back.
        self.rate.wait().await?;
        Ok(slot)
    }

    /// [`admit`](Self::admit), abandoned with the error produced by `abort`
    /// if that resolves first.
    async fn admit_until<F>(&self, abort: F) -> Result<ConcurrencySlot<'_>, PoolError<E::Error>>
    where
        F: Future<Output = PoolError<E::Error>>,
    {
        tokio::select! {
            biased;
            admitted = self.admit() => admitted,
            error = abort => {
                trace!("Admission abandoned: {}", error);
                Err(error)
            }
        }
    }

    async fn dispatch(
        &self,
        slot: ConcurrencySlot<'_>,
        request: Request,
    ) -> Result<Response, PoolError<E::Error>> {
        trace!("Dispatching {} {}", request.method(), request.url());
        let result = self.downstream.execute(request).await;
        slot.release();

        match result {
            Ok(response) => {
                self.metrics.record_success();
                Ok(response)
            }
            Err(error) => {
                self.metrics.record_failure();
                Err(PoolError::Downstream(error))
            }
        }
    }
}

#[async_trait]
impl<E> Executor for PooledExecutor<E>
where
    E: Executor,
{
    type Error = PoolError<E::Error>;

    /// Same as [`PooledExecutor::execute_pooled`], so a pooled executor can
    /// stand in wherever a plain one is expected.
    async fn execute(&self, request: Request) -> Result<Response, Self::Error> {
        self.execute_pooled(request).await
    }
}

/// Resolve once a shutdown signal is received. A closed channel never
/// resolves.
async fn shutdown_signal(mut shutdown: broadcast::Receiver<()>) {
    match shutdown.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => future::pending().await,
    }
}

//! Admission control for HTTP transports.
//!
//! [`PooledExecutor`](pool::PooledExecutor) wraps any
//! [`Executor`](executor::Executor), `reqwest::Client` included, and bounds
//! both the number of requests in flight and the number of requests started
//! per second. It implements `Executor` itself, so it can replace the
//! transport it wraps without touching the calling code.

pub mod executor;
pub mod metrics;
pub mod pool;
pub mod settings;
pub mod utility;

pub use executor::Executor;
pub use pool::{PoolError, PooledExecutor};

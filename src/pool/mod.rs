//! Pooled Executor Module
//!
//! Wraps any [`Executor`](crate::executor::Executor) so that at most a
//! configured number of requests are in flight and at most a configured
//! number of requests are admitted per second. Either limit can be switched
//! off by setting it to zero (negative values mean the same thing).
//!
//! Every request first takes a concurrency slot and then, while holding it,
//! waits for a rate admission tick. The slot is returned however the request
//! ends: success, downstream error, panic, or the caller dropping the future.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use pooled_http::executor::Executor;
//! use pooled_http::pool::PooledExecutor;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(reqwest::Client::new());
//! // At most 25 requests in flight, at most 200 requests per second.
//! let pooled = PooledExecutor::new(client, 25, 200);
//!
//! let request = reqwest::Request::new(reqwest::Method::GET, "http://127.0.0.1:8080/".parse()?);
//! let response = pooled.execute(request).await?;
//! println!("{}", response.status());
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod impls;
pub mod types;

pub use errors::PoolError;
pub use types::PooledExecutor;

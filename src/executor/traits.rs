// 3rd party crates
use async_trait::async_trait;
use reqwest::{Request, Response};

/// The single capability every HTTP transport in this crate exposes.
///
/// Both the undecorated transport (`reqwest::Client`) and the decorated
/// [`PooledExecutor`](crate::pool::PooledExecutor) implement it, so code that
/// takes an `impl Executor` (or `Arc<dyn Executor<Error = _>>`) accepts
/// either one interchangeably.
///
/// # Example
///
/// ```rust,no_run
/// use pooled_http::executor::Executor;
///
/// async fn fetch<E: Executor>(executor: &E, url: &str) -> Result<u16, Box<dyn std::error::Error>> {
///     let request = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
///     let response = executor.execute(request).await?;
///     Ok(response.status().as_u16())
/// }
/// ```
#[async_trait]
pub trait Executor: Send + Sync {
    /// The failure type produced by this executor.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sends `request` and resolves once the response head is available.
    ///
    /// The response body is left unread; consuming it is the caller's job.
    async fn execute(&self, request: Request) -> Result<Response, Self::Error>;
}

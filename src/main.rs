// Standard library
use std::error::Error;
use std::sync::Arc;

// 3rd party crates
use futures::{stream::FuturesUnordered, StreamExt};
use reqwest::{Client, Method, Request, Url};
use tokio::signal::ctrl_c;
use tokio::sync::broadcast;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project imports
use pooled_http::metrics::PoolStats;
use pooled_http::settings::{ConfigManager, Settings};
use pooled_http::PooledExecutor;

/// Entry point of the pooled HTTP fetcher.
///
/// Requests every configured target through a single pooled executor, so the
/// whole run respects the configured concurrency and rate limits.
///
/// Features:
/// - Bounded number of requests in flight
/// - Evenly spaced request admission
/// - Optional admission timeout
/// - Graceful stop on Ctrl+C
#[tokio::main]
async fn main() {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    // Create ConfigManager and wrap it in Arc
    let config: Arc<ConfigManager> = Arc::new(
        ConfigManager::new()
            .await
            .expect("Failed to initialize configuration"),
    );

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse_lossy(log_level)
        .add_directive("hyper_util=error".parse().unwrap())
        .add_directive("reqwest=error".parse().unwrap())
        .add_directive("hyper=error".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    info!("Settings have been loaded from {:?}", config.config_path);

    // Create a broadcast channel for shutdown signal
    let (shutdown_tx, _) = broadcast::channel(1);
    let shutdown_tx_clone = shutdown_tx.clone();

    // Handle Ctrl+C
    tokio::spawn(async move {
        if let Err(e) = ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received shutdown signal, no further requests will be admitted...");
        let _ = shutdown_tx_clone.send(());
    });

    // Run the main application logic with shutdown signal
    if let Err(e) = run(config, shutdown_tx.subscribe()).await {
        error!("Application error: {}", e);
    }

    info!("Shutdown complete.");
}

/// Issues every configured request and reports the outcome.
///
/// Requests that have not been admitted when the shutdown signal arrives
/// (or when the admission timeout runs out) are skipped; requests already
/// sent are allowed to finish.
async fn run(
    config: Arc<ConfigManager>,
    shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), Box<dyn Error>> {
    let settings: Settings = config.get_settings().await.clone();

    if settings.targets.is_empty() {
        warn!("No targets configured, nothing to do");
        return Ok(());
    }

    let client: Client = Client::builder().timeout(settings.http.timeout()).build()?;
    let executor = PooledExecutor::new(
        Arc::new(client),
        settings.pool.max_concurrent,
        settings.pool.requests_per_second,
    );
    info!(
        "Max concurrent requests: {}, max requests per second: {}",
        settings.pool.max_concurrent, settings.pool.requests_per_second
    );

    let admission_deadline: Option<Instant> = settings
        .http
        .admission_timeout()
        .map(|timeout| Instant::now() + timeout);

    // Create a FuturesUnordered to hold our concurrent requests.
    let mut requests = FuturesUnordered::new();
    let executor_ref = &executor;

    for target in &settings.targets {
        let url: Url = Url::parse(&target.url)?;
        debug!(url = %url, "Queueing {} requests", target.repeat);

        for _ in 0..target.repeat {
            let request = Request::new(Method::GET, url.clone());
            let shutdown = shutdown_rx.resubscribe();
            let url = url.clone();

            requests.push(async move {
                let result = match admission_deadline {
                    Some(deadline) => {
                        executor_ref
                            .execute_with_deadline_and_shutdown(request, deadline, shutdown)
                            .await
                    }
                    None => executor_ref.execute_with_shutdown(request, shutdown).await,
                };
                (url, result)
            });
        }
    }

    // Collect all results, processing them as they complete.
    while let Some((url, result)) = requests.next().await {
        match result {
            Ok(response) => {
                let status = response.status();
                // The pool leaves the body to us.
                match response.bytes().await {
                    Ok(body) => info!(url = %url, "HTTP {} ({} bytes)", status, body.len()),
                    Err(e) => warn!(url = %url, "HTTP {}, failed to read body: {}", status, e),
                }
            }
            Err(e) if e.is_rejected() => {
                warn!(url = %url, "Request not sent: {}", e);
            }
            Err(e) => {
                error!(url = %url, "Request failed: {}", e);
            }
        }
    }

    executor.shutdown();

    let stats: PoolStats = executor.stats();
    info!("Run finished: {}", serde_json::to_string(&stats)?);

    Ok(())
}

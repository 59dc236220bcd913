// 3rd party crates
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Fixed-interval admission gate
#[derive(Debug)]
pub struct RateGate {
    /// Requests per second as configured; `<= 0` means unlimited
    pub(super) rate: i64,
    /// Present only when the gate is limited
    pub(super) ticker: Option<Ticker>,
}

/// Background tick source of a limited gate
#[derive(Debug)]
pub(super) struct Ticker {
    pub interval: Duration,
    /// Receiving end of the tick channel, one consumer at a time
    pub ticks: Mutex<mpsc::Receiver<Instant>>,
    pub task: JoinHandle<()>,
}

// 3rd party crates
use thiserror::Error;

/// Returned by [`RateGate::wait`](super::RateGate::wait) once the gate's
/// ticker has been stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rate gate has been shut down")]
pub struct RateGateClosed;

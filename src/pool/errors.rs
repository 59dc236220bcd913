// 3rd party crates
use thiserror::Error;

// Project imports
use crate::utility::rate_limiter::RateGateClosed;

/// Failure of a pooled request.
///
/// Downstream failures are passed through untouched: `Display` and `source`
/// are those of the wrapped error. The other variants mean the request was
/// never handed to the downstream executor.
#[derive(Debug, Error)]
pub enum PoolError<E> {
    #[error(transparent)]
    Downstream(E),

    #[error("Request cancelled before admission")]
    Cancelled,

    #[error("Admission deadline elapsed before the request was admitted")]
    DeadlineElapsed,

    #[error(transparent)]
    RateGateClosed(#[from] RateGateClosed),
}

impl<E> PoolError<E> {
    /// The downstream failure, if that is what this is.
    pub fn downstream(&self) -> Option<&E> {
        match self {
            PoolError::Downstream(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_downstream(self) -> Option<E> {
        match self {
            PoolError::Downstream(error) => Some(error),
            _ => None,
        }
    }

    /// Whether the request was turned away before reaching downstream.
    pub fn is_rejected(&self) -> bool {
        !matches!(self, PoolError::Downstream(_))
    }
}

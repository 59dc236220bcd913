// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("HTTP timeout must be greater than 0, got {0}")]
    InvalidTimeout(u64),
    #[error("Invalid target URL '{url}': {reason}")]
    InvalidTargetUrl { url: String, reason: String },
    #[error("Target '{0}' must be requested at least once")]
    InvalidRepeat(String),
}

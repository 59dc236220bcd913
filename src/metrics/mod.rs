pub mod types;

pub use types::{PoolMetrics, PoolStats};

pub mod concurrency_gate;
pub mod rate_limiter;

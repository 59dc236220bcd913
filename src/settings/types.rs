// Standard library
use std::path::PathBuf;
use std::sync::Arc;

// 3rd party crates
use serde::Deserialize;
use tokio::sync::RwLock;

// Current module imports
use super::constants::{default_log_level, default_repeat, default_timeout_secs};

#[derive(Debug, Deserialize, Clone)]
pub struct Log {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Limits applied by the pooled executor. Zero or negative disables a limit.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Pool {
    #[serde(default)]
    pub max_concurrent: i64,
    #[serde(default)]
    pub requests_per_second: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Http {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 0 waits for admission forever
    #[serde(default)]
    pub admission_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Target {
    pub url: String,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub log: Log,
    #[serde(default)]
    pub pool: Pool,
    #[serde(default)]
    pub http: Http,

    #[serde(default)]
    pub targets: Vec<Target>,
}

/// Settings that passed [`Settings::validate`]
#[derive(Debug, Clone)]
pub struct ValidatedSettings(pub(super) Settings);

/// Holds the validated application settings and where they were loaded from.
pub struct ConfigManager {
    pub settings: Arc<RwLock<Settings>>,
    pub config_path: PathBuf,
}

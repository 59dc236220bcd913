// Standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};

// 3rd party crates
use config::{Config, ConfigError, Environment, File};
use log::{error, info, LevelFilter};
use reqwest::Url;
use tokio::sync::RwLock;

// Current module imports
use super::constants::{
    default_log_level, default_timeout_secs, CONFIG_PATH_ENV, DEFAULT_CONFIG, ENV_PREFIX,
    VALID_LOG_LEVELS,
};
use super::errors::ValidationError;
use super::types::{ConfigManager, Http, Log, Settings, Target, ValidatedSettings};

impl Default for Log {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for Http {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            admission_timeout_secs: 0,
        }
    }
}

impl Http {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// `None` when requests should wait for admission indefinitely.
    pub fn admission_timeout(&self) -> Option<Duration> {
        (self.admission_timeout_secs > 0).then(|| Duration::from_secs(self.admission_timeout_secs))
    }
}

impl Target {
    pub fn validate(&self) -> Result<(), ValidationError> {
        Url::parse(&self.url).map_err(|e| ValidationError::InvalidTargetUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        if self.repeat == 0 {
            return Err(ValidationError::InvalidRepeat(self.url.clone()));
        }

        Ok(())
    }
}

impl Settings {
    pub fn get_log_level(&self) -> String {
        self.log.level.to_lowercase()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate log level
        if !VALID_LOG_LEVELS.contains(&self.get_log_level().as_str()) {
            return Err(ValidationError::InvalidLogLevel(self.log.level.clone()));
        }

        // Validate HTTP client timeout
        if self.http.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout(self.http.timeout_secs));
        }

        // Pool limits need no validation: zero and negative values disable a gate.

        for target in &self.targets {
            target.validate()?;
        }

        Ok(())
    }
}

impl ConfigManager {
    /// Creates a new `ConfigManager` instance by loading and validating the configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path: PathBuf = Self::get_config_path()?;
        Self::ensure_config_file_exists(&config_path)?;
        Self::from_path(config_path).await
    }

    /// Loads and validates the configuration at `config_path`.
    pub async fn from_path(config_path: PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let settings: Settings = Self::load_settings(&config_path)?;

        // Validate settings before proceeding
        let validated_settings = ValidatedSettings::new(settings).map_err(|e| {
            error!("Configuration validation failed: {}", e);
            e
        })?;

        let manager = ConfigManager {
            settings: Arc::new(RwLock::new(validated_settings.into_inner())),
            config_path,
        };

        manager.adjust_logging_level().await;

        Ok(manager)
    }

    /// Determines the configuration file path.
    fn get_config_path() -> Result<PathBuf, ConfigError> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV) {
            Ok(PathBuf::from(path))
        } else if let Some(config_dir) = dirs::config_dir() {
            Ok(config_dir.join("pooled-http").join("config.toml"))
        } else {
            let msg: &str = "Could not determine the configuration directory";
            error!("{}", msg);
            Err(ConfigError::Message(msg.into()))
        }
    }

    /// Ensures that the configuration file exists, creating it if necessary.
    fn ensure_config_file_exists(config_path: &Path) -> Result<(), ConfigError> {
        if !config_path.exists() {
            if let Some(parent_dir) = config_path.parent() {
                fs::create_dir_all(parent_dir).map_err(|e| {
                    let msg: String = format!("Failed to create configuration directory: {}", e);
                    error!("{}", msg);
                    ConfigError::Message(msg)
                })?;
            }
            fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                let msg: String = format!("Failed to create default configuration file: {}", e);
                error!("{}", msg);
                ConfigError::Message(msg)
            })?;
            info!("Default configuration file created at: {:?}", config_path);
        }
        Ok(())
    }

    /// Loads the settings from the configuration file and environment variables.
    fn load_settings(config_path: &Path) -> Result<Settings, ConfigError> {
        let config_file: &str = config_path.to_str().ok_or_else(|| {
            let msg: &str = "Configuration file path contains invalid UTF-8 characters";
            error!("{}", msg);
            ConfigError::Message(msg.into())
        })?;

        let settings: Config = Config::builder()
            .add_source(File::with_name(config_file))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Adjusts the logging level based on the configuration.
    async fn adjust_logging_level(&self) {
        let level: String = self.get_log_level().await;
        let level_filter: LevelFilter = match level.as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        };
        log::set_max_level(level_filter);
    }

    /// Provides a read-locked reference to the current settings.
    pub async fn get_settings(&self) -> tokio::sync::RwLockReadGuard<'_, Settings> {
        self.settings.read().await
    }

    pub async fn get_log_level(&self) -> String {
        self.settings.read().await.get_log_level()
    }
}

impl ValidatedSettings {
    pub fn new(settings: Settings) -> Result<Self, ValidationError> {
        settings.validate()?;
        Ok(ValidatedSettings(settings))
    }

    pub fn into_inner(self) -> Settings {
        self.0
    }
}

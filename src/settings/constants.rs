/// Example configuration, written out on first run
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# Admission control
[pool]
# Maximum requests in flight at once; 0 or a negative value means no limit
max_concurrent = 25
# Maximum requests started per second; 0 or a negative value means no limit
requests_per_second = 200

# Underlying HTTP client
[http]
# Per-request timeout in seconds, enforced by the HTTP client
timeout_secs = 30
# How long a request may wait for admission in seconds; 0 waits forever
admission_timeout_secs = 0

# Requests to issue
[[targets]]
url = "http://127.0.0.1:8080/"
# Number of times to request this URL
repeat = 10
"#;

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "POOLED_HTTP_CONFIG_PATH";

/// Prefix of environment variables overriding individual settings
pub const ENV_PREFIX: &str = "POOLED_HTTP";

pub const VALID_LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_timeout_secs() -> u64 {
    30
}

pub fn default_repeat() -> u32 {
    1
}

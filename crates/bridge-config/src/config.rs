//! Configuration management for the bridge.
//!
//! Values are layered: built-in defaults, then `config.json` under the base
//! directory, then `REMOTE_BRIDGE_*` environment variables. The binary applies
//! command-line overrides last.

use crate::{ConfigError, ConfigResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Database node the dashboard writes commands to.
pub const DEFAULT_LISTEN_PATH: &str = "media";
/// Commands older than this are dropped.
pub const DEFAULT_FRESHNESS_WINDOW_MS: u64 = 2_000;
/// Minimum gap between two admitted commands.
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 500;
/// Hard limit for `custom` shell commands.
pub const DEFAULT_CUSTOM_COMMAND_TIMEOUT_SECS: u64 = 10;
/// Page opened by the `browser` action.
pub const DEFAULT_BROWSER_URL: &str = "https://google.com";
/// Delay before reopening a dropped event stream.
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 1_000;
/// Silence on an open stream before it is treated as dead. The database
/// sends a keep-alive every 30 seconds.
pub const DEFAULT_STREAM_IDLE_TIMEOUT_SECS: u64 = 60;
/// Interpreter for `custom` commands, run as `<shell> -c <command>`.
pub const DEFAULT_SHELL: &str = "sh";

/// Main bridge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Realtime database URL, e.g. https://my-project-default-rtdb.firebaseio.com.
    pub database_url: Option<String>,
    /// Database path holding the command record.
    pub listen_path: String,
    /// Credentials file. Defaults to `<base_dir>/credentials.json`.
    pub credentials_file: Option<PathBuf>,
    pub freshness_window_ms: u64,
    pub min_interval_ms: u64,
    pub custom_command_timeout_secs: u64,
    pub browser_url: String,
    pub reconnect_delay_ms: u64,
    pub stream_idle_timeout_secs: u64,
    pub shell: String,
    /// Write JSONL logs under `<base_dir>/logs`.
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            database_url: None,
            listen_path: DEFAULT_LISTEN_PATH.to_string(),
            credentials_file: None,
            freshness_window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            custom_command_timeout_secs: DEFAULT_CUSTOM_COMMAND_TIMEOUT_SECS,
            browser_url: DEFAULT_BROWSER_URL.to_string(),
            reconnect_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
            stream_idle_timeout_secs: DEFAULT_STREAM_IDLE_TIMEOUT_SECS,
            shell: DEFAULT_SHELL.to_string(),
            log_to_file: true,
        }
    }
}

impl Config {
    /// Load configuration from the base directory, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        Self::load_from(&paths.config_file())
    }

    /// Like [`Config::load`] with an explicit config file path.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        let mut config = if config_path.exists() {
            debug!(path = %config_path.display(), "Loading config file");
            Self::load_from_file(config_path)?
        } else {
            debug!(path = %config_path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override values from `REMOTE_BRIDGE_*` variables supplied by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(level) = non_empty("REMOTE_BRIDGE_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(url) = non_empty("REMOTE_BRIDGE_DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(path) = non_empty("REMOTE_BRIDGE_PATH") {
            self.listen_path = path;
        }
        if let Some(file) = non_empty("REMOTE_BRIDGE_CREDENTIALS") {
            self.credentials_file = Some(PathBuf::from(file));
        }
        if let Some(ms) = non_empty("REMOTE_BRIDGE_FRESHNESS_MS").and_then(|v| v.parse().ok()) {
            self.freshness_window_ms = ms;
        }
        if let Some(ms) = non_empty("REMOTE_BRIDGE_MIN_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            self.min_interval_ms = ms;
        }
        if let Some(secs) =
            non_empty("REMOTE_BRIDGE_CUSTOM_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.custom_command_timeout_secs = secs;
        }
        if let Some(url) = non_empty("REMOTE_BRIDGE_BROWSER_URL") {
            self.browser_url = url;
        }
        if let Some(ms) =
            non_empty("REMOTE_BRIDGE_RECONNECT_DELAY_MS").and_then(|v| v.parse().ok())
        {
            self.reconnect_delay_ms = ms;
        }
        if let Some(secs) =
            non_empty("REMOTE_BRIDGE_IDLE_TIMEOUT_SECS").and_then(|v| v.parse().ok())
        {
            self.stream_idle_timeout_secs = secs;
        }
        if let Some(shell) = non_empty("REMOTE_BRIDGE_SHELL") {
            self.shell = shell.trim().to_string();
        }
        if let Some(enabled) = non_empty("REMOTE_BRIDGE_LOG_TO_FILE").and_then(|v| parse_flag(&v)) {
            self.log_to_file = enabled;
        }
    }

    /// Check the values needed to run the listener.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.database_url()?;
        if !matches!(url.scheme(), "https" | "http") {
            return Err(ConfigError::Invalid(format!(
                "database_url must be http(s), got scheme '{}'",
                url.scheme()
            )));
        }
        if self.freshness_window_ms == 0 {
            return Err(ConfigError::Invalid(
                "freshness_window_ms must be greater than zero".to_string(),
            ));
        }
        if self.custom_command_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "custom_command_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.stream_idle_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "stream_idle_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.shell.trim().is_empty() {
            return Err(ConfigError::Invalid("shell must not be empty".to_string()));
        }
        Ok(())
    }

    /// Parsed database URL.
    pub fn database_url(&self) -> ConfigResult<Url> {
        let raw = self.database_url.as_deref().ok_or_else(|| {
            ConfigError::Invalid(
                "database_url is not set (config.json, REMOTE_BRIDGE_DATABASE_URL or --database-url)"
                    .to_string(),
            )
        })?;
        Url::parse(raw).map_err(ConfigError::from)
    }

    /// Listen path without leading or trailing slashes.
    pub fn normalized_listen_path(&self) -> &str {
        self.listen_path.trim_matches('/')
    }

    /// Credentials file, resolved against the base directory default.
    pub fn credentials_path(&self, paths: &Paths) -> PathBuf {
        self.credentials_file
            .clone()
            .unwrap_or_else(|| paths.credentials_file())
    }

    pub fn freshness_window(&self) -> Duration {
        Duration::from_millis(self.freshness_window_ms)
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn custom_command_timeout(&self) -> Duration {
        Duration::from_secs(self.custom_command_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn stream_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_idle_timeout_secs)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

//! Configuration, paths, credentials and logging setup for the remote bridge.

mod config;
mod credentials;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_BROWSER_URL, DEFAULT_CUSTOM_COMMAND_TIMEOUT_SECS, DEFAULT_FRESHNESS_WINDOW_MS,
    DEFAULT_LISTEN_PATH, DEFAULT_LOG_LEVEL, DEFAULT_MIN_INTERVAL_MS, DEFAULT_RECONNECT_DELAY_MS,
    DEFAULT_SHELL, DEFAULT_STREAM_IDLE_TIMEOUT_SECS,
};
pub use credentials::Credentials;
pub use error::{ConfigError, ConfigResult};
pub use logging::init_logging;
pub use paths::Paths;

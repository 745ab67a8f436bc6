//! # Observability
//!
//! Logging setup for the remote bridge.
//!
//! Binaries call [`init_with_config`] once at startup and use the standard
//! `tracing` macros everywhere else. Two sinks are installed:
//!
//! - a compact, human-readable stderr layer for the operator console
//! - an optional append-only JSONL file (one object per event) that can be
//!   followed with `tail -f ... | jq`
//!
//! ```rust,ignore
//! observability::init_with_config(observability::LogConfig {
//!     service_name: "remote-bridge".into(),
//!     default_level: "debug".into(),
//!     log_path: Some(paths.log_file()),
//!     ..Default::default()
//! });
//! ```

mod file_writer;
mod json_layer;

use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file_writer::{FileWriterFactory, JsonlFileWriter};
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service, written into every JSONL line.
    pub service_name: String,

    /// Default filter (e.g. "info", "remote_actions=debug").
    /// `RUST_LOG` takes precedence when set.
    pub default_level: String,

    /// JSONL log file. `None` disables file output.
    pub log_path: Option<PathBuf>,

    /// Emit compact logs on stderr.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize logging with a custom configuration.
///
/// If the JSONL file cannot be opened, file output is skipped and a warning
/// is emitted through the stderr layer instead.
pub fn init_with_config(config: LogConfig) {
    let file_result = config.log_path.as_deref().map(JsonlFileWriter::open);

    let (json_layer, file_error) = match file_result {
        Some(Ok(writer)) => (
            Some(
                JsonLayer::new(config.service_name.clone(), FileWriterFactory::new(writer))
                    .with_filter(env_filter(&config.default_level)),
            ),
            None,
        ),
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    let stderr_layer = if config.also_stderr {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .compact()
                .with_writer(std::io::stderr)
                .with_filter(env_filter(&config.default_level)),
        )
    } else {
        None
    };

    // try_init so tests and repeated calls don't panic on a second install
    let installed = tracing_subscriber::registry()
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if !installed {
        return;
    }

    match (&config.log_path, file_error) {
        (Some(path), Some(e)) => tracing::warn!(
            log_path = %path.display(),
            error = %e,
            "failed to open log file, continuing with stderr only"
        ),
        (Some(path), None) => tracing::debug!(
            log_path = %path.display(),
            service = %config.service_name,
            "observability initialized"
        ),
        _ => {}
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert!(config.also_stderr);
    }
}

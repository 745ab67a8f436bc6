//! Logging initialization for the bridge binaries.

use crate::{Config, Paths};

/// Initialize logging for `service_name` from the loaded config.
///
/// Level comes from `RUST_LOG` or `level`. When `config.log_to_file` is set,
/// JSONL lines are appended to `<base_dir>/logs/bridge.jsonl`.
pub fn init_logging(service_name: &str, level: &str, config: &Config, paths: &Paths) {
    let log_path = config.log_to_file.then(|| paths.log_file());

    observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path,
        also_stderr: true,
    });
}

use std::time::Duration;
use thiserror::Error;

/// Error taxonomy for host actions and custom shell commands.
///
/// None of these ever leave the dispatcher: they are logged and dropped.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{program} is not installed or not on PATH")]
    ToolNotFound { program: String },

    #[error("failed to start {program}: {message}")]
    SpawnFailed { program: String, message: String },

    #[error("{command} exited with code {exit_code:?}: {stderr}")]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("command timed out after {timeout:?}: {command}")]
    Timeout { command: String, timeout: Duration },
}

impl ActionError {
    /// Stable machine-readable error code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ToolNotFound { .. } => "tool_not_found",
            Self::SpawnFailed { .. } => "spawn_failed",
            Self::CommandFailed { .. } => "command_failed",
            Self::Timeout { .. } => "timeout",
        }
    }

    /// Map an io error from spawning `program`.
    pub(crate) fn from_spawn(program: &str, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::ToolNotFound {
                program: program.to_string(),
            }
        } else {
            Self::SpawnFailed {
                program: program.to_string(),
                message: err.to_string(),
            }
        }
    }
}

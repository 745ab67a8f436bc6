//! Execution of `custom` shell commands under a hard timeout.

use crate::ActionError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Captured result of a finished shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs a literal command line.
///
/// A non-zero exit is still `Ok`: the caller decides how to report it.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, command: &str, limit: Duration) -> Result<ShellOutput, ActionError>;
}

/// Runs commands through `<shell> -c`, `sh` unless configured otherwise.
#[derive(Debug, Clone)]
pub struct SystemShell {
    shell: String,
}

impl Default for SystemShell {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemShell {
    pub fn new() -> Self {
        Self::with_shell("sh")
    }

    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }
}

#[async_trait]
impl ShellRunner for SystemShell {
    async fn run(&self, command: &str, limit: Duration) -> Result<ShellOutput, ActionError> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        // dropping the output future on timeout must not leave the child running
        cmd.kill_on_drop(true);

        let output = match timeout(limit, cmd.output()).await {
            Err(_) => {
                return Err(ActionError::Timeout {
                    command: command.to_string(),
                    timeout: limit,
                });
            }
            Ok(Err(err)) => return Err(ActionError::from_spawn(&self.shell, err)),
            Ok(Ok(output)) => output,
        };

        Ok(ShellOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

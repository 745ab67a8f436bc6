//! Host implementations of the capability traits.
//!
//! Each action maps to one or more external programs from a per-platform
//! table:
//! - **Linux**: `playerctl`, `pactl`, GNOME tooling, `xdg-open`
//! - **macOS**: `osascript`, `pmset`, `screencapture`, `open`
//!
//! Quick tools are awaited; launchers are spawned detached so an application
//! that keeps running never holds up the next command.

#[cfg(not(target_os = "macos"))]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(not(target_os = "macos"))]
use linux as platform;

#[cfg(target_os = "macos")]
use macos as platform;

use crate::action::Action;
use crate::capabilities::{MediaController, SystemActions, VolumeController};
use crate::ActionError;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// How a host program is run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Wait for exit and check the status.
    Wait,
    /// Spawn and forget.
    Detach,
}

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostCommand {
    pub program: &'static str,
    pub args: Vec<String>,
    pub mode: LaunchMode,
}

impl HostCommand {
    pub(crate) fn wait(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
            mode: LaunchMode::Wait,
        }
    }

    pub(crate) fn detach(program: &'static str, args: &[&str]) -> Self {
        Self {
            program,
            args: args.iter().map(|a| a.to_string()).collect(),
            mode: LaunchMode::Detach,
        }
    }

    fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.to_string()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    async fn execute(&self) -> Result<(), ActionError> {
        let mut cmd = Command::new(self.program);
        cmd.args(&self.args);
        cmd.stdin(Stdio::null());

        match self.mode {
            LaunchMode::Detach => {
                cmd.stdout(Stdio::null());
                cmd.stderr(Stdio::null());
                let child = cmd
                    .spawn()
                    .map_err(|e| ActionError::from_spawn(self.program, e))?;
                debug!(command = %self.display(), pid = ?child.id(), "Launched");
                Ok(())
            }
            LaunchMode::Wait => {
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
                let output = cmd
                    .output()
                    .await
                    .map_err(|e| ActionError::from_spawn(self.program, e))?;

                if output.status.success() {
                    debug!(command = %self.display(), "Host command succeeded");
                    Ok(())
                } else {
                    Err(ActionError::CommandFailed {
                        command: self.display(),
                        exit_code: output.status.code(),
                        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    })
                }
            }
        }
    }
}

/// Host command table for `action` on this platform.
pub fn commands_for(action: Action, browser_url: &str) -> Vec<HostCommand> {
    platform::commands(action, browser_url)
}

/// Capability provider backed by the platform command table.
#[derive(Debug, Clone)]
pub struct HostActions {
    browser_url: String,
}

impl HostActions {
    pub fn new(browser_url: impl Into<String>) -> Self {
        Self {
            browser_url: browser_url.into(),
        }
    }

    /// Run every command for `action`; succeed if any of them does.
    async fn run(&self, action: Action) -> Result<(), ActionError> {
        let mut last_error = None;

        for command in commands_for(action, &self.browser_url) {
            match command.execute().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!(action = %action, command = %command.display(), error = %e, "Host command failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaController for HostActions {
    async fn play_pause(&self) -> Result<(), ActionError> {
        self.run(Action::Play).await
    }

    async fn next_track(&self) -> Result<(), ActionError> {
        self.run(Action::Next).await
    }

    async fn previous_track(&self) -> Result<(), ActionError> {
        self.run(Action::Previous).await
    }
}

#[async_trait]
impl VolumeController for HostActions {
    async fn volume_up(&self) -> Result<(), ActionError> {
        self.run(Action::VolumeUp).await
    }

    async fn volume_down(&self) -> Result<(), ActionError> {
        self.run(Action::VolumeDown).await
    }

    async fn toggle_mute(&self) -> Result<(), ActionError> {
        self.run(Action::Mute).await
    }
}

#[async_trait]
impl SystemActions for HostActions {
    async fn lock_screen(&self) -> Result<(), ActionError> {
        self.run(Action::Lock).await
    }

    async fn screenshot(&self) -> Result<(), ActionError> {
        self.run(Action::Screenshot).await
    }

    async fn open_browser(&self) -> Result<(), ActionError> {
        self.run(Action::Browser).await
    }

    async fn open_spotify(&self) -> Result<(), ActionError> {
        self.run(Action::Spotify).await
    }

    async fn open_terminal(&self) -> Result<(), ActionError> {
        self.run(Action::Terminal).await
    }
}

/// Availability of one host program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolStatus {
    pub program: &'static str,
    pub path: Option<PathBuf>,
    /// Actions that use this program.
    pub actions: Vec<Action>,
}

impl ToolStatus {
    pub fn is_available(&self) -> bool {
        self.path.is_some()
    }
}

/// Look up every program in the platform table on `PATH`.
pub fn check_tools(browser_url: &str) -> Vec<ToolStatus> {
    let mut by_program: BTreeMap<&'static str, Vec<Action>> = BTreeMap::new();
    for action in Action::ALL {
        for command in commands_for(action, browser_url) {
            let actions = by_program.entry(command.program).or_default();
            if !actions.contains(&action) {
                actions.push(action);
            }
        }
    }

    by_program
        .into_iter()
        .map(|(program, actions)| ToolStatus {
            program,
            path: which::which(program).ok(),
            actions,
        })
        .collect()
}

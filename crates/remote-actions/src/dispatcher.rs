//! Dispatch of admitted records.

use crate::action::Action;
use crate::record::{Command, CommandRecord};
use crate::registry::ActionRegistry;
use crate::shell::{ShellOutput, ShellRunner};
use crate::ActionError;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What happened to a dispatched record. Used for logs and tests only;
/// nothing is reported back to the command source.
#[derive(Debug)]
pub enum DispatchOutcome {
    Invoked(Action),
    ActionFailed(Action, ActionError),
    Custom(ShellOutput),
    CustomFailed(ActionError),
    Unrecognized(Option<String>),
}

/// Routes admitted records to the registry or the shell runner.
#[derive(Clone)]
pub struct Dispatcher {
    registry: ActionRegistry,
    shell: Arc<dyn ShellRunner>,
    custom_timeout: Duration,
}

impl Dispatcher {
    pub fn new(
        registry: ActionRegistry,
        shell: Arc<dyn ShellRunner>,
        custom_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            shell,
            custom_timeout,
        }
    }

    /// Execute `record`. Never fails; every error is logged here.
    pub async fn dispatch(&self, record: &CommandRecord) -> DispatchOutcome {
        match record.command() {
            Command::Registered(action) => match self.registry.invoke(action).await {
                Ok(()) => {
                    info!(action = %action, "Action executed");
                    DispatchOutcome::Invoked(action)
                }
                Err(e) => {
                    warn!(action = %action, code = e.code(), error = %e, "Action failed");
                    DispatchOutcome::ActionFailed(action, e)
                }
            },
            Command::Custom(command) => self.run_custom(&command).await,
            Command::Unrecognized(name) => {
                warn!(action = name.as_deref().unwrap_or("<none>"), "Unknown action");
                DispatchOutcome::Unrecognized(name)
            }
        }
    }

    async fn run_custom(&self, command: &str) -> DispatchOutcome {
        match self.shell.run(command, self.custom_timeout).await {
            Ok(output) => {
                if output.success() {
                    info!(command = %command, output = %output.stdout, "Custom command finished");
                } else {
                    warn!(
                        command = %command,
                        exit_code = ?output.exit_code,
                        stdout = %output.stdout,
                        stderr = %output.stderr,
                        "Custom command exited unsuccessfully"
                    );
                }
                DispatchOutcome::Custom(output)
            }
            Err(e) => {
                warn!(command = %command, code = e.code(), error = %e, "Custom command failed");
                DispatchOutcome::CustomFailed(e)
            }
        }
    }
}

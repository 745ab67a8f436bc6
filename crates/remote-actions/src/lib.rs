//! # Remote Actions
//!
//! Turns command records from the remote dashboard into host actions.
//!
//! ```text
//! value -> CommandRecord -> AdmissionFilter -> Dispatcher -> ActionRegistry -> host
//!                                 |                 |
//!                              (drop)          custom: ShellRunner
//! ```
//!
//! The admission filter drops stale records and anything arriving within the
//! minimum interval of the last admitted one. The dispatcher never fails:
//! host and shell errors are logged and swallowed, and nothing is reported
//! back to the command source.

pub mod action;
pub mod admission;
pub mod capabilities;
pub mod dispatcher;
mod error;
pub mod host;
pub mod pipeline;
pub mod record;
pub mod registry;
pub mod shell;

#[cfg(test)]
mod tests;

pub use action::{Action, CUSTOM_ACTION};
pub use admission::{Admission, AdmissionFilter, RejectReason};
pub use capabilities::{MediaController, SystemActions, VolumeController};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::ActionError;
pub use host::{check_tools, HostActions, ToolStatus};
pub use pipeline::{CommandPipeline, PipelineOutcome};
pub use record::{Command, CommandRecord};
pub use registry::ActionRegistry;
pub use shell::{ShellOutput, ShellRunner, SystemShell};

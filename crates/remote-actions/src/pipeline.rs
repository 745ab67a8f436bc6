//! Admission followed by dispatch, the entry point for every notification.

use crate::admission::{Admission, AdmissionFilter, RejectReason};
use crate::dispatcher::{DispatchOutcome, Dispatcher};
use crate::record::CommandRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// Result of handling one delivered value.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// The value was not a command record.
    Malformed(String),
    Rejected(RejectReason),
    Dispatched(DispatchOutcome),
}

/// Single-owner pipeline: the listener holds it and feeds values in order.
pub struct CommandPipeline {
    filter: AdmissionFilter,
    dispatcher: Dispatcher,
}

impl CommandPipeline {
    pub fn new(filter: AdmissionFilter, dispatcher: Dispatcher) -> Self {
        Self { filter, dispatcher }
    }

    /// Handle a raw JSON value delivered by the listener.
    pub async fn handle_value(&mut self, value: &Value, now: DateTime<Utc>) -> PipelineOutcome {
        match CommandRecord::from_value(value) {
            Ok(record) => self.handle(&record, now).await,
            Err(e) => {
                debug!(error = %e, "Ignoring value that is not a command record");
                PipelineOutcome::Malformed(e.to_string())
            }
        }
    }

    /// Admit and, if accepted, dispatch `record`. Runs to completion.
    pub async fn handle(&mut self, record: &CommandRecord, now: DateTime<Utc>) -> PipelineOutcome {
        match self.filter.evaluate(record, now) {
            Admission::Accepted => {
                debug!(action = ?record.action, timestamp = ?record.timestamp, "Command admitted");
                PipelineOutcome::Dispatched(self.dispatcher.dispatch(record).await)
            }
            Admission::Rejected(reason) => {
                debug!(action = ?record.action, reason = %reason, "Command dropped");
                PipelineOutcome::Rejected(reason)
            }
        }
    }
}

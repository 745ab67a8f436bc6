//! Listener loop: change stream in, command pipeline out.

use crate::error::{BridgeError, BridgeResult};
use crate::rtdb::{EventStream, RtdbClient, RtdbEvent};
use crate::snapshot::Snapshot;
use chrono::Utc;
use remote_actions::{CommandPipeline, PipelineOutcome};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Feeds every change of one database node through the command pipeline.
///
/// Values are handled one at a time: the next event is not read until the
/// previous command has been admitted or dropped and, if admitted, executed.
pub struct Listener {
    client: RtdbClient,
    path: String,
    pipeline: CommandPipeline,
    reconnect_delay: Duration,
}

impl Listener {
    pub fn new(
        client: RtdbClient,
        path: impl Into<String>,
        pipeline: CommandPipeline,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            client,
            path: path.into(),
            pipeline,
            reconnect_delay,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Open the change stream. Callers treat a first failure as fatal.
    pub async fn connect(&self) -> BridgeResult<EventStream> {
        self.client.stream(&self.path).await
    }

    /// Run forever on `stream`, reopening it whenever it drops.
    ///
    /// Returns only on errors a reconnect cannot fix (cancelled or revoked
    /// access).
    pub async fn run(&mut self, mut stream: EventStream) -> BridgeResult<()> {
        info!(path = %self.path, "Listening for remote commands");

        loop {
            match self.run_session(stream).await {
                Ok(()) => warn!(path = %self.path, "Change stream closed by server"),
                Err(e) if e.is_fatal() => {
                    error!(path = %self.path, error = %e, "Change stream ended");
                    return Err(e);
                }
                Err(e) => warn!(path = %self.path, error = %e, "Change stream interrupted"),
            }

            stream = self.reconnect().await;
        }
    }

    /// Reopen the stream after a fixed delay, retrying until it succeeds.
    async fn reconnect(&self) -> EventStream {
        loop {
            tokio::time::sleep(self.reconnect_delay).await;
            match self.connect().await {
                Ok(stream) => {
                    info!(path = %self.path, "Change stream reopened");
                    return stream;
                }
                Err(e) => warn!(
                    path = %self.path,
                    error = %e,
                    delay_ms = self.reconnect_delay.as_millis() as u64,
                    "Reconnect failed, retrying"
                ),
            }
        }
    }

    /// Consume one stream until the server closes it.
    ///
    /// The snapshot starts empty for every session; the server opens each
    /// stream with a `put` of the whole node.
    pub async fn run_session(&mut self, mut stream: EventStream) -> BridgeResult<()> {
        let mut snapshot = Snapshot::new();

        while let Some(event) = stream.next_event().await? {
            match event {
                RtdbEvent::Put { path, data } => {
                    snapshot.put(&path, data);
                    self.deliver(&snapshot).await;
                }
                RtdbEvent::Patch { path, data } => {
                    snapshot.patch(&path, data);
                    self.deliver(&snapshot).await;
                }
                RtdbEvent::KeepAlive => debug!("keep-alive"),
                RtdbEvent::Cancel(reason) => return Err(BridgeError::Cancelled(reason)),
                RtdbEvent::AuthRevoked => return Err(BridgeError::AuthRevoked),
                RtdbEvent::Other(name) => debug!(event = %name, "Ignoring stream event"),
            }
        }

        Ok(())
    }

    async fn deliver(&mut self, snapshot: &Snapshot) {
        let Some(record) = snapshot.record() else {
            debug!("Node is empty or not an object");
            return;
        };

        match self.pipeline.handle_value(record, Utc::now()).await {
            PipelineOutcome::Malformed(reason) => {
                warn!(reason = %reason, "Ignoring malformed command record")
            }
            PipelineOutcome::Rejected(_) | PipelineOutcome::Dispatched(_) => {}
        }
    }
}

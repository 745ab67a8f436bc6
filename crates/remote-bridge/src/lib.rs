//! Remote Bridge: runs host actions written to a realtime database node.
//!
//! A phone or web dashboard writes `{action, timestamp, command?}` to one
//! database path. The bridge keeps a change stream open on that path and
//! hands every new value to the command pipeline from `remote-actions`.
//!
//! # Architecture
//!
//! ```text
//! RTDB node --SSE--> EventStream -> Snapshot -> CommandPipeline -> host
//!     ^                                                  |
//!     |___________ (nothing reported back) ______________|
//! ```
//!
//! Stale and back-to-back commands are dropped by admission. A dropped
//! stream is reopened after a fixed delay; cancelled or revoked access ends
//! the process.

pub mod error;
pub mod listener;
pub mod rtdb;
pub mod snapshot;
pub mod sse;

#[cfg(test)]
mod tests;

pub use error::{BridgeError, BridgeResult};
pub use listener::Listener;
pub use rtdb::{EventStream, RtdbClient, RtdbEvent};
pub use snapshot::Snapshot;
pub use sse::{SseEvent, SseParser};

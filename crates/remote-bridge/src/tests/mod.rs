//! Listener tests against a local fake database.
//!
//! - `harness.rs` - canned HTTP/SSE server and recording host actions
//! - `stream.rs`  - change stream to host action, end to end
//! - `reconnect.rs` - dropped streams, fatal stream events, writes

pub(crate) mod harness;
mod reconnect;

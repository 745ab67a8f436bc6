//! Behavioral tests for admission and dispatch.
//!
//! - `harness.rs`   - recording fakes for the capability traits and the shell
//! - `admission.rs` - freshness and interval rules
//! - `dispatch.rs`  - registry routing, custom commands, unknown actions
//! - `scenarios.rs` - end-to-end pipeline scenarios

//! Command admission: freshness and de-duplication.
//!
//! The transport replays the latest stored record on every (re)subscribe and
//! may deliver bursts of duplicates. Two checks decide whether a record runs:
//!
//! 1. **Freshness**: the record's producer timestamp must be younger than the
//!    freshness window relative to local wall-clock time.
//! 2. **Interval**: at least `min_interval` must have passed since the last
//!    admitted record, whatever its action. This is a global limiter.
//!
//! Rejections are normal operation, not faults.

use crate::record::CommandRecord;
use chrono::{DateTime, TimeDelta, Utc};
use std::fmt;
use std::time::Duration;

/// Why a record was not admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingTimestamp,
    /// Record age reached the freshness window.
    Stale { age_ms: i64 },
    /// Too little time since the last admitted record.
    TooSoon { since_last_ms: i64 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTimestamp => f.write_str("missing timestamp"),
            Self::Stale { age_ms } => write!(f, "stale ({age_ms}ms old)"),
            Self::TooSoon { since_last_ms } => {
                write!(f, "too soon ({since_last_ms}ms after previous command)")
            }
        }
    }
}

/// Result of evaluating one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected(RejectReason),
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// Stateful admission filter. One instance per listener.
#[derive(Debug, Clone)]
pub struct AdmissionFilter {
    freshness_window: TimeDelta,
    min_interval: TimeDelta,
    /// Wall-clock time of the last admitted record; `None` until the first.
    last_accepted_at: Option<DateTime<Utc>>,
}

impl AdmissionFilter {
    pub fn new(freshness_window: Duration, min_interval: Duration) -> Self {
        Self {
            freshness_window: to_delta(freshness_window),
            min_interval: to_delta(min_interval),
            last_accepted_at: None,
        }
    }

    /// Decide whether `record` may run at `now`.
    ///
    /// On acceptance the last-accepted time is updated before returning, so
    /// the caller dispatches with the interval window already closed.
    pub fn evaluate(&mut self, record: &CommandRecord, now: DateTime<Utc>) -> Admission {
        let Some(timestamp_ms) = record.timestamp else {
            return Admission::Rejected(RejectReason::MissingTimestamp);
        };

        // A producer clock ahead of ours gives a negative age, which is fresh.
        let age_ms = now.timestamp_millis().saturating_sub(timestamp_ms);
        if age_ms >= self.freshness_window.num_milliseconds() {
            return Admission::Rejected(RejectReason::Stale { age_ms });
        }

        if let Some(last) = self.last_accepted_at {
            let since_last = now.signed_duration_since(last);
            if since_last < self.min_interval {
                return Admission::Rejected(RejectReason::TooSoon {
                    since_last_ms: since_last.num_milliseconds(),
                });
            }
        }

        self.last_accepted_at = Some(now);
        Admission::Accepted
    }

    /// Boolean form of [`AdmissionFilter::evaluate`].
    pub fn admit(&mut self, record: &CommandRecord, now: DateTime<Utc>) -> bool {
        self.evaluate(record, now).is_accepted()
    }

    pub fn last_accepted_at(&self) -> Option<DateTime<Utc>> {
        self.last_accepted_at
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}

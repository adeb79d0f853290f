//! Stability wait for snapshots written by an external sync client.
//!
//! A cloud-drive client may still be downloading a snapshot when we look at
//! it. We treat a file as settled once two size samples taken a short delay
//! apart agree and are non-zero. The wait is a bounded retry loop; time and
//! sleeping go through [`Clock`] so tests run instantly.

use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::sync::file::file_size;
use crate::sync::types::{SyncError, SyncResult};

/// Source of wall-clock time and of sleeping.
pub trait Clock: Send + Sync {
    /// Current local time, used for snapshot and backup names.
    fn now(&self) -> NaiveDateTime;

    /// Suspend the caller for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Timestamp fragment used in snapshot and backup file names.
#[must_use]
pub fn format_stamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d_%H%M%S").to_string()
}

/// Retry budget for the stability wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityPolicy {
    /// Delay between the two size samples of one attempt.
    pub sample_delay_ms: u64,
    /// Delay between failed attempts.
    pub retry_delay_ms: u64,
    /// Attempts before giving up.
    pub max_attempts: u32,
}

impl Default for StabilityPolicy {
    fn default() -> Self {
        Self {
            sample_delay_ms: 500,
            retry_delay_ms: 2_000,
            max_attempts: 30,
        }
    }
}

impl StabilityPolicy {
    /// Delay between the two samples.
    #[must_use]
    pub const fn sample_delay(&self) -> Duration {
        Duration::from_millis(self.sample_delay_ms)
    }

    /// Delay between attempts.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Wait until `path` has a stable, non-zero size.
///
/// A missing file counts as "not yet stable". Returns the settled size.
///
/// # Errors
///
/// Returns [`SyncError::StabilityTimeout`] once `policy.max_attempts`
/// attempts have failed.
pub fn wait_for_stable(
    path: &Path,
    policy: &StabilityPolicy,
    clock: &dyn Clock,
) -> SyncResult<u64> {
    for attempt in 1..=policy.max_attempts {
        let first = file_size(path);
        clock.sleep(policy.sample_delay());
        let second = file_size(path);

        match (first, second) {
            (Some(a), Some(b)) if a == b && a > 0 => {
                debug!(path = %path.display(), size = a, attempt, "Snapshot is stable");
                return Ok(a);
            }
            _ => trace!(?first, ?second, attempt, "Snapshot not stable yet"),
        }

        if attempt < policy.max_attempts {
            clock.sleep(policy.retry_delay());
        }
    }

    Err(SyncError::StabilityTimeout {
        path: path.to_path_buf(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
pub(crate) use testing::ManualClock;

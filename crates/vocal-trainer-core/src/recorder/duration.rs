//! Bounded wait for a clip's duration.

use std::{future::Future, time::Duration};

use tokio::time::{sleep, timeout};
use tracing::debug;

/// Default number of probes.
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 10;
/// Default pause between probes.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_millis(300);

/// How long to keep asking for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    /// Total probes, at least one is always made.
    pub attempts: u32,
    /// Pause between consecutive probes.
    pub interval: Duration,
}

impl ProbePolicy {
    /// Time a full run spends asleep, rounded up to one interval per probe.
    pub fn deadline(&self) -> Duration {
        self.interval.saturating_mul(self.attempts.max(1))
    }
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_PROBE_ATTEMPTS,
            interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

/// Result of waiting for a duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DurationOutcome {
    /// Finite, non-negative length in seconds.
    Known(f64),
    /// Not available within the policy's bound.
    Unknown,
}

impl DurationOutcome {
    /// User-facing line for the duration display.
    pub fn display(&self) -> String {
        match *self {
            DurationOutcome::Known(secs) => format!("Recording duration: {}", format_elapsed(secs)),
            DurationOutcome::Unknown => "Recording ready!".to_string(),
        }
    }
}

/// Call `probe` until it yields a finite, non-negative value, at most
/// `policy.attempts` times with `policy.interval` in between, and never
/// longer than `policy.deadline()` plus one interval.
pub async fn wait_for_duration<F>(mut probe: F, policy: ProbePolicy) -> DurationOutcome
where
    F: FnMut() -> Option<f64>,
{
    let attempts = policy.attempts.max(1);

    let polling = async {
        for attempt in 1..=attempts {
            if let Some(secs) = probe().filter(|s| s.is_finite() && *s >= 0.0) {
                debug!(attempt, secs, "Duration available");
                return DurationOutcome::Known(secs);
            }
            if attempt < attempts {
                sleep(policy.interval).await;
            }
        }
        DurationOutcome::Unknown
    };

    bounded(polling, policy.deadline() + policy.interval).await
}

async fn bounded(
    future: impl Future<Output = DurationOutcome>,
    limit: Duration,
) -> DurationOutcome {
    match timeout(limit, future).await {
        Ok(outcome) => outcome,
        Err(_) => {
            debug!(limit = ?limit, "Duration wait timed out");
            DurationOutcome::Unknown
        }
    }
}

/// `m:ss`, seconds truncated.
pub fn format_elapsed(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

use crate::{DurationOutcome, ProbePolicy, format_elapsed, wait_for_duration};

use std::time::Duration;

const FAST: ProbePolicy = ProbePolicy {
    attempts: 5,
    interval: Duration::from_millis(1),
};

/// WHAT: A duration that appears after a few probes is reported
/// WHY: Metadata becomes available some time after the clip is built
#[tokio::test]
async fn given_duration_available_on_third_probe_when_waiting_then_known() {
    // Given: A probe that fails twice
    let mut calls = 0;
    let probe = || {
        calls += 1;
        if calls < 3 { None } else { Some(65.4) }
    };

    // When: Waiting
    let outcome = wait_for_duration(probe, FAST).await;

    // Then: Known after exactly three probes
    assert_eq!(outcome, DurationOutcome::Known(65.4));
    assert_eq!(calls, 3);
}

/// WHAT: A duration that never appears yields Unknown after the budget
/// WHY: The flow must degrade, not hang
#[tokio::test]
async fn given_duration_never_available_when_waiting_then_unknown_after_budget() {
    // Given: A probe that always fails
    let mut calls = 0;
    let probe = || {
        calls += 1;
        None
    };

    // When: Waiting
    let outcome = wait_for_duration(probe, FAST).await;

    // Then: Unknown after exactly the attempt budget
    assert_eq!(outcome, DurationOutcome::Unknown);
    assert_eq!(calls, FAST.attempts);
    assert_eq!(outcome.display(), "Recording ready!");
}

/// WHAT: Infinite, NaN and negative values are not accepted as durations
/// WHY: Only finite, non-negative durations are ever displayed
#[tokio::test]
async fn given_invalid_values_when_waiting_then_skipped_until_valid() {
    // Given: A probe yielding NaN, infinity, a negative value, then 2.0
    let mut values = vec![Some(2.0), Some(-1.0), Some(f64::INFINITY), Some(f64::NAN)];
    let probe = || values.pop().flatten();

    // When: Waiting
    let outcome = wait_for_duration(probe, FAST).await;

    // Then: The first valid value wins
    assert_eq!(outcome, DurationOutcome::Known(2.0));
}

/// WHAT: A zero-attempt policy still probes once
/// WHY: An already-available duration must not be reported unknown
#[tokio::test]
async fn given_zero_attempts_when_waiting_then_probes_once() {
    // Given: A policy with no attempts and an immediately available value
    let policy = ProbePolicy {
        attempts: 0,
        interval: Duration::from_millis(1),
    };

    // When: Waiting
    let outcome = wait_for_duration(|| Some(1.0), policy).await;

    // Then: Known
    assert_eq!(outcome, DurationOutcome::Known(1.0));
}

/// WHAT: Elapsed time renders as m:ss with truncated seconds
/// WHY: Matches the duration display format
#[test]
fn given_seconds_when_formatting_then_minutes_and_padded_seconds() {
    assert_eq!(format_elapsed(0.0), "0:00");
    assert_eq!(format_elapsed(9.99), "0:09");
    assert_eq!(format_elapsed(65.9), "1:05");
    assert_eq!(format_elapsed(600.0), "10:00");
    assert_eq!(format_elapsed(f64::NAN), "0:00");
    assert_eq!(
        DurationOutcome::Known(65.9).display(),
        "Recording duration: 1:05"
    );
}

//! Retry Wrapper Integration Tests
//!
//! Attempt counting, backoff bounds, and last-error propagation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use issue_triage::core::{with_retry, RetryPolicy};

/// Millisecond delays so the tests stay fast
fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        initial_delay_ms: 1,
        max_delay_ms: 2,
        backoff_multiplier: 2.0,
    }
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let attempts = AtomicUsize::new(0);
    let attempts_ref = &attempts;

    let result = with_retry(&fast_policy(3), "test", move || async move {
        attempts_ref.fetch_add(1, Ordering::SeqCst);
        Ok(7)
    })
    .await;

    assert_eq!(result.unwrap(), 7);
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failure_recovers() {
    let attempts = AtomicUsize::new(0);
    let attempts_ref = &attempts;

    let result = with_retry(&fast_policy(3), "test", move || async move {
        let n = attempts_ref.fetch_add(1, Ordering::SeqCst);
        if n < 2 {
            anyhow::bail!("transient failure {}", n);
        }
        Ok("recovered")
    })
    .await;

    assert_eq!(result.unwrap(), "recovered");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exhaustion_returns_last_error() {
    let attempts = AtomicUsize::new(0);
    let attempts_ref = &attempts;

    let result: anyhow::Result<()> = with_retry(&fast_policy(3), "test", move || async move {
        let n = attempts_ref.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("failure {}", n);
    })
    .await;

    // Bounded attempt count, last failure re-raised
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert_eq!(result.unwrap_err().to_string(), "failure 2");
}

#[tokio::test]
async fn test_single_attempt_policy_never_retries() {
    let attempts = AtomicUsize::new(0);
    let attempts_ref = &attempts;

    let result: anyhow::Result<()> = with_retry(&fast_policy(1), "test", move || async move {
        attempts_ref.fetch_add(1, Ordering::SeqCst);
        anyhow::bail!("hard failure");
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_backoff_is_monotonic_and_capped() {
    let policy = RetryPolicy {
        max_attempts: 10,
        initial_delay_ms: 100,
        max_delay_ms: 1000,
        backoff_multiplier: 2.0,
    };

    let mut last = Duration::ZERO;
    for attempt in 1..=8 {
        let delay = policy.delay_for_attempt(attempt);
        assert!(delay >= last, "delay decreased at attempt {}", attempt);
        assert!(delay <= Duration::from_millis(1000));
        last = delay;
    }

    assert_eq!(policy.delay_for_attempt(8), Duration::from_millis(1000));
}

//! Retry loop tests. All run on a paused clock, so backoff waits are instant
//! but still observable through `tokio::time::Instant`.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::*;

#[derive(Debug, PartialEq)]
enum OpError {
    Transient,
    Fatal,
}

impl fmt::Display for OpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpError::Transient => write!(f, "transient"),
            OpError::Fatal => write!(f, "fatal"),
        }
    }
}

fn always_fail() -> impl FnMut() -> std::future::Ready<Result<(), OpError>> {
    || std::future::ready(Err(OpError::Transient))
}

#[tokio::test(start_paused = true)]
async fn first_try_success_does_not_sleep() {
    let timer = HarmonicTimer::default();
    let start = tokio::time::Instant::now();
    let outcome = retry_with_backoff(
        &timer,
        &BackoffPolicy::default(),
        RetryOptions::<OpError>::new(),
        || async { Ok::<_, OpError>(42) },
    )
    .await
    .unwrap();
    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.total_delay, Duration::ZERO);
    assert!(outcome.delays_used.is_empty());
    assert_eq!(outcome.result, Some(42));
    assert!(outcome.error.is_none());
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_transient_failures() {
    let timer = HarmonicTimer::default();
    let calls = AtomicU32::new(0);
    let outcome = retry_with_backoff(
        &timer,
        &BackoffPolicy::default(),
        RetryOptions::new(),
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(OpError::Transient)
                } else {
                    Ok("done")
                }
            }
        },
    )
    .await
    .unwrap();
    assert!(outcome.succeeded());
    assert_eq!(outcome.attempts, 3);
    assert_eq!(outcome.delays_used, vec![timer.delay_for(1), timer.delay_for(2)]);
    assert_eq!(outcome.total_delay, timer.delay_for(1) + timer.delay_for(2));
    assert_eq!(outcome.result, Some("done"));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_reports_last_error_and_delays() {
    let timer = HarmonicTimer::default();
    let policy = BackoffPolicy::default();
    let outcome = retry_with_backoff(&timer, &policy, RetryOptions::new(), always_fail())
        .await
        .unwrap();
    assert_eq!(outcome.status, RetryStatus::Exhausted);
    assert!(!outcome.succeeded());
    assert_eq!(outcome.attempts, 5);
    assert_eq!(outcome.error, Some(OpError::Transient));
    // No wait after the last attempt.
    let expected: Vec<Duration> = [1, 2, 4, 8].iter().map(|&m| timer.delay_for(m)).collect();
    assert_eq!(outcome.delays_used, expected);
}

#[tokio::test(start_paused = true)]
async fn identical_parameters_give_identical_delays() {
    let timer = HarmonicTimer::default();
    let policy = BackoffPolicy {
        max_attempts: 6,
        start_multiple: 2,
        growth_factor: 1.7,
        max_multiple: Some(9),
    };
    let a = retry_with_backoff(&timer, &policy, RetryOptions::new(), always_fail())
        .await
        .unwrap();
    let b = retry_with_backoff(&timer, &policy, RetryOptions::new(), always_fail())
        .await
        .unwrap();
    assert_eq!(a.delays_used, b.delays_used);
    assert_eq!(a.delays_used.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn non_retryable_error_propagates_immediately() {
    let timer = HarmonicTimer::default();
    let calls = AtomicU32::new(0);
    let only_transient = |e: &OpError| *e == OpError::Transient;
    let result = retry_with_backoff(
        &timer,
        &BackoffPolicy::default(),
        RetryOptions::new().retry_if(&only_transient),
        || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err::<(), _>(OpError::Transient)
                } else {
                    Err(OpError::Fatal)
                }
            }
        },
    )
    .await;
    match result {
        Err(RetryError::NonRetryable { attempt, error }) => {
            assert_eq!(attempt, 2);
            assert_eq!(error, OpError::Fatal);
        }
        other => panic!("expected NonRetryable, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn on_retry_sees_each_failed_attempt() {
    let timer = HarmonicTimer::default();
    let policy = BackoffPolicy {
        max_attempts: 3,
        ..BackoffPolicy::default()
    };
    let mut seen = Vec::new();
    let mut record = |attempt: u32, _e: &OpError, delay: Duration| seen.push((attempt, delay));
    let outcome = retry_with_backoff(
        &timer,
        &policy,
        RetryOptions::new().on_retry(&mut record),
        always_fail(),
    )
    .await
    .unwrap();
    assert_eq!(outcome.attempts, 3);
    assert_eq!(
        seen,
        vec![(1, timer.delay_for(1)), (2, timer.delay_for(2))]
    );
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_backoff() {
    let timer = HarmonicTimer::default();
    let token = CancellationToken::new();
    let trigger = token.clone();
    let mut cancel_on_second = move |attempt: u32, _e: &OpError, _d: Duration| {
        if attempt == 2 {
            trigger.cancel();
        }
    };
    let outcome = retry_with_backoff(
        &timer,
        &BackoffPolicy::default(),
        RetryOptions::new()
            .on_retry(&mut cancel_on_second)
            .cancel_on(&token),
        always_fail(),
    )
    .await
    .unwrap();
    assert_eq!(outcome.status, RetryStatus::Cancelled);
    assert!(outcome.is_cancelled());
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.delays_used, vec![timer.delay_for(1)]);
    assert_eq!(outcome.error, Some(OpError::Transient));
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_runs_nothing() {
    let timer = HarmonicTimer::default();
    let token = CancellationToken::new();
    token.cancel();
    let calls = AtomicU32::new(0);
    let outcome = retry_with_backoff(
        &timer,
        &BackoffPolicy::default(),
        RetryOptions::new().cancel_on(&token),
        || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, OpError>(()) }
        },
    )
    .await
    .unwrap();
    assert!(outcome.is_cancelled());
    assert_eq!(outcome.attempts, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn invalid_policy_is_an_error() {
    let policy = BackoffPolicy {
        max_attempts: 0,
        ..BackoffPolicy::default()
    };
    let result = retry_with_backoff(
        &HarmonicTimer::default(),
        &policy,
        RetryOptions::new(),
        always_fail(),
    )
    .await;
    assert!(matches!(result, Err(RetryError::InvalidPolicy(_))));
}

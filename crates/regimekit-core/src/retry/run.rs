//! Retry loop: run an async operation until success, exhaustion, a
//! non-retryable error, or cancellation.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::RetryError;
use super::harmonic::{cancellable_sleep, HarmonicTimer};
use super::outcome::{RetryOutcome, RetryStatus};
use super::policy::{BackoffPolicy, RetryDecision};

/// Optional hooks for a retry session. The default retries every error,
/// has no callback and cannot be cancelled.
pub struct RetryOptions<'a, E> {
    retryable: Option<&'a (dyn Fn(&E) -> bool + Sync)>,
    on_retry: Option<&'a mut (dyn FnMut(u32, &E, Duration) + Send)>,
    cancel: Option<&'a CancellationToken>,
}

impl<E> Default for RetryOptions<'_, E> {
    fn default() -> Self {
        Self {
            retryable: None,
            on_retry: None,
            cancel: None,
        }
    }
}

impl<'a, E> RetryOptions<'a, E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only errors for which `predicate` returns true are retried; any other
    /// error ends the session with [`RetryError::NonRetryable`].
    pub fn retry_if(mut self, predicate: &'a (dyn Fn(&E) -> bool + Sync)) -> Self {
        self.retryable = Some(predicate);
        self
    }

    /// Called with `(attempt, error, delay)` before each wait.
    pub fn on_retry(mut self, callback: &'a mut (dyn FnMut(u32, &E, Duration) + Send)) -> Self {
        self.on_retry = Some(callback);
        self
    }

    pub fn cancel_on(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_retryable(&self, error: &E) -> bool {
        self.retryable.map_or(true, |p| p(error))
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_cancelled)
    }
}

/// Runs `op` until it succeeds or the backoff schedule says to stop.
///
/// Attempts run strictly one after another. After a retryable failure that
/// is not the last attempt, waits the scheduled delay for that attempt; the
/// wait is interrupted by the cancellation token, which ends the session with
/// [`RetryStatus::Cancelled`].
pub async fn retry_with_backoff<T, E, F, Fut>(
    timer: &HarmonicTimer,
    policy: &BackoffPolicy,
    mut options: RetryOptions<'_, E>,
    mut op: F,
) -> Result<RetryOutcome<T, E>, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let schedule = policy.schedule(timer)?;
    tracing::debug!(
        max_attempts = policy.max_attempts,
        total_possible_delay_secs = schedule.total_delay().as_secs_f64(),
        "retry session started"
    );

    let mut delays_used = Vec::new();
    let mut last_error = None;
    let mut attempt = 0u32;

    loop {
        if options.is_cancelled() {
            tracing::info!(attempts = attempt, "retry session cancelled");
            return Ok(RetryOutcome::finish(
                RetryStatus::Cancelled,
                attempt,
                None,
                last_error,
                delays_used,
            ));
        }

        attempt += 1;
        match op().await {
            Ok(value) => {
                let outcome =
                    RetryOutcome::finish(RetryStatus::Succeeded, attempt, Some(value), None, delays_used);
                tracing::debug!(
                    attempt,
                    total_delay_secs = outcome.total_delay.as_secs_f64(),
                    "retry session succeeded"
                );
                return Ok(outcome);
            }
            Err(e) => {
                if !options.is_retryable(&e) {
                    tracing::warn!(attempt, error = %e, "non-retryable failure");
                    return Err(RetryError::NonRetryable { attempt, error: e });
                }
                match schedule.decide(attempt) {
                    RetryDecision::GiveUp => {
                        tracing::warn!(attempts = attempt, error = %e, "retry attempts exhausted");
                        return Ok(RetryOutcome::finish(
                            RetryStatus::Exhausted,
                            attempt,
                            None,
                            Some(e),
                            delays_used,
                        ));
                    }
                    RetryDecision::RetryAfter(delay) => {
                        tracing::warn!(
                            attempt,
                            error = %e,
                            next_delay_ms = delay.as_millis() as u64,
                            "attempt failed; backing off"
                        );
                        if let Some(callback) = options.on_retry.as_deref_mut() {
                            callback(attempt, &e, delay);
                        }
                        last_error = Some(e);
                        if !cancellable_sleep(delay, options.cancel).await {
                            tracing::info!(attempts = attempt, "retry session cancelled during backoff");
                            return Ok(RetryOutcome::finish(
                                RetryStatus::Cancelled,
                                attempt,
                                None,
                                last_error,
                                delays_used,
                            ));
                        }
                        delays_used.push(delay);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;

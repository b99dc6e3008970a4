//! Structured result of a retry session.

use std::time::Duration;

/// How a retry session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStatus {
    Succeeded,
    /// Every attempt failed with a retryable error.
    Exhausted,
    /// The cancellation token fired before the session finished.
    Cancelled,
}

/// Outcome of [`retry_with_backoff`](super::retry_with_backoff).
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub status: RetryStatus,
    /// Attempts actually executed.
    pub attempts: u32,
    /// Sum of `delays_used`.
    pub total_delay: Duration,
    pub result: Option<T>,
    /// Last operation error, if any attempt failed.
    pub error: Option<E>,
    /// Delays fully waited, in order.
    pub delays_used: Vec<Duration>,
}

impl<T, E> RetryOutcome<T, E> {
    pub fn succeeded(&self) -> bool {
        self.status == RetryStatus::Succeeded
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == RetryStatus::Cancelled
    }

    pub(super) fn finish(
        status: RetryStatus,
        attempts: u32,
        result: Option<T>,
        error: Option<E>,
        delays_used: Vec<Duration>,
    ) -> Self {
        Self {
            status,
            attempts,
            total_delay: delays_used
                .iter()
                .fold(Duration::ZERO, |acc, d| acc.saturating_add(*d)),
            result,
            error,
            delays_used,
        }
    }
}

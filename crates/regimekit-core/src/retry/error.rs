//! Errors raised by a retry session (as opposed to failures of the operation).

/// Backoff or timer parameters that cannot produce a schedule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid backoff policy: {0}")]
pub struct InvalidPolicy(pub String);

/// A retry session that could not run to a normal outcome.
///
/// Exhaustion and cancellation are not errors; they are reported through
/// [`RetryOutcome`](super::RetryOutcome).
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E> {
    #[error(transparent)]
    InvalidPolicy(#[from] InvalidPolicy),
    /// The operation failed with an error the retryable predicate rejected.
    /// Remaining attempts were not consumed.
    #[error("non-retryable failure on attempt {attempt}: {error}")]
    NonRetryable { attempt: u32, error: E },
}

//! Harmonic retry and backoff.
//!
//! Delays are integer multiples of a fixed base period (`1 / base_frequency_hz`).
//! A backoff schedule is computed once per retry session from the policy, so
//! the same policy always yields the same delays. The only suspension point in
//! the crate is the wait between attempts, which a `CancellationToken` can
//! interrupt.

mod error;
mod harmonic;
mod outcome;
mod policy;
mod run;

pub use error::{InvalidPolicy, RetryError};
pub use harmonic::{
    cancellable_sleep, HarmonicMultiple, HarmonicTimer, HarmonicTiming, DEFAULT_BASE_FREQUENCY_HZ,
};
pub use outcome::{RetryOutcome, RetryStatus};
pub use policy::{BackoffPolicy, BackoffSchedule, BackoffStep, RetryDecision, DEFAULT_MAX_MULTIPLE};
pub use run::{retry_with_backoff, RetryOptions};

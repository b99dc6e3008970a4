//! Job control: per-job cancellation tokens.
//!
//! When the orchestrator runs a job it registers the job id and receives a
//! cancellation token. Anyone holding the `JobControl` (a signal handler, an
//! outer service) can request abort; the retry loop observes the token between
//! attempts and the job stops with a cancelled status.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tokio_util::sync::CancellationToken;

/// Job identifier.
pub type JobId = u64;

/// Shared registry of job id -> cancellation token.
#[derive(Debug, Default)]
pub struct JobControl {
    jobs: RwLock<HashMap<JobId, CancellationToken>>,
}

impl JobControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a running job; returns the token to pass into the job.
    /// Re-registering an id replaces (and does not cancel) the previous token.
    pub fn register(&self, job_id: JobId) -> CancellationToken {
        self.register_with(job_id, CancellationToken::new())
    }

    /// Register a job with a token the caller already owns, e.g. a child of a
    /// process-wide shutdown token.
    pub fn register_with(&self, job_id: JobId, token: CancellationToken) -> CancellationToken {
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id, token.clone());
        token
    }

    /// Unregister a job (call when the job finishes, success or failure).
    pub fn unregister(&self, job_id: JobId) {
        self.jobs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&job_id);
    }

    /// Request abort for a job. Returns false if the job is not registered.
    pub fn request_abort(&self, job_id: JobId) -> bool {
        match self
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&job_id)
        {
            Some(token) => {
                tracing::info!(job_id, "abort requested");
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel every registered job.
    pub fn abort_all(&self) {
        for token in self
            .jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
        {
            token.cancel();
        }
    }

    pub fn is_registered(&self, job_id: JobId) -> bool {
        self.jobs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&job_id)
    }
}

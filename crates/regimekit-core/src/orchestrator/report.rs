//! Job report returned by [`Orchestrator::run_job`](super::Orchestrator::run_job).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::batch::BatchPlan;
use crate::classifier::TaskClassification;
use crate::control::JobId;

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Every batch succeeded.
    Complete,
    /// All batches ran; at least one exhausted its retries.
    CompleteWithFailures,
    /// Stopped early by the job's cancellation token.
    Cancelled,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Complete => "complete",
            JobStatus::CompleteWithFailures => "complete_with_failures",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A batch that did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// 1-based batch number.
    pub batch: usize,
    pub attempts: u32,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobReport<V> {
    pub job_id: JobId,
    pub status: JobStatus,
    pub classification: TaskClassification,
    pub batch_plan: BatchPlan,
    pub failures: Vec<BatchFailure>,
    /// Batch results read back from the cache, in batch order.
    pub results: Vec<V>,
}

impl<V> JobReport<V> {
    pub fn failed_batches(&self) -> usize {
        self.failures.len()
    }
}

//! Job orchestration: classify, plan, retry each batch, cache the results.
//!
//! An [`Orchestrator`] owns every component a job needs and no state is
//! global; share one behind an `Arc` to run jobs from several tasks against
//! the same cache.

mod report;
mod request;

use std::fmt;
use std::future::Future;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::batch::{BatchPlan, BatchPlanner, PlannerStatistics};
use crate::cache::RegimeCache;
use crate::classifier::TaskClassifier;
use crate::config::KernelConfig;
use crate::control::{JobControl, JobId};
use crate::retry::{
    retry_with_backoff, BackoffPolicy, HarmonicTimer, RetryError, RetryOptions, RetryStatus,
};

pub use report::{BatchFailure, JobReport, JobStatus};
pub use request::JobRequest;

/// Cache key of batch `batch` (1-based) of job `job_id`.
pub fn batch_key(job_id: JobId, batch: usize) -> String {
    format!("{job_id}/batch_{batch}")
}

pub struct Orchestrator<V> {
    classifier: TaskClassifier,
    planner: Mutex<BatchPlanner>,
    timer: HarmonicTimer,
    policy: BackoffPolicy,
    cache: Arc<RegimeCache<V>>,
    control: JobControl,
    next_job_id: AtomicU64,
}

impl<V: Clone> Orchestrator<V> {
    /// Build every component from `config`, with a fresh cache.
    pub fn new(config: &KernelConfig) -> Result<Self> {
        let cache = Arc::new(RegimeCache::new(
            config.cache.max_size,
            config.cache.fifo_ttl(),
        ));
        Self::with_cache(config, cache)
    }

    /// Like [`new`](Self::new) but writes into an existing cache.
    pub fn with_cache(config: &KernelConfig, cache: Arc<RegimeCache<V>>) -> Result<Self> {
        config.validate()?;
        let timer = HarmonicTimer::new(config.retry.base_frequency_hz)?;
        let policy = config.retry.policy();
        policy.validate()?;
        let planner = BatchPlanner::new(config.batch.min_batch, config.batch.max_batch)?;
        let classifier = TaskClassifier::new(
            config.classifier.confidence_weights(),
            config.classifier.distribution(),
        );
        Ok(Self {
            classifier,
            planner: Mutex::new(planner),
            timer,
            policy,
            cache,
            control: JobControl::new(),
            next_job_id: AtomicU64::new(1),
        })
    }

    pub fn classifier(&self) -> &TaskClassifier {
        &self.classifier
    }

    pub fn timer(&self) -> &HarmonicTimer {
        &self.timer
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    pub fn cache(&self) -> &Arc<RegimeCache<V>> {
        &self.cache
    }

    /// Registry of running jobs; abort a job by id through it.
    pub fn control(&self) -> &JobControl {
        &self.control
    }

    /// Plan `total_items` with the configured bounds and record it.
    pub fn plan(&self, total_items: usize) -> BatchPlan {
        self.planner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .plan(total_items)
    }

    pub fn planner_statistics(&self) -> PlannerStatistics {
        self.planner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .statistics()
    }

    pub fn reset_planner_statistics(&self) {
        self.planner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reset_statistics();
    }

    /// Reserve a job id ahead of [`run_job`](Self::run_job), so the job can be
    /// aborted through [`control`](Self::control) while it runs.
    pub fn allocate_job_id(&self) -> JobId {
        self.next_job_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Run one job.
    ///
    /// `unit(batch_index, item_range)` processes one batch; `batch_index` is
    /// 0-based and `item_range` is the half-open slice of item indices. Each
    /// call is retried under the configured backoff policy. Successful results
    /// are cached under [`batch_key`] with the job's regime. A batch that
    /// exhausts its attempts is recorded in `failures` and the job moves on.
    /// Cancelling `cancel` (directly, or through [`control`](Self::control)
    /// under the job's id) stops the job before the next attempt. The job runs
    /// under `request.job_id` when set; ids must be unique among running jobs.
    ///
    /// Errors only when the backoff policy cannot produce a schedule.
    pub async fn run_job<F, Fut, E>(
        &self,
        request: &JobRequest,
        cancel: CancellationToken,
        mut unit: F,
    ) -> Result<JobReport<V>>
    where
        F: FnMut(usize, Range<usize>) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: fmt::Display,
    {
        let job_id = request
            .job_id
            .unwrap_or_else(|| self.allocate_job_id());
        self.control.register_with(job_id, cancel.clone());
        let report = self.execute(job_id, request, &cancel, &mut unit).await;
        self.control.unregister(job_id);
        report
    }

    async fn execute<F, Fut, E>(
        &self,
        job_id: JobId,
        request: &JobRequest,
        cancel: &CancellationToken,
        unit: &mut F,
    ) -> Result<JobReport<V>>
    where
        F: FnMut(usize, Range<usize>) -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: fmt::Display,
    {
        let classification = self.classifier.classify(
            &request.task_name,
            &request.keywords,
            &request.description,
        );
        let regime = classification.regime;
        let batch_plan = self.plan(request.total_items);
        tracing::info!(
            job_id,
            task = %request.task_name,
            %regime,
            total_items = batch_plan.total_items,
            batch_size = batch_plan.optimal_batch_size,
            num_batches = batch_plan.num_batches,
            "job started"
        );

        let mut status = JobStatus::Complete;
        let mut failures = Vec::new();
        let mut stored = Vec::new();

        for (index, range) in batch_plan.batches().enumerate() {
            let batch = index + 1;
            if cancel.is_cancelled() {
                status = JobStatus::Cancelled;
                break;
            }

            let options = RetryOptions::new().cancel_on(cancel);
            let session =
                retry_with_backoff(&self.timer, &self.policy, options, || {
                    unit(index, range.clone())
                })
                .await;

            match session {
                Ok(outcome) => match outcome.status {
                    RetryStatus::Succeeded => {
                        if let Some(value) = outcome.result {
                            let key = batch_key(job_id, batch);
                            self.cache.set(&key, value, regime);
                            stored.push(key);
                        }
                        tracing::debug!(job_id, batch, attempts = outcome.attempts, "batch done");
                    }
                    RetryStatus::Exhausted => {
                        let error = outcome
                            .error
                            .map(|e| e.to_string())
                            .unwrap_or_default();
                        tracing::warn!(job_id, batch, attempts = outcome.attempts, %error, "batch failed");
                        failures.push(BatchFailure {
                            batch,
                            attempts: outcome.attempts,
                            error,
                        });
                    }
                    RetryStatus::Cancelled => {
                        status = JobStatus::Cancelled;
                        break;
                    }
                },
                Err(RetryError::InvalidPolicy(e)) => return Err(e.into()),
                Err(RetryError::NonRetryable { attempt, error }) => {
                    failures.push(BatchFailure {
                        batch,
                        attempts: attempt,
                        error: error.to_string(),
                    });
                }
            }
        }

        if status == JobStatus::Complete && !failures.is_empty() {
            status = JobStatus::CompleteWithFailures;
        }

        let results: Vec<V> = stored.iter().filter_map(|key| self.cache.get(key)).collect();
        if results.len() < stored.len() {
            tracing::debug!(
                job_id,
                missing = stored.len() - results.len(),
                "some batch results were evicted before read-back"
            );
        }
        tracing::info!(job_id, %status, failures = failures.len(), "job finished");

        Ok(JobReport {
            job_id,
            status,
            classification,
            batch_plan,
            failures,
            results,
        })
    }
}

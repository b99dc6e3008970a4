use serde::{Deserialize, Serialize};

use crate::control::JobId;

/// Input for one orchestrated job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub task_name: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub description: String,
    pub total_items: usize,
    /// Id to run under, e.g. from
    /// [`Orchestrator::allocate_job_id`](super::Orchestrator::allocate_job_id).
    /// A fresh id is allocated when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<JobId>,
}

impl JobRequest {
    pub fn new(task_name: impl Into<String>, total_items: usize) -> Self {
        Self {
            task_name: task_name.into(),
            total_items,
            ..Self::default()
        }
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn job_id(mut self, job_id: JobId) -> Self {
        self.job_id = Some(job_id);
        self
    }
}

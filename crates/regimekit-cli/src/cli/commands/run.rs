//! `regimekit run` – run a simulated job through the orchestrator.

use std::collections::HashMap;
use std::ops::Range;

use anyhow::Result;
use regimekit_core::config::KernelConfig;
use regimekit_core::{JobRequest, JobStatus, Orchestrator};
use tokio_util::sync::CancellationToken;

/// Arguments of `regimekit run`.
#[derive(Debug, Clone)]
pub struct JobArgs {
    pub task: String,
    pub items: usize,
    pub keywords: Vec<String>,
    pub description: String,
    pub fail_first: u32,
}

pub async fn run_job(cfg: &KernelConfig, args: JobArgs) -> Result<()> {
    let orchestrator: Orchestrator<usize> = Orchestrator::new(cfg)?;
    let job_id = orchestrator.allocate_job_id();
    let request = JobRequest::new(args.task, args.items)
        .keywords(args.keywords)
        .description(args.description)
        .job_id(job_id);
    tracing::info!(job_id, items = request.total_items, "starting simulated job");

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling job");
                cancel.cancel();
            }
        })
    };

    let fail_first = args.fail_first;
    let mut attempts: HashMap<usize, u32> = HashMap::new();
    let report = orchestrator
        .run_job(&request, cancel, |index, range: Range<usize>| {
            let n = attempts.entry(index).or_default();
            *n += 1;
            let attempt = *n;
            async move {
                if attempt <= fail_first {
                    Err(format!(
                        "simulated failure of batch {} (attempt {attempt})",
                        index + 1
                    ))
                } else {
                    Ok(range.len())
                }
            }
        })
        .await;
    ctrl_c.abort();
    let report = report?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    if report.status != JobStatus::Complete {
        tracing::warn!(job_id = report.job_id, status = %report.status, "job did not complete cleanly");
    }
    Ok(())
}

//! Integration test: config file → orchestrator → retry → cache read-back.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::work::{flaky_sum, Attempts};
use regimekit_core::cache::RegimeCache;
use regimekit_core::config;
use regimekit_core::orchestrator::batch_key;
use regimekit_core::{JobRequest, JobStatus, Orchestrator, Regime};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn expected_sum(n: usize) -> u64 {
    (0..n as u64).sum()
}

#[tokio::test(start_paused = true)]
async fn job_from_config_file_completes_after_retries() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
            [batch]
            min_batch = 4
            max_batch = 32

            [retry]
            base_frequency_hz = 10.0
            max_attempts = 3
            start_multiple = 1
            growth_factor = 2.0
        "#,
    )
    .unwrap();
    let cfg = config::load_from_path(&path).unwrap();
    let orch: Orchestrator<u64> = Orchestrator::new(&cfg).unwrap();

    let attempts = Attempts::default();
    let start = tokio::time::Instant::now();
    let report = orch
        .run_job(
            &JobRequest::new("tune_throughput", 200),
            CancellationToken::new(),
            flaky_sum(attempts.clone(), 2),
        )
        .await
        .unwrap();

    assert_eq!(report.status, JobStatus::Complete);
    assert_eq!(report.classification.regime, Regime::Optimization);
    // sqrt(200) * log2(200) ~ 108.1, clamped to 32
    assert_eq!(report.batch_plan.optimal_batch_size, 32);
    assert_eq!(report.batch_plan.num_batches, 7);
    assert_eq!(report.results.iter().sum::<u64>(), expected_sum(200));
    assert_eq!(attempts.total(), 7 * 3);

    // Each batch waited 0.1s + 0.2s on the paused clock.
    let waited = start.elapsed();
    assert!(waited >= Duration::from_millis(7 * 300));
    assert!(waited < Duration::from_millis(7 * 300 + 50));
}

#[tokio::test(start_paused = true)]
async fn jobs_share_one_cache_partitioned_by_regime() {
    let cfg = config::KernelConfig::default();
    let cache = Arc::new(RegimeCache::new(16, Duration::from_secs(60)));
    let orch: Orchestrator<u64> = Orchestrator::with_cache(&cfg, Arc::clone(&cache)).unwrap();

    let stable = orch
        .run_job(
            &JobRequest::new("release_validation", 50),
            CancellationToken::new(),
            flaky_sum(Attempts::default(), 0),
        )
        .await
        .unwrap();
    let explore = orch
        .run_job(
            &JobRequest::new("prototype_new_parser", 50),
            CancellationToken::new(),
            flaky_sum(Attempts::default(), 0),
        )
        .await
        .unwrap();

    assert_eq!(stable.classification.regime, Regime::Stabilization);
    assert_eq!(explore.classification.regime, Regime::Exploration);
    assert_eq!(cache.len_in(Regime::Stabilization), stable.batch_plan.num_batches);
    assert_eq!(cache.len_in(Regime::Exploration), explore.batch_plan.num_batches);

    // Exploration results expire; stabilization results do not.
    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(cache.get(&batch_key(explore.job_id, 1)).is_none());
    assert!(cache.get(&batch_key(stable.job_id, 1)).is_some());
}

#[tokio::test(start_paused = true)]
async fn cancelling_mid_job_keeps_completed_batches() {
    let cfg = config::KernelConfig::default();
    let orch: Orchestrator<u64> = Orchestrator::new(&cfg).unwrap();
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let attempts = Attempts::default();
    let mut unit = flaky_sum(attempts.clone(), 0);

    let report = orch
        .run_job(
            &JobRequest::new("production_rollout", 1000),
            cancel,
            move |index, range| {
                if index == 1 {
                    trigger.cancel();
                }
                unit(index, range)
            },
        )
        .await
        .unwrap();

    // The attempt already in flight finishes; the next batch never starts.
    assert_eq!(report.status, JobStatus::Cancelled);
    assert_eq!(report.batch_plan.num_batches, 4);
    assert_eq!(report.results.len(), 2);
    assert_eq!(attempts.get(2), 0);
    assert!(!orch.control().is_registered(report.job_id));
}

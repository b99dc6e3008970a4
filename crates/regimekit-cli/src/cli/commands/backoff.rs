//! `regimekit backoff` – print the delay table of a retry policy.

use anyhow::Result;
use regimekit_core::config::KernelConfig;
use regimekit_core::retry::HarmonicTimer;

pub fn run_backoff(
    cfg: &KernelConfig,
    attempts: Option<u32>,
    start_multiple: Option<u32>,
    growth_factor: Option<f64>,
    max_multiple: Option<u32>,
) -> Result<()> {
    let timer = HarmonicTimer::new(cfg.retry.base_frequency_hz)?;
    let mut policy = cfg.retry.policy();
    if let Some(n) = attempts {
        policy.max_attempts = n;
    }
    if let Some(m) = start_multiple {
        policy.start_multiple = m;
    }
    if let Some(g) = growth_factor {
        policy.growth_factor = g;
    }
    if max_multiple.is_some() {
        policy.max_multiple = max_multiple;
    }
    let schedule = policy.schedule(&timer)?;

    println!(
        "base frequency {:.3} Hz, base period {:.4}s",
        timer.base_frequency_hz(),
        timer.base_period().as_secs_f64()
    );
    println!("{:<8} {:<9} {:<10} {}", "ATTEMPT", "MULTIPLE", "DELAY", "NOTE");
    for (i, step) in schedule.steps().iter().enumerate() {
        println!(
            "{:<8} {:<9} {:<10} {}",
            i + 1,
            step.multiple,
            format!("{:.4}s", step.delay.as_secs_f64()),
            step.description
        );
    }
    println!("total {:.4}s", schedule.total_delay().as_secs_f64());
    Ok(())
}

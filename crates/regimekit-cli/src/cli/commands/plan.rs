//! `regimekit plan` – print the batch plan for N items.

use anyhow::Result;
use regimekit_core::batch::calculate_batch_plan;
use regimekit_core::config::KernelConfig;

pub fn run_plan(
    cfg: &KernelConfig,
    total_items: usize,
    min_batch: Option<usize>,
    max_batch: Option<usize>,
) -> Result<()> {
    let min = min_batch.unwrap_or(cfg.batch.min_batch);
    let max = max_batch.unwrap_or(cfg.batch.max_batch);
    let plan = calculate_batch_plan(total_items, min, max)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

//! Batch plan type and the closed-form sizing formula.

use std::ops::Range;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_BATCH: usize = 10;
pub const DEFAULT_MAX_BATCH: usize = 5000;

/// Caller-violated preconditions of [`calculate_batch_plan`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("invalid batch bounds: {0}")]
    InvalidArgument(String),
}

/// How a job's items are split into batches. Read-only once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPlan {
    pub total_items: usize,
    pub optimal_batch_size: usize,
    pub num_batches: usize,
    pub space_bound: f64,
    pub efficiency_multiplier: f64,
    pub space_reduction_percent: f64,
}

impl BatchPlan {
    /// True for the small-input plan (`total_items <= min_batch`), which claims
    /// no amplification.
    pub fn is_degenerate(&self) -> bool {
        self.efficiency_multiplier == 1.0 && self.space_reduction_percent == 0.0
    }

    /// Half-open item ranges, one per batch. All batches have
    /// `optimal_batch_size` items except possibly the last.
    pub fn batches(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let size = self.optimal_batch_size.max(1);
        (0..self.num_batches).map(move |i| {
            let start = (i * size).min(self.total_items);
            let end = (start + size).min(self.total_items);
            start..end
        })
    }
}

/// Compute a batch plan for `total_items`, clamping the batch size to
/// `[min_batch, max_batch]`.
///
/// Requires `0 < min_batch < max_batch`.
pub fn calculate_batch_plan(
    total_items: usize,
    min_batch: usize,
    max_batch: usize,
) -> Result<BatchPlan, BatchError> {
    validate_bounds(min_batch, max_batch)?;
    Ok(compute(total_items, min_batch, max_batch))
}

pub(super) fn validate_bounds(min_batch: usize, max_batch: usize) -> Result<(), BatchError> {
    if min_batch == 0 {
        return Err(BatchError::InvalidArgument(
            "min_batch must be positive".to_string(),
        ));
    }
    if min_batch >= max_batch {
        return Err(BatchError::InvalidArgument(format!(
            "min_batch ({min_batch}) must be less than max_batch ({max_batch})"
        )));
    }
    Ok(())
}

/// Sizing formula proper. Bounds must already be validated.
pub(super) fn compute(total_items: usize, min_batch: usize, max_batch: usize) -> BatchPlan {
    if total_items <= min_batch {
        return BatchPlan {
            total_items,
            optimal_batch_size: total_items,
            num_batches: usize::from(total_items > 0),
            space_bound: total_items as f64,
            efficiency_multiplier: 1.0,
            space_reduction_percent: 0.0,
        };
    }

    let t = total_items as f64;
    let space_bound = t.sqrt() * t.log2();
    let efficiency_multiplier = t / space_bound;
    let space_reduction_percent = (t - space_bound) / t * 100.0;

    // Truncate, then clamp.
    let optimal_batch_size = (space_bound as usize).clamp(min_batch, max_batch);
    let num_batches = total_items.div_ceil(optimal_batch_size);

    tracing::debug!(
        total_items,
        optimal_batch_size,
        num_batches,
        space_bound,
        efficiency = efficiency_multiplier,
        space_reduction_percent,
        "batch plan calculated"
    );

    BatchPlan {
        total_items,
        optimal_batch_size,
        num_batches,
        space_bound,
        efficiency_multiplier,
        space_reduction_percent,
    }
}

//! Batch sizing with a `sqrt(n) × log2(n)` space bound.
//!
//! Given a number of work items, computes how many items to process per
//! batch and how many batches that takes, and splits the index space into
//! half-open ranges for the orchestrator to iterate.

mod plan;
mod planner;

pub use plan::{calculate_batch_plan, BatchError, BatchPlan, DEFAULT_MAX_BATCH, DEFAULT_MIN_BATCH};
pub use planner::{BatchPlanner, PlannerStatistics, RECENT_PLANS};

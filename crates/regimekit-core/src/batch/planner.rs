//! Batch planner with fixed bounds and running statistics over computed plans.

use std::collections::VecDeque;

use serde::Serialize;

use super::plan::{compute, validate_bounds, BatchError, BatchPlan};

/// Aggregate over the plans a [`BatchPlanner`] has produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerStatistics {
    /// Mean efficiency multiplier, rounded to 2 decimals.
    pub average_efficiency: f64,
    /// Best efficiency multiplier, rounded to 2 decimals.
    pub max_efficiency: f64,
    pub total_plans: usize,
    pub total_items_processed: usize,
}

/// Number of recent plans kept by a [`BatchPlanner`].
pub const RECENT_PLANS: usize = 64;

/// Holds validated `[min_batch, max_batch]` bounds, running totals over every
/// non-degenerate plan it computed, and the last [`RECENT_PLANS`] of them.
#[derive(Debug, Clone)]
pub struct BatchPlanner {
    min_batch: usize,
    max_batch: usize,
    recent: VecDeque<BatchPlan>,
    total_plans: usize,
    total_items: usize,
    efficiency_sum: f64,
    max_efficiency: f64,
}

impl BatchPlanner {
    pub fn new(min_batch: usize, max_batch: usize) -> Result<Self, BatchError> {
        validate_bounds(min_batch, max_batch)?;
        Ok(Self {
            min_batch,
            max_batch,
            recent: VecDeque::with_capacity(RECENT_PLANS),
            total_plans: 0,
            total_items: 0,
            efficiency_sum: 0.0,
            max_efficiency: f64::MIN,
        })
    }

    pub fn min_batch(&self) -> usize {
        self.min_batch
    }

    pub fn max_batch(&self) -> usize {
        self.max_batch
    }

    /// Plan a job of `total_items`. Plans for inputs at or below `min_batch`
    /// are returned but not recorded.
    pub fn plan(&mut self, total_items: usize) -> BatchPlan {
        let plan = compute(total_items, self.min_batch, self.max_batch);
        if total_items > self.min_batch {
            self.record(&plan);
        }
        plan
    }

    fn record(&mut self, plan: &BatchPlan) {
        self.total_plans += 1;
        self.total_items = self.total_items.saturating_add(plan.total_items);
        self.efficiency_sum += plan.efficiency_multiplier;
        self.max_efficiency = self.max_efficiency.max(plan.efficiency_multiplier);
        if self.recent.len() == RECENT_PLANS {
            self.recent.pop_front();
        }
        self.recent.push_back(plan.clone());
    }

    /// Most recent recorded plans, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &BatchPlan> {
        self.recent.iter()
    }

    /// Forget every recorded plan. Bounds are kept.
    pub fn reset_statistics(&mut self) {
        self.recent.clear();
        self.total_plans = 0;
        self.total_items = 0;
        self.efficiency_sum = 0.0;
        self.max_efficiency = f64::MIN;
        tracing::debug!("planner statistics reset");
    }

    pub fn statistics(&self) -> PlannerStatistics {
        if self.total_plans == 0 {
            return PlannerStatistics {
                average_efficiency: 1.0,
                max_efficiency: 1.0,
                total_plans: 0,
                total_items_processed: 0,
            };
        }
        PlannerStatistics {
            average_efficiency: round2(self.efficiency_sum / self.total_plans as f64),
            max_efficiency: round2(self.max_efficiency),
            total_plans: self.total_plans,
            total_items_processed: self.total_items,
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_planner_statistics() {
        let planner = BatchPlanner::new(10, 5000).unwrap();
        let stats = planner.statistics();
        assert_eq!(stats.average_efficiency, 1.0);
        assert_eq!(stats.max_efficiency, 1.0);
        assert_eq!(stats.total_plans, 0);
        assert_eq!(stats.total_items_processed, 0);
    }

    #[test]
    fn records_only_non_degenerate_plans() {
        let mut planner = BatchPlanner::new(10, 5000).unwrap();
        planner.plan(5);
        planner.plan(100);
        planner.plan(10_000);
        assert_eq!(planner.recent().count(), 2);

        let stats = planner.statistics();
        assert_eq!(stats.total_plans, 2);
        assert_eq!(stats.total_items_processed, 10_100);
        // (1.505 + 7.526) / 2
        assert_eq!(stats.average_efficiency, 4.52);
        assert_eq!(stats.max_efficiency, 7.53);
    }

    #[test]
    fn rejects_invalid_bounds() {
        assert!(BatchPlanner::new(0, 10).is_err());
        assert!(BatchPlanner::new(10, 10).is_err());
        let planner = BatchPlanner::new(2, 3).unwrap();
        assert_eq!(planner.min_batch(), 2);
        assert_eq!(planner.max_batch(), 3);
    }

    #[test]
    fn recent_plans_are_capped_but_totals_are_not() {
        let mut planner = BatchPlanner::new(10, 5000).unwrap();
        for _ in 0..1000 {
            planner.plan(100);
        }
        assert_eq!(planner.recent().count(), RECENT_PLANS);
        let stats = planner.statistics();
        assert_eq!(stats.total_plans, 1000);
        assert_eq!(stats.total_items_processed, 100_000);
        assert_eq!(stats.average_efficiency, 1.51);
    }

    #[test]
    fn reset_statistics_starts_over() {
        let mut planner = BatchPlanner::new(10, 5000).unwrap();
        planner.plan(10_000);
        planner.reset_statistics();
        assert_eq!(planner.recent().count(), 0);
        assert_eq!(planner.statistics().total_plans, 0);
        assert_eq!(planner.statistics().max_efficiency, 1.0);

        planner.plan(100);
        let stats = planner.statistics();
        assert_eq!(stats.total_plans, 1);
        assert_eq!(stats.max_efficiency, 1.51);
    }
}

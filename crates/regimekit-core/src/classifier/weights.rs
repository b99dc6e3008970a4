//! Per-regime weights, regime distribution and the classifier summary.

use serde::{Deserialize, Serialize};

use crate::regime::Regime;

use super::keywords::keywords_for;

/// One `f64` per regime. Used for confidence weights and the regime distribution,
/// and read from the `[classifier]` section of the config file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeTable {
    pub exploration: f64,
    pub optimization: f64,
    pub stabilization: f64,
}

impl RegimeTable {
    pub fn get(&self, regime: Regime) -> f64 {
        match regime {
            Regime::Exploration => self.exploration,
            Regime::Optimization => self.optimization,
            Regime::Stabilization => self.stabilization,
        }
    }

    pub fn sum(&self) -> f64 {
        self.exploration + self.optimization + self.stabilization
    }
}

/// Static confidence weight per regime.
pub const DEFAULT_CONFIDENCE_WEIGHTS: RegimeTable = RegimeTable {
    exploration: 0.70,
    optimization: 0.85,
    stabilization: 1.00,
};

/// Expected share of tasks per regime; used when aggregating confidence.
pub const DEFAULT_DISTRIBUTION: RegimeTable = RegimeTable {
    exploration: 0.3385,
    optimization: 0.2872,
    stabilization: 0.3744,
};

/// Serializable description of a classifier's configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifierSummary {
    pub distribution: RegimeTable,
    pub confidence_weights: RegimeTable,
    pub keyword_counts: KeywordCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordCounts {
    pub exploration: usize,
    pub optimization: usize,
    pub stabilization: usize,
}

impl KeywordCounts {
    pub(super) fn current() -> Self {
        Self {
            exploration: keywords_for(Regime::Exploration).len(),
            optimization: keywords_for(Regime::Optimization).len(),
            stabilization: keywords_for(Regime::Stabilization).len(),
        }
    }
}

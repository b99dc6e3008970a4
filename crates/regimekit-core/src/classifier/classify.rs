//! Keyword-count classification and weighted confidence aggregation.

use serde::{Deserialize, Serialize};

use crate::regime::Regime;

use super::keywords::matches_in;
use super::weights::{
    ClassifierSummary, KeywordCounts, RegimeTable, DEFAULT_CONFIDENCE_WEIGHTS,
    DEFAULT_DISTRIBUTION,
};

/// Reasoning recorded when no keyword of any regime matched.
pub const NO_MATCH_REASONING: &str =
    "No regime keywords found - defaulting to stabilization (critical path)";

/// Order in which regimes win a tie on a positive match count.
const TIE_PRIORITY: [Regime; 3] = [
    Regime::Stabilization,
    Regime::Optimization,
    Regime::Exploration,
];

/// Result of classifying one task. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskClassification {
    pub task_name: String,
    pub regime: Regime,
    pub confidence_weight: f64,
    /// Keywords of the winning regime only.
    pub keywords_matched: Vec<String>,
    pub reasoning: String,
}

/// Maps task text to a regime. Cheap to clone; holds only the weight tables.
#[derive(Debug, Clone)]
pub struct TaskClassifier {
    confidence_weights: RegimeTable,
    distribution: RegimeTable,
}

impl Default for TaskClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_WEIGHTS, DEFAULT_DISTRIBUTION)
    }
}

impl TaskClassifier {
    /// Create a classifier with custom tables. A distribution that does not sum
    /// to 1.0 (within 0.01) is accepted but logged.
    pub fn new(confidence_weights: RegimeTable, distribution: RegimeTable) -> Self {
        let total = distribution.sum();
        if (total - 1.0).abs() > 0.01 {
            tracing::warn!(total, expected = 1.0, "regime distribution does not sum to 1.0");
        }
        tracing::debug!(
            exploration_pct = distribution.exploration * 100.0,
            optimization_pct = distribution.optimization * 100.0,
            stabilization_pct = distribution.stabilization * 100.0,
            "task classifier initialized"
        );
        Self {
            confidence_weights,
            distribution,
        }
    }

    pub fn confidence_weights(&self) -> &RegimeTable {
        &self.confidence_weights
    }

    pub fn distribution(&self) -> &RegimeTable {
        &self.distribution
    }

    /// Classify a task. Never fails: with no signal the result is stabilization.
    pub fn classify(
        &self,
        task_name: &str,
        keywords: &[String],
        description: &str,
    ) -> TaskClassification {
        let full_text = format!("{} {} {}", task_name, keywords.join(" "), description).to_lowercase();

        let mut best: Option<(Regime, Vec<String>)> = None;
        for regime in TIE_PRIORITY {
            let matched = matches_in(regime, &full_text);
            if matched.is_empty() {
                continue;
            }
            // Strictly greater: earlier entries in TIE_PRIORITY keep ties.
            let better = match &best {
                Some((_, current)) => matched.len() > current.len(),
                None => true,
            };
            if better {
                best = Some((regime, matched));
            }
        }

        let (regime, keywords_matched, reasoning) = match best {
            Some((regime, matched)) => {
                let reasoning = format!(
                    "Matched {} {} keywords: {}",
                    matched.len(),
                    regime,
                    matched.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
                );
                (regime, matched, reasoning)
            }
            None => (Regime::Stabilization, Vec::new(), NO_MATCH_REASONING.to_string()),
        };

        let confidence_weight = self.confidence_weights.get(regime);
        tracing::debug!(
            task_name,
            regime = %regime,
            weight = confidence_weight,
            keywords_matched = keywords_matched.len(),
            "task classified"
        );

        TaskClassification {
            task_name: task_name.to_string(),
            regime,
            confidence_weight,
            keywords_matched,
            reasoning,
        }
    }

    /// Aggregate per-regime success rates (0.0..=1.0) into one confidence value:
    /// the sum of `rate × weight × proportion` over the regimes given.
    pub fn weighted_confidence(&self, success_rates: &[(Regime, f64)]) -> f64 {
        let total: f64 = success_rates
            .iter()
            .map(|&(regime, rate)| {
                rate * self.confidence_weights.get(regime) * self.distribution.get(regime)
            })
            .sum();
        tracing::debug!(total_confidence = total, "weighted confidence calculated");
        total
    }

    pub fn summary(&self) -> ClassifierSummary {
        ClassifierSummary {
            distribution: self.distribution,
            confidence_weights: self.confidence_weights,
            keyword_counts: KeywordCounts::current(),
        }
    }
}

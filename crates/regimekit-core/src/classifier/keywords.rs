//! Fixed keyword tables, one per regime.

use crate::regime::Regime;

pub const EXPLORATION_KEYWORDS: &[&str] = &[
    "experimental",
    "new",
    "discovery",
    "research",
    "edge_case",
    "unknown",
    "exploratory",
    "investigate",
    "novel",
    "cutting_edge",
    "hypothesis",
    "theory",
    "speculation",
    "frontier",
    "emerging",
];

pub const OPTIMIZATION_KEYWORDS: &[&str] = &[
    "optimization",
    "performance",
    "refactor",
    "improve",
    "enhance",
    "efficiency",
    "streamline",
    "polish",
    "refinement",
    "tuning",
    "benchmark",
    "speed",
    "memory",
    "throughput",
    "latency",
];

pub const STABILIZATION_KEYWORDS: &[&str] = &[
    "validation",
    "regression",
    "baseline",
    "critical",
    "core",
    "essential",
    "standard",
    "proven",
    "reliable",
    "stable",
    "production",
    "canonical",
    "reference",
    "definitive",
    "authoritative",
];

/// Keyword table for a regime.
pub fn keywords_for(regime: Regime) -> &'static [&'static str] {
    match regime {
        Regime::Exploration => EXPLORATION_KEYWORDS,
        Regime::Optimization => OPTIMIZATION_KEYWORDS,
        Regime::Stabilization => STABILIZATION_KEYWORDS,
    }
}

/// Keywords of `regime` that occur as substrings of the (already lower-cased) text.
pub(super) fn matches_in(regime: Regime, text: &str) -> Vec<String> {
    keywords_for(regime)
        .iter()
        .filter(|kw| text.contains(*kw))
        .map(|kw| kw.to_string())
        .collect()
}

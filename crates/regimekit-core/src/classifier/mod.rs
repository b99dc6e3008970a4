//! Task classification into operating regimes.
//!
//! A task is described by a name, optional keyword tags and an optional free
//! text description. The classifier counts fixed keyword hits per regime and
//! picks the regime with the most hits, defaulting to stabilization when no
//! keyword matches at all.

mod classify;
mod keywords;
mod weights;

pub use classify::{TaskClassification, TaskClassifier, NO_MATCH_REASONING};
pub use keywords::{keywords_for, EXPLORATION_KEYWORDS, OPTIMIZATION_KEYWORDS, STABILIZATION_KEYWORDS};
pub use weights::{ClassifierSummary, KeywordCounts, RegimeTable, DEFAULT_CONFIDENCE_WEIGHTS, DEFAULT_DISTRIBUTION};

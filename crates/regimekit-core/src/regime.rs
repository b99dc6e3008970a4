//! Operating regimes.
//!
//! Every job runs in exactly one regime. The regime biases the confidence
//! weight a result is given and selects the eviction policy used when the
//! result is cached.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the three discrete operating modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// New topics, edge cases, experimental work. Cached FIFO with expiry.
    Exploration,
    /// Performance tuning and refinement. Cached by access frequency.
    Optimization,
    /// Validation and critical paths. Cached by recency.
    Stabilization,
}

impl Regime {
    pub const ALL: [Regime; 3] = [
        Regime::Exploration,
        Regime::Optimization,
        Regime::Stabilization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Regime::Exploration => "exploration",
            Regime::Optimization => "optimization",
            Regime::Stabilization => "stabilization",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the three regime tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown regime `{0}` (expected exploration, optimization or stabilization)")]
pub struct UnknownRegime(pub String);

impl FromStr for Regime {
    type Err = UnknownRegime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exploration" => Ok(Regime::Exploration),
            "optimization" => Ok(Regime::Optimization),
            "stabilization" => Ok(Regime::Stabilization),
            other => Err(UnknownRegime(other.to_string())),
        }
    }
}

//! Harmonic timing: delays as integer multiples of a fixed base period.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::error::InvalidPolicy;

/// Default base frequency. One period is about 203.7 ms.
pub const DEFAULT_BASE_FREQUENCY_HZ: f64 = 4.909;

/// Named multiples for common timing patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarmonicMultiple {
    Immediate,
    Single,
    Double,
    Triple,
    Quadruple,
    Quintuple,
    MinorThird,
    MajorThird,
    PerfectFifth,
    Octave,
}

impl HarmonicMultiple {
    pub fn value(self) -> u32 {
        match self {
            HarmonicMultiple::Immediate => 0,
            HarmonicMultiple::Single => 1,
            HarmonicMultiple::Double => 2,
            HarmonicMultiple::Triple => 3,
            HarmonicMultiple::Quadruple => 4,
            HarmonicMultiple::Quintuple => 5,
            HarmonicMultiple::MinorThird => 6,
            HarmonicMultiple::MajorThird => 8,
            HarmonicMultiple::PerfectFifth => 12,
            HarmonicMultiple::Octave => 24,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HarmonicMultiple::Immediate => "Immediate",
            HarmonicMultiple::Single => "Single",
            HarmonicMultiple::Double => "Double",
            HarmonicMultiple::Triple => "Triple",
            HarmonicMultiple::Quadruple => "Quadruple",
            HarmonicMultiple::Quintuple => "Quintuple",
            HarmonicMultiple::MinorThird => "Minor Third",
            HarmonicMultiple::MajorThird => "Major Third",
            HarmonicMultiple::PerfectFifth => "Perfect Fifth",
            HarmonicMultiple::Octave => "Octave",
        }
    }
}

/// A computed harmonic delay.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicTiming {
    pub multiple: u32,
    pub delay: Duration,
    /// Frequency of this harmonic (`base / multiple`); infinite for multiple 0.
    pub frequency_hz: f64,
    pub description: String,
}

/// Converts harmonic multiples into delays for a fixed base frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicTimer {
    base_frequency_hz: f64,
}

impl Default for HarmonicTimer {
    fn default() -> Self {
        Self {
            base_frequency_hz: DEFAULT_BASE_FREQUENCY_HZ,
        }
    }
}

impl HarmonicTimer {
    pub fn new(base_frequency_hz: f64) -> Result<Self, InvalidPolicy> {
        if !base_frequency_hz.is_finite() || base_frequency_hz <= 0.0 {
            return Err(InvalidPolicy(format!(
                "base frequency must be a positive number of Hz, got {base_frequency_hz}"
            )));
        }
        tracing::debug!(
            frequency_hz = base_frequency_hz,
            period_ms = 1000.0 / base_frequency_hz,
            "harmonic timer initialized"
        );
        Ok(Self { base_frequency_hz })
    }

    pub fn base_frequency_hz(&self) -> f64 {
        self.base_frequency_hz
    }

    /// Length of one cycle.
    pub fn base_period(&self) -> Duration {
        saturating_secs(1.0 / self.base_frequency_hz)
    }

    /// `multiple × base_period`.
    pub fn delay_for(&self, multiple: u32) -> Duration {
        saturating_secs(f64::from(multiple) / self.base_frequency_hz)
    }

    pub fn timing(&self, multiple: u32, description: impl Into<String>) -> HarmonicTiming {
        let frequency_hz = if multiple > 0 {
            self.base_frequency_hz / f64::from(multiple)
        } else {
            f64::INFINITY
        };
        HarmonicTiming {
            multiple,
            delay: self.delay_for(multiple),
            frequency_hz,
            description: description.into(),
        }
    }

    pub fn preset(&self, multiple: HarmonicMultiple) -> HarmonicTiming {
        self.timing(multiple.value(), multiple.label())
    }

    /// Fixed-rate schedule of `count` identical intervals, for rate limiting.
    pub fn intervals(&self, count: usize, multiple: u32) -> Vec<HarmonicTiming> {
        (1..=count)
            .map(|i| self.timing(multiple, format!("Rate limit interval {i}")))
            .collect()
    }

    /// Sleep for `multiple` periods. Returns false if `cancel` fired first.
    pub async fn sleep(&self, multiple: u32, cancel: Option<&CancellationToken>) -> bool {
        cancellable_sleep(self.delay_for(multiple), cancel).await
    }
}

// Very low frequencies give delays past `Duration::MAX`.
fn saturating_secs(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Wait for `delay` unless `cancel` fires first. Returns true when the full
/// delay elapsed. A zero delay returns immediately unless already cancelled.
pub async fn cancellable_sleep(delay: Duration, cancel: Option<&CancellationToken>) -> bool {
    match cancel {
        Some(token) => {
            if token.is_cancelled() {
                return false;
            }
            tokio::select! {
                biased;
                _ = token.cancelled() => false,
                _ = tokio::time::sleep(delay) => true,
            }
        }
        None => {
            tokio::time::sleep(delay).await;
            true
        }
    }
}

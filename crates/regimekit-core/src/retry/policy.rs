//! Backoff policy and the precomputed per-session schedule.

use std::time::Duration;

use super::error::InvalidPolicy;
use super::harmonic::HarmonicTimer;

/// Cap applied when a policy does not set `max_multiple`.
pub const DEFAULT_MAX_MULTIPLE: u32 = 100;

/// Decision returned by the schedule after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The attempt budget is spent.
    GiveUp,
    /// Retry after the given delay.
    RetryAfter(Duration),
}

/// Exponential backoff in harmonic multiples:
/// `multiple_i = min(trunc(start_multiple × growth_factor^i), max_multiple)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackoffPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    pub start_multiple: u32,
    pub growth_factor: f64,
    /// Upper bound on the multiple; `None` or `Some(0)` means [`DEFAULT_MAX_MULTIPLE`].
    pub max_multiple: Option<u32>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            start_multiple: 1,
            growth_factor: 2.0,
            max_multiple: None,
        }
    }
}

/// One entry of a backoff schedule, indexed by attempt number.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffStep {
    pub multiple: u32,
    pub delay: Duration,
    pub description: String,
}

/// Backoff steps computed once, before the first attempt of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffSchedule {
    steps: Vec<BackoffStep>,
}

impl BackoffPolicy {
    pub fn validate(&self) -> Result<(), InvalidPolicy> {
        if self.max_attempts == 0 {
            return Err(InvalidPolicy("max_attempts must be at least 1".to_string()));
        }
        if !self.growth_factor.is_finite() || self.growth_factor <= 0.0 {
            return Err(InvalidPolicy(format!(
                "growth_factor must be a positive number, got {}",
                self.growth_factor
            )));
        }
        Ok(())
    }

    /// Cap on the multiple. Unset or zero means [`DEFAULT_MAX_MULTIPLE`].
    pub fn effective_max_multiple(&self) -> u32 {
        match self.max_multiple {
            None | Some(0) => DEFAULT_MAX_MULTIPLE,
            Some(cap) => cap,
        }
    }

    /// Harmonic multiple for the zero-based attempt index `i`.
    pub fn multiple_at(&self, i: u32) -> u32 {
        let exponent = i32::try_from(i).unwrap_or(i32::MAX);
        let raw = f64::from(self.start_multiple) * self.growth_factor.powi(exponent);
        // `as` saturates, so overflowing growth lands on u32::MAX before the cap.
        (raw as u32).min(self.effective_max_multiple())
    }

    /// Compute the full schedule against `timer`. Deterministic in the policy.
    pub fn schedule(&self, timer: &HarmonicTimer) -> Result<BackoffSchedule, InvalidPolicy> {
        self.validate()?;
        let steps: Vec<BackoffStep> = (0..self.max_attempts)
            .map(|i| {
                let multiple = self.multiple_at(i);
                BackoffStep {
                    multiple,
                    delay: timer.delay_for(multiple),
                    description: format!("Retry attempt {}", i + 1),
                }
            })
            .collect();
        let schedule = BackoffSchedule { steps };
        tracing::debug!(
            max_attempts = self.max_attempts,
            start_multiple = self.start_multiple,
            growth_factor = self.growth_factor,
            max_multiple = self.effective_max_multiple(),
            total_delay_secs = schedule.total_delay().as_secs_f64(),
            "backoff schedule calculated"
        );
        Ok(schedule)
    }
}

impl BackoffSchedule {
    pub fn steps(&self) -> &[BackoffStep] {
        &self.steps
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.steps.iter().map(|s| s.delay).collect()
    }

    /// Sum of every step, i.e. the longest a session can spend waiting.
    pub fn total_delay(&self) -> Duration {
        self.steps
            .iter()
            .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.delay))
    }

    /// Decide what follows a failed attempt. `attempt` is 1-based; the wait
    /// after attempt `n` is step `n - 1`. The last attempt never retries.
    pub fn decide(&self, attempt: u32) -> RetryDecision {
        if attempt as usize >= self.steps.len() {
            return RetryDecision::GiveUp;
        }
        let idx = attempt.saturating_sub(1) as usize;
        RetryDecision::RetryAfter(self.steps[idx].delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(d: &[Duration]) -> Vec<f64> {
        d.iter().map(|d| (d.as_secs_f64() * 10_000.0).trunc() / 10_000.0).collect()
    }

    #[test]
    fn default_schedule_doubles() {
        let schedule = BackoffPolicy::default()
            .schedule(&HarmonicTimer::default())
            .unwrap();
        let multiples: Vec<u32> = schedule.steps().iter().map(|s| s.multiple).collect();
        assert_eq!(multiples, vec![1, 2, 4, 8, 16]);
        assert_eq!(
            secs(&schedule.delays()),
            vec![0.2037, 0.4074, 0.8148, 1.6296, 3.2593]
        );
        assert_eq!(schedule.steps()[2].description, "Retry attempt 3");
    }

    #[test]
    fn schedule_is_deterministic() {
        let policy = BackoffPolicy {
            max_attempts: 7,
            start_multiple: 3,
            growth_factor: 1.5,
            max_multiple: Some(20),
        };
        let timer = HarmonicTimer::default();
        assert_eq!(policy.schedule(&timer).unwrap(), policy.schedule(&timer).unwrap());
    }

    #[test]
    fn multiples_truncate_and_cap() {
        let policy = BackoffPolicy {
            max_attempts: 6,
            start_multiple: 3,
            growth_factor: 1.5,
            max_multiple: Some(10),
        };
        // 3, 4.5, 6.75, 10.125, 15.19, 22.78
        let multiples: Vec<u32> = (0..6).map(|i| policy.multiple_at(i)).collect();
        assert_eq!(multiples, vec![3, 4, 6, 10, 10, 10]);
    }

    #[test]
    fn default_cap_is_one_hundred() {
        let policy = BackoffPolicy {
            max_attempts: 10,
            ..BackoffPolicy::default()
        };
        assert_eq!(policy.multiple_at(6), 64);
        assert_eq!(policy.multiple_at(7), 100);
        assert_eq!(policy.multiple_at(40), 100);
    }

    #[test]
    fn decide_respects_attempt_budget() {
        let policy = BackoffPolicy {
            max_attempts: 3,
            ..BackoffPolicy::default()
        };
        let timer = HarmonicTimer::default();
        let schedule = policy.schedule(&timer).unwrap();
        assert_eq!(schedule.decide(1), RetryDecision::RetryAfter(timer.delay_for(1)));
        assert_eq!(schedule.decide(2), RetryDecision::RetryAfter(timer.delay_for(2)));
        assert_eq!(schedule.decide(3), RetryDecision::GiveUp);
    }

    #[test]
    fn invalid_policies_are_rejected() {
        let timer = HarmonicTimer::default();
        let zero_attempts = BackoffPolicy {
            max_attempts: 0,
            ..BackoffPolicy::default()
        };
        assert!(zero_attempts.schedule(&timer).is_err());
        let bad_growth = BackoffPolicy {
            growth_factor: f64::INFINITY,
            ..BackoffPolicy::default()
        };
        assert!(bad_growth.schedule(&timer).is_err());
        let negative_growth = BackoffPolicy {
            growth_factor: -2.0,
            ..BackoffPolicy::default()
        };
        assert!(negative_growth.validate().is_err());
    }

    #[test]
    fn zero_max_multiple_means_default_cap() {
        let timer = HarmonicTimer::default();
        let policy = BackoffPolicy {
            max_attempts: 8,
            max_multiple: Some(0),
            ..BackoffPolicy::default()
        };
        assert_eq!(policy.effective_max_multiple(), DEFAULT_MAX_MULTIPLE);
        let multiples: Vec<u32> = policy
            .schedule(&timer)
            .unwrap()
            .steps()
            .iter()
            .map(|s| s.multiple)
            .collect();
        assert_eq!(multiples, vec![1, 2, 4, 8, 16, 32, 64, 100]);
    }

    #[test]
    fn huge_delays_saturate_instead_of_panicking() {
        let timer = HarmonicTimer::new(1e-18).unwrap();
        let schedule = BackoffPolicy::default().schedule(&timer).unwrap();
        assert_eq!(schedule.total_delay(), Duration::MAX);
    }
}

//! Simulated units of work for orchestrator tests.

use std::collections::HashMap;
use std::future::Future;
use std::ops::Range;
use std::sync::{Arc, Mutex};

/// Per-batch attempt counter shared with the test body.
#[derive(Debug, Clone, Default)]
pub struct Attempts(Arc<Mutex<HashMap<usize, u32>>>);

impl Attempts {
    pub fn get(&self, batch_index: usize) -> u32 {
        self.0.lock().unwrap().get(&batch_index).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.lock().unwrap().values().sum()
    }

    fn bump(&self, batch_index: usize) -> u32 {
        let mut map = self.0.lock().unwrap();
        let n = map.entry(batch_index).or_default();
        *n += 1;
        *n
    }
}

/// Unit that fails the first `fail_first` attempts of every batch, then
/// returns the sum of the item indices in its range.
pub fn flaky_sum(
    attempts: Attempts,
    fail_first: u32,
) -> impl FnMut(usize, Range<usize>) -> std::pin::Pin<Box<dyn Future<Output = Result<u64, String>> + Send>>
{
    move |index, range| {
        let attempt = attempts.bump(index);
        Box::pin(async move {
            if attempt <= fail_first {
                Err(format!("batch {index} attempt {attempt} failed"))
            } else {
                Ok(range.map(|i| i as u64).sum())
            }
        })
    }
}

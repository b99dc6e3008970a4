//! Regime-aware result cache.
//!
//! Three independent bounded stores, one per regime, each with its own
//! eviction policy:
//! - stabilization: least recently used is evicted
//! - optimization: least frequently used is evicted (ties: oldest insertion)
//! - exploration: first in, first out, with entries expiring after a TTL
//!
//! Writes go to exactly one store, chosen by the regime. Reads probe the
//! stores in the order recency, frequency, arrival. Each store sits behind its
//! own mutex and at most one lock is held at a time, so the cache can be
//! shared across tasks.

mod fifo;
mod lfu;
mod lru;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::regime::Regime;

use fifo::FifoStore;
use lfu::LfuStore;
use lru::LruStore;

pub const DEFAULT_MAX_SIZE: usize = 128;
pub const DEFAULT_FIFO_TTL: Duration = Duration::from_secs(3600);

/// Cache whose eviction policy follows the regime a value was written under.
#[derive(Debug)]
pub struct RegimeCache<V> {
    max_size: usize,
    fifo_ttl: Duration,
    lru: Mutex<LruStore<V>>,
    lfu: Mutex<LfuStore<V>>,
    fifo: Mutex<FifoStore<V>>,
}

impl<V> Default for RegimeCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, DEFAULT_FIFO_TTL)
    }
}

// Stores are left consistent after every mutation, so a poisoned lock is
// still safe to use.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<V> RegimeCache<V> {
    /// `max_size` bounds each store separately (minimum 1). `fifo_ttl` only
    /// applies to the exploration store.
    pub fn new(max_size: usize, fifo_ttl: Duration) -> Self {
        let max_size = max_size.max(1);
        Self {
            max_size,
            fifo_ttl,
            lru: Mutex::new(LruStore::new(max_size)),
            lfu: Mutex::new(LfuStore::new(max_size)),
            fifo: Mutex::new(FifoStore::new(max_size, fifo_ttl)),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn fifo_ttl(&self) -> Duration {
        self.fifo_ttl
    }

    /// Store `value` under `key` in the store for `regime`.
    pub fn set(&self, key: &str, value: V, regime: Regime) {
        match regime {
            Regime::Stabilization => lock(&self.lru).set(key, value),
            Regime::Optimization => lock(&self.lfu).set(key, value),
            Regime::Exploration => lock(&self.fifo).set(key, value),
        }
    }

    /// Number of entries in the store for `regime` (expired FIFO entries that
    /// have not been purged yet are counted).
    pub fn len_in(&self, regime: Regime) -> usize {
        match regime {
            Regime::Stabilization => lock(&self.lru).len(),
            Regime::Optimization => lock(&self.lfu).len(),
            Regime::Exploration => lock(&self.fifo).len(),
        }
    }

    pub fn len(&self) -> usize {
        Regime::ALL.iter().map(|&r| self.len_in(r)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired exploration entries now. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        lock(&self.fifo).purge_expired()
    }

    pub fn clear(&self) {
        lock(&self.lru).clear();
        lock(&self.lfu).clear();
        lock(&self.fifo).clear();
    }
}

impl<V: Clone> RegimeCache<V> {
    /// Look `key` up in the recency, frequency and arrival stores, in that order.
    ///
    /// A recency hit refreshes recency, a frequency hit bumps the counter, and an
    /// arrival hit past its TTL is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(v) = lock(&self.lru).get(key) {
            return Some(v);
        }
        if let Some(v) = lock(&self.lfu).get(key) {
            return Some(v);
        }
        lock(&self.fifo).get(key)
    }
}

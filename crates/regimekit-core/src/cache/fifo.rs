//! Arrival store with expiry (exploration).

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
struct Slot<V> {
    value: V,
    inserted_at: Instant,
    seq: u64,
}

/// Bounded map evicting in arrival order; entries older than `ttl` are misses.
///
/// Rewriting a live key replaces its value and refreshes its timestamp but
/// keeps its place in the eviction queue.
#[derive(Debug)]
pub(super) struct FifoStore<V> {
    max_size: usize,
    ttl: Duration,
    entries: HashMap<String, Slot<V>>,
    order: BTreeMap<u64, String>,
    next_seq: u64,
}

impl<V> FifoStore<V> {
    pub(super) fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            max_size,
            ttl,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }

    fn is_expired(&self, inserted_at: Instant, now: Instant) -> bool {
        now.saturating_duration_since(inserted_at) > self.ttl
    }

    fn remove(&mut self, key: &str) -> Option<Slot<V>> {
        let slot = self.entries.remove(key)?;
        self.order.remove(&slot.seq);
        Some(slot)
    }

    pub(super) fn set(&mut self, key: &str, value: V) {
        self.purge_expired();
        let now = Instant::now();
        if let Some(slot) = self.entries.get_mut(key) {
            slot.value = value;
            slot.inserted_at = now;
            return;
        }
        if self.entries.len() >= self.max_size {
            if let Some((_, oldest)) = self.order.pop_first() {
                self.entries.remove(&oldest);
                tracing::debug!(key = %oldest, "fifo eviction");
            }
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, key.to_string());
        self.entries.insert(
            key.to_string(),
            Slot {
                value,
                inserted_at: now,
                seq,
            },
        );
    }

    /// Remove every entry older than the TTL. Returns the number removed.
    pub(super) fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| self.is_expired(slot.inserted_at, now))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        if !expired.is_empty() {
            tracing::debug!(count = expired.len(), "fifo expired entries purged");
        }
        expired.len()
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<V: Clone> FifoStore<V> {
    pub(super) fn get(&mut self, key: &str) -> Option<V> {
        let inserted_at = self.entries.get(key)?.inserted_at;
        if self.is_expired(inserted_at, Instant::now()) {
            self.remove(key);
            return None;
        }
        self.entries.get(key).map(|slot| slot.value.clone())
    }
}

//! Frequency store (optimization).

use std::collections::HashMap;

#[derive(Debug)]
struct Slot<V> {
    value: V,
    freq: u64,
    /// Insertion order; breaks ties between equal frequencies (lowest goes first).
    seq: u64,
}

/// Bounded map evicting the least frequently used key.
#[derive(Debug)]
pub(super) struct LfuStore<V> {
    max_size: usize,
    entries: HashMap<String, Slot<V>>,
    next_seq: u64,
}

impl<V> LfuStore<V> {
    pub(super) fn new(max_size: usize) -> Self {
        Self {
            max_size,
            entries: HashMap::new(),
            next_seq: 0,
        }
    }

    pub(super) fn set(&mut self, key: &str, value: V) {
        if let Some(slot) = self.entries.get_mut(key) {
            slot.freq = slot.freq.saturating_add(1);
            slot.value = value;
            return;
        }
        if self.entries.len() >= self.max_size {
            self.evict_one();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries
            .insert(key.to_string(), Slot { value, freq: 1, seq });
    }

    fn evict_one(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, slot)| (slot.freq, slot.seq))
            .map(|(k, _)| k.clone());
        if let Some(key) = victim {
            if let Some(slot) = self.entries.remove(&key) {
                tracing::debug!(key = %key, freq = slot.freq, "lfu eviction");
            }
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V: Clone> LfuStore<V> {
    pub(super) fn get(&mut self, key: &str) -> Option<V> {
        let slot = self.entries.get_mut(key)?;
        slot.freq = slot.freq.saturating_add(1);
        Some(slot.value.clone())
    }
}

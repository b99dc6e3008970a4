//! Recency store (stabilization).

use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
struct Slot<V> {
    value: V,
    tick: u64,
}

/// Bounded map evicting the least recently used key. Recency is a
/// monotonically increasing tick; `order` maps tick to key.
#[derive(Debug)]
pub(super) struct LruStore<V> {
    max_size: usize,
    entries: HashMap<String, Slot<V>>,
    order: BTreeMap<u64, String>,
    next_tick: u64,
}

impl<V> LruStore<V> {
    pub(super) fn new(max_size: usize) -> Self {
        Self {
            max_size,
            entries: HashMap::new(),
            order: BTreeMap::new(),
            next_tick: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        let tick = self.next_tick;
        self.next_tick += 1;
        tick
    }

    pub(super) fn set(&mut self, key: &str, value: V) {
        let tick = self.bump();
        if let Some(slot) = self.entries.get_mut(key) {
            self.order.remove(&slot.tick);
            slot.tick = tick;
            slot.value = value;
        } else {
            self.entries.insert(key.to_string(), Slot { value, tick });
        }
        self.order.insert(tick, key.to_string());

        if self.entries.len() > self.max_size {
            if let Some((_, evicted)) = self.order.pop_first() {
                self.entries.remove(&evicted);
                tracing::debug!(key = %evicted, "lru eviction");
            }
        }
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

impl<V: Clone> LruStore<V> {
    pub(super) fn get(&mut self, key: &str) -> Option<V> {
        let tick = self.bump();
        let slot = self.entries.get_mut(key)?;
        if let Some(k) = self.order.remove(&slot.tick) {
            self.order.insert(tick, k);
        }
        slot.tick = tick;
        Some(slot.value.clone())
    }
}

//! Cache Store Module
//!
//! HashMap storage with a fixed TTL, lazy and swept expiry, and LRU eviction
//! once capacity is reached.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheKey, CacheStats, Clock, LruTracker, SystemClock};

// == Cache Store ==
/// In-process cache of values of type `V` keyed by namespaced keys.
///
/// Values are handed out by clone; callers store `Arc`s so a hit shares the
/// original value and nothing can mutate what is stored.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store on the system clock.
    ///
    /// # Arguments
    /// * `max_entries` - Capacity; a capacity of zero is treated as one
    /// * `ttl` - Lifetime applied to every write
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self::with_clock(max_entries, ttl, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(max_entries: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its TTL.
    ///
    /// When a new key arrives at capacity, expired entries are swept first;
    /// if that frees nothing the least recently used entry is evicted.
    pub fn set(&mut self, key: CacheKey, value: V) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            if self.cleanup_expired() == 0 {
                if let Some(victim) = self.lru.evict_oldest() {
                    self.entries.remove(&victim);
                    self.stats.record_eviction();
                }
            }
        }

        let entry = CacheEntry::new(value, self.clock.now_ms(), self.ttl.as_millis() as u64);
        self.entries.insert(key.clone(), entry);
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Returns the value for `key` if present and not expired.
    ///
    /// An expired entry is removed on the spot and counts as a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = self.clock.now_ms();

        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Cleanup Expired ==
    /// Removes every expired entry, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_total_entries(self.entries.len());
    }
}

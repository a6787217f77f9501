//! Sharded LRU cache of per-word normalization outcomes.
//!
//! Entries are keyed by `(snapshot version, word)`. A lookup under a version
//! other than the one an entry was computed for is a miss, so entries from a
//! replaced snapshot are never served; they are overwritten on the next
//! insert of the same word or evicted under capacity pressure.
//!
//! Each shard is an independent LRU list behind its own mutex, so callers
//! normalizing different words rarely contend.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::{AHashMap, RandomState};
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::normalizer::result::WordOutcome;

const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node {
    word: String,
    version: u64,
    outcome: WordOutcome,
    prev: usize,
    next: usize,
}

/// One LRU list. Nodes live in a slab and are linked by index; the slab only
/// grows up to `capacity` and then recycles the least recently used slot.
#[derive(Debug)]
struct Shard {
    index: AHashMap<String, usize>,
    nodes: Vec<Node>,
    head: usize,
    tail: usize,
    capacity: usize,
}

impl Shard {
    fn new(capacity: usize) -> Self {
        Shard {
            index: AHashMap::new(),
            nodes: Vec::new(),
            head: NIL,
            tail: NIL,
            capacity,
        }
    }

    fn get(&mut self, version: u64, word: &str) -> Option<WordOutcome> {
        let idx = *self.index.get(word)?;
        if self.nodes[idx].version != version {
            return None;
        }
        self.move_to_front(idx);
        Some(self.nodes[idx].outcome.clone())
    }

    fn insert(&mut self, version: u64, word: &str, outcome: WordOutcome) {
        if let Some(&idx) = self.index.get(word) {
            let node = &mut self.nodes[idx];
            node.version = version;
            node.outcome = outcome;
            self.move_to_front(idx);
            return;
        }

        let idx = if self.nodes.len() < self.capacity {
            self.nodes.push(Node {
                word: word.to_string(),
                version,
                outcome,
                prev: NIL,
                next: NIL,
            });
            self.nodes.len() - 1
        } else {
            let idx = self.tail;
            self.unlink(idx);
            let node = &mut self.nodes[idx];
            let evicted = std::mem::replace(&mut node.word, word.to_string());
            node.version = version;
            node.outcome = outcome;
            self.index.remove(&evicted);
            idx
        };

        self.link_front(idx);
        self.index.insert(word.to_string(), idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        if prev != NIL {
            self.nodes[prev].next = next;
        } else {
            self.head = next;
        }
        if next != NIL {
            self.nodes[next].prev = prev;
        } else {
            self.tail = prev;
        }
    }

    fn link_front(&mut self, idx: usize) {
        self.nodes[idx].prev = NIL;
        self.nodes[idx].next = self.head;
        if self.head != NIL {
            self.nodes[self.head].prev = idx;
        } else {
            self.tail = idx;
        }
        self.head = idx;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == idx {
            return;
        }
        self.unlink(idx);
        self.link_front(idx);
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.index.clear();
        self.nodes.clear();
        self.head = NIL;
        self.tail = NIL;
    }
}

/// Cache performance statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Entries currently held, including stale-version ones.
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    /// Calculate hit ratio.
    pub fn hit_ratio(&self) -> f64 {
        if self.hits + self.misses == 0 {
            0.0
        } else {
            self.hits as f64 / (self.hits + self.misses) as f64
        }
    }
}

/// Bounded, sharded LRU cache of word outcomes.
#[derive(Debug)]
pub struct WordCache {
    shards: Vec<Mutex<Shard>>,
    hasher: RandomState,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

// Shares of `capacity` over `shard_count` shards sum to exactly `capacity`;
// the first `capacity % shard_count` shards hold one extra entry.
fn shard_capacity(capacity: usize, shard_count: usize, shard: usize) -> usize {
    capacity / shard_count + usize::from(shard < capacity % shard_count)
}

impl WordCache {
    /// Create a cache holding up to `capacity` entries split over `shards`.
    ///
    /// A capacity of zero disables the cache: every lookup misses and
    /// inserts are dropped.
    pub fn new(capacity: usize, shards: usize) -> Self {
        let shard_count = if capacity == 0 {
            0
        } else {
            shards.clamp(1, capacity)
        };

        WordCache {
            shards: (0..shard_count)
                .map(|i| Mutex::new(Shard::new(shard_capacity(capacity, shard_count, i))))
                .collect(),
            hasher: RandomState::new(),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    pub fn is_enabled(&self) -> bool {
        !self.shards.is_empty()
    }

    fn shard(&self, word: &str) -> Option<&Mutex<Shard>> {
        if self.shards.is_empty() {
            return None;
        }
        let hash = self.hasher.hash_one(word);
        Some(&self.shards[(hash % self.shards.len() as u64) as usize])
    }

    /// Outcome of `word` computed under snapshot `version`, if cached.
    pub fn get(&self, version: u64, word: &str) -> Option<WordOutcome> {
        let shard = self.shard(word)?;
        let found = shard.lock().get(version, word);
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store the outcome of `word` under snapshot `version`.
    pub fn insert(&self, version: u64, word: &str, outcome: WordOutcome) {
        if let Some(shard) = self.shard(word) {
            shard.lock().insert(version, word, outcome);
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured total capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        for shard in &self.shards {
            shard.lock().clear();
        }
        debug!("Word cache cleared");
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::result::WordSource;

    fn outcome(word: &str) -> WordOutcome {
        WordOutcome::new(word, WordSource::Rule)
    }

    #[test]
    fn test_hit_and_miss() {
        let cache = WordCache::new(16, 4);
        assert_eq!(cache.get(1, "قال"), None);
        cache.insert(1, "قال", outcome("كال"));
        assert_eq!(cache.get(1, "قال"), Some(outcome("كال")));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_ratio(), 0.5);
    }

    #[test]
    fn test_stale_version_not_served() {
        let cache = WordCache::new(16, 1);
        cache.insert(1, "قال", outcome("كال"));
        assert_eq!(cache.get(2, "قال"), None);

        cache.insert(2, "قال", outcome("قال"));
        assert_eq!(cache.get(2, "قال"), Some(outcome("قال")));
        assert_eq!(cache.get(1, "قال"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction() {
        let cache = WordCache::new(2, 1);
        cache.insert(1, "a", outcome("a"));
        cache.insert(1, "b", outcome("b"));
        // touch "a" so "b" is least recently used
        assert!(cache.get(1, "a").is_some());
        cache.insert(1, "c", outcome("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(1, "a").is_some());
        assert!(cache.get(1, "b").is_none());
        assert!(cache.get(1, "c").is_some());
    }

    #[test]
    fn test_eviction_cycles_through_slots() {
        let cache = WordCache::new(3, 1);
        for i in 0..100 {
            cache.insert(1, &format!("w{i}"), outcome("x"));
        }
        assert_eq!(cache.len(), 3);
        for i in 97..100 {
            assert!(cache.get(1, &format!("w{i}")).is_some());
        }
        assert!(cache.get(1, "w96").is_none());
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = WordCache::new(0, 8);
        assert!(!cache.is_enabled());
        cache.insert(1, "قال", outcome("كال"));
        assert_eq!(cache.get(1, "قال"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_more_shards_than_capacity() {
        let cache = WordCache::new(2, 64);
        for word in ["a", "b", "c", "d"] {
            cache.insert(1, word, outcome(word));
        }
        assert!(cache.len() <= 2);
    }

    #[test]
    fn test_clear() {
        let cache = WordCache::new(16, 4);
        for word in ["a", "b", "c"] {
            cache.insert(1, word, outcome(word));
        }
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(1, "a"), None);
        cache.insert(1, "a", outcome("a"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_total_capacity_is_exact() {
        let cache = WordCache::new(10, 4);
        let shares: Vec<usize> = cache.shards.iter().map(|s| s.lock().capacity).collect();
        assert_eq!(shares, vec![3, 3, 2, 2]);

        for i in 0..1000 {
            cache.insert(1, &format!("w{i}"), outcome("x"));
        }
        assert_eq!(cache.len(), 10);
        assert_eq!(cache.stats().capacity, 10);
    }
}

//! # Least-Frequently-Used replay engine
//!
//! Evicts the resident with the fewest hits since it was inserted.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                             │
//!   │                                                                     │
//!   │   index: FxHashMap<K, LfuRecord>        store: SlotArena<Entry>     │
//!   │   ┌───────┬────────────────────┐        ┌──────┬──────────────────┐ │
//!   │   │  key  │  slot    uses      │        │ slot │  (key, value)    │ │
//!   │   ├───────┼────────────────────┤        ├──────┼──────────────────┤ │
//!   │   │  "A"  │  #0      1         │ ─────► │  #0  │  ("A", va)       │ │
//!   │   │  "C"  │  #1      0         │ ─────► │  #1  │  ("C", vc)       │ │
//!   │   └───────┴────────────────────┘        └──────┴──────────────────┘ │
//!   │                                                                     │
//!   │   selector: LazyMinHeap<SlotId, u64>   ordered by (uses, seq)       │
//!   │     (#1, 0, seq=3)  ← victim                                        │
//!   │     (#0, 1, seq=2)                                                  │
//!   └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Tie-breaking
//!
//! Ordering by use count alone would collapse residents that share a count
//! into one selectable record. The selector breaks ties with a sequence
//! number drawn on every insert or hit, so every resident keeps exactly one
//! live record. Among equal counts the entry whose count changed least
//! recently goes first.
//!
//! ## Operations
//!
//! | Method            | Complexity          | Notes                           |
//! |-------------------|---------------------|---------------------------------|
//! | `lookup_update`   | O(log n) amortized  | hit: re-score, miss: evict+ins  |
//! | `get` / `contains`| O(1)                | no policy side effects          |
//! | `use_count`       | O(1)                |                                 |
//! | `peek_victim`     | O(log n) amortized  | drops stale selector records    |
//! | `clear`           | O(n)                |                                 |
//!
//! ## Example
//!
//! ```
//! use cachesim::policy::lfu::LfuCache;
//! use cachesim::traits::{LfuCacheTrait, ReplayCache};
//!
//! let mut cache: LfuCache<char, u32> = LfuCache::new(2);
//! let hits: Vec<bool> = "ABAC"
//!     .chars()
//!     .map(|key| cache.lookup_update(key, |k| *k as u32))
//!     .collect();
//!
//! assert_eq!(hits, [false, false, true, false]);
//! assert!(cache.contains(&'A'));
//! assert!(!cache.contains(&'B'));
//! assert_eq!(cache.use_count(&'A'), Some(1));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe. See `shared::SharedCache`.

use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{LazyMinHeap, SlotArena, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};
use crate::traits::{LfuCacheTrait, ReplayCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

#[derive(Debug, Clone, Copy)]
struct LfuRecord {
    slot: SlotId,
    uses: u64,
}

/// LFU cache with O(log n) victim selection.
#[derive(Debug)]
pub struct LfuCache<K, V> {
    capacity: usize,
    store: SlotArena<Entry<K, V>>,
    index: FxHashMap<K, LfuRecord>,
    selector: LazyMinHeap<SlotId, u64>,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Bound on selector records per resident before a rebuild.
    const MAX_HEAP_FACTOR: usize = 4;
    /// Entries reserved up front; larger caches grow on demand.
    const PREALLOC_LIMIT: usize = 4096;

    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of zero is valid: every lookup misses and nothing is stored.
    pub fn new(capacity: usize) -> Self {
        let reserved = capacity.min(Self::PREALLOC_LIMIT);
        Self {
            capacity,
            store: SlotArena::with_capacity(reserved),
            index: FxHashMap::with_capacity_and_hasher(reserved, Default::default()),
            selector: LazyMinHeap::with_capacity(reserved),
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Iterates resident `(key, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Evicts the current victim and returns it.
    pub fn pop_victim(&mut self) -> Option<(K, V)> {
        let (slot, uses) = self.selector.pop_best()?;
        let entry = self.store.remove(slot)?;
        self.index.remove(&entry.key);
        trace!(slot = slot.index(), uses, "lfu eviction");
        #[cfg(feature = "metrics")]
        self.metrics.record_evict();
        Some((entry.key, entry.value))
    }

    /// Checks that store, key index and selector describe the same residents.
    pub fn check_invariants(&self) -> Result<(), InvariantError>
    where
        K: Debug,
    {
        if self.store.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "store holds {} entries, capacity is {}",
                self.store.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.store.len() || self.selector.len() != self.store.len() {
            return Err(InvariantError::new(format!(
                "index {} / selector {} / store {} sizes differ",
                self.index.len(),
                self.selector.len(),
                self.store.len()
            )));
        }
        for (key, record) in &self.index {
            let entry = self.store.get(record.slot).ok_or_else(|| {
                InvariantError::new(format!("key {key:?} points at vacant {:?}", record.slot))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "key {key:?} points at slot holding {:?}",
                    entry.key
                )));
            }
            if self.selector.score_of(&record.slot) != Some(&record.uses) {
                return Err(InvariantError::new(format!(
                    "selector score for {key:?} differs from use count {}",
                    record.uses
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> ReplayCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, value_fn: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        if let Some(record) = self.index.get_mut(&key) {
            record.uses += 1;
            self.selector.update(record.slot, record.uses);
            self.selector.maybe_rebuild(Self::MAX_HEAP_FACTOR);
            #[cfg(feature = "metrics")]
            self.metrics.record_hit();
            return true;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_miss();

        if self.capacity == 0 {
            return false;
        }
        if self.store.len() >= self.capacity {
            self.pop_victim();
        }

        let value = value_fn(&key);
        let slot = self.store.insert(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, LfuRecord { slot, uses: 0 });
        self.selector.update(slot, 0);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert();
        false
    }

    fn get(&self, key: &K) -> Option<&V> {
        let record = self.index.get(key)?;
        self.store.get(record.slot).map(|entry| &entry.value)
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.store.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        debug!(evicted = self.store.len(), "lfu cache cleared");
        self.store.clear();
        self.index.clear();
        self.selector.clear();
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn use_count(&self, key: &K) -> Option<u64> {
        self.index.get(key).map(|record| record.uses)
    }

    fn peek_victim(&mut self) -> Option<&K> {
        let slot = *self.selector.peek_best()?.0;
        self.store.get(slot).map(|entry| &entry.key)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
            lookups: self.metrics.lookups,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            inserts: self.metrics.inserts,
            evictions: self.metrics.evictions,
            clears: self.metrics.clears,
            cache_len: self.store.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

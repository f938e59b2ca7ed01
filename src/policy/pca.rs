//! # Perfect Caching Algorithm (Belady's MIN)
//!
//! Offline-optimal replacement for a trace known in full ahead of time. At
//! every eviction it discards the resident whose next reference lies
//! farthest in the future, or that is never referenced again. It also
//! refuses to admit a key whose own next use is no sooner than that of every
//! resident, since admitting it could only cost hits.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          PcaCache<K, V>                              │
//!   │                                                                      │
//!   │   future: FutureIndex<K>          built once from the whole trace    │
//!   │     A → [5, 9]   B → [7]   C → []                                    │
//!   │                                                                      │
//!   │   index: FxHashMap<K, Resident>     store: SlotArena<Entry<K, V>>    │
//!   │     A → { #0, At(5) }                 #0 → (A, va)                   │
//!   │     B → { #1, At(7) }                 #1 → (B, vb)                   │
//!   │     C → { #2, Never }                 #2 → (C, vc)                   │
//!   │                                                                      │
//!   │   selector: LazyMinHeap<SlotId, Reverse<usize>>                      │
//!   │     (#1, 7)  ← farthest next use                                     │
//!   │     (#0, 5)                                                          │
//!   │                                                                      │
//!   │   redundant: Vec<SlotId>    residents that never recur               │
//!   │     [#2]     ← evicted first, at zero cost                           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lookup flow
//!
//! ```text
//!   lookup_update(key)
//!     next = future.advance(key)            consume this occurrence
//!     resident? ── yes ──► re-file under `next`, return true
//!        │
//!        no
//!        ├─ capacity 0 or next == Never ──► decline, return false
//!        ├─ full?
//!        │    ├─ redundant non-empty ──► evict top of stack
//!        │    ├─ next >= farthest   ──► decline, return false
//!        │    └─ otherwise           ──► evict farthest
//!        └─ materialize, insert, file under `next`, return false
//! ```
//!
//! ## Preconditions
//!
//! The engine must be replayed with exactly the sequence it was built from.
//! A key that is absent from that sequence, or looked up more often than it
//! occurs, is treated as never recurring: it is never admitted.
//!
//! ## Example
//!
//! ```
//! use cachesim::policy::pca::PcaCache;
//! use cachesim::traits::ReplayCache;
//!
//! let trace = ['A', 'B', 'A'];
//! let mut cache: PcaCache<char, u32> = PcaCache::from_slice(1, &trace);
//! let hits: Vec<bool> = trace
//!     .iter()
//!     .map(|&key| cache.lookup_update(key, |k| *k as u32))
//!     .collect();
//!
//! // B never recurs, so it is not admitted and A survives the gap.
//! assert_eq!(hits, [false, false, true]);
//! ```

use std::cmp::Reverse;
use std::fmt::Debug;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::{FutureIndex, LazyMinHeap, NextUse, SlotArena, SlotId};
use crate::error::InvariantError;
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::PcaMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::PcaMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider, PcaMetricsRecorder};
use crate::traits::{OfflineCacheTrait, ReplayCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

#[derive(Debug, Clone, Copy)]
struct Resident {
    slot: SlotId,
    next: NextUse,
}

/// Offline-optimal replay cache.
#[derive(Debug)]
pub struct PcaCache<K, V> {
    capacity: usize,
    store: SlotArena<Entry<K, V>>,
    index: FxHashMap<K, Resident>,
    future: FutureIndex<K>,
    selector: LazyMinHeap<SlotId, Reverse<usize>>,
    redundant: Vec<SlotId>,
    position: usize,
    #[cfg(feature = "metrics")]
    metrics: PcaMetrics,
}

impl<K, V> PcaCache<K, V>
where
    K: Eq + Hash + Clone,
{
    const MAX_HEAP_FACTOR: usize = 4;

    /// Creates an empty cache for replaying `trace`.
    ///
    /// The whole sequence is indexed up front; nothing is cached yet.
    pub fn new<I>(capacity: usize, trace: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let future = FutureIndex::from_trace(trace);
        debug!(
            capacity,
            trace_len = future.trace_len(),
            distinct_keys = future.distinct_keys(),
            "pca cache created"
        );
        // No more keys than the trace holds can ever be resident.
        let reserved = capacity.min(future.distinct_keys());
        Self {
            capacity,
            store: SlotArena::with_capacity(reserved),
            index: FxHashMap::with_capacity_and_hasher(reserved, Default::default()),
            future,
            selector: LazyMinHeap::with_capacity(reserved),
            redundant: Vec::new(),
            position: 0,
            #[cfg(feature = "metrics")]
            metrics: PcaMetrics::default(),
        }
    }

    /// Like [`new`](Self::new), cloning the keys of `trace` into the occurrence index.
    pub fn from_slice(capacity: usize, trace: &[K]) -> Self {
        Self::new(capacity, trace.iter().cloned())
    }

    /// Length of the indexed trace.
    pub fn trace_len(&self) -> usize {
        self.future.trace_len()
    }

    /// Residents known never to be referenced again.
    pub fn redundant_len(&self) -> usize {
        self.redundant.len()
    }

    /// Iterates resident `(key, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter().map(|(_, entry)| (&entry.key, &entry.value))
    }

    /// Makes room for a key whose next use is `incoming`.
    ///
    /// Returns `false` when admitting the key would not pay off, in which
    /// case nothing is evicted.
    fn free_space(&mut self, incoming: NextUse) -> bool {
        if let Some(slot) = self.redundant.pop() {
            self.evict_slot(slot);
            #[cfg(feature = "metrics")]
            self.metrics.record_redundant_evict();
            return true;
        }

        let NextUse::At(incoming) = incoming else {
            return false;
        };
        let farthest = match self.selector.peek_best() {
            Some((_, Reverse(pos))) => *pos,
            None => return false,
        };
        if incoming >= farthest {
            return false;
        }

        let Some((slot, _)) = self.selector.pop_best() else {
            return false;
        };
        self.evict_slot(slot);
        #[cfg(feature = "metrics")]
        self.metrics.record_farthest_evict();
        true
    }

    fn evict_slot(&mut self, slot: SlotId) {
        if let Some(entry) = self.store.remove(slot) {
            self.index.remove(&entry.key);
            trace!(slot = slot.index(), position = self.position, "pca eviction");
        }
    }

    /// Files a resident under its next use.
    fn file(&mut self, slot: SlotId, next: NextUse) {
        match next {
            NextUse::At(pos) => {
                self.selector.update(slot, Reverse(pos));
            },
            NextUse::Never => self.redundant.push(slot),
        }
    }

    fn decline(&mut self, next: NextUse) -> bool {
        trace!(position = self.position, %next, "pca declined insert");
        #[cfg(feature = "metrics")]
        self.metrics.record_declined();
        false
    }

    /// Checks that store, key index, selector and redundant stack agree.
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
        if self.index.len() != self.store.len() {
            return Err(InvariantError::new(format!(
                "index has {} keys, store has {} entries",
                self.index.len(),
                self.store.len()
            )));
        }
        if self.selector.len() + self.redundant.len() != self.store.len() {
            return Err(InvariantError::new(format!(
                "selector {} + redundant {} != store {}",
                self.selector.len(),
                self.redundant.len(),
                self.store.len()
            )));
        }
        for (key, resident) in &self.index {
            let entry = self.store.get(resident.slot).ok_or_else(|| {
                InvariantError::new(format!("key {key:?} points at vacant {:?}", resident.slot))
            })?;
            if entry.key != *key {
                return Err(InvariantError::new(format!(
                    "key {key:?} points at slot holding {:?}",
                    entry.key
                )));
            }
            let filed = match resident.next {
                NextUse::At(pos) => self.selector.score_of(&resident.slot) == Some(&Reverse(pos)),
                NextUse::Never => {
                    !self.selector.contains(&resident.slot)
                        && self.redundant.iter().filter(|s| **s == resident.slot).count() == 1
                },
            };
            if !filed {
                return Err(InvariantError::new(format!(
                    "key {key:?} is not filed under next use {}",
                    resident.next
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> ReplayCache<K, V> for PcaCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, value_fn: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        self.position += 1;
        let next = self.future.advance(&key);

        if let Some(resident) = self.index.get_mut(&key) {
            let previous = resident.next;
            resident.next = next;
            let slot = resident.slot;
            // A resident already on the redundant stack stays there once.
            if !previous.is_never() {
                self.selector.remove(&slot);
                self.file(slot, next);
                self.selector.maybe_rebuild(Self::MAX_HEAP_FACTOR);
            }
            #[cfg(feature = "metrics")]
            self.metrics.record_hit();
            return true;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_miss();

        if self.capacity == 0 {
            return false;
        }
        if next.is_never() {
            return self.decline(next);
        }
        if self.store.len() >= self.capacity && !self.free_space(next) {
            return self.decline(next);
        }

        let value = value_fn(&key);
        let slot = self.store.insert(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, Resident { slot, next });
        self.file(slot, next);
        #[cfg(feature = "metrics")]
        self.metrics.record_insert();
        false
    }

    fn get(&self, key: &K) -> Option<&V> {
        let resident = self.index.get(key)?;
        self.store.get(resident.slot).map(|entry| &entry.value)
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

    /// Drops every entry and the occurrence index itself.
    ///
    /// Further replay requires [`reset`](OfflineCacheTrait::reset) with a
    /// trace; until then every key is treated as never recurring.
    fn clear(&mut self) {
        debug!(
            evicted = self.store.len(),
            position = self.position,
            "pca cache cleared"
        );
        self.store.clear();
        self.index.clear();
        self.selector.clear();
        self.redundant.clear();
        self.future.clear();
        self.position = 0;
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();
    }
}

impl<K, V> OfflineCacheTrait<K, V> for PcaCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn next_use(&self, key: &K) -> NextUse {
        self.future.peek(key)
    }

    fn position(&self) -> usize {
        self.position
    }

    fn reset<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>,
    {
        self.clear();
        self.future = FutureIndex::from_trace(trace);
        debug!(trace_len = self.future.trace_len(), "pca cache reset");
    }
}

#[cfg(feature = "metrics")]
impl<K, V> PcaCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> PcaMetricsSnapshot {
        PcaMetricsSnapshot {
            lookups: self.metrics.lookups,
            hits: self.metrics.hits,
            misses: self.metrics.misses,
            inserts: self.metrics.inserts,
            evictions: self.metrics.evictions,
            clears: self.metrics.clears,
            declined: self.metrics.declined,
            redundant_evictions: self.metrics.redundant_evictions,
            farthest_evictions: self.metrics.farthest_evictions,
            cache_len: self.store.len(),
            redundant_len: self.redundant.len(),
            capacity: self.capacity,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<PcaMetricsSnapshot> for PcaCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> PcaMetricsSnapshot {
        self.metrics_snapshot()
    }
}

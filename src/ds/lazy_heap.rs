//! Lazy min-heap with stale record skipping.
//!
//! Both eviction selectors are built on this structure. Re-scoring a key
//! does not search the heap; it pushes a fresh record and lets the old one go
//! stale. Stale records are dropped when they surface at the top.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  live: FxHashMap<K, (S, seq)>    authoritative score per key        │
//! │                                                                     │
//! │    slot#0 → (2, seq=7)                                              │
//! │    slot#1 → (0, seq=4)                                              │
//! │                                                                     │
//! │  heap: BinaryHeap<Reverse<Record>>    ordered by (score, seq)       │
//! │                                                                     │
//! │    (0, seq=1, slot#0)  ← stale: live[slot#0].seq is 7               │
//! │    (0, seq=4, slot#1)  ← live                                       │
//! │    (1, seq=5, slot#0)  ← stale                                      │
//! │    (2, seq=7, slot#0)  ← live                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A record is live only when the map holds exactly its `(score, seq)` pair.
//! Every `update` draws a fresh `seq`, so equal scores never collapse into
//! one record, and a key that is removed and later re-added (a recycled
//! arena slot, say) cannot resurrect one of its old records.
//!
//! ## Operations
//!
//! | Operation       | Complexity          |
//! |-----------------|---------------------|
//! | `update`        | O(log n)            |
//! | `remove`        | O(1)                |
//! | `peek_best`     | amortized O(log n)  |
//! | `pop_best`      | amortized O(log n)  |
//! | `rebuild`       | O(n log n)          |
//!
//! ## Example
//!
//! ```
//! use cachesim::ds::LazyMinHeap;
//!
//! let mut heap: LazyMinHeap<&str, u32> = LazyMinHeap::new();
//! heap.update("a", 3);
//! heap.update("b", 1);
//! heap.update("c", 1);
//! heap.update("a", 0);
//!
//! // Equal scores pop in update order.
//! assert_eq!(heap.pop_best(), Some(("a", 0)));
//! assert_eq!(heap.pop_best(), Some(("b", 1)));
//! assert_eq!(heap.pop_best(), Some(("c", 1)));
//! assert_eq!(heap.pop_best(), None);
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::hash::Hash;

use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct Record<K, S> {
    score: S,
    seq: u64,
    key: K,
}

impl<K, S: Ord> PartialEq for Record<K, S> {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.seq == other.seq
    }
}

impl<K, S: Ord> Eq for Record<K, S> {}

impl<K, S: Ord> PartialOrd for Record<K, S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K, S: Ord> Ord for Record<K, S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap keyed by `K` with O(log n) re-scoring via lazy deletion.
#[derive(Debug)]
pub struct LazyMinHeap<K, S> {
    live: FxHashMap<K, (S, u64)>,
    heap: BinaryHeap<Reverse<Record<K, S>>>,
    seq: u64,
}

impl<K, S> LazyMinHeap<K, S>
where
    K: Eq + Hash + Clone,
    S: Ord + Clone,
{
    pub fn new() -> Self {
        Self {
            live: FxHashMap::default(),
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            live: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: BinaryHeap::with_capacity(capacity),
            seq: 0,
        }
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Physical heap length, stale records included.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.live.contains_key(key)
    }

    /// Current score of `key`, if it is live.
    pub fn score_of(&self, key: &K) -> Option<&S> {
        self.live.get(key).map(|(score, _)| score)
    }

    /// Sets `key`'s score and returns the previous one.
    ///
    /// ```
    /// use cachesim::ds::LazyMinHeap;
    ///
    /// let mut heap: LazyMinHeap<u8, u64> = LazyMinHeap::new();
    /// assert_eq!(heap.update(1, 10), None);
    /// assert_eq!(heap.update(1, 11), Some(10));
    /// assert_eq!(heap.len(), 1);
    /// assert_eq!(heap.heap_len(), 2);
    /// ```
    pub fn update(&mut self, key: K, score: S) -> Option<S> {
        let seq = self.next_seq();
        let previous = self.live.insert(key.clone(), (score.clone(), seq));
        self.heap.push(Reverse(Record { score, seq, key }));
        previous.map(|(score, _)| score)
    }

    /// Forgets `key`. Its heap records go stale and are skipped later.
    pub fn remove(&mut self, key: &K) -> Option<S> {
        self.live.remove(key).map(|(score, _)| score)
    }

    /// Returns the minimum live `(key, score)` without removing it.
    ///
    /// Takes `&mut self` because stale records at the top are discarded on
    /// the way.
    pub fn peek_best(&mut self) -> Option<(&K, &S)> {
        self.discard_stale();
        self.heap
            .peek()
            .map(|Reverse(record)| (&record.key, &record.score))
    }

    /// Removes and returns the minimum live `(key, score)`.
    pub fn pop_best(&mut self) -> Option<(K, S)> {
        self.discard_stale();
        let Reverse(record) = self.heap.pop()?;
        self.live.remove(&record.key);
        Some((record.key, record.score))
    }

    /// Rebuilds the heap from the live map, dropping every stale record.
    ///
    /// Records keep their sequence numbers, so pop order is unchanged.
    pub fn rebuild(&mut self) {
        let records: Vec<_> = self
            .live
            .iter()
            .map(|(key, (score, seq))| {
                Reverse(Record {
                    score: score.clone(),
                    seq: *seq,
                    key: key.clone(),
                })
            })
            .collect();
        self.heap = BinaryHeap::from(records);
    }

    /// Rebuilds once the heap holds more than `factor` records per live key.
    pub fn maybe_rebuild(&mut self, factor: usize) {
        let factor = factor.max(1);
        if self.heap.len() > self.live.len().max(1).saturating_mul(factor) {
            self.rebuild();
        }
    }

    pub fn clear(&mut self) {
        self.live.clear();
        self.heap.clear();
        self.seq = 0;
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        assert!(self.heap.len() >= self.live.len());
        let live_records = self
            .heap
            .iter()
            .filter(|Reverse(record)| Self::is_live(&self.live, record))
            .count();
        assert_eq!(live_records, self.live.len());
    }

    fn is_live(live: &FxHashMap<K, (S, u64)>, record: &Record<K, S>) -> bool {
        live.get(&record.key)
            .is_some_and(|(_, seq)| *seq == record.seq)
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse(top)) = self.heap.peek() {
            if Self::is_live(&self.live, top) {
                return;
            }
            self.heap.pop();
        }
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.seq;
        self.seq = self.seq.wrapping_add(1);
        seq
    }
}

impl<K, S> Default for LazyMinHeap<K, S>
where
    K: Eq + Hash + Clone,
    S: Ord + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

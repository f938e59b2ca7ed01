//! # Replay Cache Traits
//!
//! Every engine in this crate answers the same question for each element of
//! a key trace: *was this key resident?* On a miss the engine may ask the
//! caller to materialize the value and keep it. The shared contract is
//! [`ReplayCache`]; policy-specific inspection lives in the traits that
//! extend it.
//!
//! ```text
//!                    ┌──────────────────────────────────────────┐
//!                    │            ReplayCache<K, V>             │
//!                    │                                          │
//!                    │  lookup_update(&mut, K, FnOnce) → bool   │
//!                    │  get(&, &K) → Option<&V>                 │
//!                    │  contains(&, &K) → bool                  │
//!                    │  len / capacity / is_empty / is_full     │
//!                    │  clear(&mut)                             │
//!                    └───────────────────┬──────────────────────┘
//!                                        │
//!                 ┌──────────────────────┴───────────────────────┐
//!                 ▼                                              ▼
//!   ┌──────────────────────────────┐            ┌──────────────────────────────┐
//!   │    LfuCacheTrait<K, V>       │            │   OfflineCacheTrait<K, V>    │
//!   │                              │            │                              │
//!   │  use_count(&K) → u64         │            │  next_use(&K) → NextUse      │
//!   │  peek_victim() → &K          │            │  position() → usize          │
//!   │                              │            │  reset(trace)                │
//!   └──────────────────────────────┘            └──────────────────────────────┘
//! ```
//!
//! ## The value producer
//!
//! `lookup_update` takes the producer as an `FnOnce(&K) -> V`. The type
//! system enforces "at most once per call". Engines call it only when they
//! actually store a new entry: never on a hit, never when an insert is
//! declined, never when capacity is zero.
//!
//! ## Thread Safety
//!
//! None of the engines synchronise internally. Wrap one in
//! `shared::SharedCache` (feature `concurrency`) or any other single
//! exclusive lock to use it from several threads.

use crate::ds::NextUse;

/// Operations common to every replay engine.
///
/// # Example
///
/// ```
/// use cachesim::policy::lfu::LfuCache;
/// use cachesim::traits::ReplayCache;
///
/// fn hits<C: ReplayCache<u32, String>>(cache: &mut C, trace: &[u32]) -> usize {
///     trace
///         .iter()
///         .filter(|&&key| cache.lookup_update(key, |k| k.to_string()))
///         .count()
/// }
///
/// let mut cache = LfuCache::new(2);
/// assert_eq!(hits(&mut cache, &[1, 2, 1, 3, 1]), 2);
/// ```
pub trait ReplayCache<K, V> {
    /// Looks `key` up and returns `true` on a hit.
    ///
    /// On a miss the engine applies its admission and eviction policy and,
    /// if it decides to store the key, calls `value_fn` exactly once.
    fn lookup_update<F>(&mut self, key: K, value_fn: F) -> bool
    where
        F: FnOnce(&K) -> V;

    /// Returns the resident value without touching policy state.
    fn get(&self, key: &K) -> Option<&V>;

    /// Checks residency without touching policy state.
    fn contains(&self, key: &K) -> bool;

    /// Number of resident entries.
    fn len(&self) -> usize;

    /// Maximum number of resident entries.
    fn capacity(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` once `len() == capacity()`. A zero-capacity cache is always full.
    fn is_full(&self) -> bool {
        self.len() >= self.capacity()
    }

    /// Drops every entry and all bookkeeping.
    fn clear(&mut self);
}

/// Frequency-ordered engines.
pub trait LfuCacheTrait<K, V>: ReplayCache<K, V> {
    /// Hits recorded for a resident key since it was inserted.
    fn use_count(&self, key: &K) -> Option<u64>;

    /// Key that would be evicted by the next miss on a full cache.
    ///
    /// Takes `&mut self` since stale selector records are dropped on the way.
    fn peek_victim(&mut self) -> Option<&K>;
}

/// Engines that know the complete trace ahead of time.
pub trait OfflineCacheTrait<K, V>: ReplayCache<K, V> {
    /// Next trace position at which `key` is referenced.
    fn next_use(&self, key: &K) -> NextUse;

    /// Number of lookups replayed so far.
    fn position(&self) -> usize;

    /// Empties the cache and installs the occurrence index of a new trace.
    fn reset<I>(&mut self, trace: I)
    where
        I: IntoIterator<Item = K>;
}

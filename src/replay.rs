//! Trace replay helpers.
//!
//! Thin drivers over [`ReplayCache`]: feed a trace through an engine and
//! count hits, or run both engines side by side.
//!
//! ```
//! use cachesim::policy::pca::PcaCache;
//! use cachesim::replay::{count_hits, hit_sequence};
//!
//! let trace = [1, 2, 1];
//! let mut cache: PcaCache<i32, ()> = PcaCache::from_slice(1, &trace);
//! assert_eq!(hit_sequence(&mut cache, &trace), [false, false, true]);
//!
//! let mut cache: PcaCache<i32, ()> = PcaCache::from_slice(1, &trace);
//! assert_eq!(count_hits(&mut cache, &trace), 1);
//! ```

use std::hash::Hash;

use tracing::debug;

use crate::policy::lfu::LfuCache;
use crate::policy::pca::PcaCache;
use crate::traits::ReplayCache;

/// Replays `trace` and counts hits, storing `V::default()` on inserts.
pub fn count_hits<C, K, V>(cache: &mut C, trace: &[K]) -> usize
where
    C: ReplayCache<K, V>,
    K: Clone,
    V: Default,
{
    count_hits_with(cache, trace, |_| V::default())
}

/// Replays `trace` and counts hits, materializing values with `value_fn`.
pub fn count_hits_with<C, K, V, F>(cache: &mut C, trace: &[K], mut value_fn: F) -> usize
where
    C: ReplayCache<K, V>,
    K: Clone,
    F: FnMut(&K) -> V,
{
    trace
        .iter()
        .filter(|key| cache.lookup_update((*key).clone(), &mut value_fn))
        .count()
}

/// Hit (`true`) or miss (`false`) for every element of `trace`.
pub fn hit_sequence<C, K, V>(cache: &mut C, trace: &[K]) -> Vec<bool>
where
    C: ReplayCache<K, V>,
    K: Clone,
    V: Default,
{
    trace
        .iter()
        .map(|key| cache.lookup_update(key.clone(), |_| V::default()))
        .collect()
}

/// Hit counts of both engines on one trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison {
    pub capacity: usize,
    pub lookups: usize,
    pub lfu_hits: usize,
    pub pca_hits: usize,
}

impl Comparison {
    pub fn lfu_hit_ratio(&self) -> f64 {
        ratio(self.lfu_hits, self.lookups)
    }

    pub fn pca_hit_ratio(&self) -> f64 {
        ratio(self.pca_hits, self.lookups)
    }

    /// Hits the LFU engine left on the table.
    pub fn gap(&self) -> usize {
        self.pca_hits.saturating_sub(self.lfu_hits)
    }
}

fn ratio(hits: usize, lookups: usize) -> f64 {
    if lookups == 0 {
        0.0
    } else {
        hits as f64 / lookups as f64
    }
}

/// Replays `trace` through a fresh LFU and a fresh offline engine.
pub fn compare<K>(capacity: usize, trace: &[K]) -> Comparison
where
    K: Eq + Hash + Clone,
{
    let mut lfu: LfuCache<K, ()> = LfuCache::new(capacity);
    let lfu_hits = count_hits(&mut lfu, trace);

    let mut pca: PcaCache<K, ()> = PcaCache::from_slice(capacity, trace);
    let pca_hits = count_hits(&mut pca, trace);

    debug!(capacity, lookups = trace.len(), lfu_hits, pca_hits, "replay compared");
    Comparison {
        capacity,
        lookups: trace.len(),
        lfu_hits,
        pca_hits,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    const CLASSIC: [i64; 20] = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];

    #[test]
    fn compare_classic_reference_string() {
        let result = compare(3, &CLASSIC);
        assert_eq!(result.lookups, 20);
        assert_eq!(result.pca_hits, 12);
        assert_eq!(result.lfu_hits, 9);
        assert_eq!(result.gap(), 3);
        assert!((result.pca_hit_ratio() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn compare_across_capacities() {
        let trace: Vec<char> = "ABCDABEABCDE".chars().collect();
        assert_eq!(compare(3, &trace).pca_hits, 5);
        assert_eq!(compare(3, &trace).lfu_hits, 2);
        assert_eq!(compare(4, &trace).pca_hits, 6);
        assert_eq!(compare(4, &trace).lfu_hits, 4);
    }

    #[test]
    fn empty_trace_has_zero_ratio() {
        let result = compare::<u8>(4, &[]);
        assert_eq!(result.lookups, 0);
        assert_eq!(result.lfu_hit_ratio(), 0.0);
        assert_eq!(result.pca_hit_ratio(), 0.0);
    }

    #[test]
    fn count_hits_with_calls_producer_per_insert() {
        let trace = [1, 2, 1, 3, 1];
        let mut cache: LfuCache<i32, i32> = LfuCache::new(2);
        let calls = Cell::new(0);
        let hits = count_hits_with(&mut cache, &trace, |k| {
            calls.set(calls.get() + 1);
            k * 10
        });
        assert_eq!(hits, 2);
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.get(&3), Some(&30));
    }

    #[test]
    fn hit_sequence_lfu() {
        let trace: Vec<char> = "ABAC".chars().collect();
        let mut cache: LfuCache<char, ()> = LfuCache::new(2);
        assert_eq!(hit_sequence(&mut cache, &trace), [false, false, true, false]);
        assert!(cache.contains(&'A'));
        assert!(cache.contains(&'C'));
    }
}

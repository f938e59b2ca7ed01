//! Unified cache builder for both replacement engines.
//!
//! Lets a driver pick the engine at runtime and replay through one type.
//! The offline engine needs the trace up front; the LFU engine ignores it.
//!
//! ## Example
//!
//! ```rust
//! use cachesim::builder::{CacheBuilder, CachePolicy};
//! use cachesim::traits::ReplayCache;
//!
//! let trace = vec![1u64, 2, 1, 3, 1];
//! for policy in [CachePolicy::Lfu, CachePolicy::Pca] {
//!     let mut cache = CacheBuilder::new(2).build::<u64, String>(policy, trace.iter().copied());
//!     let hits = trace
//!         .iter()
//!         .filter(|&&key| cache.lookup_update(key, |k| k.to_string()))
//!         .count();
//!     assert_eq!(hits, 2, "{policy}");
//! }
//! ```

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::policy::lfu::LfuCache;
use crate::policy::pca::PcaCache;
use crate::traits::ReplayCache;

/// Available replacement policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CachePolicy {
    /// Least Frequently Used eviction.
    Lfu,
    /// Offline-optimal eviction over a known trace.
    Pca,
}

impl CachePolicy {
    pub const ALL: [CachePolicy; 2] = [CachePolicy::Lfu, CachePolicy::Pca];

    pub fn name(self) -> &'static str {
        match self {
            CachePolicy::Lfu => "lfu",
            CachePolicy::Pca => "pca",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CachePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lfu" => Ok(CachePolicy::Lfu),
            "pca" | "perfect" | "belady" => Ok(CachePolicy::Pca),
            other => Err(ConfigError::new(format!("unknown cache policy {other:?}"))),
        }
    }
}

/// Either engine behind one [`ReplayCache`] implementation.
#[derive(Debug)]
pub enum Cache<K, V> {
    Lfu(LfuCache<K, V>),
    Pca(PcaCache<K, V>),
}

impl<K, V> Cache<K, V> {
    pub fn policy(&self) -> CachePolicy {
        match self {
            Cache::Lfu(_) => CachePolicy::Lfu,
            Cache::Pca(_) => CachePolicy::Pca,
        }
    }
}

impl<K, V> ReplayCache<K, V> for Cache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn lookup_update<F>(&mut self, key: K, value_fn: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        match self {
            Cache::Lfu(lfu) => lfu.lookup_update(key, value_fn),
            Cache::Pca(pca) => pca.lookup_update(key, value_fn),
        }
    }

    fn get(&self, key: &K) -> Option<&V> {
        match self {
            Cache::Lfu(lfu) => lfu.get(key),
            Cache::Pca(pca) => pca.get(key),
        }
    }

    fn contains(&self, key: &K) -> bool {
        match self {
            Cache::Lfu(lfu) => lfu.contains(key),
            Cache::Pca(pca) => pca.contains(key),
        }
    }

    fn len(&self) -> usize {
        match self {
            Cache::Lfu(lfu) => lfu.len(),
            Cache::Pca(pca) => pca.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            Cache::Lfu(lfu) => lfu.capacity(),
            Cache::Pca(pca) => pca.capacity(),
        }
    }

    fn clear(&mut self) {
        match self {
            Cache::Lfu(lfu) => lfu.clear(),
            Cache::Pca(pca) => pca.clear(),
        }
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Like [`new`](Self::new), but rejects capacities above `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `capacity > limit`.
    ///
    /// ```
    /// use cachesim::builder::CacheBuilder;
    ///
    /// assert!(CacheBuilder::try_with_capacity_limit(64, 1024).is_ok());
    /// assert!(CacheBuilder::try_with_capacity_limit(4096, 1024).is_err());
    /// ```
    pub fn try_with_capacity_limit(capacity: usize, limit: usize) -> Result<Self, ConfigError> {
        if capacity > limit {
            return Err(ConfigError::new(format!(
                "capacity {capacity} exceeds limit {limit}"
            )));
        }
        Ok(Self::new(capacity))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build a cache with the specified policy.
    ///
    /// `trace` is the full sequence that will be replayed. Only
    /// [`CachePolicy::Pca`] consumes it.
    pub fn build<K, V>(self, policy: CachePolicy, trace: impl IntoIterator<Item = K>) -> Cache<K, V>
    where
        K: Eq + Hash + Clone,
    {
        match policy {
            CachePolicy::Lfu => Cache::Lfu(LfuCache::new(self.capacity)),
            CachePolicy::Pca => Cache::Pca(PcaCache::new(self.capacity, trace)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_policies_basic_ops() {
        let trace = [1u64, 2, 1, 2, 3];
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(10).build::<u64, String>(policy, trace);
            assert_eq!(cache.policy(), policy);

            assert!(!cache.lookup_update(1, |k| k.to_string()));
            assert!(!cache.lookup_update(2, |k| k.to_string()));
            assert_eq!(cache.get(&1), Some(&"1".to_string()));
            assert!(cache.contains(&2));
            assert!(!cache.contains(&99));
            assert_eq!(cache.len(), 2);
            assert_eq!(cache.capacity(), 10);

            assert!(cache.lookup_update(1, |_| unreachable!()));

            cache.clear();
            assert!(cache.is_empty());
        }
    }

    #[test]
    fn test_capacity_enforcement() {
        let trace = [1u64, 2, 3, 1, 2, 3];
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(2).build::<u64, ()>(policy, trace);
            for key in trace {
                cache.lookup_update(key, |_| ());
                assert!(cache.len() <= 2, "{policy}");
            }
        }
    }

    #[test]
    fn test_capacity_limit() {
        let builder = CacheBuilder::try_with_capacity_limit(0, 0).unwrap();
        assert_eq!(builder.capacity(), 0);

        let err = CacheBuilder::try_with_capacity_limit(5, 4).unwrap_err();
        assert_eq!(err.to_string(), "capacity 5 exceeds limit 4");
    }

    #[test]
    fn test_policy_parse_and_display() {
        assert_eq!("lfu".parse::<CachePolicy>().unwrap(), CachePolicy::Lfu);
        assert_eq!("PCA".parse::<CachePolicy>().unwrap(), CachePolicy::Pca);
        assert_eq!("perfect".parse::<CachePolicy>().unwrap(), CachePolicy::Pca);
        assert!("lru".parse::<CachePolicy>().is_err());

        for policy in CachePolicy::ALL {
            assert_eq!(policy.to_string().parse::<CachePolicy>().unwrap(), policy);
        }
    }
}

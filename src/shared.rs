//! Single-lock wrapper for sharing one engine between threads.
//!
//! Every lookup mutates engine state (use counts, the replay cursor), so a
//! plain exclusive [`parking_lot::Mutex`] guards the whole engine. Engines
//! themselves stay lock-free and single-threaded.
//!
//! Replaying an offline engine from several threads only makes sense when
//! the threads agree on the interleaving the engine was built from.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//!
//! use cachesim::policy::lfu::LfuCache;
//! use cachesim::shared::SharedCache;
//!
//! let cache: Arc<SharedCache<_, u32, u32>> = Arc::new(SharedCache::new(LfuCache::new(64)));
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for key in 0..16 {
//!                 cache.lookup_update(key + t, |k| *k * 2);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 19);
//! ```

use std::fmt;
use std::marker::PhantomData;

use parking_lot::Mutex;

use crate::traits::ReplayCache;

pub struct SharedCache<C, K, V> {
    inner: Mutex<C>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<C, K, V> SharedCache<C, K, V>
where
    C: ReplayCache<K, V>,
{
    pub fn new(cache: C) -> Self {
        Self {
            inner: Mutex::new(cache),
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> C {
        self.inner.into_inner()
    }

    /// Runs `f` with exclusive access to the engine.
    pub fn with<R>(&self, f: impl FnOnce(&mut C) -> R) -> R {
        let mut cache = self.inner.lock();
        f(&mut cache)
    }

    /// Locked [`ReplayCache::lookup_update`].
    ///
    /// `value_fn` runs while the lock is held.
    pub fn lookup_update<F>(&self, key: K, value_fn: F) -> bool
    where
        F: FnOnce(&K) -> V,
    {
        let mut cache = self.inner.lock();
        cache.lookup_update(key, value_fn)
    }

    pub fn get_with<R>(&self, key: &K, f: impl FnOnce(&V) -> R) -> Option<R> {
        let cache = self.inner.lock();
        cache.get(key).map(f)
    }

    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.lock();
        cache.contains(key)
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.lock();
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        let cache = self.inner.lock();
        cache.capacity()
    }

    pub fn clear(&self) {
        let mut cache = self.inner.lock();
        cache.clear();
    }
}

impl<C, K, V> fmt::Debug for SharedCache<C, K, V>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCache").field("inner", &self.inner).finish()
    }
}

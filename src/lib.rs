//! cachesim: LFU and offline-optimal cache replacement engines for trace
//! replay.
//!
//! Both engines answer one question per trace element, "was this key
//! resident?", through [`traits::ReplayCache::lookup_update`]. Comparing
//! their hit counts on the same trace shows how far an online policy is
//! from the best any policy could do.
//!
//! ```
//! use cachesim::replay::compare;
//!
//! let trace = [1, 2, 1, 3, 1, 2];
//! let result = compare(2, &trace);
//! assert!(result.pca_hits >= result.lfu_hits);
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod replay;
pub mod trace;
pub mod traits;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "concurrency")]
pub mod shared;

//! Replacement engines.
//!
//! - [`lfu`]: online least-frequently-used eviction.
//! - [`pca`]: offline-optimal eviction (Belady's MIN) over a known trace.

pub mod lfu;
pub mod pca;

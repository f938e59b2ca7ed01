pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{FutureIndex, LazyMinHeap, NextUse, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, TraceError};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::{LfuMetricsSnapshot, PcaMetricsSnapshot};
#[cfg(feature = "metrics")]
pub use crate::metrics::traits::MetricsSnapshotProvider;
pub use crate::policy::lfu::LfuCache;
pub use crate::policy::pca::PcaCache;
pub use crate::replay::{Comparison, compare, count_hits, count_hits_with, hit_sequence};
#[cfg(feature = "concurrency")]
pub use crate::shared::SharedCache;
pub use crate::trace::{AUTO_SUITE, RunInput, TraceShape, TraceSpec, parse_run_input};
pub use crate::traits::{LfuCacheTrait, OfflineCacheTrait, ReplayCache};

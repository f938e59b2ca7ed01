//! # Metrics Trait Hierarchy
//!
//! Recording and snapshotting are split into small traits so policy code
//! only ever writes counters and consumers only ever read snapshots.
//!
//! ```text
//!                 ┌─────────────────────────────┐
//!                 │     CoreMetricsRecorder     │
//!                 │  hit/miss/insert/evict      │
//!                 │  clear                      │
//!                 └──────────────┬──────────────┘
//!                                │
//!              ┌─────────────────┴──────────────────┐
//!              ▼                                    ▼
//!      ┌───────────────┐                 ┌────────────────────┐
//!      │  LfuMetrics   │                 │ PcaMetricsRecorder │
//!      │ (core only)   │                 │ declined/redundant │
//!      └───────────────┘                 │ farthest evictions │
//!                                        └────────────────────┘
//!
//!   Consumption:
//!   ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │
//!   └──────────────────────────────┘
//! ```

/// Counters shared by every policy.
pub trait CoreMetricsRecorder {
    fn record_hit(&mut self);
    fn record_miss(&mut self);
    fn record_insert(&mut self);
    fn record_evict(&mut self);
    fn record_clear(&mut self);
}

/// Extra signals of the offline-optimal policy.
pub trait PcaMetricsRecorder: CoreMetricsRecorder {
    /// A miss that was not admitted.
    fn record_declined(&mut self);
    /// Eviction served from the no-future-reuse stack.
    fn record_redundant_evict(&mut self);
    /// Eviction of the resident with the farthest next use.
    fn record_farthest_evict(&mut self);
}

/// Produces a point-in-time copy of a cache's counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

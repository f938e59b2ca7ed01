//! Hit/miss and eviction counters for the replay engines.
//!
//! Compiled only with the `metrics` feature. Each engine owns one recorder
//! and exposes a [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider)
//! returning a plain-data snapshot.

pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

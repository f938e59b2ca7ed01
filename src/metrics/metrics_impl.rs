use crate::metrics::traits::{CoreMetricsRecorder, PcaMetricsRecorder};

#[derive(Debug, Default, Clone)]
pub struct LfuMetrics {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub clears: u64,
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_hit(&mut self) {
        self.lookups += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.lookups += 1;
        self.misses += 1;
    }

    fn record_insert(&mut self) {
        self.inserts += 1;
    }

    fn record_evict(&mut self) {
        self.evictions += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

#[derive(Debug, Default, Clone)]
pub struct PcaMetrics {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub clears: u64,
    pub declined: u64,
    pub redundant_evictions: u64,
    pub farthest_evictions: u64,
}

impl CoreMetricsRecorder for PcaMetrics {
    fn record_hit(&mut self) {
        self.lookups += 1;
        self.hits += 1;
    }

    fn record_miss(&mut self) {
        self.lookups += 1;
        self.misses += 1;
    }

    fn record_insert(&mut self) {
        self.inserts += 1;
    }

    fn record_evict(&mut self) {
        self.evictions += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl PcaMetricsRecorder for PcaMetrics {
    fn record_declined(&mut self) {
        self.declined += 1;
    }

    fn record_redundant_evict(&mut self) {
        self.record_evict();
        self.redundant_evictions += 1;
    }

    fn record_farthest_evict(&mut self) {
        self.record_evict();
        self.farthest_evictions += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lfu_counts_lookups() {
        let mut m = LfuMetrics::default();
        m.record_hit();
        m.record_miss();
        m.record_miss();
        m.record_insert();
        assert_eq!(m.lookups, 3);
        assert_eq!(m.hits, 1);
        assert_eq!(m.misses, 2);
        assert_eq!(m.inserts, 1);
    }

    #[test]
    fn pca_evictions_roll_up() {
        let mut m = PcaMetrics::default();
        m.record_redundant_evict();
        m.record_farthest_evict();
        m.record_farthest_evict();
        m.record_declined();
        assert_eq!(m.evictions, 3);
        assert_eq!(m.redundant_evictions, 1);
        assert_eq!(m.farthest_evictions, 2);
        assert_eq!(m.declined, 1);
    }
}

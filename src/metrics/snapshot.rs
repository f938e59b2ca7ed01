#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub clears: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PcaMetricsSnapshot {
    pub lookups: u64,
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
    pub clears: u64,
    pub declined: u64,
    pub redundant_evictions: u64,
    pub farthest_evictions: u64,

    pub cache_len: usize,
    pub redundant_len: usize,
    pub capacity: usize,
}

impl LfuMetricsSnapshot {
    /// Fraction of lookups that hit, `0.0` before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        ratio(self.hits, self.lookups)
    }
}

impl PcaMetricsSnapshot {
    pub fn hit_ratio(&self) -> f64 {
        ratio(self.hits, self.lookups)
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

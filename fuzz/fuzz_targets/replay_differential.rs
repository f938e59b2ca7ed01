#![no_main]

use cachesim::policy::lfu::LfuCache;
use cachesim::policy::pca::PcaCache;
use cachesim::traits::ReplayCache;
use libfuzzer_sys::fuzz_target;

// First byte picks the capacity, the rest is the trace.
fuzz_target!(|data: &[u8]| {
    let Some((&cap, trace)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(cap % 32);

    let mut lfu: LfuCache<u8, u8> = LfuCache::new(capacity);
    let mut pca: PcaCache<u8, u8> = PcaCache::from_slice(capacity, trace);
    let (mut lfu_hits, mut pca_hits) = (0usize, 0usize);

    for &key in trace {
        if lfu.lookup_update(key, |k| *k) {
            lfu_hits += 1;
        }
        if pca.lookup_update(key, |k| *k) {
            pca_hits += 1;
        }
        assert!(lfu.len() <= capacity);
        assert!(pca.len() <= capacity);
        lfu.check_invariants().unwrap();
        pca.check_invariants().unwrap();
    }

    assert!(pca_hits >= lfu_hits, "pca {pca_hits} < lfu {lfu_hits}");
});

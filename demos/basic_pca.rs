use cachesim::policy::pca::PcaCache;
use cachesim::traits::{OfflineCacheTrait, ReplayCache};

fn main() {
    let trace = ["a", "b", "c", "a", "c", "b"];
    let mut cache: PcaCache<&str, usize> = PcaCache::from_slice(2, &trace);

    for key in trace {
        let hit = cache.lookup_update(key, |k| k.len());
        let next = cache.next_use(&key);
        println!("{key}: {}, next use {next}", if hit { "hit" } else { "miss" });
    }
}

// Expected output:
// a: miss, next use @3
// b: miss, next use @5
// c: miss, next use @4
// a: hit, next use never
// c: hit, next use never
// b: miss, next use never
//
// Explanation: when "c" arrives, "b" is needed later than "c", so "b" is
// evicted in favour of "c".

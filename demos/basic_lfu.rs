use cachesim::policy::lfu::LfuCache;
use cachesim::traits::{LfuCacheTrait, ReplayCache};

fn main() {
    let mut cache: LfuCache<&str, String> = LfuCache::new(2);

    for key in ["a", "b", "a", "c"] {
        let hit = cache.lookup_update(key, |k| k.to_uppercase());
        println!("{key}: {}", if hit { "hit" } else { "miss" });
    }

    println!("contains a? {}", cache.contains(&"a"));
    println!("contains b? {}", cache.contains(&"b"));
    println!("uses of a: {:?}", cache.use_count(&"a"));
}

// Expected output:
// a: miss
// b: miss
// a: hit
// c: miss
// contains a? true
// contains b? false
// uses of a: Some(1)
//
// Explanation: capacity=2; "a" was hit once, "b" never, so "c" evicts "b".

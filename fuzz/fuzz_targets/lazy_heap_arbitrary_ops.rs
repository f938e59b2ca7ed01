#![no_main]

use cachesim::ds::LazyMinHeap;
use libfuzzer_sys::fuzz_target;

// Arbitrary update/remove/pop/rebuild sequences against a plain map model.
fuzz_target!(|data: &[u8]| {
    let mut heap: LazyMinHeap<u8, u8> = LazyMinHeap::new();
    let mut model: std::collections::BTreeMap<u8, (u8, u64)> = Default::default();
    let mut stamp = 0u64;

    for chunk in data.chunks_exact(3) {
        let (op, key, score) = (chunk[0] % 6, chunk[1] % 32, chunk[2]);
        match op {
            0 => {
                stamp += 1;
                let previous = heap.update(key, score);
                let expected = model.insert(key, (score, stamp)).map(|(s, _)| s);
                assert_eq!(previous, expected);
                assert_eq!(heap.score_of(&key), Some(&score));
            },
            1 => {
                let removed = heap.remove(&key);
                assert_eq!(removed, model.remove(&key).map(|(s, _)| s));
                assert!(!heap.contains(&key));
            },
            2 => {
                // Lowest score wins; ties go to the earliest update.
                let expected = model
                    .iter()
                    .min_by_key(|(_, (s, seq))| (*s, *seq))
                    .map(|(k, (s, _))| (*k, *s));
                let popped = heap.pop_best();
                assert_eq!(popped, expected);
                if let Some((k, _)) = popped {
                    model.remove(&k);
                }
            },
            3 => {
                heap.rebuild();
                assert_eq!(heap.heap_len(), heap.len());
            },
            4 => heap.maybe_rebuild(2),
            5 => {
                heap.clear();
                model.clear();
                assert!(heap.is_empty());
            },
            _ => unreachable!(),
        }
        assert_eq!(heap.len(), model.len());
        heap.debug_validate_invariants();
    }
});

// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behaviour that must hold for both engines, plus the differential check
// that the offline engine never loses to LFU on the same trace.

use std::cell::Cell;

use cachesim::builder::{CacheBuilder, CachePolicy};
use cachesim::policy::lfu::LfuCache;
use cachesim::policy::pca::PcaCache;
use cachesim::replay::{compare, count_hits, hit_sequence};
use cachesim::trace::parse_run_input;
use cachesim::traits::ReplayCache;
use proptest::prelude::*;

// ==============================================
// Capacity-0 Behavior
// ==============================================

mod zero_capacity {
    use super::*;

    #[test]
    fn no_policy_stores_or_materializes() {
        let trace = [1u32, 1, 2, 1, 2, 2];
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(0).build::<u32, u32>(policy, trace);
            let calls = Cell::new(0);
            for key in trace {
                let hit = cache.lookup_update(key, |k| {
                    calls.set(calls.get() + 1);
                    *k
                });
                assert!(!hit, "{policy} hit with capacity 0");
            }
            assert_eq!(cache.len(), 0, "{policy}");
            assert!(cache.is_full(), "{policy}");
            assert_eq!(calls.get(), 0, "{policy} called value_fn");
        }
    }
}

// ==============================================
// Capacity Far Above Available Memory
// ==============================================
//
// Capacity is a limit, not a reservation: storage grows with residents.

mod huge_capacity {
    use super::*;

    #[test]
    fn lfu_max_capacity_replays() {
        let mut cache: LfuCache<u64, u64> = LfuCache::new(usize::MAX);
        assert!(!cache.lookup_update(1, |k| *k));
        assert!(cache.lookup_update(1, |k| *k));
        assert_eq!(cache.len(), 1);
        assert!(!cache.is_full());
    }

    #[test]
    fn pca_max_capacity_replays() {
        let trace = [1u64, 2, 1];
        let mut cache: PcaCache<u64, ()> = PcaCache::from_slice(usize::MAX, &trace);
        assert_eq!(hit_sequence(&mut cache, &trace), [false, false, true]);
        assert_eq!(cache.capacity(), usize::MAX);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn parsed_run_with_huge_cache_size_compares() {
        let run = parse_run_input("1000000000000000 3 1 2 1".as_bytes()).unwrap();
        assert_eq!(run.capacity, 1_000_000_000_000_000);

        let result = compare(run.capacity, &run.keys);
        assert_eq!(result.lfu_hits, 1);
        assert_eq!(result.pca_hits, 1);
    }

    #[test]
    fn builder_accepts_max_capacity() {
        let trace = [5u32, 5, 6];
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(usize::MAX).build::<u32, u32>(policy, trace);
            let hits = trace
                .iter()
                .filter(|&&key| cache.lookup_update(key, |k| *k))
                .count();
            assert_eq!(hits, 1, "{policy}");
        }
    }
}

// ==============================================
// Clear Semantics
// ==============================================

mod clear {
    use super::*;

    #[test]
    fn cleared_keys_miss() {
        let trace = [1u32, 2, 1, 2, 1, 2];
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(2).build::<u32, ()>(policy, trace);
            for key in &trace[..2] {
                cache.lookup_update(*key, |_| ());
            }
            assert_eq!(cache.len(), 2, "{policy}");

            cache.clear();
            assert!(cache.is_empty(), "{policy}");
            assert!(!cache.contains(&1), "{policy}");
            assert!(!cache.lookup_update(1, |_| ()), "{policy}");
        }
    }
}

// ==============================================
// Reference Traces
// ==============================================

mod reference {
    use super::*;

    #[test]
    fn lfu_aba_c() {
        let mut cache: LfuCache<char, ()> = LfuCache::new(2);
        let trace = ['A', 'B', 'A', 'C'];
        assert_eq!(hit_sequence(&mut cache, &trace), [false, false, true, false]);
        assert!(cache.contains(&'A'));
        assert!(cache.contains(&'C'));
        assert!(!cache.contains(&'B'));
    }

    #[test]
    fn pca_aba() {
        let trace = ['A', 'B', 'A'];
        let mut cache: PcaCache<char, ()> = PcaCache::from_slice(1, &trace);
        assert_eq!(hit_sequence(&mut cache, &trace), [false, false, true]);
    }

    #[test]
    fn classic_reference_string() {
        let trace = [7, 0, 1, 2, 0, 3, 0, 4, 2, 3, 0, 3, 2, 1, 2, 0, 1, 7, 0, 1];
        let result = compare(3, &trace);
        assert_eq!(result.lfu_hits, 9);
        assert_eq!(result.pca_hits, 12);
    }

    #[test]
    fn pca_replay_is_deterministic() {
        let trace: Vec<u16> = (0..400u16).map(|i| (i * 37 + i / 7) % 23).collect();
        let runs: Vec<Vec<bool>> = (0..3)
            .map(|_| {
                let mut cache: PcaCache<u16, ()> = PcaCache::from_slice(5, &trace);
                hit_sequence(&mut cache, &trace)
            })
            .collect();
        assert_eq!(runs[0], runs[1]);
        assert_eq!(runs[1], runs[2]);
    }
}

// ==============================================
// Property Tests
// ==============================================

proptest! {
    #[cfg_attr(miri, ignore)]
    #[test]
    fn pca_never_loses_to_lfu(
        capacity in 0usize..10,
        trace in prop::collection::vec(0u8..24, 0..300)
    ) {
        let result = compare(capacity, &trace);
        prop_assert!(result.pca_hits >= result.lfu_hits,
            "pca {} < lfu {}", result.pca_hits, result.lfu_hits);
        prop_assert!(result.pca_hits <= trace.len());
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn value_fn_runs_once_per_insert(
        capacity in 0usize..6,
        trace in prop::collection::vec(0u8..12, 0..150)
    ) {
        for policy in CachePolicy::ALL {
            let mut cache = CacheBuilder::new(capacity).build::<u8, u8>(policy, trace.iter().copied());
            let calls = Cell::new(0usize);
            let mut inserts = 0usize;
            for &key in &trace {
                let before = calls.get();
                let hit = cache.lookup_update(key, |k| {
                    calls.set(calls.get() + 1);
                    *k
                });
                let called = calls.get() - before;
                prop_assert!(called <= 1);
                if hit {
                    prop_assert_eq!(called, 0);
                }
                if called == 1 {
                    inserts += 1;
                    prop_assert!(cache.contains(&key));
                    prop_assert_eq!(cache.get(&key), Some(&key));
                }
                prop_assert!(cache.len() <= capacity);
            }
            prop_assert_eq!(calls.get(), inserts);
        }
    }

    #[cfg_attr(miri, ignore)]
    #[test]
    fn hits_bounded_by_trace_len(
        capacity in 0usize..8,
        trace in prop::collection::vec(any::<i16>(), 0..100)
    ) {
        let mut lfu: LfuCache<i16, ()> = LfuCache::new(capacity);
        prop_assert!(count_hits(&mut lfu, &trace) <= trace.len());

        let mut pca: PcaCache<i16, ()> = PcaCache::from_slice(capacity, &trace);
        prop_assert!(count_hits(&mut pca, &trace) <= trace.len());
    }
}

#![no_main]

use cachesim::trace::parse_run_input;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(run) = parse_run_input(data) {
        // Parsed runs must replay without panicking.
        let result = cachesim::replay::compare(run.capacity.min(4096), &run.keys);
        assert!(result.lfu_hits <= run.keys.len());
        assert!(result.pca_hits <= run.keys.len());
    }
});

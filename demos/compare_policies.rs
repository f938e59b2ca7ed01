use cachesim::replay::compare;
use cachesim::trace::TraceSpec;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn main() -> Result<(), cachesim::error::ConfigError> {
    let mut rng = SmallRng::seed_from_u64(42);

    for spec in [
        TraceSpec::uniform(16, 2_000, 0, 64),
        TraceSpec::uniform(16, 2_000, 0, 64).zipf(1.1),
    ] {
        let keys = spec.generate(&mut rng)?;
        let result = compare(spec.capacity, &keys);
        println!("{spec}");
        println!(
            "  LFU    : {:>5} ({:.1}%)",
            result.lfu_hits,
            result.lfu_hit_ratio() * 100.0
        );
        println!(
            "  Perfect: {:>5} ({:.1}%)",
            result.pca_hits,
            result.pca_hit_ratio() * 100.0
        );
    }
    Ok(())
}

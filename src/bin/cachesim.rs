//! Command-line front end: compare LFU against the offline optimum.
//!
//! ```text
//! echo "2 5 1 2 1 3 1" | cachesim run
//! cachesim auto --seed 42 --extra 2
//! cachesim auto --zipf 1.1
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `info`).

use std::io::{self, Write};
use std::process::ExitCode;

use cachesim::replay::{Comparison, compare};
use cachesim::trace::{AUTO_SUITE, TraceSpec, parse_run_input};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Read `cache_size N key...` from stdin and report hit counts.
    Run,
    /// Replay the built-in suite of generated traces.
    Auto {
        /// Seed for the trace generator. Random when omitted.
        #[arg(long)]
        seed: Option<u64>,

        /// Additional runs of the large configuration.
        #[arg(long, default_value_t = 0)]
        extra: usize,

        /// Draw keys from a Zipf distribution with this exponent.
        #[arg(long, value_name = "EXPONENT")]
        zipf: Option<f64>,
    },
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run => run_stdin(),
        Command::Auto { seed, extra, zipf } => run_auto(seed, extra, zipf),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        },
    }
}

fn run_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let input = parse_run_input(io::stdin().lock())?;
    debug!(capacity = input.capacity, keys = input.keys.len(), "run input parsed");

    let result = compare(input.capacity, &input.keys);
    let mut out = io::stdout().lock();
    writeln!(out, "Hits statistics:")?;
    write_hits(&mut out, &result)?;
    Ok(())
}

fn run_auto(
    seed: Option<u64>,
    extra: usize,
    zipf: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };
    let shape = |spec: TraceSpec| match zipf {
        Some(exponent) => spec.zipf(exponent),
        None => spec,
    };
    info!(?seed, extra, ?zipf, "running generated suite");

    let mut out = io::stdout().lock();
    for (index, spec) in AUTO_SUITE.into_iter().map(shape).enumerate() {
        let keys = spec.generate(&mut rng)?;
        writeln!(out, "Test #{} {spec}", index + 1)?;
        write_hits(&mut out, &compare(spec.capacity, &keys))?;
        writeln!(out)?;
    }

    if extra > 0 {
        let spec = shape(TraceSpec::EXTRA);
        writeln!(out, "Additional tests:")?;
        writeln!(out, "{spec}")?;
        for index in 0..extra {
            let keys = spec.generate(&mut rng)?;
            writeln!(out, "Additional test #{}", index + 1)?;
            write_hits(&mut out, &compare(spec.capacity, &keys))?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_hits(out: &mut impl Write, result: &Comparison) -> io::Result<()> {
    writeln!(out, "- LFU    : {}", result.lfu_hits)?;
    writeln!(out, "- Perfect: {}", result.pca_hits)
}

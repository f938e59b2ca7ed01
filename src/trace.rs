//! Trace sources: textual run descriptions and random generators.
//!
//! ## Run input
//!
//! A run is described as whitespace-separated text:
//!
//! ```text
//!   cache_size N key_1 key_2 ... key_N
//! ```
//!
//! Anything after the `N`th key is ignored.
//!
//! ```
//! use cachesim::trace::parse_run_input;
//!
//! let run = parse_run_input("2 5\n1 2 1 3 1\n".as_bytes()).unwrap();
//! assert_eq!(run.capacity, 2);
//! assert_eq!(run.keys, [1, 2, 1, 3, 1]);
//! ```
//!
//! ## Generated traces
//!
//! [`TraceSpec`] draws `len` keys from `[lower, upper]`, uniformly or with a
//! Zipf skew towards `lower`. [`AUTO_SUITE`] is the fixed table of
//! configurations the `auto` command replays.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use cachesim::trace::TraceSpec;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let keys = TraceSpec::uniform(4, 100, 0, 9).generate(&mut rng).unwrap();
//! assert_eq!(keys.len(), 100);
//! assert!(keys.iter().all(|k| (0..=9).contains(k)));
//! ```

use std::fmt;
use std::io::Read;

use rand::Rng;
use rand_distr::{Distribution, Zipf};

use crate::error::{ConfigError, TraceError};

/// Parsed `cache_size N keys...` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInput {
    pub capacity: usize,
    pub keys: Vec<i64>,
}

/// Reads a run description from `reader`.
///
/// # Errors
///
/// - [`TraceError::MissingHeader`] if the cache size or key count is absent.
/// - [`TraceError::InvalidHeader`] if either is not a non-negative integer.
/// - [`TraceError::InvalidKey`] if a key token is not an integer.
/// - [`TraceError::Truncated`] if fewer than `N` keys follow the header.
pub fn parse_run_input<R: Read>(mut reader: R) -> Result<RunInput, TraceError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = text.split_whitespace();

    let capacity = parse_header(tokens.next(), "cache size")?;
    let expected = parse_header(tokens.next(), "key count")?;

    let mut keys = Vec::with_capacity(expected.min(1 << 20));
    for (position, token) in tokens.take(expected).enumerate() {
        let key = token.parse::<i64>().map_err(|_| TraceError::InvalidKey {
            position,
            token: token.to_owned(),
        })?;
        keys.push(key);
    }
    if keys.len() < expected {
        return Err(TraceError::Truncated {
            expected,
            found: keys.len(),
        });
    }

    Ok(RunInput { capacity, keys })
}

fn parse_header(token: Option<&str>, field: &'static str) -> Result<usize, TraceError> {
    let token = token.ok_or(TraceError::MissingHeader { field })?;
    token.parse::<usize>().map_err(|_| TraceError::InvalidHeader {
        field,
        token: token.to_owned(),
    })
}

/// Key distribution of a generated trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceShape {
    Uniform,
    /// Rank `r` (1-based) maps to key `lower + r - 1`.
    Zipf { exponent: f64 },
}

/// Parameters of one generated trace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSpec {
    pub capacity: usize,
    pub len: usize,
    pub lower: i64,
    pub upper: i64,
    pub shape: TraceShape,
}

/// Configurations replayed by the `auto` command, in order.
pub const AUTO_SUITE: [TraceSpec; 14] = [
    TraceSpec::uniform(4, 8, 0, 6),
    TraceSpec::uniform(4, 16, 0, 9),
    TraceSpec::uniform(8, 16, 0, 12),
    TraceSpec::uniform(8, 32, 0, 20),
    TraceSpec::uniform(16, 32, 0, 24),
    TraceSpec::uniform(16, 64, 0, 36),
    TraceSpec::uniform(32, 64, 0, 48),
    TraceSpec::uniform(32, 128, 0, 72),
    TraceSpec::uniform(64, 128, 0, 96),
    TraceSpec::uniform(64, 256, 0, 144),
    TraceSpec::uniform(128, 512, 0, 192),
    TraceSpec::uniform(128, 512, 0, 288),
    TraceSpec::uniform(1024, 25000, 0, 10000),
    TraceSpec::uniform(1024, 50000, 0, 15000),
];

impl TraceSpec {
    /// Large configuration used for `auto --extra` runs.
    pub const EXTRA: TraceSpec = TraceSpec::uniform(2048, 100_000, 0, 50_000);

    pub const fn uniform(capacity: usize, len: usize, lower: i64, upper: i64) -> Self {
        Self {
            capacity,
            len,
            lower,
            upper,
            shape: TraceShape::Uniform,
        }
    }

    /// Same parameters with a Zipf-skewed key distribution.
    pub const fn zipf(self, exponent: f64) -> Self {
        Self {
            shape: TraceShape::Zipf { exponent },
            ..self
        }
    }

    /// Number of distinct keys the generator can produce.
    pub fn key_space(&self) -> u64 {
        (i128::from(self.upper) - i128::from(self.lower) + 1).clamp(0, i128::from(u64::MAX)) as u64
    }

    /// # Errors
    ///
    /// Returns [`ConfigError`] if `lower > upper` or the Zipf exponent is not
    /// a positive finite number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lower > self.upper {
            return Err(ConfigError::new(format!(
                "lower bound {} is above upper bound {}",
                self.lower, self.upper
            )));
        }
        if let TraceShape::Zipf { exponent } = self.shape {
            if !(exponent.is_finite() && exponent > 0.0) {
                return Err(ConfigError::new(format!(
                    "zipf exponent must be positive, got {exponent}"
                )));
            }
        }
        Ok(())
    }

    /// Draws a fresh trace from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if [`validate`](Self::validate) fails.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<i64>, ConfigError> {
        self.validate()?;
        let keys: Vec<i64> = match self.shape {
            TraceShape::Uniform => (0..self.len)
                .map(|_| rng.random_range(self.lower..=self.upper))
                .collect(),
            TraceShape::Zipf { exponent } => {
                let n = self.key_space() as f64;
                let zipf = Zipf::new(n, exponent)
                    .map_err(|err| ConfigError::new(format!("invalid zipf parameters: {err}")))?;
                (0..self.len)
                    .map(|_| {
                        let rank = zipf.sample(&mut *rng) as u64;
                        let offset = rank.saturating_sub(1).min(self.key_space() - 1);
                        self.lower.saturating_add_unsigned(offset)
                    })
                    .collect()
            },
        };
        Ok(keys)
    }
}

impl fmt::Display for TraceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cache size = {}; elements = {}; keys in [{}, {}]",
            self.capacity, self.len, self.lower, self.upper
        )?;
        if let TraceShape::Zipf { exponent } = self.shape {
            write!(f, "; zipf s = {exponent}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn reads_header_and_keys() {
            let run = parse_run_input("3 4 10 -2 10 7".as_bytes()).unwrap();
            assert_eq!(run.capacity, 3);
            assert_eq!(run.keys, [10, -2, 10, 7]);
        }

        #[test]
        fn ignores_surplus_tokens() {
            let run = parse_run_input("1 2 5 6 7 junk".as_bytes()).unwrap();
            assert_eq!(run.keys, [5, 6]);
        }

        #[test]
        fn empty_key_list() {
            let run = parse_run_input("0 0".as_bytes()).unwrap();
            assert_eq!(run.capacity, 0);
            assert!(run.keys.is_empty());
        }

        #[test]
        fn missing_header() {
            let err = parse_run_input("".as_bytes()).unwrap_err();
            assert!(matches!(err, TraceError::MissingHeader { field: "cache size" }));

            let err = parse_run_input("4".as_bytes()).unwrap_err();
            assert!(matches!(err, TraceError::MissingHeader { field: "key count" }));
        }

        #[test]
        fn malformed_header_keeps_token() {
            let err = parse_run_input("-1 3 1 2 3".as_bytes()).unwrap_err();
            match err {
                TraceError::InvalidHeader { field, token } => {
                    assert_eq!(field, "cache size");
                    assert_eq!(token, "-1");
                },
                other => panic!("unexpected error: {other}"),
            }

            let err = parse_run_input("4 abc".as_bytes()).unwrap_err();
            assert!(matches!(
                err,
                TraceError::InvalidHeader { field: "key count", .. }
            ));
        }

        #[test]
        fn invalid_key_reports_position() {
            let err = parse_run_input("2 3 1 x 3".as_bytes()).unwrap_err();
            match err {
                TraceError::InvalidKey { position, token } => {
                    assert_eq!(position, 1);
                    assert_eq!(token, "x");
                },
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn truncated_input() {
            let err = parse_run_input("2 5 1 2".as_bytes()).unwrap_err();
            assert!(matches!(
                err,
                TraceError::Truncated {
                    expected: 5,
                    found: 2
                }
            ));
        }
    }

    mod generation {
        use super::*;

        #[test]
        fn auto_suite_is_valid() {
            assert_eq!(AUTO_SUITE.len(), 14);
            for spec in AUTO_SUITE.iter().chain([&TraceSpec::EXTRA]) {
                spec.validate().unwrap();
                assert_eq!(spec.shape, TraceShape::Uniform);
            }
            assert_eq!(AUTO_SUITE[0], TraceSpec::uniform(4, 8, 0, 6));
            assert_eq!(AUTO_SUITE[13], TraceSpec::uniform(1024, 50000, 0, 15000));
        }

        #[test]
        fn uniform_stays_in_range() {
            let mut rng = SmallRng::seed_from_u64(42);
            let spec = TraceSpec::uniform(4, 500, -3, 3);
            let keys = spec.generate(&mut rng).unwrap();
            assert_eq!(keys.len(), 500);
            assert!(keys.iter().all(|k| (-3..=3).contains(k)));
        }

        #[test]
        fn same_seed_same_trace() {
            let spec = TraceSpec::uniform(8, 64, 0, 20);
            let a = spec.generate(&mut SmallRng::seed_from_u64(1)).unwrap();
            let b = spec.generate(&mut SmallRng::seed_from_u64(1)).unwrap();
            assert_eq!(a, b);
        }

        #[test]
        fn single_key_range() {
            let mut rng = SmallRng::seed_from_u64(3);
            let keys = TraceSpec::uniform(1, 10, 5, 5).generate(&mut rng).unwrap();
            assert_eq!(keys, vec![5; 10]);

            let keys = TraceSpec::uniform(1, 10, 5, 5)
                .zipf(1.2)
                .generate(&mut rng)
                .unwrap();
            assert_eq!(keys, vec![5; 10]);
        }

        #[test]
        fn zipf_favours_lower_keys() {
            let mut rng = SmallRng::seed_from_u64(42);
            let spec = TraceSpec::uniform(16, 5000, 100, 199).zipf(1.1);
            let keys = spec.generate(&mut rng).unwrap();
            assert!(keys.iter().all(|k| (100..=199).contains(k)));
            let low = keys.iter().filter(|&&k| k < 110).count();
            let high = keys.iter().filter(|&&k| k >= 190).count();
            assert!(low > high * 4, "low {low} high {high}");
        }

        #[test]
        fn invalid_specs_rejected() {
            let err = TraceSpec::uniform(4, 16, 10, 0).validate().unwrap_err();
            assert!(err.to_string().contains("lower"));

            let spec = TraceSpec::uniform(4, 16, 0, 10).zipf(0.0);
            assert!(spec.validate().is_err());
            assert!(spec.generate(&mut SmallRng::seed_from_u64(0)).is_err());

            assert!(TraceSpec::uniform(4, 16, 0, 10).zipf(f64::NAN).validate().is_err());
        }

        #[test]
        fn display_names_parameters() {
            let spec = TraceSpec::uniform(4, 8, 0, 6);
            assert_eq!(spec.to_string(), "cache size = 4; elements = 8; keys in [0, 6]");
            assert!(spec.zipf(1.5).to_string().ends_with("; zipf s = 1.5"));
        }
    }
}

//! Error types for cachesim.
//!
//! The replay engines themselves never fail: every lookup is a hit, an
//! insert, or a declined insert. Errors only come from the surfaces around
//! them.
//!
//! - [`ConfigError`]: invalid builder or trace-generator parameters.
//! - [`InvariantError`]: returned by `check_invariants` when an engine's
//!   store, key index and selector have drifted out of lock-step.
//! - [`TraceError`]: malformed `cache_size N key...` input.
//!
//! ## Example Usage
//!
//! ```
//! use cachesim::error::ConfigError;
//! use cachesim::trace::TraceSpec;
//!
//! let spec = TraceSpec::uniform(4, 16, 10, 0);
//! let err: ConfigError = spec.validate().unwrap_err();
//! assert!(err.to_string().contains("lower"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Internal bookkeeping of an engine is inconsistent.
///
/// Carries a human-readable description of the violated invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Invalid configuration parameter.
///
/// Produced by [`CacheBuilder::try_with_capacity_limit`](crate::builder::CacheBuilder::try_with_capacity_limit),
/// [`TraceSpec::validate`](crate::trace::TraceSpec::validate) and
/// [`CachePolicy`](crate::builder::CachePolicy) parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// TraceError
// ---------------------------------------------------------------------------

/// Failure to read a `cache_size N key1 .. keyN` run description.
#[derive(Debug)]
pub enum TraceError {
    /// Reading the underlying stream failed.
    Io(std::io::Error),
    /// Input ended before the cache size or key count.
    MissingHeader { field: &'static str },
    /// Cache size or key count is present but not a non-negative integer.
    InvalidHeader { field: &'static str, token: String },
    /// A key token could not be parsed.
    InvalidKey { position: usize, token: String },
    /// Input ended before `expected` keys were read.
    Truncated { expected: usize, found: usize },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(err) => write!(f, "failed to read trace: {err}"),
            TraceError::MissingHeader { field } => write!(f, "missing {field}"),
            TraceError::InvalidHeader { field, token } => {
                write!(f, "expected a non-negative integer {field}, found {token:?}")
            },
            TraceError::InvalidKey { position, token } => {
                write!(f, "invalid key {token:?} at position {position}")
            },
            TraceError::Truncated { expected, found } => {
                write!(f, "expected {expected} keys, found {found}")
            },
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(err: std::io::Error) -> Self {
        TraceError::Io(err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("index has 3 keys, store has 2 entries");
        assert_eq!(err.to_string(), "index has 3 keys, store has 2 entries");
        assert_eq!(err.message(), "index has 3 keys, store has 2 entries");
    }

    #[test]
    fn config_display_shows_message() {
        let err = ConfigError::new("capacity 10 exceeds limit 4");
        assert_eq!(err.to_string(), "capacity 10 exceeds limit 4");
        assert_eq!(err.clone(), err);
    }

    #[test]
    fn errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
        assert_error::<ConfigError>();
        assert_error::<TraceError>();
    }

    #[test]
    fn trace_error_messages() {
        let err = TraceError::MissingHeader { field: "cache size" };
        assert_eq!(err.to_string(), "missing cache size");

        let err = TraceError::InvalidHeader {
            field: "key count",
            token: "-1".into(),
        };
        assert_eq!(
            err.to_string(),
            "expected a non-negative integer key count, found \"-1\""
        );

        let err = TraceError::InvalidKey {
            position: 2,
            token: "x".into(),
        };
        assert_eq!(err.to_string(), "invalid key \"x\" at position 2");

        let err = TraceError::Truncated {
            expected: 5,
            found: 3,
        };
        assert_eq!(err.to_string(), "expected 5 keys, found 3");
    }

    #[test]
    fn trace_error_wraps_io() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let err = TraceError::from(io);
        assert!(matches!(err, TraceError::Io(_)));
        assert!(err.source().is_some());
    }
}

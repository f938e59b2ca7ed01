//! Per-key queues of future trace positions.
//!
//! Built once from the complete key sequence and consumed front to back as
//! the same sequence is replayed. This is what lets the offline engine know,
//! at every step, when each key will be referenced next.
//!
//! ```text
//!   trace:   A  B  A  C  B  A
//!   pos:     0  1  2  3  4  5
//!
//!   A → [0, 2, 5]
//!   B → [1, 4]
//!   C → [3]
//!
//!   advance(A)  → pops 0, next use At(2)
//!   advance(C)  → pops 3, next use Never
//! ```
//!
//! ## Example
//!
//! ```
//! use cachesim::ds::{FutureIndex, NextUse};
//!
//! let mut index = FutureIndex::from_trace(["a", "b", "a"]);
//! assert_eq!(index.advance(&"a"), NextUse::At(2));
//! assert_eq!(index.advance(&"b"), NextUse::Never);
//! assert_eq!(index.advance(&"a"), NextUse::Never);
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Next reference of a key, relative to the replay cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NextUse {
    /// The key is referenced again at this trace position.
    At(usize),
    /// The key never recurs.
    Never,
}

impl NextUse {
    pub fn position(self) -> Option<usize> {
        match self {
            NextUse::At(pos) => Some(pos),
            NextUse::Never => None,
        }
    }

    pub fn is_never(self) -> bool {
        matches!(self, NextUse::Never)
    }

    fn from_front(queue: Option<&VecDeque<usize>>) -> Self {
        match queue.and_then(VecDeque::front) {
            Some(&pos) => NextUse::At(pos),
            None => NextUse::Never,
        }
    }
}

impl fmt::Display for NextUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextUse::At(pos) => write!(f, "@{pos}"),
            NextUse::Never => f.write_str("never"),
        }
    }
}

/// Offline occurrence map for one trace.
#[derive(Debug, Clone)]
pub struct FutureIndex<K> {
    queues: FxHashMap<K, VecDeque<usize>>,
    trace_len: usize,
}

impl<K> FutureIndex<K>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self {
            queues: FxHashMap::default(),
            trace_len: 0,
        }
    }

    /// Records every position of `trace` under its key.
    pub fn from_trace<I>(trace: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut queues: FxHashMap<K, VecDeque<usize>> = FxHashMap::default();
        let mut trace_len = 0;
        for (pos, key) in trace.into_iter().enumerate() {
            queues.entry(key).or_default().push_back(pos);
            trace_len = pos + 1;
        }
        Self { queues, trace_len }
    }

    /// Consumes the key's current occurrence and reports the next one.
    ///
    /// Keys that were never in the trace, or whose occurrences are already
    /// used up, report [`NextUse::Never`].
    pub fn advance(&mut self, key: &K) -> NextUse {
        match self.queues.get_mut(key) {
            Some(queue) => {
                queue.pop_front();
                NextUse::from_front(Some(&*queue))
            },
            None => NextUse::Never,
        }
    }

    /// Next unconsumed occurrence of `key`, without consuming anything.
    pub fn peek(&self, key: &K) -> NextUse {
        NextUse::from_front(self.queues.get(key))
    }

    /// Occurrences of `key` not yet consumed.
    pub fn remaining(&self, key: &K) -> usize {
        self.queues.get(key).map_or(0, VecDeque::len)
    }

    /// Length of the trace the index was built from.
    pub fn trace_len(&self) -> usize {
        self.trace_len
    }

    pub fn distinct_keys(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn clear(&mut self) {
        self.queues.clear();
        self.trace_len = 0;
    }
}

impl<K> Default for FutureIndex<K>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation. Starts at 1 so that
/// `ArenaId::default()` never names a live arena.
static ARENA_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an arena.
///
/// Every sequence handle records the id of the arena it was allocated
/// from, so a handle presented to a different arena is detected in O(1)
/// instead of silently reading foreign storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena id.
    ///
    /// Each call returns an id that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(ARENA_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The placeholder id carried by default-constructed handles.
    pub const fn unassigned() -> Self {
        Self(0)
    }

    /// Whether this id was issued by [`ArenaId::next`].
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}

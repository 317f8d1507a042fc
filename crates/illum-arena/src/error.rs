//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use illum_core::ArenaId;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// Segment pool is full: no more segments can be allocated.
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Total capacity available across all segments of the pool.
        capacity: usize,
    },
    /// A container was requested from an arena that has already been
    /// released. The arena is a mandatory dependency of every container.
    Unavailable {
        /// The released arena.
        arena: ArenaId,
    },
    /// A handle was used after its arena released all storage.
    StaleHandle {
        /// The released arena the handle belongs to.
        arena: ArenaId,
    },
    /// A handle was presented to an arena that did not allocate it.
    ForeignHandle {
        /// The arena encoded in the handle.
        handle_arena: ArenaId,
        /// The arena the handle was presented to.
        arena: ArenaId,
    },
    /// A handle index that does not name a sequence in its pool.
    UnknownSequence {
        /// The unrecognised index.
        index: u32,
    },
    /// The arena configuration is inconsistent.
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "arena capacity exceeded: requested {requested} bytes, capacity {capacity} bytes"
                )
            }
            Self::Unavailable { arena } => {
                write!(f, "{arena} has been released; cannot allocate")
            }
            Self::StaleHandle { arena } => {
                write!(f, "stale handle: storage of {arena} was released")
            }
            Self::ForeignHandle {
                handle_arena,
                arena,
            } => {
                write!(f, "handle from {handle_arena} presented to {arena}")
            }
            Self::UnknownSequence { index } => {
                write!(f, "unknown sequence index {index}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid arena config: {reason}"),
        }
    }
}

impl Error for ArenaError {}

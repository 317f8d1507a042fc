//! Typed sequence handles.
//!
//! A [`SeqHandle`] names one growable sequence inside an arena pool. It is
//! a plain index plus the owning arena's id, so copying it is free and it
//! can never dangle: every access goes through the arena, which rejects
//! handles from other arenas and handles outliving a release.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use illum_core::ArenaId;

/// Handle to a sequence of `T` allocated from an [`Arena`](crate::Arena).
#[must_use]
pub struct SeqHandle<T> {
    /// Arena that allocated the sequence.
    pub(crate) arena: ArenaId,
    /// Index into the pool's sequence table.
    pub(crate) index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> SeqHandle<T> {
    pub(crate) fn new(arena: ArenaId, index: u32) -> Self {
        Self {
            arena,
            index,
            _marker: PhantomData,
        }
    }

    /// The arena this handle was allocated from.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Position of the sequence in its pool's table.
    pub fn index(&self) -> u32 {
        self.index
    }
}

// Manual impls: derives would require `T: Clone` etc. although only the
// id and index are stored.

impl<T> Clone for SeqHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SeqHandle<T> {}

impl<T> PartialEq for SeqHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena && self.index == other.index
    }
}

impl<T> Eq for SeqHandle<T> {}

impl<T> Hash for SeqHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.index.hash(state);
    }
}

impl<T> Default for SeqHandle<T> {
    /// A handle that no arena will accept.
    fn default() -> Self {
        Self::new(ArenaId::unassigned(), u32::MAX)
    }
}

impl<T> fmt::Debug for SeqHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqHandle")
            .field("arena", &self.arena)
            .field("index", &self.index)
            .finish()
    }
}

impl<T> fmt::Display for SeqHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeqHandle({}, idx={})", self.arena, self.index)
    }
}

//! The protocol arena: lifecycle, handle validation, and accounting.

use illum_core::ArenaId;

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::SeqHandle;
use crate::pool::{Element, PoolSet};

/// Accounting for one element pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Sequences ever created in the pool.
    pub sequences: usize,
    /// Elements currently reachable from the head of their sequence.
    pub live_elements: usize,
    /// Element slots claimed by sequence blocks (live or already popped).
    pub reserved_elements: usize,
    /// Segments allocated.
    pub segments: usize,
    /// Bytes of segment storage.
    pub bytes: usize,
}

/// Accounting for a whole arena, per element pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ArenaStats {
    /// Polygon point storage.
    pub points: PoolStats,
    /// Montage contents.
    pub polygons: PoolStats,
    /// Step list contents.
    pub montages: PoolStats,
}

impl ArenaStats {
    /// Total bytes of segment storage across all pools.
    pub fn total_bytes(&self) -> usize {
        self.points.bytes + self.polygons.bytes + self.montages.bytes
    }

    /// Total segments across all pools.
    pub fn total_segments(&self) -> usize {
        self.points.segments + self.polygons.segments + self.montages.segments
    }

    /// Total sequences across all pools.
    pub fn total_sequences(&self) -> usize {
        self.points.sequences + self.polygons.sequences + self.montages.sequences
    }

    /// Whether the arena holds no storage at all.
    pub fn is_empty(&self) -> bool {
        self.total_segments() == 0 && self.total_sequences() == 0
    }
}

/// Memory pool owning every sequence of one protocol.
///
/// Created empty; sequences are allocated with [`Arena::alloc_seq`] and
/// addressed through the returned [`SeqHandle`]. All storage is reclaimed
/// at once by [`Arena::release`] (or by dropping the arena). After release
/// every handle is stale and no further allocation is possible.
///
/// # Examples
///
/// ```
/// use illum_arena::{Arena, ArenaError};
/// use illum_core::Point;
///
/// let mut arena = Arena::new();
/// let seq = arena.alloc_seq::<Point>().unwrap();
/// arena.push(seq, Point::new(1, 2)).unwrap();
/// arena.push(seq, Point::new(3, 4)).unwrap();
/// assert_eq!(arena.pop_front(seq).unwrap(), Some(Point::new(1, 2)));
///
/// let freed = arena.release();
/// assert_eq!(freed.points.sequences, 1);
/// assert!(matches!(arena.seq_len(seq), Err(ArenaError::StaleHandle { .. })));
/// ```
pub struct Arena {
    id: ArenaId,
    config: ArenaConfig,
    /// `None` once released.
    pools: Option<PoolSet>,
}

impl Arena {
    /// Create an empty arena with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(ArenaConfig::default())
    }

    /// Create an empty arena, validating `config` first.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ArenaConfig) -> Self {
        let id = ArenaId::next();
        let pools = PoolSet::new(config.segment_len, config.block_len, config.max_segments);
        tracing::debug!(arena = %id, segment_len = config.segment_len, "arena created");
        Self {
            id,
            config,
            pools: Some(pools),
        }
    }

    /// This arena's unique id.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configuration the arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Whether [`Arena::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.pools.is_none()
    }

    /// Allocate a new, empty sequence of `T`.
    ///
    /// Fails with [`ArenaError::Unavailable`] once the arena is released.
    pub fn alloc_seq<T: Element>(&mut self) -> Result<SeqHandle<T>, ArenaError> {
        let id = self.id;
        let Some(pools) = self.pools.as_mut() else {
            tracing::error!(arena = %id, kind = T::KIND, "allocation from a released arena");
            return Err(ArenaError::Unavailable { arena: id });
        };
        let index = T::pool_mut(pools).create();
        Ok(SeqHandle::new(id, index))
    }

    /// Append `value` to the tail of `seq`.
    pub fn push<T: Element>(&mut self, seq: SeqHandle<T>, value: T) -> Result<(), ArenaError> {
        T::pool_mut(self.pools_mut_for(seq)?).push_back(seq.index, value)
    }

    /// Append every value of `values` to the tail of `seq`, in order.
    ///
    /// Stops at the first failure; values pushed before it stay pushed.
    pub fn extend<T, I>(&mut self, seq: SeqHandle<T>, values: I) -> Result<(), ArenaError>
    where
        T: Element,
        I: IntoIterator<Item = T>,
    {
        let pool = T::pool_mut(self.pools_mut_for(seq)?);
        for value in values {
            pool.push_back(seq.index, value)?;
        }
        Ok(())
    }

    /// Remove and return the head of `seq`, or `None` if it is empty.
    pub fn pop_front<T: Element>(&mut self, seq: SeqHandle<T>) -> Result<Option<T>, ArenaError> {
        T::pool_mut(self.pools_mut_for(seq)?).pop_front(seq.index)
    }

    /// Element `index` of `seq`, counted from the head.
    pub fn get<T: Element>(&self, seq: SeqHandle<T>, index: usize) -> Result<Option<T>, ArenaError> {
        T::pool(self.pools_for(seq)?).get(seq.index, index)
    }

    /// Number of live elements in `seq`.
    pub fn seq_len<T: Element>(&self, seq: SeqHandle<T>) -> Result<usize, ArenaError> {
        T::pool(self.pools_for(seq)?).len(seq.index)
    }

    /// Copy the live elements of `seq`, head first, without consuming them.
    pub fn to_vec<T: Element>(&self, seq: SeqHandle<T>) -> Result<Vec<T>, ArenaError> {
        T::pool(self.pools_for(seq)?).to_vec(seq.index)
    }

    /// Whether `seq` was allocated by this arena.
    pub fn owns<T>(&self, seq: SeqHandle<T>) -> bool {
        seq.arena == self.id
    }

    /// Current accounting. All zero after release.
    pub fn stats(&self) -> ArenaStats {
        match &self.pools {
            Some(pools) => ArenaStats {
                points: pools.points.stats(),
                polygons: pools.polygons.stats(),
                montages: pools.montages.stats(),
            },
            None => ArenaStats::default(),
        }
    }

    /// Free every segment in one operation and return what was freed.
    ///
    /// This is the only way sequence storage is reclaimed. Calling it
    /// again is harmless and returns empty stats.
    pub fn release(&mut self) -> ArenaStats {
        let freed = self.stats();
        if self.pools.take().is_some() {
            tracing::debug!(
                arena = %self.id,
                bytes = freed.total_bytes(),
                segments = freed.total_segments(),
                sequences = freed.total_sequences(),
                "arena released"
            );
        }
        freed
    }

    fn pools_for<T>(&self, seq: SeqHandle<T>) -> Result<&PoolSet, ArenaError> {
        self.check_owner(seq)?;
        self.pools
            .as_ref()
            .ok_or(ArenaError::StaleHandle { arena: self.id })
    }

    fn pools_mut_for<T>(&mut self, seq: SeqHandle<T>) -> Result<&mut PoolSet, ArenaError> {
        self.check_owner(seq)?;
        let id = self.id;
        self.pools
            .as_mut()
            .ok_or(ArenaError::StaleHandle { arena: id })
    }

    /// Fail with [`ArenaError::ForeignHandle`] unless `seq` was allocated
    /// by this arena.
    pub fn check_owner<T>(&self, seq: SeqHandle<T>) -> Result<(), ArenaError> {
        if seq.arena != self.id {
            return Err(ArenaError::ForeignHandle {
                handle_arena: seq.arena,
                arena: self.id,
            });
        }
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("released", &self.is_released())
            .field("stats", &self.stats())
            .finish()
    }
}

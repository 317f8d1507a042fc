//! Block-chained sequence pools.
//!
//! A [`SeqPool`] stores any number of ordered sequences of one element
//! kind. Each sequence owns a short table of fixed-size blocks carved from
//! the pool's [`SegmentChain`]. Appends go to the tail; pops advance a head
//! cursor. Neither operation returns memory to the segments: consumed
//! blocks stay reserved until the whole pool is dropped.
//!
//! [`PoolSet`] keeps one pool per element kind, and the sealed [`Element`]
//! trait maps each storable type to its pool.

use illum_core::{GridSize, Point};
use smallvec::SmallVec;

use crate::error::ArenaError;
use crate::handle::SeqHandle;
use crate::segment::{SegmentChain, Slot};

/// Per-sequence bookkeeping.
#[derive(Clone, Debug, Default)]
struct SeqState {
    /// Blocks in logical order. Most polygons fit in a handful.
    blocks: SmallVec<[Slot; 4]>,
    /// Logical position of the first live element.
    head: usize,
    /// Number of live elements.
    len: usize,
}

/// Storage for every sequence of one element kind.
pub struct SeqPool<T> {
    segments: SegmentChain<T>,
    seqs: Vec<SeqState>,
    block_len: u32,
}

impl<T: Copy + Default> SeqPool<T> {
    /// Create an empty pool.
    pub fn new(segment_len: u32, block_len: u32, max_segments: u16) -> Self {
        Self {
            segments: SegmentChain::new(segment_len, max_segments),
            seqs: Vec::new(),
            block_len,
        }
    }

    /// Register a new, empty sequence and return its index.
    ///
    /// No element storage is reserved until the first push.
    pub fn create(&mut self) -> u32 {
        self.seqs.push(SeqState::default());
        (self.seqs.len() - 1) as u32
    }

    /// Append `value` to the tail of sequence `index`.
    pub fn push_back(&mut self, index: u32, value: T) -> Result<(), ArenaError> {
        let block_len = self.block_len as usize;
        let state = self
            .seqs
            .get_mut(index as usize)
            .ok_or(ArenaError::UnknownSequence { index })?;

        let pos = state.head + state.len;
        if pos == state.blocks.len() * block_len {
            state.blocks.push(self.segments.claim(self.block_len)?);
        }

        let slot = state.blocks[pos / block_len].advance((pos % block_len) as u32);
        self.segments.write(slot, value);
        state.len += 1;
        Ok(())
    }

    /// Remove and return the head element of sequence `index`.
    pub fn pop_front(&mut self, index: u32) -> Result<Option<T>, ArenaError> {
        let block_len = self.block_len as usize;
        let state = self
            .seqs
            .get_mut(index as usize)
            .ok_or(ArenaError::UnknownSequence { index })?;
        if state.len == 0 {
            return Ok(None);
        }
        let pos = state.head;
        let slot = state.blocks[pos / block_len].advance((pos % block_len) as u32);
        state.head += 1;
        state.len -= 1;
        Ok(Some(self.segments.read(slot)))
    }

    /// Element `i` (counted from the head) of sequence `index`.
    pub fn get(&self, index: u32, i: usize) -> Result<Option<T>, ArenaError> {
        let state = self.state(index)?;
        if i >= state.len {
            return Ok(None);
        }
        Ok(Some(self.read(state, state.head + i)))
    }

    /// Number of live elements in sequence `index`.
    pub fn len(&self, index: u32) -> Result<usize, ArenaError> {
        Ok(self.state(index)?.len)
    }

    /// Copy the live elements of sequence `index`, head first.
    pub fn to_vec(&self, index: u32) -> Result<Vec<T>, ArenaError> {
        let state = self.state(index)?;
        Ok((state.head..state.head + state.len)
            .map(|pos| self.read(state, pos))
            .collect())
    }

    /// Accounting snapshot for this pool.
    pub fn stats(&self) -> crate::arena::PoolStats {
        let blocks: usize = self.seqs.iter().map(|s| s.blocks.len()).sum();
        crate::arena::PoolStats {
            sequences: self.seqs.len(),
            live_elements: self.seqs.iter().map(|s| s.len).sum(),
            reserved_elements: blocks * self.block_len as usize,
            segments: self.segments.segment_count(),
            bytes: self.segments.bytes(),
        }
    }

    fn state(&self, index: u32) -> Result<&SeqState, ArenaError> {
        self.seqs
            .get(index as usize)
            .ok_or(ArenaError::UnknownSequence { index })
    }

    fn read(&self, state: &SeqState, pos: usize) -> T {
        let block_len = self.block_len as usize;
        let slot = state.blocks[pos / block_len].advance((pos % block_len) as u32);
        self.segments.read(slot)
    }
}

/// The three pools backing one arena, one per element kind.
pub struct PoolSet {
    /// Points of every polygon.
    pub points: SeqPool<Point>,
    /// Polygon entries of every montage.
    pub polygons: SeqPool<PolygonEntry>,
    /// Montage handles of every step list.
    pub montages: SeqPool<SeqHandle<PolygonEntry>>,
}

impl PoolSet {
    /// Create three empty pools sharing one geometry.
    pub fn new(segment_len: u32, block_len: u32, max_segments: u16) -> Self {
        Self {
            points: SeqPool::new(segment_len, block_len, max_segments),
            polygons: SeqPool::new(segment_len, block_len, max_segments),
            montages: SeqPool::new(segment_len, block_len, max_segments),
        }
    }
}

/// The header of one polygon as stored inside a montage.
///
/// Montages hold polygon headers by value. The points themselves live in a
/// separate arena sequence that the header refers to, so a polygon appended
/// to a montage keeps seeing points pushed through the caller's copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PolygonEntry {
    /// The polygon's point sequence.
    pub points: SeqHandle<Point>,
    /// Grid the polygon's coordinates refer to.
    pub grid_size: GridSize,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for illum_core::Point {}
    impl Sealed for super::PolygonEntry {}
    impl Sealed for crate::handle::SeqHandle<super::PolygonEntry> {}
}

/// A type the arena can store in sequences.
pub trait Element: Copy + Default + sealed::Sealed + 'static {
    /// Human-readable kind, used in diagnostics.
    const KIND: &'static str;

    /// The pool holding sequences of this kind.
    fn pool(pools: &PoolSet) -> &SeqPool<Self>;

    /// The pool holding sequences of this kind, mutably.
    fn pool_mut(pools: &mut PoolSet) -> &mut SeqPool<Self>;
}

impl Element for Point {
    const KIND: &'static str = "point";

    fn pool(pools: &PoolSet) -> &SeqPool<Self> {
        &pools.points
    }

    fn pool_mut(pools: &mut PoolSet) -> &mut SeqPool<Self> {
        &mut pools.points
    }
}

impl Element for PolygonEntry {
    const KIND: &'static str = "polygon";

    fn pool(pools: &PoolSet) -> &SeqPool<Self> {
        &pools.polygons
    }

    fn pool_mut(pools: &mut PoolSet) -> &mut SeqPool<Self> {
        &mut pools.polygons
    }
}

impl Element for SeqHandle<PolygonEntry> {
    const KIND: &'static str = "montage";

    fn pool(pools: &PoolSet) -> &SeqPool<Self> {
        &pools.montages
    }

    fn pool_mut(pools: &mut PoolSet) -> &mut SeqPool<Self> {
        &mut pools.montages
    }
}

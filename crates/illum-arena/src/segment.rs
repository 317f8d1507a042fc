//! Fixed-capacity segments and the chain that grows them.
//!
//! A [`Segment`] is one heap allocation of element slots, sized once and
//! never reallocated. A [`SegmentChain`] hands out runs of slots from the
//! newest segment and appends a fresh segment when that one is full.

use crate::error::ArenaError;

/// Address of the first slot of a claimed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Index of the segment in its chain.
    pub segment: u16,
    /// Offset of the first slot inside the segment.
    pub offset: u32,
}

impl Slot {
    /// The slot `i` positions further into the same run.
    pub fn advance(self, i: u32) -> Self {
        Self {
            segment: self.segment,
            offset: self.offset + i,
        }
    }
}

/// One heap allocation of element slots.
///
/// Slots are claimed front to back and are never handed back; the memory
/// goes away only when the segment is dropped.
pub struct Segment<T> {
    /// Claimed slots. Capacity is fixed at creation and never grows.
    slots: Vec<T>,
}

impl<T: Copy + Default> Segment<T> {
    /// Reserve room for `capacity` slots. Nothing is claimed yet.
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            slots: Vec::with_capacity(capacity as usize),
        }
    }

    /// Claim `len` default-initialised slots, returning the first offset.
    ///
    /// `None` when fewer than `len` slots are free.
    pub fn claim(&mut self, len: u32) -> Option<u32> {
        if (len as usize) > self.free() {
            return None;
        }
        let start = self.slots.len();
        self.slots.resize(start + len as usize, T::default());
        Some(start as u32)
    }

    /// The value at `offset`. Panics if the slot was never claimed.
    pub fn read(&self, offset: u32) -> T {
        self.slots[offset as usize]
    }

    /// Overwrite the value at `offset`. Panics if the slot was never claimed.
    pub fn write(&mut self, offset: u32, value: T) {
        self.slots[offset as usize] = value;
    }

    /// Slots claimed so far.
    pub fn claimed(&self) -> usize {
        self.slots.len()
    }

    /// Slots still available.
    pub fn free(&self) -> usize {
        self.slots.capacity() - self.slots.len()
    }

    /// Heap bytes held by this segment.
    pub fn bytes(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<T>()
    }
}

/// Growable chain of [`Segment`]s.
///
/// Holds no memory until the first claim. A run never straddles two
/// segments: if it does not fit in the newest one, a new segment is added,
/// up to `max_segments`.
pub struct SegmentChain<T> {
    segments: Vec<Segment<T>>,
    segment_len: u32,
    max_segments: u16,
}

impl<T: Copy + Default> SegmentChain<T> {
    /// An empty chain of `segment_len`-slot segments.
    pub fn new(segment_len: u32, max_segments: u16) -> Self {
        Self {
            segments: Vec::new(),
            segment_len,
            max_segments,
        }
    }

    /// Claim a run of `len` contiguous slots.
    ///
    /// Fails with [`ArenaError::CapacityExceeded`] when `len` exceeds a
    /// whole segment or the chain is already at `max_segments`.
    pub fn claim(&mut self, len: u32) -> Result<Slot, ArenaError> {
        if len > self.segment_len {
            return Err(self.exceeded(len, self.segment_len as usize));
        }
        if let Some(offset) = self.segments.last_mut().and_then(|s| s.claim(len)) {
            return Ok(Slot {
                segment: (self.segments.len() - 1) as u16,
                offset,
            });
        }
        if self.segments.len() >= self.max_segments as usize {
            let slots = self.segments.len() * self.segment_len as usize;
            return Err(self.exceeded(len, slots));
        }

        let mut segment = Segment::with_capacity(self.segment_len);
        let offset = segment
            .claim(len)
            .ok_or_else(|| self.exceeded(len, self.segment_len as usize))?;
        self.segments.push(segment);
        tracing::trace!(
            segments = self.segments.len(),
            segment_len = self.segment_len,
            element_bytes = std::mem::size_of::<T>(),
            "segment chain grew"
        );
        Ok(Slot {
            segment: (self.segments.len() - 1) as u16,
            offset,
        })
    }

    /// The value stored at `slot`.
    pub fn read(&self, slot: Slot) -> T {
        self.segments[slot.segment as usize].read(slot.offset)
    }

    /// Store `value` at `slot`.
    pub fn write(&mut self, slot: Slot, value: T) {
        self.segments[slot.segment as usize].write(slot.offset, value);
    }

    /// Number of segments allocated.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Heap bytes held by all segments.
    pub fn bytes(&self) -> usize {
        self.segments.iter().map(Segment::bytes).sum()
    }

    /// Slots claimed across all segments.
    pub fn claimed(&self) -> usize {
        self.segments.iter().map(Segment::claimed).sum()
    }

    fn exceeded(&self, len: u32, capacity_slots: usize) -> ArenaError {
        let size = std::mem::size_of::<T>();
        ArenaError::CapacityExceeded {
            requested: len as usize * size,
            capacity: capacity_slots * size,
        }
    }
}

//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for the sequence arena.
///
/// Controls segment sizing, sequence growth granularity, and the per-pool
/// capacity limit. Validated by [`ArenaConfig::validate`]; immutable once
/// handed to an [`Arena`](crate::Arena).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of each segment in elements.
    ///
    /// Default: 4096. Must be at least `block_len`.
    pub segment_len: u32,

    /// Number of elements a sequence grows by when its last block is full.
    ///
    /// Default: 16. Must be non-zero.
    pub block_len: u32,

    /// Maximum number of segments per element pool.
    ///
    /// Default: 4096. Allocation beyond this returns
    /// [`ArenaError::CapacityExceeded`] instead of aborting.
    pub max_segments: u16,
}

impl ArenaConfig {
    /// Default segment size in elements.
    pub const DEFAULT_SEGMENT_LEN: u32 = 4096;

    /// Default sequence growth block in elements.
    pub const DEFAULT_BLOCK_LEN: u32 = 16;

    /// Default maximum segment count per pool.
    pub const DEFAULT_MAX_SEGMENTS: u16 = 4096;

    /// Create a config with default values for every parameter.
    pub fn new() -> Self {
        Self {
            segment_len: Self::DEFAULT_SEGMENT_LEN,
            block_len: Self::DEFAULT_BLOCK_LEN,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
        }
    }

    /// Check the parameters for internal consistency.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.block_len == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "block_len must be non-zero".into(),
            });
        }
        if self.segment_len < self.block_len {
            return Err(ArenaError::InvalidConfig {
                reason: format!(
                    "segment_len {} is smaller than block_len {}",
                    self.segment_len, self.block_len
                ),
            });
        }
        if self.max_segments == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "max_segments must be non-zero".into(),
            });
        }
        Ok(())
    }

    /// Number of whole blocks that fit in one segment.
    pub fn blocks_per_segment(&self) -> u32 {
        self.segment_len / self.block_len.max(1)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Segment-backed sequence arena for illumination protocols.
//!
//! One [`Arena`] owns every variable-length sequence of a protocol: the
//! points of each polygon, the polygons of each montage, and the montages
//! of the step list. Storage is reclaimed only as a unit, when the arena
//! is released or dropped.
//!
//! # Architecture
//!
//! ```text
//! Arena (lifecycle + handle validation)
//! └── PoolSet (one pool per element kind)
//!     ├── SeqPool<Point>                      polygon points
//!     ├── SeqPool<PolygonEntry>               montage contents
//!     └── SeqPool<SeqHandle<PolygonEntry>>    step list contents
//!         ├── SegmentChain<T> → Segment<T>[]  fixed-capacity Vec<T> runs
//!         └── SeqState[] (block slots + head cursor per sequence)
//! ```
//!
//! Sequences grow by fixed-size blocks carved from the current segment.
//! Popping from the head only advances a cursor; blocks are never handed
//! back individually.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
pub mod pool;
pub mod segment;

// Public re-exports for the primary API surface.
pub use arena::{Arena, ArenaStats, PoolStats};
pub use config::ArenaConfig;
pub use pool::{Element, PolygonEntry};
pub use error::ArenaError;
pub use handle::SeqHandle;

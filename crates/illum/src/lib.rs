//! Illum: illumination protocols for worm-tracking experiments.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all illum sub-crates. For most users, adding `illum` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use illum::prelude::*;
//!
//! let mut protocol = Protocol::new();
//! protocol.set_grid_size(4, 4);
//! protocol.set_filename("test.proto");
//!
//! // Populate bottom-up from the protocol's arena.
//! let grid = protocol.grid_size();
//! let arena = protocol.arena_mut();
//! let steps = Steps::create(arena).unwrap();
//! let montage = Montage::create(arena).unwrap();
//! let polygon = Polygon::create(arena, grid).unwrap();
//! polygon
//!     .extend(arena, [(0, 0), (1, 0), (1, 1), (0, 1)].map(Point::from))
//!     .unwrap();
//! montage.push(arena, &polygon).unwrap();
//! steps.push(arena, montage).unwrap();
//! protocol.set_steps(steps).unwrap();
//!
//! let meta = BuildMetadata::new("3f2a9c1", "2024-05-01T12:00:00Z");
//! let doc = illum::yaml::encode_protocol(&mut protocol, &meta).unwrap();
//! assert!(doc.contains("- { x: 1, y: 1 }"));
//!
//! let rebuilt = ProtocolReader::from_str(&doc).unwrap().to_protocol().unwrap();
//! assert_eq!(rebuilt.outline().unwrap().point_count(), 4);
//!
//! let report = protocol.destroy();
//! assert!(report.freed.total_segments() > 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `illum-core` | `Point`, `GridSize`, `ArenaId` |
//! | [`arena`] | `illum-arena` | Segment-backed sequence arena and handles |
//! | [`protocol`] | `illum-protocol` | Protocol, steps, montages, polygons |
//! | [`yaml`] | `illum-yaml` | Document writer and reader |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Geometry and identifier types (`illum-core`).
pub use illum_core as types;

/// Sequence arena (`illum-arena`).
///
/// Most users only touch the arena through [`protocol::Protocol::arena_mut`]
/// and the container constructors.
pub use illum_arena as arena;

/// Protocol data model (`illum-protocol`).
pub use illum_protocol as protocol;

/// YAML persistence (`illum-yaml`).
///
/// Write documents with [`yaml::ProtocolWriter`] or
/// [`yaml::write_protocol_file`], read them with [`yaml::ProtocolReader`].
pub use illum_yaml as yaml;

/// Common imports for typical illum usage.
///
/// ```rust
/// use illum::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use illum_core::{GridSize, Point};

    // Arena
    pub use illum_arena::{Arena, ArenaConfig, ArenaStats};

    // Protocol tree
    pub use illum_protocol::{
        Montage, Polygon, Protocol, ProtocolTree, Steps, TeardownReport,
    };

    // Persistence
    pub use illum_yaml::{
        read_protocol_file, write_protocol_file, BuildMetadata, ProtocolReader, ProtocolWriter,
    };

    // Errors
    pub use illum_arena::ArenaError;
    pub use illum_protocol::ProtocolError;
    pub use illum_yaml::FormatError;
}

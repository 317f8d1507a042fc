//! Illumination protocol data model.
//!
//! A [`Protocol`] is an ordered timeline of [`Steps`]. Each step is a
//! [`Montage`] of [`Polygon`]s, and each polygon is an ordered boundary of
//! [`Point`](illum_core::Point)s over a [`GridSize`](illum_core::GridSize).
//!
//! Every variable-length sequence in the tree is stored in the protocol's
//! single [`Arena`](illum_arena::Arena). Containers are lightweight handles
//! into it: they are created from the arena, appended into their parent,
//! and all of their storage is reclaimed together by [`Protocol::destroy`].
//!
//! ```
//! use illum_core::Point;
//! use illum_protocol::{Montage, Polygon, Protocol, Steps};
//!
//! let mut protocol = Protocol::new();
//! protocol.set_grid_size(4, 4);
//! protocol.set_filename("test.proto");
//!
//! let grid = protocol.grid_size();
//! let arena = protocol.arena_mut();
//! let steps = Steps::create(arena).unwrap();
//! let montage = Montage::create(arena).unwrap();
//! let polygon = Polygon::create(arena, grid).unwrap();
//! polygon.push(arena, Point::new(0, 0)).unwrap();
//! polygon.push(arena, Point::new(1, 0)).unwrap();
//! montage.push(arena, &polygon).unwrap();
//! steps.push(arena, montage).unwrap();
//! protocol.set_steps(steps).unwrap();
//!
//! let tree = protocol.outline().unwrap();
//! assert_eq!(tree.point_count(), 2);
//!
//! let report = protocol.destroy();
//! assert!(report.freed.total_bytes() > 0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod containers;
pub mod error;
pub mod protocol;
pub mod tree;

pub use containers::{Montage, Polygon, Steps};
pub use error::ProtocolError;
pub use protocol::{Protocol, TeardownReport};
pub use tree::ProtocolTree;

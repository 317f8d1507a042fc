//! Core types for illumination protocols.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types shared across the workspace: grid points, grid
//! dimensions, and arena identifiers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod geometry;
pub mod id;

pub use geometry::{GridSize, Point};
pub use id::ArenaId;

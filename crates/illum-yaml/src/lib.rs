//! YAML persistence for illumination protocols.
//!
//! # Architecture
//!
//! - [`ProtocolWriter`] writes protocol documents to any `Write` sink
//! - [`ProtocolReader`] rebuilds protocols from any `Read` source
//! - [`write_protocol_file`] and [`read_protocol_file`] work on the path
//!   held in [`Protocol::filename`](illum_protocol::Protocol::filename)
//!
//! Writing is a destructive drain: every step, polygon and point is
//! popped from its container as it is emitted, so a written protocol is
//! left with an empty step list.
//!
//! # Format
//!
//! ```text
//! # Illumination Protocol:
//! # Generated by the illum protocol library
//! #
//! # Software Version Information:
//! # <git sha>
//! # <build time>
//! #
//! Protocol:
//!   Filename: "test.proto"
//!   GridSize:
//!     height: 4
//!     width: 4
//!   Steps:
//!     -
//!       -
//!         - { x: 0, y: 0 }
//!         - { x: 1, y: 0 }
//! ```
//!
//! `Filename` and `Description` appear only when set. Empty sequences are
//! written in flow form (`[]`).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod reader;
pub mod types;
pub mod writer;

pub use error::FormatError;
pub use reader::{read_protocol_file, ProtocolReader};
pub use types::{BuildMetadata, DocumentSummary};
pub use writer::{encode_protocol, write_protocol_file, ProtocolWriter};

/// First line of every document's comment header.
pub const BANNER: &str = "Illumination Protocol:";

/// Second line of every document's comment header.
pub const ATTRIBUTION: &str = "Generated by the illum protocol library";

/// Spaces per nesting level.
pub const INDENT: usize = 2;

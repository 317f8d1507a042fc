//! Test fixtures for illum development.
//!
//! Provides a [`ProtocolBuilder`] for assembling populated protocols from
//! plain nested vectors, plus ready-made fixtures for the scenarios the
//! test suites share.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use illum_arena::ArenaConfig;
use illum_core::{GridSize, Point};
use illum_protocol::{Protocol, ProtocolTree};

/// Builder for protocols with preconfigured contents.
///
/// Steps are added as lists of polygons, each a list of `(x, y)` pairs.
/// Polygons always take the builder's grid size.
#[derive(Clone, Debug, Default)]
pub struct ProtocolBuilder {
    tree: ProtocolTree,
    config: Option<ArenaConfig>,
}

impl ProtocolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(mut self, width: u32, height: u32) -> Self {
        self.tree.grid_size = GridSize::new(width, height);
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.tree.filename = Some(filename.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.tree.description = Some(description.to_string());
        self
    }

    /// Attach an empty step list even if no step is added.
    pub fn with_empty_steps(mut self) -> Self {
        self.tree.steps.get_or_insert_with(Vec::new);
        self
    }

    /// Append one step made of the given polygons.
    pub fn step(mut self, polygons: &[&[(i32, i32)]]) -> Self {
        let step = polygons
            .iter()
            .map(|points| points.iter().map(|&(x, y)| Point::new(x, y)).collect())
            .collect();
        self.tree.steps.get_or_insert_with(Vec::new).push(step);
        self
    }

    pub fn arena_config(mut self, config: ArenaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// The tree the built protocol will hold.
    pub fn tree(&self) -> &ProtocolTree {
        &self.tree
    }

    /// Build the protocol.
    ///
    /// # Panics
    ///
    /// Panics if the arena rejects the contents.
    pub fn build(&self) -> Protocol {
        let result = match &self.config {
            Some(config) => self.tree.instantiate_with(config.clone()),
            None => self.tree.instantiate(),
        };
        result.expect("fixture protocol should build")
    }
}

/// The unit square, counter-clockwise from the origin.
pub const UNIT_SQUARE: [(i32, i32); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

/// Grid 4×4, one step, one montage, one unit-square polygon, filename
/// `"test.proto"`, no description.
pub fn unit_square_protocol() -> Protocol {
    unit_square_builder().build()
}

pub fn unit_square_builder() -> ProtocolBuilder {
    ProtocolBuilder::new()
        .grid(4, 4)
        .filename("test.proto")
        .step(&[&UNIT_SQUARE])
}

/// Three steps of differing shape, with a description.
pub fn multi_step_builder() -> ProtocolBuilder {
    ProtocolBuilder::new()
        .grid(32, 24)
        .filename("multi.yaml")
        .description("head sweep\nthen tail")
        .step(&[&[(0, 0), (4, 0), (4, 4)], &[(10, 10), (12, 10), (12, 12), (10, 12)]])
        .step(&[])
        .step(&[&[], &[(-1, -1)], &[(31, 23), (0, 23)]])
}

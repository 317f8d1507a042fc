//! Owned snapshots of a protocol tree.

use illum_arena::ArenaConfig;
use illum_core::{GridSize, Point};

use crate::containers::{Montage, Polygon, Steps};
use crate::error::ProtocolError;
use crate::protocol::Protocol;

/// A plain, arena-free copy of a protocol.
///
/// `steps[s][p]` is the point list of polygon `p` in step `s`. `None`
/// means no step list is attached, which is distinct from an attached but
/// empty one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolTree {
    /// Output path.
    pub filename: Option<String>,
    /// Free-form description.
    pub description: Option<String>,
    /// Grid dimensions.
    pub grid_size: GridSize,
    /// Step → polygon → point nesting.
    pub steps: Option<Vec<Vec<Vec<Point>>>>,
}

impl ProtocolTree {
    /// Number of steps, zero when none are attached.
    pub fn step_count(&self) -> usize {
        self.steps.as_ref().map_or(0, Vec::len)
    }

    /// Total polygons across all steps.
    pub fn polygon_count(&self) -> usize {
        self.steps
            .iter()
            .flatten()
            .map(Vec::len)
            .sum()
    }

    /// Total points across all polygons.
    pub fn point_count(&self) -> usize {
        self.steps
            .iter()
            .flatten()
            .flatten()
            .map(Vec::len)
            .sum()
    }

    /// Build a live protocol holding this tree, with a default arena.
    ///
    /// Every polygon takes the tree's grid size as its grid snapshot.
    pub fn instantiate(&self) -> Result<Protocol, ProtocolError> {
        self.populate(Protocol::new())
    }

    /// Like [`ProtocolTree::instantiate`], with a custom arena config.
    pub fn instantiate_with(&self, config: ArenaConfig) -> Result<Protocol, ProtocolError> {
        self.populate(Protocol::with_config(config)?)
    }

    fn populate(&self, mut protocol: Protocol) -> Result<Protocol, ProtocolError> {
        protocol.set_grid_size(self.grid_size.width, self.grid_size.height);
        if let Some(filename) = &self.filename {
            protocol.set_filename(filename.as_str());
        }
        if let Some(description) = &self.description {
            protocol.set_description(description.as_str());
        }
        if let Some(step_list) = &self.steps {
            let grid = self.grid_size;
            let arena = protocol.arena_mut();
            let steps = Steps::create(arena)?;
            for polygons in step_list {
                let montage = Montage::create(arena)?;
                for points in polygons {
                    let polygon = Polygon::create(arena, grid)?;
                    polygon.extend(arena, points.iter().copied())?;
                    montage.push(arena, &polygon)?;
                }
                steps.push(arena, montage)?;
            }
            protocol.set_steps(steps)?;
        }
        Ok(protocol)
    }
}

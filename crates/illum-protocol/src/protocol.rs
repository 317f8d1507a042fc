//! The protocol header and its lifecycle.

use illum_arena::{Arena, ArenaConfig, ArenaStats};
use illum_core::{ArenaId, GridSize};

use crate::containers::Steps;
use crate::error::ProtocolError;
use crate::tree::ProtocolTree;

/// An illumination protocol: metadata, grid, and an ordered step list.
///
/// The protocol owns exactly one [`Arena`]; every step list, montage and
/// polygon attached to it must be allocated from that arena (see
/// [`Protocol::arena_mut`]).
#[derive(Debug)]
pub struct Protocol {
    filename: Option<String>,
    description: Option<String>,
    grid_size: GridSize,
    steps: Option<Steps>,
    arena: Arena,
}

/// What [`Protocol::destroy`] reclaimed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TeardownReport {
    /// The arena that was released.
    pub arena: ArenaId,
    /// Storage freed by the release.
    pub freed: ArenaStats,
    /// Whether a step list was attached at destruction.
    pub had_steps: bool,
}

impl Protocol {
    /// Create an empty protocol with a default arena.
    ///
    /// The grid is 0×0 and filename, description and steps are unset.
    pub fn new() -> Self {
        Self::from_arena(Arena::new())
    }

    /// Create an empty protocol whose arena uses `config`.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ProtocolError> {
        Ok(Self::from_arena(Arena::with_config(config)?))
    }

    fn from_arena(arena: Arena) -> Self {
        Self {
            filename: None,
            description: None,
            grid_size: GridSize::default(),
            steps: None,
            arena,
        }
    }

    /// Path the protocol is written to.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Free-form description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Grid every polygon's coordinates refer to.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// The attached step list, if any.
    pub fn steps(&self) -> Option<Steps> {
        self.steps
    }

    /// The arena backing the protocol tree.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The arena backing the protocol tree, for allocating containers.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Set the grid dimensions.
    pub fn set_grid_size(&mut self, width: u32, height: u32) {
        self.grid_size = GridSize::new(width, height);
    }

    /// Set the output path.
    pub fn set_filename(&mut self, filename: impl Into<String>) {
        self.filename = Some(filename.into());
    }

    /// Set the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Unset the output path.
    pub fn clear_filename(&mut self) {
        self.filename = None;
    }

    /// Unset the description.
    pub fn clear_description(&mut self) {
        self.description = None;
    }

    /// Attach `steps`, replacing any step list already attached.
    ///
    /// The step list must come from this protocol's arena.
    pub fn set_steps(&mut self, steps: Steps) -> Result<(), ProtocolError> {
        self.arena.check_owner(steps.handle())?;
        self.steps = Some(steps);
        Ok(())
    }

    /// Copy the whole tree out without consuming anything.
    pub fn outline(&self) -> Result<ProtocolTree, ProtocolError> {
        let steps = match self.steps {
            Some(steps) => {
                let mut out = Vec::new();
                for montage in steps.montages(&self.arena)? {
                    let mut polygons = Vec::new();
                    for polygon in montage.polygons(&self.arena)? {
                        polygons.push(polygon.points(&self.arena)?);
                    }
                    out.push(polygons);
                }
                Some(out)
            }
            None => None,
        };
        Ok(ProtocolTree {
            filename: self.filename.clone(),
            description: self.description.clone(),
            grid_size: self.grid_size,
            steps,
        })
    }

    /// Release the arena, then the header.
    ///
    /// Every container handle allocated from this protocol becomes stale.
    pub fn destroy(mut self) -> TeardownReport {
        let freed = self.arena.release();
        let report = TeardownReport {
            arena: self.arena.id(),
            freed,
            had_steps: self.steps.is_some(),
        };
        tracing::debug!(
            arena = %report.arena,
            bytes = freed.total_bytes(),
            had_steps = report.had_steps,
            "protocol destroyed"
        );
        report
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::containers::{Montage, Polygon};
    use illum_arena::ArenaError;
    use illum_core::Point;

    #[test]
    fn new_protocol_is_empty() {
        let protocol = Protocol::new();
        assert_eq!(protocol.grid_size(), GridSize::new(0, 0));
        assert_eq!(protocol.filename(), None);
        assert_eq!(protocol.description(), None);
        assert!(protocol.steps().is_none());
        assert!(protocol.arena().stats().is_empty());
    }

    #[test]
    fn empty_protocol_destroys_cleanly() {
        let report = Protocol::new().destroy();
        assert_eq!(report.freed, ArenaStats::default());
        assert!(!report.had_steps);
    }

    #[test]
    fn mutators_set_and_clear() {
        let mut protocol = Protocol::new();
        protocol.set_grid_size(16, 9);
        protocol.set_filename("out.yaml");
        protocol.set_description("dorsal sweep");
        assert_eq!(protocol.grid_size(), GridSize::new(16, 9));
        assert_eq!(protocol.filename(), Some("out.yaml"));
        assert_eq!(protocol.description(), Some("dorsal sweep"));

        protocol.clear_filename();
        protocol.clear_description();
        assert_eq!(protocol.filename(), None);
        assert_eq!(protocol.description(), None);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ArenaConfig {
            max_segments: 0,
            ..ArenaConfig::new()
        };
        assert!(matches!(
            Protocol::with_config(config),
            Err(ProtocolError::Arena(ArenaError::InvalidConfig { .. }))
        ));
    }

    #[test]
    fn steps_from_another_arena_are_rejected() {
        let mut protocol = Protocol::new();
        let mut other = Arena::new();
        let steps = Steps::create(&mut other).unwrap();
        let err = protocol.set_steps(steps).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Arena(ArenaError::ForeignHandle { .. })
        ));
        assert!(protocol.steps().is_none());
    }

    #[test]
    fn outline_copies_without_consuming() {
        let mut protocol = Protocol::new();
        protocol.set_grid_size(4, 4);
        let grid = protocol.grid_size();
        let arena = protocol.arena_mut();
        let steps = Steps::create(arena).unwrap();
        let montage = Montage::create(arena).unwrap();
        let polygon = Polygon::create(arena, grid).unwrap();
        polygon
            .extend(arena, [Point::new(0, 0), Point::new(1, 1)])
            .unwrap();
        montage.push(arena, &polygon).unwrap();
        steps.push(arena, montage).unwrap();
        protocol.set_steps(steps).unwrap();

        let first = protocol.outline().unwrap();
        let second = protocol.outline().unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.steps,
            Some(vec![vec![vec![Point::new(0, 0), Point::new(1, 1)]]])
        );
    }

    #[test]
    fn destroy_reports_freed_storage() {
        let mut protocol = Protocol::new();
        let arena = protocol.arena_mut();
        let steps = Steps::create(arena).unwrap();
        let montage = Montage::create(arena).unwrap();
        steps.push(arena, montage).unwrap();
        protocol.set_steps(steps).unwrap();
        let id = protocol.arena().id();

        let report = protocol.destroy();
        assert_eq!(report.arena, id);
        assert!(report.had_steps);
        assert_eq!(report.freed.total_sequences(), 2);
        assert!(report.freed.total_segments() > 0);
    }
}

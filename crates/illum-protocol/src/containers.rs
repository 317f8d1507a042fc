//! Step lists, montages and polygons.
//!
//! All three are handles into the protocol's arena. Creating one allocates
//! an empty sequence; appending goes to the tail and consuming pops from
//! the head. None of them frees storage on its own: that happens only when
//! the arena is released.

use illum_arena::{Arena, PolygonEntry, SeqHandle};
use illum_core::{GridSize, Point};

use crate::error::ProtocolError;

/// The ordered list of steps of a protocol, one [`Montage`] per step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Steps {
    seq: SeqHandle<SeqHandle<PolygonEntry>>,
}

impl Steps {
    /// Allocate an empty step list from `arena`.
    ///
    /// Fails with [`ArenaError::Unavailable`](illum_arena::ArenaError::Unavailable)
    /// if the arena has been released.
    pub fn create(arena: &mut Arena) -> Result<Self, ProtocolError> {
        Ok(Self {
            seq: arena.alloc_seq()?,
        })
    }

    /// The underlying arena handle.
    pub fn handle(&self) -> SeqHandle<SeqHandle<PolygonEntry>> {
        self.seq
    }

    /// Append `montage` as the last step.
    ///
    /// `montage` must come from the same arena as the step list.
    pub fn push(&self, arena: &mut Arena, montage: Montage) -> Result<(), ProtocolError> {
        arena.check_owner(montage.seq)?;
        Ok(arena.push(self.seq, montage.seq)?)
    }

    /// Remove and return the first step.
    pub fn pop_front(&self, arena: &mut Arena) -> Result<Option<Montage>, ProtocolError> {
        Ok(arena.pop_front(self.seq)?.map(|seq| Montage { seq }))
    }

    /// Number of steps.
    pub fn len(&self, arena: &Arena) -> Result<usize, ProtocolError> {
        Ok(arena.seq_len(self.seq)?)
    }

    /// Whether there are no steps.
    pub fn is_empty(&self, arena: &Arena) -> Result<bool, ProtocolError> {
        Ok(self.len(arena)? == 0)
    }

    /// The steps in order, without consuming them.
    pub fn montages(&self, arena: &Arena) -> Result<Vec<Montage>, ProtocolError> {
        Ok(arena
            .to_vec(self.seq)?
            .into_iter()
            .map(|seq| Montage { seq })
            .collect())
    }
}

/// The polygons illuminated together during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Montage {
    seq: SeqHandle<PolygonEntry>,
}

impl Montage {
    /// Allocate an empty montage from `arena`.
    pub fn create(arena: &mut Arena) -> Result<Self, ProtocolError> {
        Ok(Self {
            seq: arena.alloc_seq()?,
        })
    }

    /// The underlying arena handle.
    pub fn handle(&self) -> SeqHandle<PolygonEntry> {
        self.seq
    }

    /// Append a copy of `polygon`'s header.
    ///
    /// The montage shares the polygon's point sequence, so points pushed
    /// through `polygon` afterwards are visible through the montage too.
    /// `polygon` must come from the same arena as the montage.
    pub fn push(&self, arena: &mut Arena, polygon: &Polygon) -> Result<(), ProtocolError> {
        arena.check_owner(polygon.points)?;
        Ok(arena.push(self.seq, polygon.entry())?)
    }

    /// Remove and return the first polygon.
    pub fn pop_front(&self, arena: &mut Arena) -> Result<Option<Polygon>, ProtocolError> {
        Ok(arena.pop_front(self.seq)?.map(Polygon::from_entry))
    }

    /// Number of polygons.
    pub fn len(&self, arena: &Arena) -> Result<usize, ProtocolError> {
        Ok(arena.seq_len(self.seq)?)
    }

    /// Whether the montage holds no polygons.
    pub fn is_empty(&self, arena: &Arena) -> Result<bool, ProtocolError> {
        Ok(self.len(arena)? == 0)
    }

    /// The polygons in order, without consuming them.
    pub fn polygons(&self, arena: &Arena) -> Result<Vec<Polygon>, ProtocolError> {
        Ok(arena
            .to_vec(self.seq)?
            .into_iter()
            .map(Polygon::from_entry)
            .collect())
    }
}

/// An ordered polygon boundary over a grid.
///
/// The header (point handle and grid snapshot) is owned by the caller; the
/// points live in the arena. The grid is recorded at creation and is not
/// checked against the protocol's grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    points: SeqHandle<Point>,
    grid_size: GridSize,
}

impl Polygon {
    /// Allocate an empty polygon over `grid_size` from `arena`.
    pub fn create(arena: &mut Arena, grid_size: GridSize) -> Result<Self, ProtocolError> {
        Ok(Self {
            points: arena.alloc_seq()?,
            grid_size,
        })
    }

    fn from_entry(entry: PolygonEntry) -> Self {
        Self {
            points: entry.points,
            grid_size: entry.grid_size,
        }
    }

    fn entry(&self) -> PolygonEntry {
        PolygonEntry {
            points: self.points,
            grid_size: self.grid_size,
        }
    }

    /// Grid the coordinates refer to.
    pub fn grid_size(&self) -> GridSize {
        self.grid_size
    }

    /// The underlying point sequence handle.
    pub fn handle(&self) -> SeqHandle<Point> {
        self.points
    }

    /// Append one point.
    pub fn push(&self, arena: &mut Arena, point: Point) -> Result<(), ProtocolError> {
        Ok(arena.push(self.points, point)?)
    }

    /// Append several points in order.
    pub fn extend<I>(&self, arena: &mut Arena, points: I) -> Result<(), ProtocolError>
    where
        I: IntoIterator<Item = Point>,
    {
        Ok(arena.extend(self.points, points)?)
    }

    /// Remove and return the first point.
    pub fn pop_front(&self, arena: &mut Arena) -> Result<Option<Point>, ProtocolError> {
        Ok(arena.pop_front(self.points)?)
    }

    /// Number of points.
    pub fn len(&self, arena: &Arena) -> Result<usize, ProtocolError> {
        Ok(arena.seq_len(self.points)?)
    }

    /// Whether the polygon has no points.
    pub fn is_empty(&self, arena: &Arena) -> Result<bool, ProtocolError> {
        Ok(self.len(arena)? == 0)
    }

    /// The points in order, without consuming them.
    pub fn points(&self, arena: &Arena) -> Result<Vec<Point>, ProtocolError> {
        Ok(arena.to_vec(self.points)?)
    }

    /// Drop the polygon header.
    ///
    /// Point storage is untouched and stays valid for every montage that
    /// holds this polygon until the arena is released.
    pub fn destroy(self) {
        tracing::trace!(points = %self.points, "polygon header dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use illum_arena::ArenaError;

    fn square() -> [Point; 4] {
        [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ]
    }

    #[test]
    fn new_containers_are_empty() {
        let mut arena = Arena::new();
        let steps = Steps::create(&mut arena).unwrap();
        let montage = Montage::create(&mut arena).unwrap();
        let polygon = Polygon::create(&mut arena, GridSize::new(2, 3)).unwrap();
        assert!(steps.is_empty(&arena).unwrap());
        assert!(montage.is_empty(&arena).unwrap());
        assert!(polygon.is_empty(&arena).unwrap());
        assert_eq!(polygon.grid_size(), GridSize::new(2, 3));
    }

    #[test]
    fn creation_from_released_arena_fails() {
        let mut arena = Arena::new();
        arena.release();
        let id = arena.id();
        let expected = ProtocolError::Arena(ArenaError::Unavailable { arena: id });
        assert_eq!(Steps::create(&mut arena), Err(expected.clone()));
        assert_eq!(Montage::create(&mut arena), Err(expected.clone()));
        assert_eq!(
            Polygon::create(&mut arena, GridSize::new(1, 1)),
            Err(expected)
        );
    }

    #[test]
    fn points_keep_insertion_order() {
        let mut arena = Arena::new();
        let polygon = Polygon::create(&mut arena, GridSize::new(4, 4)).unwrap();
        polygon.extend(&mut arena, square()).unwrap();
        assert_eq!(polygon.len(&arena).unwrap(), 4);
        assert_eq!(polygon.points(&arena).unwrap(), square().to_vec());
        assert_eq!(polygon.pop_front(&mut arena).unwrap(), Some(Point::new(0, 0)));
        assert_eq!(polygon.len(&arena).unwrap(), 3);
    }

    #[test]
    fn montage_sees_points_pushed_after_append() {
        let mut arena = Arena::new();
        let montage = Montage::create(&mut arena).unwrap();
        let polygon = Polygon::create(&mut arena, GridSize::new(4, 4)).unwrap();
        montage.push(&mut arena, &polygon).unwrap();
        polygon.push(&mut arena, Point::new(3, 3)).unwrap();

        let held = montage.pop_front(&mut arena).unwrap().unwrap();
        assert_eq!(held, polygon);
        assert_eq!(held.points(&arena).unwrap(), vec![Point::new(3, 3)]);
    }

    #[test]
    fn destroyed_polygon_leaves_montage_intact() {
        let mut arena = Arena::new();
        let montage = Montage::create(&mut arena).unwrap();
        let polygon = Polygon::create(&mut arena, GridSize::new(4, 4)).unwrap();
        polygon.extend(&mut arena, square()).unwrap();
        montage.push(&mut arena, &polygon).unwrap();
        polygon.destroy();

        let polygons = montage.polygons(&arena).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(polygons[0].points(&arena).unwrap(), square().to_vec());
    }

    #[test]
    fn steps_keep_montage_order() {
        let mut arena = Arena::new();
        let steps = Steps::create(&mut arena).unwrap();
        let montages: Vec<Montage> = (0..5)
            .map(|_| Montage::create(&mut arena).unwrap())
            .collect();
        for &m in &montages {
            steps.push(&mut arena, m).unwrap();
        }
        assert_eq!(steps.montages(&arena).unwrap(), montages);
        for &m in &montages {
            assert_eq!(steps.pop_front(&mut arena).unwrap(), Some(m));
        }
        assert_eq!(steps.pop_front(&mut arena).unwrap(), None);
    }

    #[test]
    fn foreign_arena_is_rejected() {
        let mut a = Arena::new();
        let mut b = Arena::new();
        let polygon = Polygon::create(&mut a, GridSize::new(1, 1)).unwrap();
        let err = polygon.push(&mut b, Point::new(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::Arena(ArenaError::ForeignHandle { .. })
        ));
    }

    #[test]
    fn foreign_children_are_not_appended() {
        let mut a = Arena::new();
        let mut b = Arena::new();
        let steps = Steps::create(&mut a).unwrap();
        let montage = Montage::create(&mut a).unwrap();
        let foreign_montage = Montage::create(&mut b).unwrap();
        let foreign_polygon = Polygon::create(&mut b, GridSize::new(1, 1)).unwrap();

        let expected = ProtocolError::Arena(ArenaError::ForeignHandle {
            handle_arena: b.id(),
            arena: a.id(),
        });
        assert_eq!(steps.push(&mut a, foreign_montage), Err(expected.clone()));
        assert_eq!(montage.push(&mut a, &foreign_polygon), Err(expected));
        assert!(steps.is_empty(&a).unwrap());
        assert!(montage.is_empty(&a).unwrap());
    }
}

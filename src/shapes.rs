//! Shape definitions and the shared orientation cache.
//!
//! Each shape is a set of occupied cells normalized to start at the origin.
//! Orientation sets are computed once per shape and shared read-only by every
//! region search.

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::PackError;
use crate::geometry::{all_orientations, canonicalize, extent, Cell};

/// Identifier of a shape in the library.
pub type ShapeId = usize;

/// An immutable shape in canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    id: ShapeId,
    cells: Vec<Cell>,
}

impl Shape {
    /// Creates a shape, canonicalizing the given cells.
    pub fn new(id: ShapeId, cells: &[Cell]) -> Self {
        Self {
            id,
            cells: canonicalize(cells),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    /// The canonical cells, sorted.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells.
    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

/// All shapes of a puzzle, ordered by id.
#[derive(Debug, Clone, Default)]
pub struct ShapeLibrary {
    shapes: BTreeMap<ShapeId, Shape>,
}

impl ShapeLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape, replacing any shape that had the same id.
    pub fn insert(&mut self, shape: Shape) -> Option<Shape> {
        self.shapes.insert(shape.id, shape)
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(&id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(&id)
    }

    /// Area of a shape, failing loudly for ids outside the library.
    pub fn area(&self, id: ShapeId) -> Result<usize, PackError> {
        self.get(id)
            .map(Shape::area)
            .ok_or(PackError::UnknownShape { shape: id })
    }

    /// Shapes in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.values()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl FromIterator<Shape> for ShapeLibrary {
    fn from_iter<I: IntoIterator<Item = Shape>>(iter: I) -> Self {
        let mut library = Self::new();
        for shape in iter {
            library.insert(shape);
        }
        library
    }
}

/// One orientation of a shape: canonical cells plus their bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Orientation {
    cells: Vec<Cell>,
    height: usize,
    width: usize,
}

impl Orientation {
    fn new(cells: Vec<Cell>) -> Self {
        let (height, width) = extent(&cells);
        Self {
            cells,
            height,
            width,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of rows spanned; zero for an empty shape.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns spanned; zero for an empty shape.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

/// Precomputed orientation sets for every shape in a library.
///
/// Built once and never mutated; the sets are reference counted so searches
/// on other threads can hold them without copying.
#[derive(Debug, Clone, Default)]
pub struct OrientationCache {
    orientations: FxHashMap<ShapeId, Arc<[Orientation]>>,
}

impl OrientationCache {
    /// Generates the orientation set of every shape in the library.
    pub fn build(library: &ShapeLibrary) -> Self {
        let orientations = library
            .iter()
            .map(|shape| {
                let set: Arc<[Orientation]> = all_orientations(shape.cells())
                    .into_iter()
                    .map(Orientation::new)
                    .collect();
                log::trace!(
                    "shape {} has {} orientation(s)",
                    shape.id(),
                    set.len()
                );
                (shape.id(), set)
            })
            .collect();

        Self { orientations }
    }

    /// Orientation set for a shape id.
    pub fn get(&self, id: ShapeId) -> Result<&Arc<[Orientation]>, PackError> {
        self.orientations
            .get(&id)
            .ok_or(PackError::UnknownShape { shape: id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> ShapeLibrary {
        [
            Shape::new(0, &[(0, 0)]),
            Shape::new(1, &[(3, 3), (4, 3), (4, 4)]),
            Shape::new(2, &[]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_shape_is_canonical() {
        let shape = Shape::new(7, &[(4, 2), (3, 2), (4, 3)]);
        assert_eq!(shape.cells(), &[(0, 0), (1, 0), (1, 1)]);
        assert_eq!(shape.area(), 3);
        assert_eq!(shape.id(), 7);
    }

    #[test]
    fn test_library_area_lookup() {
        let library = library();
        assert_eq!(library.len(), 3);
        assert_eq!(library.area(1), Ok(3));
        assert_eq!(library.area(2), Ok(0));
        assert_eq!(library.area(9), Err(PackError::UnknownShape { shape: 9 }));
    }

    #[test]
    fn test_identical_cells_keep_distinct_ids() {
        let library: ShapeLibrary = [Shape::new(0, &[(0, 0)]), Shape::new(1, &[(5, 5)])]
            .into_iter()
            .collect();
        assert_eq!(library.len(), 2);
        assert_eq!(library.get(0).unwrap().cells(), library.get(1).unwrap().cells());
    }

    #[test]
    fn test_cache_covers_every_shape() {
        let library = library();
        let cache = OrientationCache::build(&library);
        for shape in library.iter() {
            assert!(cache.get(shape.id()).is_ok());
        }
        assert_eq!(cache.get(0).unwrap().len(), 1);
        assert_eq!(cache.get(1).unwrap().len(), 4);
        assert!(cache.get(3).is_err());
    }

    #[test]
    fn test_empty_shape_orientation() {
        let cache = OrientationCache::build(&library());
        let empty = cache.get(2).unwrap();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty[0].area(), 0);
        assert_eq!((empty[0].height(), empty[0].width()), (0, 0));
    }

    #[test]
    fn test_orientation_extent() {
        let cache = OrientationCache::build(&library());
        for orientation in cache.get(1).unwrap().iter() {
            assert_eq!((orientation.height(), orientation.width()), (2, 2));
            assert_eq!(orientation.area(), 3);
        }
    }
}

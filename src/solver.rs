//! Backtracking placement engine for a single region.
//!
//! Tiles are placed largest-first. For each tile every orientation is tried
//! in cache order, and for each orientation every in-bounds anchor in
//! row-major order. The first complete assignment wins.
//!
//! The search is iterative: each depth of the search tree keeps a `Frame`
//! with the cursor of the next candidate to try, so deep demand lists do not
//! grow the call stack.

use std::cmp::Reverse;
use std::sync::Arc;

use crate::error::PackError;
use crate::grid::Grid;
use crate::shapes::{Orientation, OrientationCache, ShapeId};

/// Tunables for a region search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of tentative placements before giving up.
    /// `None` searches exhaustively.
    pub node_limit: Option<u64>,
    /// Evaluate regions on the rayon thread pool.
    pub parallel: bool,
}

/// One tile of a finished packing, in absolute grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedTile {
    pub shape: ShapeId,
    /// Index into the shape's orientation set.
    pub orientation: usize,
    /// Top-left anchor of the orientation's bounding box.
    pub row: usize,
    pub col: usize,
    cells: Vec<(usize, usize)>,
}

impl PlacedTile {
    /// Occupied `(row, col)` cells of this tile.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.cells
    }
}

/// A complete, non-overlapping arrangement of a region's demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packing {
    width: usize,
    height: usize,
    tiles: Vec<PlacedTile>,
}

impl Packing {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Tiles in placement order.
    pub fn tiles(&self) -> &[PlacedTile] {
        &self.tiles
    }
}

/// Result of a region search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Packed(Packing),
    /// Every candidate was exhausted; no arrangement exists.
    Infeasible,
    /// The node limit was hit before the search finished.
    Aborted { nodes: u64 },
}

/// A required tile copy with its resolved orientation set.
struct Tile {
    shape: ShapeId,
    orientations: Arc<[Orientation]>,
}

impl Tile {
    fn area(&self) -> usize {
        self.orientations.first().map_or(0, Orientation::area)
    }
}

/// A tentative placement on the current search path.
#[derive(Clone, Copy)]
struct Placement {
    orientation_index: usize,
    row: usize,
    col: usize,
}

/// Cursor into the candidate space of one tile.
///
/// Candidates are enumerated orientation-major, then row, then column; the
/// cursor points at the next candidate not yet tried.
#[derive(Clone, Copy, Default)]
struct Frame {
    orientation_index: usize,
    row: usize,
    col: usize,
}

/// Exact packing search for one `width` x `height` region.
pub struct Packer {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Packer {
    /// Resolves the demand list against the cache and orders it largest-first.
    ///
    /// The sort is stable, so equal-area tiles keep their demand order.
    pub fn new(
        width: usize,
        height: usize,
        demand: &[ShapeId],
        cache: &OrientationCache,
    ) -> Result<Self, PackError> {
        if width.checked_mul(height).is_none() {
            return Err(PackError::RegionTooLarge { width, height });
        }

        let mut tiles = demand
            .iter()
            .map(|&shape| {
                Ok(Tile {
                    shape,
                    orientations: Arc::clone(cache.get(shape)?),
                })
            })
            .collect::<Result<Vec<_>, PackError>>()?;

        tiles.sort_by_key(|tile| Reverse(tile.area()));

        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    /// Shape ids in the order they will be placed.
    pub fn placement_order(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.tiles.iter().map(|tile| tile.shape)
    }

    /// Total number of cells the demand occupies.
    pub fn required_area(&self) -> usize {
        self.tiles.iter().map(Tile::area).sum()
    }

    /// Runs the search on a fresh grid.
    ///
    /// A demand with no occupied cells is placed at the origin without
    /// allocating a grid, with the same node accounting as a full search.
    pub fn search(&self, node_limit: Option<u64>) -> SearchOutcome {
        if self.required_area() == 0 {
            let tiles = self.tiles.len() as u64;
            if let Some(limit) = node_limit.filter(|&limit| limit < tiles) {
                return SearchOutcome::Aborted { nodes: limit };
            }
            let origin = Placement {
                orientation_index: 0,
                row: 0,
                col: 0,
            };
            return SearchOutcome::Packed(self.packing(&vec![origin; self.tiles.len()]));
        }

        let mut grid = Grid::new(self.width, self.height);
        let mut placements: Vec<Placement> = Vec::with_capacity(self.tiles.len());
        let mut search_stack = vec![Frame::default()];
        let mut nodes = 0u64;

        while let Some(frame) = search_stack.last_mut() {
            let depth = placements.len();
            let Some(tile) = self.tiles.get(depth) else {
                // every tile placed
                log::trace!("packed {}x{} after {} nodes", self.width, self.height, nodes);
                return SearchOutcome::Packed(self.packing(&placements));
            };

            match self.next_placement(&grid, tile, frame) {
                Some(placement) => {
                    if node_limit.is_some_and(|limit| nodes >= limit) {
                        return SearchOutcome::Aborted { nodes };
                    }
                    nodes += 1;

                    let orientation = &tile.orientations[placement.orientation_index];
                    grid.set(orientation, placement.row, placement.col, true);
                    placements.push(placement);
                    search_stack.push(Frame::default());
                }
                None => {
                    // tile exhausted: undo the parent's placement and resume its cursor
                    search_stack.pop();
                    if let Some(placement) = placements.pop() {
                        let parent = &self.tiles[placements.len()];
                        let orientation = &parent.orientations[placement.orientation_index];
                        grid.set(orientation, placement.row, placement.col, false);
                    }
                }
            }
        }

        log::trace!(
            "no packing for {}x{} after {} nodes",
            self.width,
            self.height,
            nodes
        );
        SearchOutcome::Infeasible
    }

    /// Advances the frame to the next collision-free candidate for `tile`.
    ///
    /// Orientations larger than the region are skipped outright.
    fn next_placement(&self, grid: &Grid, tile: &Tile, frame: &mut Frame) -> Option<Placement> {
        while let Some(orientation) = tile.orientations.get(frame.orientation_index) {
            if orientation.height() <= self.height && orientation.width() <= self.width {
                let last_row = self.height - orientation.height();
                let last_col = self.width - orientation.width();

                while frame.row <= last_row {
                    while frame.col <= last_col {
                        let (row, col) = (frame.row, frame.col);
                        frame.col += 1;

                        if grid.is_free(orientation, row, col) {
                            return Some(Placement {
                                orientation_index: frame.orientation_index,
                                row,
                                col,
                            });
                        }
                    }
                    frame.col = 0;
                    frame.row += 1;
                }
            }

            frame.orientation_index += 1;
            frame.row = 0;
            frame.col = 0;
        }

        None
    }

    /// Materializes the placements on the current path into absolute cells.
    fn packing(&self, placements: &[Placement]) -> Packing {
        let tiles = self
            .tiles
            .iter()
            .zip(placements)
            .map(|(tile, placement)| {
                let orientation = &tile.orientations[placement.orientation_index];
                let cells = orientation
                    .cells()
                    .iter()
                    .map(|&(r, c)| (placement.row + r as usize, placement.col + c as usize))
                    .collect();
                PlacedTile {
                    shape: tile.shape,
                    orientation: placement.orientation_index,
                    row: placement.row,
                    col: placement.col,
                    cells,
                }
            })
            .collect();

        Packing {
            width: self.width,
            height: self.height,
            tiles,
        }
    }
}

/// Decides whether every tile of `demand` fits into a `width` x `height` region.
///
/// Runs an exhaustive search; only an unknown shape id is an error.
pub fn can_pack(
    width: usize,
    height: usize,
    demand: &[ShapeId],
    cache: &OrientationCache,
) -> Result<bool, PackError> {
    let packer = Packer::new(width, height, demand, cache)?;
    Ok(matches!(packer.search(None), SearchOutcome::Packed(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Shape, ShapeLibrary};

    const MONO: ShapeId = 0;
    const DOMINO: ShapeId = 1;
    const L_TROMINO: ShapeId = 2;
    const T_TETROMINO: ShapeId = 3;
    const I_TROMINO: ShapeId = 4;
    const EMPTY: ShapeId = 5;

    fn cache() -> OrientationCache {
        let library: ShapeLibrary = [
            Shape::new(MONO, &[(0, 0)]),
            Shape::new(DOMINO, &[(0, 0), (0, 1)]),
            Shape::new(L_TROMINO, &[(0, 0), (1, 0), (1, 1)]),
            Shape::new(T_TETROMINO, &[(0, 0), (0, 1), (0, 2), (1, 1)]),
            Shape::new(I_TROMINO, &[(0, 0), (0, 1), (0, 2)]),
            Shape::new(EMPTY, &[]),
        ]
        .into_iter()
        .collect();
        OrientationCache::build(&library)
    }

    fn pack(width: usize, height: usize, demand: &[ShapeId]) -> SearchOutcome {
        Packer::new(width, height, demand, &cache())
            .unwrap()
            .search(None)
    }

    /// Checks that tiles are disjoint, in bounds, and match the demand.
    fn assert_sound(packing: &Packing, demand: &[ShapeId]) {
        let mut seen = vec![false; packing.width() * packing.height()];
        for tile in packing.tiles() {
            for &(row, col) in tile.cells() {
                assert!(row < packing.height() && col < packing.width());
                let index = row * packing.width() + col;
                assert!(!seen[index], "cell ({row}, {col}) covered twice");
                seen[index] = true;
            }
        }

        let mut placed: Vec<ShapeId> = packing.tiles().iter().map(|t| t.shape).collect();
        let mut expected = demand.to_vec();
        placed.sort_unstable();
        expected.sort_unstable();
        assert_eq!(placed, expected);
    }

    #[test]
    fn test_unit_cells_fill_square() {
        let cache = cache();
        assert_eq!(can_pack(2, 2, &[MONO; 4], &cache), Ok(true));
    }

    #[test]
    fn test_two_dominoes_fill_square() {
        let cache = cache();
        assert_eq!(can_pack(2, 2, &[DOMINO, DOMINO], &cache), Ok(true));
    }

    #[test]
    fn test_overfull_region_is_infeasible() {
        let cache = cache();
        assert_eq!(can_pack(1, 1, &[MONO, MONO], &cache), Ok(false));
    }

    #[test]
    fn test_matching_area_but_no_arrangement() {
        // any T placement in 2x4 isolates a single cell
        let cache = cache();
        assert_eq!(can_pack(4, 2, &[T_TETROMINO, DOMINO, DOMINO], &cache), Ok(false));
    }

    #[test]
    fn test_rotation_needed() {
        // the straight tromino only fits vertically
        let cache = cache();
        assert_eq!(can_pack(1, 3, &[I_TROMINO], &cache), Ok(true));
        assert_eq!(can_pack(2, 2, &[I_TROMINO], &cache), Ok(false));
    }

    #[test]
    fn test_empty_demand_always_fits() {
        let cache = cache();
        assert_eq!(can_pack(1, 1, &[], &cache), Ok(true));
    }

    #[test]
    fn test_empty_shape_occupies_nothing() {
        match pack(1, 1, &[EMPTY, MONO, EMPTY]) {
            SearchOutcome::Packed(packing) => {
                assert_sound(&packing, &[EMPTY, MONO, EMPTY]);
                assert_eq!(packing.tiles()[0].shape, MONO);
            }
            other => panic!("expected a packing, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_area_demand_skips_grid() {
        // a grid this size could never be allocated
        let side = 1 << 15;
        match pack(side, side, &[]) {
            SearchOutcome::Packed(packing) => assert!(packing.tiles().is_empty()),
            other => panic!("expected a packing, got {other:?}"),
        }
        match pack(side, side, &[EMPTY, EMPTY]) {
            SearchOutcome::Packed(packing) => assert_sound(&packing, &[EMPTY, EMPTY]),
            other => panic!("expected a packing, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_area_shortcut_matches_search() {
        // empty tiles land at the origin in their only orientation
        let cache = cache();
        let packer = Packer::new(2, 2, &[EMPTY, EMPTY, EMPTY], &cache).unwrap();
        let SearchOutcome::Packed(packing) = packer.search(None) else {
            panic!("expected a packing");
        };
        for tile in packing.tiles() {
            assert_eq!((tile.orientation, tile.row, tile.col), (0, 0, 0));
            assert!(tile.cells().is_empty());
        }
        assert_eq!(packer.search(Some(1)), SearchOutcome::Aborted { nodes: 1 });
        assert!(matches!(packer.search(Some(3)), SearchOutcome::Packed(_)));
    }

    #[test]
    fn test_overflowing_region_is_an_error() {
        let cache = cache();
        assert_eq!(
            can_pack(usize::MAX, 2, &[MONO], &cache),
            Err(PackError::RegionTooLarge {
                width: usize::MAX,
                height: 2
            })
        );
    }

    #[test]
    fn test_unknown_shape_is_an_error() {
        let cache = cache();
        assert_eq!(
            can_pack(3, 3, &[MONO, 42], &cache),
            Err(PackError::UnknownShape { shape: 42 })
        );
    }

    #[test]
    fn test_largest_tiles_placed_first() {
        let cache = cache();
        let packer = Packer::new(5, 5, &[MONO, DOMINO, L_TROMINO, DOMINO, T_TETROMINO], &cache)
            .unwrap();
        let order: Vec<ShapeId> = packer.placement_order().collect();
        assert_eq!(order, vec![T_TETROMINO, L_TROMINO, DOMINO, DOMINO, MONO]);
        assert_eq!(packer.required_area(), 4 + 3 + 2 + 2 + 1);
    }

    #[test]
    fn test_packings_are_sound() {
        let cases: &[(usize, usize, &[ShapeId])] = &[
            (2, 2, &[MONO, MONO, MONO, MONO]),
            (3, 2, &[L_TROMINO, L_TROMINO]),
            (3, 3, &[I_TROMINO, DOMINO, DOMINO, DOMINO]),
            (4, 3, &[T_TETROMINO, L_TROMINO, L_TROMINO, DOMINO]),
            (5, 5, &[T_TETROMINO, T_TETROMINO, L_TROMINO, MONO]),
        ];
        for &(width, height, demand) in cases {
            match pack(width, height, demand) {
                SearchOutcome::Packed(packing) => {
                    assert_eq!((packing.width(), packing.height()), (width, height));
                    assert_sound(&packing, demand);
                }
                other => panic!("{width}x{height} {demand:?}: expected a packing, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_first_solution_in_search_order() {
        let SearchOutcome::Packed(packing) = pack(3, 3, &[DOMINO, DOMINO, I_TROMINO, DOMINO])
        else {
            panic!("expected a packing");
        };
        let anchors: Vec<(ShapeId, usize, usize)> = packing
            .tiles()
            .iter()
            .map(|tile| (tile.shape, tile.row, tile.col))
            .collect();
        assert_eq!(
            anchors,
            vec![(I_TROMINO, 0, 0), (DOMINO, 1, 0), (DOMINO, 2, 0), (DOMINO, 1, 2)]
        );
        assert_eq!(packing.tiles()[3].orientation, 1);
    }

    #[test]
    fn test_repeated_searches_agree() {
        let cache = cache();
        let packer = Packer::new(4, 2, &[T_TETROMINO, DOMINO, DOMINO], &cache).unwrap();
        assert_eq!(packer.search(None), SearchOutcome::Infeasible);
        assert_eq!(packer.search(None), SearchOutcome::Infeasible);
    }

    #[test]
    fn test_node_limit_aborts() {
        let cache = cache();
        let packer = Packer::new(4, 2, &[T_TETROMINO, DOMINO, DOMINO], &cache).unwrap();
        assert_eq!(packer.search(Some(0)), SearchOutcome::Aborted { nodes: 0 });
        assert_eq!(packer.search(Some(2)), SearchOutcome::Aborted { nodes: 2 });
    }

    #[test]
    fn test_generous_node_limit_matches_exhaustive_search() {
        let cache = cache();
        let packer = Packer::new(3, 3, &[I_TROMINO, DOMINO, DOMINO, DOMINO], &cache).unwrap();
        assert_eq!(packer.search(Some(1_000)), packer.search(None));
    }
}

//! Present Packing Library
//!
//! Decides whether a multiset of polyomino tiles, each usable in any of its
//! rotations and mirror images, fits without overlap into a rectangular
//! region. The answer per region is exact: a placement is either found by
//! exhaustive backtracking or proven impossible.

pub mod error;
pub mod geometry;
pub mod grid;
pub mod parse;
pub mod region;
pub mod shapes;
pub mod solver;

use std::path::Path;

pub use error::{Error, PackError, ParseError};
pub use parse::{parse_input, Puzzle};
pub use region::{assess, evaluate, evaluate_all, Region, Summary, Verdict};
pub use shapes::{Orientation, OrientationCache, Shape, ShapeId, ShapeLibrary};
pub use solver::{can_pack, Packer, Packing, PlacedTile, SearchOptions, SearchOutcome};

/// Reads and parses a puzzle input file.
pub fn load(path: &Path) -> Result<Puzzle, Error> {
    let input = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_input(&input)?)
}

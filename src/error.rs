//! Error types shared by the parser and the packing core.

use std::path::PathBuf;

use thiserror::Error;

use crate::shapes::ShapeId;

/// Configuration errors raised by the packing core.
///
/// An unsuccessful search is not an error; it is reported as a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("demand references shape {shape}, which is not in the shape library")]
    UnknownShape { shape: ShapeId },
    #[error("region {width}x{height} has more cells than can be addressed")]
    RegionTooLarge { width: usize, height: usize },
}

/// Errors raised while reading the puzzle input text.
///
/// Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: shape row appears before any shape header")]
    RowWithoutHeader { line: usize },
    #[error("line {line}: unexpected character '{found}' in shape row, expected '#' or '.'")]
    UnexpectedCell { line: usize, found: char },
    #[error("line {line}: shape {shape} is defined twice")]
    DuplicateShape { line: usize, shape: ShapeId },
    #[error("line {line}: shape {shape} has no rows")]
    EmptyShapeBlock { line: usize, shape: ShapeId },
    #[error("line {line}: expected region format '<width>x<height>: <count>...', got '{text}'")]
    MalformedRegion { line: usize, text: String },
    #[error("line {line}: could not parse number '{text}'")]
    Number { line: usize, text: String },
    #[error("line {line}: region dimensions must be positive, got {width}x{height}")]
    ZeroDimension {
        line: usize,
        width: usize,
        height: usize,
    },
    #[error("line {line}: region {width}x{height} has more cells than can be addressed")]
    RegionTooLarge {
        line: usize,
        width: usize,
        height: usize,
    },
    #[error("line {line}: expected a region line after the region section began")]
    ShapeAfterRegions { line: usize },
}

/// Top-level error for loading and evaluating an input file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Pack(#[from] PackError),
}

//! Occupancy grid for a single region search, and text rendering.
//!
//! The grid is a flat row-major array of booleans, `true` for occupied.
//! Each region search owns a fresh grid; nothing is shared between searches.

use crate::geometry::{extent, Cell};
use crate::shapes::Orientation;
use crate::solver::Packing;

/// A `width` x `height` occupancy matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates an all-empty grid.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Converts a (row, col) pair to a linear cell index.
    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }

    #[cfg(test)]
    fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    #[cfg(test)]
    fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&occupied| occupied).count()
    }

    /// Checks that every cell of the orientation anchored at `(row, col)` is free.
    ///
    /// The caller guarantees the orientation fits inside the bounds at this anchor.
    #[inline]
    pub fn is_free(&self, orientation: &Orientation, row: usize, col: usize) -> bool {
        orientation
            .cells()
            .iter()
            .all(|&(r, c)| !self.cells[self.index(row + r as usize, col + c as usize)])
    }

    /// Marks (or clears) every cell of the orientation anchored at `(row, col)`.
    #[inline]
    pub fn set(&mut self, orientation: &Orientation, row: usize, col: usize, occupied: bool) {
        for &(r, c) in orientation.cells() {
            let index = self.index(row + r as usize, col + c as usize);
            self.cells[index] = occupied;
        }
    }
}

/// Label for the k-th placed tile: `A`..`Z`, then `a`..`z`, then repeating.
fn tile_label(tile_index: usize) -> char {
    let label = (tile_index % 52) as u8;
    if label < 26 {
        char::from(b'A' + label)
    } else {
        char::from(b'a' + label - 26)
    }
}

/// Formats a packing as a human-readable string.
///
/// Row 0 is printed first. Each tile is drawn with its label in placement
/// order; empty cells show as '.'.
pub fn format_packing(packing: &Packing) -> String {
    let width = packing.width();
    let mut labels = vec!['.'; width * packing.height()];

    for (tile_index, tile) in packing.tiles().iter().enumerate() {
        for &(row, col) in tile.cells() {
            labels[row * width + col] = tile_label(tile_index);
        }
    }

    let mut output = String::with_capacity(labels.len() + packing.height());
    for row in labels.chunks(width.max(1)) {
        output.extend(row);
        output.push('\n');
    }
    output
}

/// Draws a canonical cell set with '#' for occupied and '.' for empty.
pub fn format_cells(cells: &[Cell]) -> String {
    let (height, width) = extent(cells);
    let mut output = String::new();
    for row in 0..height as i32 {
        for col in 0..width as i32 {
            output.push(if cells.contains(&(row, col)) { '#' } else { '.' });
        }
        output.push('\n');
    }
    output
}

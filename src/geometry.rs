//! 2D symmetry and normalization utilities.
//!
//! A square has 8 symmetries (the dihedral group of order 8): 4 rotations,
//! each optionally mirrored. Shapes are compared in canonical form, so two
//! cell sets that differ only by translation are the same shape.

/// A grid cell as `(row, col)`, relative to some origin.
pub type Cell = (i32, i32);

/// Translates cells so the minimum row and minimum column are both zero.
///
/// The result is sorted and free of duplicates, so canonical forms can be
/// compared with `==`. An empty input yields an empty output.
pub fn canonicalize(cells: &[Cell]) -> Vec<Cell> {
    let Some(min_row) = cells.iter().map(|&(row, _)| row).min() else {
        return Vec::new();
    };
    let min_col = cells.iter().map(|&(_, col)| col).min().unwrap_or(0);

    let mut canonical: Vec<Cell> = cells
        .iter()
        .map(|&(row, col)| (row - min_row, col - min_col))
        .collect();
    canonical.sort_unstable();
    canonical.dedup();
    canonical
}

/// Rotates 90 degrees clockwise: `(r, c) -> (c, -r)`.
fn rotate(cells: &[Cell]) -> Vec<Cell> {
    cells.iter().map(|&(row, col)| (col, -row)).collect()
}

/// Mirrors horizontally: `(r, c) -> (r, -c)`.
fn mirror(cells: &[Cell]) -> Vec<Cell> {
    cells.iter().map(|&(row, col)| (row, -col)).collect()
}

/// Generates every distinct orientation of a shape.
///
/// Walks the four rotations, recording each rotation and its mirror image in
/// canonical form. Orientations are kept in discovery order; shapes with
/// internal symmetry collapse to fewer than 8 entries. An empty shape has a
/// single (empty) orientation.
pub fn all_orientations(base: &[Cell]) -> Vec<Vec<Cell>> {
    let mut orientations: Vec<Vec<Cell>> = Vec::with_capacity(8);
    let mut current = canonicalize(base);

    for _ in 0..4 {
        for candidate in [canonicalize(&current), canonicalize(&mirror(&current))] {
            if !orientations.contains(&candidate) {
                orientations.push(candidate);
            }
        }
        current = canonicalize(&rotate(&current));
    }

    orientations
}

/// Bounding `(height, width)` of a canonical cell set; `(0, 0)` when empty.
pub fn extent(cells: &[Cell]) -> (usize, usize) {
    let height = cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
    let width = cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);
    (height as usize, width as usize)
}

//! Reader for the puzzle input text.
//!
//! The input has a shape section followed by a region section:
//!
//! ```text
//! 0:
//! ###
//! #..
//!
//! 1:
//! ##
//!
//! 4x3: 1 2
//! ```
//!
//! Each shape block is a `<id>:` header and rows of `#` (occupied) and `.`
//! (empty). Each region line is `<width>x<height>:` followed by one count per
//! shape id, starting at id 0.

use crate::error::ParseError;
use crate::geometry::Cell;
use crate::region::Region;
use crate::shapes::{Shape, ShapeId, ShapeLibrary};

/// Everything read from an input file.
#[derive(Debug, Clone, Default)]
pub struct Puzzle {
    pub library: ShapeLibrary,
    pub regions: Vec<Region>,
}

/// A shape block whose rows are still being read.
struct PendingShape {
    id: ShapeId,
    header_line: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl PendingShape {
    fn finish(self, library: &mut ShapeLibrary) -> Result<(), ParseError> {
        if self.rows == 0 {
            return Err(ParseError::EmptyShapeBlock {
                line: self.header_line,
                shape: self.id,
            });
        }
        library.insert(Shape::new(self.id, &self.cells));
        Ok(())
    }
}

/// Parses the full input text.
pub fn parse_input(input: &str) -> Result<Puzzle, ParseError> {
    let mut puzzle = Puzzle::default();
    let mut pending: Option<PendingShape> = None;
    let mut in_regions = false;

    for (index, raw_line) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim_end();

        if line.is_empty() {
            if let Some(shape) = pending.take() {
                shape.finish(&mut puzzle.library)?;
            }
            continue;
        }

        if in_regions || is_region_line(line) {
            if let Some(shape) = pending.take() {
                shape.finish(&mut puzzle.library)?;
            }
            if !is_region_line(line) {
                return Err(ParseError::ShapeAfterRegions { line: line_number });
            }
            in_regions = true;
            puzzle.regions.push(parse_region(line_number, line)?);
        } else if let Some(id) = shape_header(line) {
            if let Some(shape) = pending.take() {
                shape.finish(&mut puzzle.library)?;
            }
            if puzzle.library.contains(id) {
                return Err(ParseError::DuplicateShape {
                    line: line_number,
                    shape: id,
                });
            }
            pending = Some(PendingShape {
                id,
                header_line: line_number,
                rows: 0,
                cells: Vec::new(),
            });
        } else {
            let Some(shape) = pending.as_mut() else {
                return Err(ParseError::RowWithoutHeader { line: line_number });
            };
            parse_shape_row(line_number, line, shape)?;
        }
    }

    if let Some(shape) = pending.take() {
        shape.finish(&mut puzzle.library)?;
    }

    log::debug!(
        "parsed {} shapes and {} regions",
        puzzle.library.len(),
        puzzle.regions.len()
    );
    Ok(puzzle)
}

/// Region lines start with a digit and contain both 'x' and ':'.
fn is_region_line(line: &str) -> bool {
    line.starts_with(|c: char| c.is_ascii_digit()) && line.contains('x') && line.contains(':')
}

/// Returns the id of a `<id>:` header line.
fn shape_header(line: &str) -> Option<ShapeId> {
    let number = line.strip_suffix(':')?.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

fn parse_shape_row(
    line_number: usize,
    line: &str,
    shape: &mut PendingShape,
) -> Result<(), ParseError> {
    let row = shape.rows as i32;
    for (col, c) in line.chars().enumerate() {
        match c {
            '#' => shape.cells.push((row, col as i32)),
            '.' => {}
            found => {
                return Err(ParseError::UnexpectedCell {
                    line: line_number,
                    found,
                })
            }
        }
    }
    shape.rows += 1;
    Ok(())
}

fn parse_number(line_number: usize, text: &str) -> Result<usize, ParseError> {
    let text = text.trim();
    text.parse().map_err(|_| ParseError::Number {
        line: line_number,
        text: text.to_string(),
    })
}

/// Parses `<width>x<height>: <count>...` into a region with a flat demand list.
fn parse_region(line_number: usize, line: &str) -> Result<Region, ParseError> {
    let malformed = || ParseError::MalformedRegion {
        line: line_number,
        text: line.to_string(),
    };

    let (size, counts) = line.split_once(':').ok_or_else(malformed)?;
    let (width, height) = size.split_once('x').ok_or_else(malformed)?;
    let width = parse_number(line_number, width)?;
    let height = parse_number(line_number, height)?;
    if width == 0 || height == 0 {
        return Err(ParseError::ZeroDimension {
            line: line_number,
            width,
            height,
        });
    }
    if width.checked_mul(height).is_none() {
        return Err(ParseError::RegionTooLarge {
            line: line_number,
            width,
            height,
        });
    }

    let counts = counts
        .split_whitespace()
        .map(|count| parse_number(line_number, count))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Region::from_counts(width, height, &counts))
}

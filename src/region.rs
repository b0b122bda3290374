//! Region definitions and feasibility evaluation.
//!
//! Every region first gets a cheap area check; only regions whose demand
//! fits by area are handed to the placement engine.

use rayon::prelude::*;

use crate::error::PackError;
use crate::shapes::{OrientationCache, ShapeId, ShapeLibrary};
use crate::solver::{Packer, Packing, SearchOptions, SearchOutcome};

/// A rectangular region and the tiles it must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub width: usize,
    pub height: usize,
    /// One entry per required copy.
    pub demand: Vec<ShapeId>,
}

impl Region {
    pub fn new(width: usize, height: usize, demand: Vec<ShapeId>) -> Self {
        Self {
            width,
            height,
            demand,
        }
    }

    /// Expands per-shape counts into a flat demand list.
    ///
    /// `counts[i]` copies of shape `i`, so `[1, 2]` becomes `[0, 1, 1]`.
    pub fn from_counts(width: usize, height: usize, counts: &[usize]) -> Self {
        let demand = counts
            .iter()
            .enumerate()
            .flat_map(|(shape, &count)| std::iter::repeat(shape).take(count))
            .collect();
        Self::new(width, height, demand)
    }

    /// Number of cells, failing when `width * height` overflows.
    pub fn area(&self) -> Result<usize, PackError> {
        self.width
            .checked_mul(self.height)
            .ok_or(PackError::RegionTooLarge {
                width: self.width,
                height: self.height,
            })
    }

    /// Total area of the demand. Fails on ids outside the library.
    pub fn required_area(&self, library: &ShapeLibrary) -> Result<usize, PackError> {
        self.demand.iter().map(|&shape| library.area(shape)).sum()
    }
}

/// Feasibility verdict for one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The demand needs more cells than the region has; no search was run.
    AreaExceeded { required: usize, available: usize },
    Packed(Packing),
    /// The search was exhaustive and found nothing.
    NoArrangement,
    Aborted { nodes: u64 },
}

impl Verdict {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Verdict::Packed(_))
    }
}

/// Evaluates one region, returning the detailed verdict.
pub fn assess(
    region: &Region,
    library: &ShapeLibrary,
    cache: &OrientationCache,
    options: &SearchOptions,
) -> Result<Verdict, PackError> {
    let required = region.required_area(library)?;
    let available = region.area()?;
    if required > available {
        log::debug!(
            "{}x{}: demand area {} exceeds {}",
            region.width,
            region.height,
            required,
            available
        );
        return Ok(Verdict::AreaExceeded {
            required,
            available,
        });
    }

    let packer = Packer::new(region.width, region.height, &region.demand, cache)?;
    log::debug!(
        "{}x{}: searching for {} tiles",
        region.width,
        region.height,
        region.demand.len()
    );

    let verdict = match packer.search(options.node_limit) {
        SearchOutcome::Packed(packing) => Verdict::Packed(packing),
        SearchOutcome::Infeasible => Verdict::NoArrangement,
        SearchOutcome::Aborted { nodes } => {
            log::warn!(
                "{}x{}: search aborted after {} nodes",
                region.width,
                region.height,
                nodes
            );
            Verdict::Aborted { nodes }
        }
    };
    Ok(verdict)
}

/// Returns `true` if the region's whole demand can be packed.
pub fn evaluate(
    region: &Region,
    library: &ShapeLibrary,
    cache: &OrientationCache,
) -> Result<bool, PackError> {
    assess(region, library, cache, &SearchOptions::default()).map(|verdict| verdict.is_feasible())
}

/// Verdicts for a batch of regions, in input order.
#[derive(Debug, Clone, Default)]
pub struct Summary {
    pub verdicts: Vec<Verdict>,
}

impl Summary {
    /// Number of regions that can be fully packed.
    pub fn packed(&self) -> usize {
        self.verdicts.iter().filter(|v| v.is_feasible()).count()
    }

    /// Number of regions whose search hit the node limit.
    pub fn aborted(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|v| matches!(v, Verdict::Aborted { .. }))
            .count()
    }
}

/// Evaluates every region and aggregates the results.
///
/// With `options.parallel` each region is searched as its own rayon task;
/// regions share only the read-only library and cache.
pub fn evaluate_all(
    regions: &[Region],
    library: &ShapeLibrary,
    cache: &OrientationCache,
    options: &SearchOptions,
) -> Result<Summary, PackError> {
    let verdicts = if options.parallel {
        // gather every result first so the reported error is the earliest region's
        let results: Vec<Result<Verdict, PackError>> = regions
            .par_iter()
            .map(|region| assess(region, library, cache, options))
            .collect();
        results.into_iter().collect::<Result<Vec<_>, _>>()?
    } else {
        regions
            .iter()
            .map(|region| assess(region, library, cache, options))
            .collect::<Result<Vec<_>, _>>()?
    };

    let summary = Summary { verdicts };
    log::info!(
        "{} of {} regions packed ({} aborted)",
        summary.packed(),
        regions.len(),
        summary.aborted()
    );
    Ok(summary)
}

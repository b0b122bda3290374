//! Present Packing Solver
//!
//! Reads a library of present shapes and a list of regions, then reports
//! which regions can hold every present they require. Presents may be
//! rotated and mirrored but never overlap or stick out of the region.

use std::fmt::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use packer::grid::{format_cells, format_packing};
use packer::{evaluate_all, Error, OrientationCache, Puzzle, SearchOptions, Summary, Verdict};

/// Decides which regions can be packed with their presents.
#[derive(Parser)]
#[command(name = "packer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate every region and count the ones that fit.
    Solve {
        /// Puzzle input file.
        input: PathBuf,
        /// Search regions in parallel.
        #[arg(long)]
        parallel: bool,
        /// Give up on a region after this many placements.
        #[arg(long, value_name = "N")]
        node_limit: Option<u64>,
        /// Print the arrangement found for each packed region.
        #[arg(long)]
        show: bool,
    },
    /// Print every shape with all of its orientations.
    Shapes {
        /// Puzzle input file.
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Solve {
            input,
            parallel,
            node_limit,
            show,
        } => run_solve(
            input,
            SearchOptions {
                node_limit,
                parallel,
            },
            show,
        ),
        Command::Shapes { input } => run_shapes(input),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Evaluates all regions and prints the per-region report.
fn run_solve(input: PathBuf, options: SearchOptions, show: bool) -> Result<(), Error> {
    let puzzle = packer::load(&input)?;
    let cache = OrientationCache::build(&puzzle.library);
    println!(
        "Loaded {} shapes and {} regions.\n",
        puzzle.library.len(),
        puzzle.regions.len()
    );

    let summary = evaluate_all(&puzzle.regions, &puzzle.library, &cache, &options)?;
    print!("{}", format_report(&puzzle, &summary, show));
    Ok(())
}

/// Prints each shape followed by its orientations.
fn run_shapes(input: PathBuf) -> Result<(), Error> {
    let puzzle = packer::load(&input)?;
    let cache = OrientationCache::build(&puzzle.library);
    print!("{}", format_shapes(&puzzle, &cache)?);
    Ok(())
}

/// One status line per region, then the total.
fn format_report(puzzle: &Puzzle, summary: &Summary, show: bool) -> String {
    let mut output = String::new();

    for (i, (region, verdict)) in puzzle.regions.iter().zip(&summary.verdicts).enumerate() {
        let status = match verdict {
            Verdict::Packed(_) => "Success!",
            Verdict::AreaExceeded { .. } => "Impossible (Not enough space).",
            Verdict::NoArrangement => "Failed.",
            Verdict::Aborted { .. } => "Aborted (node limit reached).",
        };
        let _ = writeln!(
            output,
            "Region {}: {}x{}, requires {} presents... {}",
            i,
            region.width,
            region.height,
            region.demand.len(),
            status
        );

        if let (true, Verdict::Packed(packing)) = (show, verdict) {
            output.push_str(&format_packing(packing));
        }
    }

    let _ = writeln!(
        output,
        "Total regions that can fit all presents: {}",
        summary.packed()
    );
    output
}

fn format_shapes(puzzle: &Puzzle, cache: &OrientationCache) -> Result<String, Error> {
    let mut output = String::new();
    for shape in puzzle.library.iter() {
        let orientations = cache.get(shape.id())?;
        let _ = writeln!(
            output,
            "Shape {}: area {}, {} orientation(s)",
            shape.id(),
            shape.area(),
            orientations.len()
        );
        for orientation in orientations.iter() {
            output.push_str(&format_cells(orientation.cells()));
            output.push('\n');
        }
    }
    Ok(output)
}

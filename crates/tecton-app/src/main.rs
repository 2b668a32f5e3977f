//! Command-line driver for the tecton lattice generator.
//!
//! Loads `tecton.ron` (creating it on first run), applies CLI overrides, runs one
//! generation pass over a Perlin field with a unit cube template, and prints a
//! summary.
//!
//! Run with: `cargo run -p tecton-app -- --count-x 20 --threshold 0.6`

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use glam::{Affine3A, Vec3};
use noise::Perlin;
use tecton_config::{CliArgs, Config};
use tecton_lattice::{GenerateError, MeshElementFactory, run};
use tecton_mesh::MeshCombiner;
use tracing::{error, info};

use crate::report::{ReportError, RunReport};

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tecton_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    match execute(&config, args.report.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("tecton: {e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(config: &Config, report_path: Option<&Path>) -> Result<(), AppError> {
    let generation = &config.generation;
    info!(
        "Lattice {}x{}x{} | threshold {:.3} | field seed {}",
        generation.lattice.count[0],
        generation.lattice.count[1],
        generation.lattice.count[2],
        generation.noise.threshold,
        generation.noise.field_seed,
    );

    let noise = Perlin::new(generation.noise.field_seed);
    let mut factory = MeshElementFactory::cube(Vec3::ONE);
    let mut combiner = MeshCombiner::new();
    let output = run(
        generation,
        &noise,
        &mut factory,
        &mut combiner,
        Affine3A::IDENTITY,
    )?;

    let stats = &output.generation.stats;
    println!(
        "visited {} | produced {} | carved {} | below threshold {} | unmaterialized {}",
        stats.visited, stats.produced, stats.carved, stats.below_threshold, stats.unmaterialized
    );
    match &output.combine {
        Some(combine) => println!(
            "combined {} groups from {} elements ({} vertices)",
            combine.groups_created, combine.source_elements, combine.total_vertices
        ),
        None => println!("combine skipped"),
    }
    println!("digest {:016x}", output.generation.digest());

    if let Some(path) = report_path {
        RunReport::new(&output, combiner.groups()).write(path)?;
        info!("Run report written to {}", path.display());
    }

    Ok(())
}

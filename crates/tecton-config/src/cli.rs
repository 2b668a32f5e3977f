//! Command-line argument parsing for the tecton generator.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tecton lattice generator command-line arguments.
///
/// CLI values override settings loaded from `tecton.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "tecton", about = "Procedural tecton lattice generator")]
pub struct CliArgs {
    /// Cell count along X.
    #[arg(long)]
    pub count_x: Option<u32>,

    /// Cell count along Y.
    #[arg(long)]
    pub count_y: Option<u32>,

    /// Cell count along Z.
    #[arg(long)]
    pub count_z: Option<u32>,

    /// Noise threshold in [0, 1].
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Seed of the noise-offset stream.
    #[arg(long)]
    pub noise_seed: Option<u64>,

    /// Seed of the material stream.
    #[arg(long)]
    pub material_seed: Option<u64>,

    /// Seed of the rotation jitter stream.
    #[arg(long)]
    pub jitter_seed: Option<u64>,

    /// Seed of the explosion stream.
    #[arg(long)]
    pub explosion_seed: Option<u64>,

    /// Skip the mesh combine pass.
    #[arg(long)]
    pub no_combine: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write a RON run report to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Path to config directory (defaults to the working directory).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        let generation = &mut self.generation;
        if let Some(x) = args.count_x {
            generation.lattice.count[0] = x;
        }
        if let Some(y) = args.count_y {
            generation.lattice.count[1] = y;
        }
        if let Some(z) = args.count_z {
            generation.lattice.count[2] = z;
        }
        if let Some(t) = args.threshold {
            generation.noise.threshold = t;
        }
        if let Some(seed) = args.noise_seed {
            generation.seeds.noise_offset = seed;
        }
        if let Some(seed) = args.material_seed {
            generation.seeds.material = seed;
        }
        if let Some(seed) = args.jitter_seed {
            generation.seeds.jitter = seed;
        }
        if let Some(seed) = args.explosion_seed {
            generation.seeds.explosion = seed;
        }
        if args.no_combine {
            generation.combine.merge = false;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

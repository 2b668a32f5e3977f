//! Configuration system for the tecton lattice generator.
//!
//! Provides the generation parameter model, range validation, RON persistence,
//! and CLI overrides via clap.

mod cli;
mod config;
mod error;
mod generation;
mod validate;

pub use cli::CliArgs;
pub use config::{CONFIG_FILE_NAME, Config, DebugConfig};
pub use error::ConfigError;
pub use generation::{
    Axis, CombineConfig, ExplosionConfig, GenerationConfig, HoleConfig, JitterConfig,
    LatticeConfig, MaterialConfig, MaterialId, MaterialPalette, NoiseConfig, PaletteCycleConfig,
    Placement, SectorConfig, SeedConfig,
};
pub use validate::{
    MAX_DIRECTION_JITTER_DEGREES, MAX_ROTATION_JITTER_DEGREES, MIN_HEIGHT_BIAS, MIN_NOISE_SCALE,
};

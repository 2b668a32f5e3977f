//! Tecton lattice generation: noise-driven occupancy, seeded material selection,
//! rotation jitter, explosion displacement, and the run pipeline that hands the
//! produced elements to the mesh combiner.

mod error;
mod explosion;
mod factory;
mod generator;
mod jitter;
mod lattice;
mod occupancy;
mod palette;
mod streams;

pub use error::GenerateError;
pub use explosion::{ExplosionDisplacer, MIN_EXPLOSION_DISTANCE};
pub use factory::{Element, ElementFactory, MeshElementFactory};
pub use generator::{
    GenerationResult, GenerationStats, PlacementDecision, RunOutput, generate, generate_seeded,
    run,
};
pub use jitter::RotationJitter;
pub use lattice::{CellCoord, LatticeGrid, LatticeIter, SectorOffsetMapper};
pub use occupancy::{Occupancy, OccupancyFilter};
pub use palette::{
    MaterialSelector, PaletteCycler, Selection, SelectionWeights, choose_slot, resolve_slot,
};
pub use streams::{NOISE_OFFSET_RANGE, SeededStreams};

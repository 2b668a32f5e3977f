//! The lattice pass and the run entry points.
//!
//! [`generate`] walks every cell once in `i`, `j`, `k` order. A cell that survives
//! the occupancy test draws its material, its wobble, and its explosion offset in
//! that order, then is handed to the element factory. [`run`] adds the combine
//! pass as a barrier after the walk.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::{Affine3A, DVec3, Quat, Vec3};
use noise::NoiseFn;
use rand::RngCore;
use tecton_config::{GenerationConfig, MaterialId};
use tecton_mesh::{CombineReport, MeshCombiner};
use tracing::{debug, info};

use crate::error::GenerateError;
use crate::explosion::ExplosionDisplacer;
use crate::factory::{Element, ElementFactory};
use crate::jitter::RotationJitter;
use crate::lattice::{CellCoord, LatticeGrid};
use crate::occupancy::{Occupancy, OccupancyFilter};
use crate::palette::{MaterialSelector, PaletteCycler};
use crate::streams::SeededStreams;

/// Where and how one surviving cell's element is placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementDecision {
    /// Source cell.
    pub cell: CellCoord,
    /// Position in the lattice frame, after explosion displacement.
    pub position: Vec3,
    /// Wobble rotation with any explosion tumble left-composed.
    pub rotation: Quat,
    /// Resolved material, `None` only when every palette slot is unset.
    pub material: Option<MaterialId>,
}

/// Counters collected during one lattice pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Cells visited.
    pub visited: u64,
    /// Cells inside the hole clearing.
    pub carved: u64,
    /// Cells whose noise fell below the threshold.
    pub below_threshold: u64,
    /// Elements produced.
    pub produced: u64,
    /// Elements produced without a material.
    pub unmaterialized: u64,
    /// Weighted-draw picks per slot `[top, rare, bottom]`, before fallback.
    pub slot_picks: [u64; 3],
}

/// Output of [`generate`].
#[derive(Clone, Debug)]
pub struct GenerationResult {
    /// One decision per produced element, in traversal order.
    pub decisions: Vec<PlacementDecision>,
    /// Elements produced by the factory, parallel to `decisions`.
    pub elements: Vec<Element>,
    /// Pass counters.
    pub stats: GenerationStats,
    /// Global noise offset the pass sampled with.
    pub noise_offset: DVec3,
}

impl GenerationResult {
    /// Hash of the bit patterns of every decision, for comparing runs.
    pub fn digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.decisions.len().hash(&mut hasher);
        for d in &self.decisions {
            d.cell.hash(&mut hasher);
            for v in d.position.to_array() {
                v.to_bits().hash(&mut hasher);
            }
            for v in d.rotation.to_array() {
                v.to_bits().hash(&mut hasher);
            }
            d.material.hash(&mut hasher);
        }
        hasher.finish()
    }
}

/// Output of [`run`].
#[derive(Clone, Debug)]
pub struct RunOutput {
    /// The lattice pass.
    pub generation: GenerationResult,
    /// The combine pass, `None` when merging is disabled.
    pub combine: Option<CombineReport>,
}

/// Runs the lattice pass with caller-supplied streams.
///
/// `config` is validated first; out-of-range values are clamped, never rejected.
/// Fails only when the factory has no template geometry, before any draw.
pub fn generate<N, F, R>(
    config: &GenerationConfig,
    noise: &N,
    factory: &mut F,
    streams: &mut SeededStreams<R>,
) -> Result<GenerationResult, GenerateError>
where
    N: NoiseFn<f64, 3>,
    F: ElementFactory,
    R: RngCore,
{
    let config = config.clone().validated();
    let element_size = factory
        .element_size()
        .ok_or(GenerateError::MissingTemplate)?;

    let grid = LatticeGrid::new(&config.lattice, element_size);
    let noise_offset = if config.noise.randomize_offset {
        streams.draw_noise_offset()
    } else {
        DVec3::from_array(config.noise.offset)
    };

    let filter = OccupancyFilter::new(&config, &grid, noise_offset);
    let cycler = PaletteCycler::from_config(&config.materials.cycle);
    let selector = MaterialSelector::new(&config.materials, grid.count().y);
    let jitter = RotationJitter::from_config(&config.jitter);
    let explosion = ExplosionDisplacer::from_config(&config.explosion);

    let _span = tracing::info_span!("generate", cells = grid.cell_count()).entered();
    debug!(
        ?element_size,
        cell_size = ?grid.cell_size(),
        origin = ?grid.origin(),
        ?noise_offset,
        jitter = jitter.is_active(),
        explosion = explosion.is_active(),
        "Lattice resolved"
    );
    if config.materials.palette.is_empty() {
        debug!("Palette has no materials; elements will be unmaterialized");
    }

    let mut stats = GenerationStats::default();
    let mut decisions = Vec::new();
    let mut elements = Vec::new();

    for cell in grid.cells() {
        stats.visited += 1;
        let position = grid.position(cell);

        match filter.classify(noise, cell, position) {
            Occupancy::Carved => {
                stats.carved += 1;
                continue;
            }
            Occupancy::BelowThreshold => {
                stats.below_threshold += 1;
                continue;
            }
            Occupancy::Occupied => {}
        }

        let palette = cycler.palette_for(&config.materials.palette, cell);
        let selection = selector.select(cell.j, &palette, &mut streams.material);
        let wobble = jitter.sample(&mut streams.jitter);
        let (position, rotation) = explosion.displace(position, wobble, &mut streams.explosion);

        stats.slot_picks[selection.slot] += 1;
        if selection.material.is_none() {
            stats.unmaterialized += 1;
        }

        let decision = PlacementDecision {
            cell,
            position,
            rotation,
            material: selection.material,
        };
        elements.push(factory.spawn(&decision));
        decisions.push(decision);
    }
    stats.produced = decisions.len() as u64;

    info!(
        visited = stats.visited,
        produced = stats.produced,
        carved = stats.carved,
        below_threshold = stats.below_threshold,
        "Lattice pass complete"
    );

    Ok(GenerationResult {
        decisions,
        elements,
        stats,
        noise_offset,
    })
}

/// Runs the lattice pass with streams seeded from `config.seeds`.
pub fn generate_seeded<N, F>(
    config: &GenerationConfig,
    noise: &N,
    factory: &mut F,
) -> Result<GenerationResult, GenerateError>
where
    N: NoiseFn<f64, 3>,
    F: ElementFactory,
{
    let mut streams = SeededStreams::from_seeds(&config.seeds);
    generate(config, noise, factory, &mut streams)
}

/// Generates, places the lattice under `parent`, and combines when merging is on.
///
/// Element transforms come back in world space. Combined groups are expressed in
/// `parent`'s local frame, so their geometry does not depend on where the parent
/// sits.
pub fn run<N, F>(
    config: &GenerationConfig,
    noise: &N,
    factory: &mut F,
    combiner: &mut MeshCombiner,
    parent: Affine3A,
) -> Result<RunOutput, GenerateError>
where
    N: NoiseFn<f64, 3>,
    F: ElementFactory,
{
    let mut generation = generate_seeded(config, noise, factory)?;
    for element in &mut generation.elements {
        element.transform = parent * element.transform;
    }

    let combine = if config.combine.merge {
        Some(combiner.combine(parent, &mut generation.elements, &config.combine)?)
    } else {
        debug!("Merging disabled; elements left standalone");
        None
    };

    Ok(RunOutput {
        generation,
        combine,
    })
}

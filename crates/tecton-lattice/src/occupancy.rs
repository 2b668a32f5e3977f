//! Per-cell survival test: cylindrical hole carving, then a noise threshold.
//!
//! Survival is a pure function of cell, position and noise. Nothing here draws
//! from a random stream.

use glam::{DVec3, Vec3};
use noise::NoiseFn;
use tecton_config::GenerationConfig;

use crate::lattice::{CellCoord, LatticeGrid, SectorOffsetMapper};

/// Outcome of the occupancy test for one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Occupancy {
    /// Inside the hole clearing.
    Carved,
    /// Normalized noise fell below the threshold.
    BelowThreshold,
    /// The cell produces an element.
    Occupied,
}

/// Combines the hole and threshold gates.
#[derive(Clone, Copy, Debug)]
pub struct OccupancyFilter {
    hole: Option<(Vec3, f32)>,
    scale: DVec3,
    noise_offset: DVec3,
    threshold: f64,
    sectors: SectorOffsetMapper,
}

impl OccupancyFilter {
    /// Builds the filter from a validated config.
    ///
    /// `noise_offset` is the run's global offset, either the configured constant or
    /// the one drawn from the noise-offset stream.
    pub fn new(config: &GenerationConfig, grid: &LatticeGrid, noise_offset: DVec3) -> Self {
        let hole = config.hole.enabled.then(|| {
            let radius = config.hole.radius;
            (grid.clearing_center(), radius * radius)
        });

        Self {
            hole,
            scale: DVec3::from_array(config.noise.scale),
            noise_offset,
            threshold: config.noise.threshold,
            sectors: SectorOffsetMapper::new(&config.noise.sectors),
        }
    }

    /// Whether a position lies inside the clearing. Only X and Z are compared.
    pub fn is_carved(&self, position: Vec3) -> bool {
        let Some((center, radius_sq)) = self.hole else {
            return false;
        };
        let dx = position.x - center.x;
        let dz = position.z - center.z;
        dx * dx + dz * dz < radius_sq
    }

    /// Noise-space coordinate sampled for a cell.
    pub fn noise_point(&self, cell: CellCoord) -> [f64; 3] {
        let p = cell.as_uvec3().as_dvec3() * self.scale + self.noise_offset + self.sectors.shift(cell);
        p.to_array()
    }

    /// Noise value for a cell, remapped from `[-1, 1]` to `[0, 1]`.
    pub fn sample<N: NoiseFn<f64, 3>>(&self, noise: &N, cell: CellCoord) -> f64 {
        (noise.get(self.noise_point(cell)) + 1.0) * 0.5
    }

    /// Runs both gates. The hole is tested first and short-circuits the noise lookup.
    pub fn classify<N: NoiseFn<f64, 3>>(
        &self,
        noise: &N,
        cell: CellCoord,
        position: Vec3,
    ) -> Occupancy {
        if self.is_carved(position) {
            return Occupancy::Carved;
        }
        if self.sample(noise, cell) < self.threshold {
            return Occupancy::BelowThreshold;
        }
        Occupancy::Occupied
    }
}

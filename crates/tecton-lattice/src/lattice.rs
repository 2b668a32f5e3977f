//! Lattice geometry: cell enumeration, world positions, and sector noise shifts.

use glam::{DVec3, UVec3, Vec3};
use tecton_config::{LatticeConfig, Placement, SectorConfig};

/// Integer coordinate of one lattice cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    /// Index along X.
    pub i: u32,
    /// Index along Y.
    pub j: u32,
    /// Index along Z.
    pub k: u32,
}

impl CellCoord {
    /// Creates a coordinate.
    pub const fn new(i: u32, j: u32, k: u32) -> Self {
        Self { i, j, k }
    }

    /// The coordinate as a vector.
    pub fn as_uvec3(self) -> UVec3 {
        UVec3::new(self.i, self.j, self.k)
    }
}

/// Resolved lattice extents, cell size, and origin for one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeGrid {
    count: UVec3,
    cell_size: Vec3,
    origin: Vec3,
    half_extents: Vec3,
    placement: Placement,
}

impl LatticeGrid {
    /// Resolves the grid for elements of `element_size`.
    ///
    /// Cell size is element size plus spacing gap. In auto-center mode the origin is
    /// `-half_extents`; in manual mode it is `base_position + manual_offset * cell_size`.
    pub fn new(config: &LatticeConfig, element_size: Vec3) -> Self {
        let count = UVec3::from_array(config.count);
        let cell_size = element_size + Vec3::from_array(config.spacing);
        let half_extents = (count.saturating_sub(UVec3::ONE)).as_vec3() * cell_size * 0.5;
        let origin = match config.placement {
            Placement::AutoCenter => -half_extents,
            Placement::Manual => {
                Vec3::from_array(config.base_position)
                    + Vec3::from_array(config.manual_offset) * cell_size
            }
        };

        Self {
            count,
            cell_size,
            origin,
            half_extents,
            placement: config.placement,
        }
    }

    /// Cell counts per axis.
    pub fn count(&self) -> UVec3 {
        self.count
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> u64 {
        u64::from(self.count.x) * u64::from(self.count.y) * u64::from(self.count.z)
    }

    /// Distance between neighbouring cell positions along each axis.
    pub fn cell_size(&self) -> Vec3 {
        self.cell_size
    }

    /// World position of cell (0, 0, 0).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Half the span between the first and last cell positions.
    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    /// World position of a cell.
    pub fn position(&self, cell: CellCoord) -> Vec3 {
        self.origin + cell.as_uvec3().as_vec3() * self.cell_size
    }

    /// Center of the hole clearing: the world origin when auto-centered, the
    /// lattice center otherwise.
    pub fn clearing_center(&self) -> Vec3 {
        match self.placement {
            Placement::AutoCenter => Vec3::ZERO,
            Placement::Manual => self.origin + self.half_extents,
        }
    }

    /// Enumerates every cell, `i` outermost and `k` innermost.
    pub fn cells(&self) -> LatticeIter {
        LatticeIter::new(self.count)
    }
}

/// Nested-order cell iterator: `i` outer, `j` middle, `k` inner.
#[derive(Clone, Debug)]
pub struct LatticeIter {
    count: UVec3,
    next: Option<CellCoord>,
}

impl LatticeIter {
    /// Iterates a lattice of the given counts. Any zero count yields nothing.
    pub fn new(count: UVec3) -> Self {
        let next = (count.min_element() > 0).then_some(CellCoord::new(0, 0, 0));
        Self { count, next }
    }
}

impl Iterator for LatticeIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<CellCoord> {
        let current = self.next?;
        let mut n = current;

        n.k += 1;
        if n.k == self.count.z {
            n.k = 0;
            n.j += 1;
            if n.j == self.count.y {
                n.j = 0;
                n.i += 1;
            }
        }
        self.next = (n.i < self.count.x).then_some(n);

        Some(current)
    }
}

/// Maps a cell to the noise-space shift of the sector it falls in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectorOffsetMapper {
    enabled: bool,
    size: UVec3,
    offset: DVec3,
}

impl SectorOffsetMapper {
    /// Builds the mapper. Sector sizes below 1 are treated as 1.
    pub fn new(config: &SectorConfig) -> Self {
        Self {
            enabled: config.enabled,
            size: UVec3::from_array(config.size).max(UVec3::ONE),
            offset: DVec3::from_array(config.offset),
        }
    }

    /// Sector index of a cell along each axis.
    pub fn sector_index(&self, cell: CellCoord) -> UVec3 {
        cell.as_uvec3() / self.size
    }

    /// Noise-space shift for a cell; zero when sectors are disabled.
    pub fn shift(&self, cell: CellCoord) -> DVec3 {
        if !self.enabled {
            return DVec3::ZERO;
        }
        self.sector_index(cell).as_dvec3() * self.offset
    }
}

//! Per-run generation parameters: lattice extents, noise, materials, and perturbation fields.
//!
//! Every struct here is `#[serde(default)]`, so a RON file only needs to name the
//! fields it changes. The generator runs [`GenerationConfig::validated`] before
//! reading any value.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MaterialId
// ---------------------------------------------------------------------------

/// Opaque reference to a render material owned by the host.
///
/// The generator never inspects the material; it only routes the id into
/// placement decisions and uses it as the merge key for combined meshes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub u16);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lattice axis selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The `i` index.
    #[default]
    X,
    /// The `j` index.
    Y,
    /// The `k` index.
    Z,
}

/// How the grid origin is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    /// The lattice is centered on the world origin.
    #[default]
    AutoCenter,
    /// The lattice starts at `base_position + manual_offset * cell_size`.
    Manual,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Lattice extents and spacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LatticeConfig {
    /// Number of cells along X, Y, Z. Each is at least 1 after validation.
    pub count: [u32; 3],
    /// Gap added between neighbouring elements along each axis. Non-negative.
    pub spacing: [f32; 3],
    /// Origin mode.
    pub placement: Placement,
    /// Anchor position used in [`Placement::Manual`] mode.
    pub base_position: [f32; 3],
    /// Offset from `base_position`, in cells, used in [`Placement::Manual`] mode.
    pub manual_offset: [f32; 3],
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            count: [10, 10, 10],
            spacing: [0.1, 0.1, 0.1],
            placement: Placement::AutoCenter,
            base_position: [0.0, 0.0, 0.0],
            manual_offset: [0.0, 0.0, 0.0],
        }
    }
}

/// Block-wise shifting of noise sampling coordinates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SectorConfig {
    /// Enable sector shifts.
    pub enabled: bool,
    /// Sector size in cells along each axis. At least 1.
    pub size: [u32; 3],
    /// Noise-space shift applied per sector index along each axis.
    pub offset: [f64; 3],
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            size: [4, 4, 4],
            offset: [100.0, 100.0, 100.0],
        }
    }
}

/// Noise sampling and occupancy threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
    /// Multiplier from cell index to noise coordinate, per axis. Strictly positive.
    pub scale: [f64; 3],
    /// Global noise-space offset, used when `randomize_offset` is off.
    pub offset: [f64; 3],
    /// Draw the global offset once from the noise-offset stream instead.
    pub randomize_offset: bool,
    /// Minimum normalized noise value for a cell to survive. Range: \[0.0, 1.0\].
    pub threshold: f64,
    /// Seed for the concrete noise field a driver plugs in. The generator itself
    /// treats the noise field as an opaque collaborator and never reads this.
    pub field_seed: u32,
    /// Sector shift settings.
    pub sectors: SectorConfig,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: [0.1, 0.1, 0.1],
            offset: [0.0, 0.0, 0.0],
            randomize_offset: false,
            threshold: 0.5,
            field_seed: 0,
            sectors: SectorConfig::default(),
        }
    }
}

/// Cylindrical clearing carved out of the lattice (XZ plane, infinite along Y).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HoleConfig {
    /// Enable hole carving.
    pub enabled: bool,
    /// Radius of the clearing. Non-negative.
    pub radius: f32,
}

impl Default for HoleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            radius: 3.0,
        }
    }
}

/// Three material slots with fixed roles. Any slot may be unset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MaterialPalette {
    /// Favoured toward the top of the lattice.
    pub top: Option<MaterialId>,
    /// Picked with a flat probability regardless of height.
    pub rare: Option<MaterialId>,
    /// Favoured toward the bottom of the lattice.
    pub bottom: Option<MaterialId>,
}

impl MaterialPalette {
    /// Slot index of the top-biased material.
    pub const TOP: usize = 0;
    /// Slot index of the rare material.
    pub const RARE: usize = 1;
    /// Slot index of the bottom-biased material.
    pub const BOTTOM: usize = 2;

    /// Builds a palette from slots ordered `[top, rare, bottom]`.
    pub fn from_slots(slots: [Option<MaterialId>; 3]) -> Self {
        Self {
            top: slots[Self::TOP],
            rare: slots[Self::RARE],
            bottom: slots[Self::BOTTOM],
        }
    }

    /// Returns the slots ordered `[top, rare, bottom]`.
    pub fn slots(&self) -> [Option<MaterialId>; 3] {
        [self.top, self.rare, self.bottom]
    }

    /// Returns `true` if no slot is set.
    pub fn is_empty(&self) -> bool {
        self.slots().iter().all(Option::is_none)
    }
}

impl Default for MaterialPalette {
    fn default() -> Self {
        Self {
            top: Some(MaterialId(1)),
            rare: Some(MaterialId(2)),
            bottom: Some(MaterialId(3)),
        }
    }
}

/// Rotation of the palette as a function of one lattice index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteCycleConfig {
    /// Enable palette cycling.
    pub enabled: bool,
    /// Which cell index drives the rotation.
    pub axis: Axis,
    /// Period of the cycle in cells. At least 1.
    pub length: u32,
    /// Phase added to the axis index before the modulo.
    pub offset: i32,
}

impl Default for PaletteCycleConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            axis: Axis::X,
            length: 3,
            offset: 0,
        }
    }
}

/// Material palette and the height-biased weighting used to pick from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MaterialConfig {
    /// Base palette.
    pub palette: MaterialPalette,
    /// Probability of the rare slot. Range: \[0.0, 1.0\].
    pub rare_probability: f32,
    /// Exponent applied to normalized row height. At least 0.5.
    pub height_bias: f32,
    /// Palette cycling.
    pub cycle: PaletteCycleConfig,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            palette: MaterialPalette::default(),
            rare_probability: 0.05,
            height_bias: 1.0,
            cycle: PaletteCycleConfig::default(),
        }
    }
}

/// Small per-element wobble rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JitterConfig {
    /// Enable rotation jitter.
    pub enabled: bool,
    /// Maximum wobble angle in degrees. Range: \[0.0, 2.0\].
    pub max_degrees: f32,
}

impl Default for JitterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_degrees: 1.0,
        }
    }
}

/// Static radial displacement field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Enable the displacement field.
    pub enabled: bool,
    /// World-space center of the field.
    pub center: [f32; 3],
    /// Displacement numerator. Non-negative; zero disables the field.
    pub strength: f32,
    /// Distance exponent of the falloff. At least 1.
    pub falloff_exponent: f32,
    /// Force a cubic falloff, ignoring `falloff_exponent`.
    pub cubic_falloff: bool,
    /// Degrees of tumble per unit of displacement. Non-negative.
    pub rotation_scale: f32,
    /// Maximum deviation of the push direction, in degrees. Range: \[0.0, 45.0\].
    pub direction_jitter_degrees: f32,
    /// Relative spread of the push magnitude. Range: \[0.0, 1.0\].
    pub magnitude_jitter: f32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            center: [0.0, 0.0, 0.0],
            strength: 5.0,
            falloff_exponent: 2.0,
            cubic_falloff: false,
            rotation_scale: 0.0,
            direction_jitter_degrees: 0.0,
            magnitude_jitter: 0.0,
        }
    }
}

/// Post-pass mesh merging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombineConfig {
    /// Merge element geometry into one mesh per material.
    pub merge: bool,
    /// Attach a collision mesh to every combined group.
    pub build_collision: bool,
    /// Drop per-element geometry after a successful merge.
    pub discard_sources: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            merge: true,
            build_collision: true,
            discard_sources: true,
        }
    }
}

/// Seeds for the four independent random streams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SeedConfig {
    /// Seed of the stream that draws the randomized global noise offset.
    pub noise_offset: u64,
    /// Seed of the per-cell material stream.
    pub material: u64,
    /// Seed of the per-cell rotation jitter stream.
    pub jitter: u64,
    /// Seed of the per-cell explosion stream.
    pub explosion: u64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            noise_offset: 1,
            material: 2,
            jitter: 3,
            explosion: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Immutable parameter bundle for one generation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Lattice extents and spacing.
    pub lattice: LatticeConfig,
    /// Noise sampling.
    pub noise: NoiseConfig,
    /// Hole carving.
    pub hole: HoleConfig,
    /// Material palette and selection weights.
    pub materials: MaterialConfig,
    /// Rotation jitter.
    pub jitter: JitterConfig,
    /// Explosion displacement.
    pub explosion: ExplosionConfig,
    /// Mesh combining.
    pub combine: CombineConfig,
    /// Random stream seeds.
    pub seeds: SeedConfig,
}

//! Palette rotation and height-biased material selection.
//!
//! The palette has three fixed roles: top-biased, rare, and bottom-biased. Cycling
//! rotates which material fills each role; selection picks a role per cell from one
//! material-stream draw and resolves it to a material.

use rand::Rng;
use tecton_config::{Axis, MaterialConfig, MaterialId, MaterialPalette, PaletteCycleConfig};

use crate::lattice::CellCoord;

/// Rotates the base palette as a function of one lattice axis index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteCycler {
    enabled: bool,
    axis: Axis,
    length: u32,
    offset: i32,
}

impl PaletteCycler {
    /// Builds a cycler. A disabled cycler or a zero length maps every cell to the
    /// base palette.
    pub fn from_config(config: &PaletteCycleConfig) -> Self {
        Self {
            enabled: config.enabled && config.length > 0,
            axis: config.axis,
            length: config.length,
            offset: config.offset,
        }
    }

    /// Rotation step for a cell: `|axis_index + offset| mod length`.
    pub fn shift(&self, cell: CellCoord) -> u32 {
        if !self.enabled {
            return 0;
        }
        let index = match self.axis {
            Axis::X => cell.i,
            Axis::Y => cell.j,
            Axis::Z => cell.k,
        };
        let shifted = (i64::from(index) + i64::from(self.offset)).unsigned_abs();
        (shifted % u64::from(self.length)) as u32
    }

    /// Effective palette for a cell, rotated left by [`shift`](Self::shift) slots.
    pub fn palette_for(&self, base: &MaterialPalette, cell: CellCoord) -> MaterialPalette {
        let shift = self.shift(cell) as usize;
        if shift % 3 == 0 {
            return *base;
        }
        let slots = base.slots();
        MaterialPalette::from_slots(std::array::from_fn(|s| slots[(s + shift) % 3]))
    }
}

/// Selection probabilities for one row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectionWeights {
    /// Probability of the rare slot.
    pub rare: f32,
    /// Probability of the top-biased slot.
    pub top: f32,
    /// Probability of the bottom-biased slot.
    pub bottom: f32,
}

/// Result of one selection: the slot drawn and the material it resolved to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Slot picked by the weighted draw, before fallback.
    pub slot: usize,
    /// Material after fallback, `None` only if the palette is empty.
    pub material: Option<MaterialId>,
}

/// Height-biased weighted slot picker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialSelector {
    rare_probability: f32,
    height_bias: f32,
    count_y: u32,
}

impl MaterialSelector {
    /// Builds a selector for a lattice with `count_y` rows.
    pub fn new(config: &MaterialConfig, count_y: u32) -> Self {
        Self {
            rare_probability: config.rare_probability.clamp(0.0, 1.0),
            height_bias: config.height_bias,
            count_y,
        }
    }

    /// Weights for row `j`, including the edge-row override.
    ///
    /// The top row forces the top-biased slot and row 0 forces the bottom-biased
    /// slot; rare keeps its probability on both. A single-row lattice counts as the
    /// top row.
    pub fn weights(&self, j: u32) -> SelectionWeights {
        let rare = self.rare_probability;
        let remain = 1.0 - rare;

        let last = self.count_y.saturating_sub(1);
        if j == last {
            return SelectionWeights {
                rare,
                top: remain,
                bottom: 0.0,
            };
        }
        if j == 0 {
            return SelectionWeights {
                rare,
                top: 0.0,
                bottom: remain,
            };
        }

        let curved = self.curved_height(j);
        SelectionWeights {
            rare,
            top: remain * curved,
            bottom: remain * (1.0 - curved),
        }
    }

    /// Normalized row height raised to the height bias.
    pub fn curved_height(&self, j: u32) -> f32 {
        let j_norm = if self.count_y <= 1 {
            1.0
        } else {
            j as f32 / (self.count_y - 1) as f32
        };
        j_norm.powf(self.height_bias)
    }

    /// Draws one value from `rng` and resolves it against `palette`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        j: u32,
        palette: &MaterialPalette,
        rng: &mut R,
    ) -> Selection {
        let r = rng.random::<f32>();
        let slot = choose_slot(&self.weights(j), r);
        Selection {
            slot,
            material: resolve_slot(palette, slot),
        }
    }
}

/// Maps a unit draw to a slot: rare below `rare`, then top, then bottom.
pub fn choose_slot(weights: &SelectionWeights, r: f32) -> usize {
    if r < weights.rare {
        MaterialPalette::RARE
    } else if r < weights.rare + weights.top {
        MaterialPalette::TOP
    } else {
        MaterialPalette::BOTTOM
    }
}

/// Material in `slot`, or the first set slot in bottom, top, rare order.
pub fn resolve_slot(palette: &MaterialPalette, slot: usize) -> Option<MaterialId> {
    let slots = palette.slots();
    slots
        .get(slot)
        .copied()
        .flatten()
        .or(palette.bottom)
        .or(palette.top)
        .or(palette.rare)
}

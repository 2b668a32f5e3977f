//! Range clamping for [`GenerationConfig`].
//!
//! Out-of-range values are corrected, never rejected. NaN in a bounded field is
//! replaced by the field's lower bound.

use crate::generation::{
    ExplosionConfig, GenerationConfig, HoleConfig, JitterConfig, LatticeConfig, MaterialConfig,
    NoiseConfig,
};

/// Smallest noise scale allowed on any axis.
pub const MIN_NOISE_SCALE: f64 = 1e-4;

/// Smallest height-bias exponent allowed.
pub const MIN_HEIGHT_BIAS: f32 = 0.5;

/// Largest rotation jitter, in degrees.
pub const MAX_ROTATION_JITTER_DEGREES: f32 = 2.0;

/// Largest explosion direction jitter, in degrees.
pub const MAX_DIRECTION_JITTER_DEGREES: f32 = 45.0;

#[inline]
fn clamp_f32(v: f32, lo: f32, hi: f32) -> f32 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

#[inline]
fn clamp_f64(v: f64, lo: f64, hi: f64) -> f64 {
    if v.is_nan() { lo } else { v.clamp(lo, hi) }
}

// `f32::max` already returns the other operand when one side is NaN.
#[inline]
fn at_least_f32(v: f32, lo: f32) -> f32 {
    v.max(lo)
}

impl GenerationConfig {
    /// Returns a copy with every bounded field clamped to its legal range.
    ///
    /// Idempotent: validating an already validated config changes nothing.
    pub fn validated(mut self) -> Self {
        self.lattice.clamp();
        self.noise.clamp();
        self.hole.clamp();
        self.materials.clamp();
        self.jitter.clamp();
        self.explosion.clamp();
        self
    }
}

impl LatticeConfig {
    fn clamp(&mut self) {
        for c in &mut self.count {
            *c = (*c).max(1);
        }
        for gap in &mut self.spacing {
            *gap = at_least_f32(*gap, 0.0);
        }
    }
}

impl NoiseConfig {
    fn clamp(&mut self) {
        for s in &mut self.scale {
            *s = s.max(MIN_NOISE_SCALE);
        }
        self.threshold = clamp_f64(self.threshold, 0.0, 1.0);
        for size in &mut self.sectors.size {
            *size = (*size).max(1);
        }
    }
}

impl HoleConfig {
    fn clamp(&mut self) {
        self.radius = at_least_f32(self.radius, 0.0);
    }
}

impl MaterialConfig {
    fn clamp(&mut self) {
        self.rare_probability = clamp_f32(self.rare_probability, 0.0, 1.0);
        self.height_bias = at_least_f32(self.height_bias, MIN_HEIGHT_BIAS);
        self.cycle.length = self.cycle.length.max(1);
    }
}

impl JitterConfig {
    fn clamp(&mut self) {
        self.max_degrees = clamp_f32(self.max_degrees, 0.0, MAX_ROTATION_JITTER_DEGREES);
    }
}

impl ExplosionConfig {
    fn clamp(&mut self) {
        self.strength = at_least_f32(self.strength, 0.0);
        self.falloff_exponent = at_least_f32(self.falloff_exponent, 1.0);
        self.rotation_scale = at_least_f32(self.rotation_scale, 0.0);
        self.direction_jitter_degrees =
            clamp_f32(self.direction_jitter_degrees, 0.0, MAX_DIRECTION_JITTER_DEGREES);
        self.magnitude_jitter = clamp_f32(self.magnitude_jitter, 0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostile() -> GenerationConfig {
        let mut config = GenerationConfig::default();
        config.lattice.count = [0, 0, 5];
        config.lattice.spacing = [-1.0, f32::NAN, 0.25];
        config.noise.scale = [0.0, -3.0, 0.2];
        config.noise.threshold = 1.7;
        config.noise.sectors.size = [0, 2, 0];
        config.hole.radius = -4.0;
        config.materials.rare_probability = f32::NAN;
        config.materials.height_bias = 0.1;
        config.materials.cycle.length = 0;
        config.jitter.max_degrees = 10.0;
        config.explosion.strength = -1.0;
        config.explosion.falloff_exponent = 0.0;
        config.explosion.rotation_scale = -2.0;
        config.explosion.direction_jitter_degrees = 90.0;
        config.explosion.magnitude_jitter = -0.5;
        config
    }

    #[test]
    fn test_counts_and_sizes_at_least_one() {
        let config = hostile().validated();
        assert_eq!(config.lattice.count, [1, 1, 5]);
        assert_eq!(config.noise.sectors.size, [1, 2, 1]);
        assert_eq!(config.materials.cycle.length, 1);
    }

    #[test]
    fn test_non_negative_fields() {
        let config = hostile().validated();
        assert_eq!(config.lattice.spacing, [0.0, 0.0, 0.25]);
        assert_eq!(config.hole.radius, 0.0);
        assert_eq!(config.explosion.strength, 0.0);
        assert_eq!(config.explosion.rotation_scale, 0.0);
    }

    #[test]
    fn test_scales_floored_to_epsilon() {
        let config = hostile().validated();
        assert_eq!(config.noise.scale, [MIN_NOISE_SCALE, MIN_NOISE_SCALE, 0.2]);
    }

    #[test]
    fn test_probabilities_and_angles_clamped() {
        let config = hostile().validated();
        assert_eq!(config.noise.threshold, 1.0);
        assert_eq!(config.materials.rare_probability, 0.0);
        assert_eq!(config.materials.height_bias, MIN_HEIGHT_BIAS);
        assert_eq!(config.jitter.max_degrees, MAX_ROTATION_JITTER_DEGREES);
        assert_eq!(config.explosion.falloff_exponent, 1.0);
        assert_eq!(
            config.explosion.direction_jitter_degrees,
            MAX_DIRECTION_JITTER_DEGREES
        );
        assert_eq!(config.explosion.magnitude_jitter, 0.0);
    }

    #[test]
    fn test_defaults_unchanged() {
        let config = GenerationConfig::default();
        assert_eq!(config.clone().validated(), config);
    }

    #[test]
    fn test_validation_idempotent() {
        let once = hostile().validated();
        let twice = once.clone().validated();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unbounded_fields_untouched() {
        let mut config = GenerationConfig::default();
        config.noise.offset = [-5.0, 1e6, 3.5];
        config.explosion.center = [-10.0, 2.0, 7.0];
        config.materials.cycle.offset = -17;
        let validated = config.clone().validated();
        assert_eq!(validated.noise.offset, config.noise.offset);
        assert_eq!(validated.explosion.center, config.explosion.center);
        assert_eq!(validated.materials.cycle.offset, -17);
    }
}

//! Static radial displacement field centered on an explosion point.
//!
//! Per-cell draws from the explosion stream, in order: the direction-jitter vector
//! and angle, the magnitude-jitter factor, then three tumble angles. Each group is
//! drawn only when its parameter is non-zero.

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use tecton_config::ExplosionConfig;

use crate::streams::symmetric;

/// Lower bound on the distance from the explosion center.
pub const MIN_EXPLOSION_DISTANCE: f32 = 1e-4;

const NEAR_ZERO_SQ: f32 = 1e-12;

/// Pushes positions away from a center with a power-law falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplosionDisplacer {
    active: bool,
    center: Vec3,
    strength: f32,
    power: f32,
    rotation_scale: f32,
    direction_jitter_degrees: f32,
    magnitude_jitter: f32,
}

impl ExplosionDisplacer {
    /// Builds the displacer from a validated config.
    pub fn from_config(config: &ExplosionConfig) -> Self {
        let power = if config.cubic_falloff {
            3.0
        } else {
            config.falloff_exponent.max(1.0)
        };
        Self {
            active: config.enabled && config.strength > 0.0,
            center: Vec3::from_array(config.center),
            strength: config.strength,
            power,
            rotation_scale: config.rotation_scale,
            direction_jitter_degrees: config.direction_jitter_degrees,
            magnitude_jitter: config.magnitude_jitter,
        }
    }

    /// Whether [`displace`](Self::displace) changes anything or consumes draws.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Displacement magnitude at `distance`, before magnitude jitter.
    pub fn falloff(&self, distance: f32) -> f32 {
        self.strength / distance.max(MIN_EXPLOSION_DISTANCE).powf(self.power)
    }

    /// Displaces `position` and left-composes a tumble onto `rotation`.
    ///
    /// Returns the inputs unchanged and draws nothing when inactive.
    pub fn displace<R: Rng + ?Sized>(
        &self,
        position: Vec3,
        rotation: Quat,
        rng: &mut R,
    ) -> (Vec3, Quat) {
        if !self.is_active() {
            return (position, rotation);
        }

        let from_center = position - self.center;
        let dist = from_center.length().max(MIN_EXPLOSION_DISTANCE);
        let mut falloff = self.falloff(dist);
        let mut dir = from_center / dist;

        if self.direction_jitter_degrees > 0.0 {
            dir = self.jitter_direction(dir, rng);
        }

        if self.magnitude_jitter > 0.0 {
            let factor = 1.0 + symmetric(rng, 1.0) * self.magnitude_jitter;
            falloff *= factor.max(0.0);
        }

        let displaced = position + dir * falloff;

        if self.rotation_scale > 0.0 {
            let limit = self.rotation_scale * falloff;
            let x = symmetric(rng, limit);
            let y = symmetric(rng, limit);
            let z = symmetric(rng, limit);
            let tumble =
                Quat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians());
            return (displaced, tumble * rotation);
        }

        (displaced, rotation)
    }

    /// Rotates `dir` about a random perpendicular axis. Always draws four values.
    fn jitter_direction<R: Rng + ?Sized>(&self, dir: Vec3, rng: &mut R) -> Vec3 {
        let x = symmetric(rng, 1.0);
        let y = symmetric(rng, 1.0);
        let z = symmetric(rng, 1.0);
        let mut random = Vec3::new(x, y, z);
        if random.length_squared() < NEAR_ZERO_SQ {
            random = Vec3::Y;
        }
        let angle = symmetric(rng, self.direction_jitter_degrees);

        let mut axis = dir.cross(random);
        if axis.length_squared() < NEAR_ZERO_SQ {
            axis = dir.cross(Vec3::Y);
        }
        // `dir` is zero or parallel to both candidates.
        if axis.length_squared() < NEAR_ZERO_SQ {
            return dir;
        }

        let rotated = Quat::from_axis_angle(axis.normalize(), angle.to_radians()) * dir;
        rotated.normalize_or_zero()
    }
}

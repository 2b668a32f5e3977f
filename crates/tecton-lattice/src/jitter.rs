//! Small two-axis rotation wobble per element.

use glam::{EulerRot, Quat};
use rand::Rng;
use tecton_config::JitterConfig;

use crate::streams::symmetric;

/// Draws a yaw wobble plus one secondary wobble on either X or Z.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationJitter {
    max_degrees: f32,
}

impl RotationJitter {
    /// Builds the generator. Disabled or zero-degree jitter draws nothing.
    pub fn from_config(config: &JitterConfig) -> Self {
        let max_degrees = if config.enabled {
            config.max_degrees.max(0.0)
        } else {
            0.0
        };
        Self { max_degrees }
    }

    /// Whether [`sample`](Self::sample) consumes draws.
    pub fn is_active(&self) -> bool {
        self.max_degrees > 0.0
    }

    /// Euler angles in degrees, `[x, y, z]`.
    ///
    /// Draw order: yaw, the axis coin, then the secondary angle. At most one of
    /// `x` and `z` is non-zero.
    pub fn wobble_angles<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 3] {
        if !self.is_active() {
            return [0.0; 3];
        }
        let y = symmetric(rng, self.max_degrees);
        let use_x = rng.random_bool(0.5);
        let secondary = symmetric(rng, self.max_degrees);
        if use_x {
            [secondary, y, 0.0]
        } else {
            [0.0, y, secondary]
        }
    }

    /// Wobble rotation, composed as intrinsic X then Y then Z.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Quat {
        if !self.is_active() {
            return Quat::IDENTITY;
        }
        let [x, y, z] = self.wobble_angles(rng);
        Quat::from_euler(EulerRot::XYZ, x.to_radians(), y.to_radians(), z.to_radians())
    }
}

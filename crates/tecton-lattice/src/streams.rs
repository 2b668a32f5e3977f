//! The four independent seeded random streams.
//!
//! The noise-offset stream is drawn at most once, at the start of a run. A
//! surviving cell draws from the material stream, then the jitter stream, then the
//! explosion stream; rejected cells draw nothing.

use glam::DVec3;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tecton_config::SeedConfig;

/// Half-width of the range a randomized global noise offset is drawn from.
pub const NOISE_OFFSET_RANGE: f64 = 10_000.0;

/// A named set of independent generators.
///
/// Generic over the generator so tests can inject fixed streams.
#[derive(Clone, Debug)]
pub struct SeededStreams<R = ChaCha8Rng> {
    /// Draws the randomized global noise offset.
    pub noise_offset: R,
    /// One draw per surviving cell for material selection.
    pub material: R,
    /// Rotation wobble draws.
    pub jitter: R,
    /// Explosion direction, magnitude and tumble draws.
    pub explosion: R,
}

impl SeededStreams<ChaCha8Rng> {
    /// Seeds one ChaCha8 stream per configured seed.
    pub fn from_seeds(seeds: &SeedConfig) -> Self {
        Self {
            noise_offset: ChaCha8Rng::seed_from_u64(seeds.noise_offset),
            material: ChaCha8Rng::seed_from_u64(seeds.material),
            jitter: ChaCha8Rng::seed_from_u64(seeds.jitter),
            explosion: ChaCha8Rng::seed_from_u64(seeds.explosion),
        }
    }
}

impl<R: RngCore> SeededStreams<R> {
    /// Wraps four caller-supplied generators.
    pub fn new(noise_offset: R, material: R, jitter: R, explosion: R) -> Self {
        Self {
            noise_offset,
            material,
            jitter,
            explosion,
        }
    }

    /// Draws a global noise offset in `[-NOISE_OFFSET_RANGE, NOISE_OFFSET_RANGE)`
    /// per axis, x then y then z.
    pub fn draw_noise_offset(&mut self) -> DVec3 {
        let mut axis = || (self.noise_offset.random::<f64>() * 2.0 - 1.0) * NOISE_OFFSET_RANGE;
        let x = axis();
        let y = axis();
        let z = axis();
        DVec3::new(x, y, z)
    }
}

/// Uniform draw in `[-limit, limit)`.
///
/// Maps a single unit draw instead of building a range, so a zero or very large
/// `limit` never panics and always costs exactly one draw.
#[inline]
pub(crate) fn symmetric<R: Rng + ?Sized>(rng: &mut R, limit: f32) -> f32 {
    (rng.random::<f32>() * 2.0 - 1.0) * limit
}

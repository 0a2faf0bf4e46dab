//! Spawn context for particle generation.
//!
//! Wraps the random source a generator consumes and provides the sampling
//! helpers the placement rules are written in terms of.

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Context threaded through a generator while it produces `count` records.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(100, 7);
/// for i in 0..ctx.count {
///     ctx.index = i;
///     let pos = ctx.random_in_sphere(30.0);
/// }
/// ```
pub struct SpawnContext {
    /// Index of the particle being generated (0 to count-1).
    pub index: usize,
    /// Total number of particles being generated.
    pub count: usize,
    rng: SmallRng,
}

impl SpawnContext {
    /// Context with a reproducible random stream.
    pub fn seeded(count: usize, seed: u64) -> Self {
        Self {
            index: 0,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Context seeded from the OS entropy source.
    pub fn from_entropy(count: usize) -> Self {
        Self {
            index: 0,
            count,
            rng: SmallRng::from_entropy(),
        }
    }

    /// Seeded when `seed` is given, entropy otherwise.
    pub fn new(count: usize, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(count, seed),
            None => Self::from_entropy(count),
        }
    }

    /// Normalized position of the current index in the run (0.0 to <1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.index as f32 / self.count as f32
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in [0, 1).
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in [min, max). Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.random()
    }

    /// Random angle in [0, 2π).
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    /// True with the given probability.
    #[inline]
    pub fn chance(&mut self, probability: f32) -> bool {
        self.random() < probability
    }

    // ========== Position helpers ==========

    /// Random point inside a sphere of given radius, centered at origin.
    ///
    /// Uniform throughout the volume: cube-root radius and a polar angle
    /// drawn as `acos(2u - 1)` so directions cover the sphere evenly.
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        let r = radius * self.random().cbrt();
        let theta = self.random_angle();
        let phi = (2.0 * self.random() - 1.0).clamp(-1.0, 1.0).acos();

        Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        )
    }

    /// Random offset with each component in [-half, half).
    pub fn random_jitter(&mut self, half: f32) -> Vec3 {
        Vec3::new(
            self.random_range(-half, half),
            self.random_range(-half, half),
            self.random_range(-half, half),
        )
    }

    /// Three random Euler angles, each in [0, max).
    pub fn random_rotation(&mut self, max: f32) -> (f32, f32, f32) {
        (
            self.random() * max,
            self.random() * max,
            self.random() * max,
        )
    }
}

/// Point on a ring of `radius` around the vertical axis at height `y`.
#[inline]
pub fn ring_point(angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

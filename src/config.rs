//! Tree configuration.
//!
//! A [`TreeConfig`] is fixed for a whole session: it decides how many particles
//! each category gets, the size of the tree and the scatter cloud, and how fast
//! the ensemble morphs. It can be built in code or loaded from JSON; fields
//! missing from the JSON fall back to the defaults below.
//!
//! ```ignore
//! let config = TreeConfig::default()
//!     .with_needle_count(1500)
//!     .with_seed(7);
//! ```

use crate::error::{Error, Result};
use crate::particle::Category;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of needle particles.
pub const DEFAULT_NEEDLE_COUNT: usize = 3000;
/// Default number of ornament particles.
pub const DEFAULT_ORNAMENT_COUNT: usize = 350;
/// Default number of ribbon particles (split across two strands).
pub const DEFAULT_RIBBON_COUNT: usize = 1600;
/// Default number of confetti particles.
pub const DEFAULT_CONFETTI_COUNT: usize = 600;
/// Default tree height in world units.
pub const DEFAULT_TREE_HEIGHT: f32 = 18.0;
/// Default radius of the tree's base in world units.
pub const DEFAULT_BASE_RADIUS: f32 = 6.0;
/// Default radius of the scattered cloud.
pub const DEFAULT_SCATTER_RADIUS: f32 = 30.0;
/// Default exponential smoothing rate of the morph, per second.
pub const DEFAULT_MORPH_RATE: f32 = 2.0;

/// Session-wide configuration for particle generation and morphing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TreeConfig {
    pub needle_count: usize,
    pub ornament_count: usize,
    pub ribbon_count: usize,
    pub confetti_count: usize,
    /// Total height of the assembled tree. The tree is centered on y = 0.
    pub tree_height: f32,
    /// Cone radius at the bottom of the tree.
    pub base_radius: f32,
    /// Radius bound of the scattered sphere.
    pub scatter_radius: f32,
    /// Rate constant of the exponential smoothing toward the target state.
    pub morph_rate: f32,
    /// Seed for particle placement. `None` draws a fresh layout every session.
    pub seed: Option<u64>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            needle_count: DEFAULT_NEEDLE_COUNT,
            ornament_count: DEFAULT_ORNAMENT_COUNT,
            ribbon_count: DEFAULT_RIBBON_COUNT,
            confetti_count: DEFAULT_CONFETTI_COUNT,
            tree_height: DEFAULT_TREE_HEIGHT,
            base_radius: DEFAULT_BASE_RADIUS,
            scatter_radius: DEFAULT_SCATTER_RADIUS,
            morph_rate: DEFAULT_MORPH_RATE,
            seed: None,
        }
    }
}

impl TreeConfig {
    /// Set the number of needles.
    pub fn with_needle_count(mut self, count: usize) -> Self {
        self.needle_count = count;
        self
    }

    /// Set the number of ornaments.
    pub fn with_ornament_count(mut self, count: usize) -> Self {
        self.ornament_count = count;
        self
    }

    /// Set the number of ribbon particles.
    pub fn with_ribbon_count(mut self, count: usize) -> Self {
        self.ribbon_count = count;
        self
    }

    /// Set the number of confetti flakes.
    pub fn with_confetti_count(mut self, count: usize) -> Self {
        self.confetti_count = count;
        self
    }

    /// Set the tree height and base radius.
    pub fn with_tree_size(mut self, height: f32, base_radius: f32) -> Self {
        self.tree_height = height;
        self.base_radius = base_radius;
        self
    }

    /// Set the radius of the scattered cloud.
    pub fn with_scatter_radius(mut self, radius: f32) -> Self {
        self.scatter_radius = radius;
        self
    }

    /// Set the morph smoothing rate (per second).
    pub fn with_morph_rate(mut self, rate: f32) -> Self {
        self.morph_rate = rate;
        self
    }

    /// Fix the placement seed for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of particles configured for a category. The star is always one.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::Needles => self.needle_count,
            Category::Ornaments => self.ornament_count,
            Category::Ribbons => self.ribbon_count,
            Category::Confetti => self.confetti_count,
            Category::Star => 1,
        }
    }

    /// Total particle count across all categories, star included.
    pub fn total_count(&self) -> usize {
        Category::ALL.iter().map(|&c| self.count(c)).sum()
    }

    /// Check that every dimension and rate is positive and finite.
    ///
    /// Counts are not checked here: a zero count disables a category.
    pub fn validate(&self) -> Result<()> {
        check_positive("tree_height", self.tree_height)?;
        check_positive("base_radius", self.base_radius)?;
        check_positive("scatter_radius", self.scatter_radius)?;
        check_positive("morph_rate", self.morph_rate)?;
        Ok(())
    }

    /// Parse a configuration from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: TreeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

fn check_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

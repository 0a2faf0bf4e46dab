//! Procedural particle placement.
//!
//! One generator per [`Category`]. Each takes a count, the tree configuration
//! and an optional seed and returns exactly `count` records. Generators are
//! pure apart from the random stream they consume: the same seed always
//! produces the same layout.
//!
//! All tree placements share one silhouette: a cone of height `tree_height`
//! centered on y = 0 whose radius shrinks linearly from `base_radius` at the
//! bottom to zero at the apex (see [`cone_radius`]).

use crate::config::TreeConfig;
use crate::error::{Error, Result};
use crate::palette::{hex, Color};
use crate::particle::{Category, ParticleRecord};
use crate::spawn::{ring_point, SpawnContext};
use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

/// Full turns the needle spiral makes from base to apex.
pub const NEEDLE_SPIRAL_TURNS: f32 = 15.0;
/// Half-width of the random height offset applied to each needle.
pub const NEEDLE_HEIGHT_JITTER: f32 = 0.05;
/// Needles sit up to this far inside the cone surface.
pub const NEEDLE_MAX_DEPTH: f32 = 1.5;
/// Ornaments hang this far inside the cone surface.
pub const ORNAMENT_INSET: f32 = 0.2;
/// Number of interleaved ribbon strands.
pub const RIBBON_STRANDS: usize = 2;
/// Full turns each ribbon strand wraps around the tree.
pub const RIBBON_TURNS: f32 = 6.0;
/// Ribbons run this far outside the cone surface.
pub const RIBBON_OFFSET: f32 = 0.5;
/// Half-width of the per-axis ribbon jitter.
pub const RIBBON_JITTER: f32 = 0.15;
/// Confetti hovers this far outside the cone surface.
pub const CONFETTI_OFFSET: f32 = 0.4;
/// The star's scatter position is pushed out by this factor.
pub const STAR_SCATTER_FACTOR: f32 = 1.2;
/// Height of the star above the apex.
pub const STAR_APEX_OFFSET: f32 = 0.5;

/// Cumulative probability bound of a gold ornament.
const GOLD_CUTOFF: f32 = 0.2;
/// Cumulative probability bound of a silver ornament (red above).
const SILVER_CUTOFF: f32 = 0.6;

// Distinct streams per category so changing one count does not reshuffle the others.
const NEEDLE_STREAM: u64 = 0x6e65_6564;
const ORNAMENT_STREAM: u64 = 0x6f72_6e61;
const RIBBON_STREAM: u64 = 0x7269_6262;
const CONFETTI_STREAM: u64 = 0x636f_6e66;
const STAR_STREAM: u64 = 0x7374_6172;

/// Radius of the tree silhouette at height fraction `h` (0 = base, 1 = apex).
#[inline]
pub fn cone_radius(base_radius: f32, h: f32) -> f32 {
    base_radius * (1.0 - h)
}

/// World-space height for height fraction `h`.
#[inline]
pub fn height_at(tree_height: f32, h: f32) -> f32 {
    h * tree_height - tree_height / 2.0
}

/// Generate the records for any category.
///
/// The star ignores `count` beyond requiring it to be positive and always
/// yields a single record.
pub fn generate(
    category: Category,
    count: usize,
    config: &TreeConfig,
    seed: Option<u64>,
) -> Result<Vec<ParticleRecord>> {
    match category {
        Category::Needles => needles(count, config, seed),
        Category::Ornaments => ornaments(count, config, seed),
        Category::Ribbons => ribbons(count, config, seed),
        Category::Confetti => confetti(count, config, seed),
        Category::Star => {
            check(category, count, config)?;
            Ok(vec![star(config, seed)?])
        }
    }
}

/// Needles: a dense multi-turn spiral filling the cone from inside.
pub fn needles(count: usize, config: &TreeConfig, seed: Option<u64>) -> Result<Vec<ParticleRecord>> {
    check(Category::Needles, count, config)?;
    let mut ctx = SpawnContext::new(count, stream(seed, NEEDLE_STREAM));

    let mut particles = Vec::with_capacity(count);
    for i in 0..count {
        ctx.index = i;
        let h = (ctx.progress() + ctx.random_range(-NEEDLE_HEIGHT_JITTER, NEEDLE_HEIGHT_JITTER))
            .clamp(0.0, 1.0);
        let y = height_at(config.tree_height, h);
        let angle = h * TAU * NEEDLE_SPIRAL_TURNS + ctx.random() * FRAC_PI_2;
        let depth = ctx.random() * NEEDLE_MAX_DEPTH;
        let radius = (cone_radius(config.base_radius, h) - depth).max(0.1);

        particles.push(ParticleRecord {
            scatter_position: ctx.random_in_sphere(config.scatter_radius),
            tree_position: ring_point(angle, radius, y),
            rotation: ctx.random_rotation(PI),
            scale: Vec3::splat(ctx.random_range(0.5, 2.0)),
            speed: ctx.random_range(0.2, 0.7),
            phase: ctx.random_angle(),
            color: None,
        });
    }
    Ok(particles)
}

/// Ornaments: scattered just under the cone surface in gold, silver and red.
pub fn ornaments(count: usize, config: &TreeConfig, seed: Option<u64>) -> Result<Vec<ParticleRecord>> {
    check(Category::Ornaments, count, config)?;
    let mut ctx = SpawnContext::new(count, stream(seed, ORNAMENT_STREAM));

    let mut particles = Vec::with_capacity(count);
    for i in 0..count {
        ctx.index = i;
        let h = ctx.random();
        let y = height_at(config.tree_height, h);
        let radius = (cone_radius(config.base_radius, h) - ORNAMENT_INSET).max(0.2);
        let angle = ctx.random_angle();
        let color = ornament_color(ctx.random());

        particles.push(ParticleRecord {
            scatter_position: ctx.random_in_sphere(config.scatter_radius),
            tree_position: ring_point(angle, radius, y),
            rotation: ctx.random_rotation(PI),
            scale: Vec3::splat(ctx.random_range(0.8, 1.3)),
            speed: ctx.random_range(0.2, 0.7),
            phase: ctx.random_angle(),
            color: Some(color),
        });
    }
    Ok(particles)
}

/// Pick an ornament color from a single uniform draw: 20% gold, 40% silver, 40% red.
pub fn ornament_color(u: f32) -> Color {
    if u <= GOLD_CUTOFF {
        Color::from_hex(hex::GOLD_METALLIC)
    } else if u <= SILVER_CUTOFF {
        Color::from_hex(hex::SILVER_METALLIC)
    } else {
        Color::from_hex(hex::RED_VELVET)
    }
}

/// Ribbons: two interleaved strands spiralling around the outside of the cone.
///
/// Even indices form strand 0 (pink), odd indices strand 1 (silver), offset by
/// half a turn.
pub fn ribbons(count: usize, config: &TreeConfig, seed: Option<u64>) -> Result<Vec<ParticleRecord>> {
    check(Category::Ribbons, count, config)?;
    let mut ctx = SpawnContext::new(count, stream(seed, RIBBON_STREAM));
    let strand_len = count as f32 / RIBBON_STRANDS as f32;
    let half_height = config.tree_height / 2.0;

    let mut particles = Vec::with_capacity(count);
    for i in 0..count {
        ctx.index = i;
        let strand = i % RIBBON_STRANDS;
        let t = (i / RIBBON_STRANDS) as f32 / strand_len;

        let y = height_at(config.tree_height, t);
        let radius = cone_radius(config.base_radius, t) + RIBBON_OFFSET;
        let angle = t * TAU * RIBBON_TURNS + strand as f32 * PI;

        let mut tree_position = ring_point(angle, radius, y) + ctx.random_jitter(RIBBON_JITTER);
        tree_position.y = tree_position.y.clamp(-half_height, half_height);

        let color = if strand == 0 {
            Color::from_hex(hex::PINK_RIBBON)
        } else {
            Color::from_hex(hex::SILVER_BRIGHT)
        };

        particles.push(ParticleRecord {
            scatter_position: ctx.random_in_sphere(config.scatter_radius),
            tree_position,
            rotation: ctx.random_rotation(PI),
            scale: Vec3::new(0.15, 0.4, 0.05) * ctx.random_range(0.5, 1.5),
            speed: ctx.random_range(0.3, 0.8),
            phase: ctx.random_angle(),
            color: Some(color),
        });
    }
    Ok(particles)
}

/// Confetti: thin flakes hovering just outside the cone surface.
pub fn confetti(count: usize, config: &TreeConfig, seed: Option<u64>) -> Result<Vec<ParticleRecord>> {
    check(Category::Confetti, count, config)?;
    let mut ctx = SpawnContext::new(count, stream(seed, CONFETTI_STREAM));

    let mut particles = Vec::with_capacity(count);
    for i in 0..count {
        ctx.index = i;
        let h = ctx.random();
        let y = height_at(config.tree_height, h);
        let radius = cone_radius(config.base_radius, h) + CONFETTI_OFFSET;
        let angle = ctx.random_angle();
        let color = if ctx.chance(0.5) {
            Color::from_hex(hex::PINK_LIGHT)
        } else {
            Color::from_hex(hex::RED_BRIGHT)
        };

        particles.push(ParticleRecord {
            scatter_position: ctx.random_in_sphere(config.scatter_radius),
            tree_position: ring_point(angle, radius, y),
            rotation: ctx.random_rotation(PI),
            scale: Vec3::new(0.15, 0.15, 0.01) * ctx.random_range(0.8, 1.3),
            speed: ctx.random_range(0.1, 0.5),
            phase: ctx.random_angle(),
            color: Some(color),
        });
    }
    Ok(particles)
}

/// The topper star: far out in the cloud, directly above the apex on the tree.
pub fn star(config: &TreeConfig, seed: Option<u64>) -> Result<ParticleRecord> {
    config.validate()?;
    let mut ctx = SpawnContext::new(1, stream(seed, STAR_STREAM));

    Ok(ParticleRecord {
        scatter_position: ctx.random_in_sphere(config.scatter_radius) * STAR_SCATTER_FACTOR,
        tree_position: Vec3::new(0.0, config.tree_height / 2.0 + STAR_APEX_OFFSET, 0.0),
        rotation: (0.0, 0.0, 0.0),
        scale: Vec3::splat(1.2),
        speed: 0.1,
        phase: 0.0,
        color: None,
    })
}

fn check(category: Category, count: usize, config: &TreeConfig) -> Result<()> {
    if count == 0 {
        return Err(Error::invalid(format!(
            "{} count must be positive",
            category
        )));
    }
    config.validate()
}

fn stream(seed: Option<u64>, salt: u64) -> Option<u64> {
    seed.map(|s| s ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

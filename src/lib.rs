//! # treemorph - particle tree morph engine
//!
//! Thousands of decorative particles that blend between a scattered cloud and
//! an assembled, decorated conical tree, driven by a single toggle.
//!
//! The crate generates the particles once, smooths a progress scalar toward
//! the desired state every frame, and writes a fresh transform for every
//! particle into per-category instance buffers that any renderer can upload.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treemorph::prelude::*;
//!
//! let mut engine = MorphEngine::new(TreeConfig::default())?;
//! let mut time = Time::new();
//!
//! engine.set_desired_state(MorphState::TreeShape);
//!
//! loop {
//!     let (elapsed, delta) = time.update();
//!     let instances = engine.advance_frame(elapsed, delta);
//!     queue.write_buffer(&needle_buffer, 0, instances.needles.as_bytes());
//!     // ...
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Categories
//!
//! | Category | Shape | Tree placement |
//! |----------|-------|----------------|
//! | [`Category::Needles`] | cone | spiral through the cone volume |
//! | [`Category::Ornaments`] | sphere | near the cone surface |
//! | [`Category::Ribbons`] | box | two helical strands |
//! | [`Category::Confetti`] | quad | just outside the surface |
//! | [`Category::Star`] | extruded star | single topper at the apex |
//!
//! ### Progress
//!
//! [`MorphAnimator`] owns one scalar in `[0, 1]`: 0 is fully scattered, 1 is
//! the assembled tree. It moves toward the target with exponential smoothing
//! at [`TreeConfig::morph_rate`] per second.
//!
//! ### Frames
//!
//! [`MorphEngine::advance_frame`] advances progress first, then rewrites every
//! slot of every [`InstanceBuffer`] and stamps it with the frame number.

pub mod animator;
pub mod config;
pub mod engine;
pub mod error;
pub mod generate;
pub mod geometry;
pub mod instance;
pub mod palette;
pub mod particle;
pub mod spawn;
pub mod store;
pub mod synth;
pub mod time;

pub use animator::MorphAnimator;
pub use bytemuck;
pub use config::TreeConfig;
pub use engine::MorphEngine;
pub use error::{Error, Result};
pub use geometry::{Mesh, Vertex};
pub use glam::{Mat4, Quat, Vec3};
pub use instance::{InstanceBuffer, InstanceRaw, InstanceSet, StarInstance, Transform};
pub use palette::{Color, MaterialSpec};
pub use particle::{Category, CategoryProfile, MorphState, ParticleRecord};
pub use spawn::SpawnContext;
pub use store::ParticleStore;
pub use time::Time;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use treemorph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::MorphAnimator;
    pub use crate::config::TreeConfig;
    pub use crate::engine::MorphEngine;
    pub use crate::error::{Error, Result};
    pub use crate::geometry::{Mesh, Vertex};
    pub use crate::instance::{InstanceBuffer, InstanceRaw, InstanceSet, Transform};
    pub use crate::palette::{Color, MaterialSpec};
    pub use crate::particle::{Category, MorphState, ParticleRecord};
    pub use crate::time::Time;
    pub use crate::{Mat4, Quat, Vec3};
}

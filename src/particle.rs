//! Particle records, categories and the morph toggle.

use crate::palette::Color;
use glam::Vec3;
use std::fmt;

/// Static attributes of one particle.
///
/// Records are generated once per session and never mutated. Everything that
/// moves on screen is derived from these values, the shared morph progress
/// and the elapsed time.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleRecord {
    /// Position in the scattered cloud.
    pub scatter_position: Vec3,
    /// Position on the assembled tree.
    pub tree_position: Vec3,
    /// Base Euler angles (XYZ order), radians.
    pub rotation: (f32, f32, f32),
    /// Per-axis size multiplier.
    pub scale: Vec3,
    /// Angular frequency of the idle drift.
    pub speed: f32,
    /// Phase offset of the idle drift, radians.
    pub phase: f32,
    /// Per-instance color; `None` when the category material supplies it.
    pub color: Option<Color>,
}

/// The five particle groups, each drawn with its own geometry and material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Needles,
    Ornaments,
    Ribbons,
    Confetti,
    /// The topper. Always exactly one, not instanced.
    Star,
}

impl Category {
    /// All categories in draw order.
    pub const ALL: [Category; 5] = [
        Category::Needles,
        Category::Ornaments,
        Category::Ribbons,
        Category::Confetti,
        Category::Star,
    ];

    /// The categories backed by an instance buffer.
    pub const INSTANCED: [Category; 4] = [
        Category::Needles,
        Category::Ornaments,
        Category::Ribbons,
        Category::Confetti,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Needles => "needles",
            Category::Ornaments => "ornaments",
            Category::Ribbons => "ribbons",
            Category::Confetti => "confetti",
            Category::Star => "star",
        }
    }

    /// Per-frame animation constants for this category.
    pub fn profile(self) -> CategoryProfile {
        match self {
            Category::Needles => CategoryProfile {
                spin_rate: 0.1,
                orient_to_axis: true,
            },
            Category::Ornaments => CategoryProfile {
                spin_rate: 0.2,
                orient_to_axis: false,
            },
            Category::Ribbons => CategoryProfile {
                spin_rate: 0.5,
                orient_to_axis: false,
            },
            Category::Confetti => CategoryProfile {
                spin_rate: 0.3,
                orient_to_axis: false,
            },
            // The star spins on its own clock, see `synth::synthesize_star`.
            Category::Star => CategoryProfile {
                spin_rate: 0.0,
                orient_to_axis: false,
            },
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category-specific constants fed to the shared synthesis routine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryProfile {
    /// Radians per second added to the base X and Y rotation.
    pub spin_rate: f32,
    /// Face the tree's vertical axis once the morph is nearly complete.
    pub orient_to_axis: bool,
}

/// The externally controlled toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MorphState {
    #[default]
    Scattered,
    TreeShape,
}

impl MorphState {
    /// Progress value this state converges toward.
    pub fn target(self) -> f32 {
        match self {
            MorphState::Scattered => 0.0,
            MorphState::TreeShape => 1.0,
        }
    }

    /// The other state.
    pub fn toggled(self) -> Self {
        match self {
            MorphState::Scattered => MorphState::TreeShape,
            MorphState::TreeShape => MorphState::Scattered,
        }
    }

    /// Label for a control that switches away from this state.
    pub fn action_label(self) -> &'static str {
        match self {
            MorphState::Scattered => "ASSEMBLE",
            MorphState::TreeShape => "SCATTER",
        }
    }
}

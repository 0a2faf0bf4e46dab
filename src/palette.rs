//! Colors and per-category materials.
//!
//! Particle colors are stored in sRGB as they are authored. Renderers that
//! shade in linear light should convert with [`Color::to_linear`].

use crate::particle::Category;
use bytemuck::{Pod, Zeroable};

/// An opaque sRGB color with channels in 0.0-1.0.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Color from a 24-bit `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }

    /// Back to `0xRRGGBB`, rounding each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Convert to linear light using the sRGB transfer function.
    pub fn to_linear(self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self {
            r: decode(self.r),
            g: decode(self.g),
            b: decode(self.b),
        }
    }

    /// RGBA array with the given alpha.
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// The named colors of the scene, as `0xRRGGBB`.
pub mod hex {
    pub const EMERALD_DEEP: u32 = 0x004225;
    pub const EMERALD_LIGHT: u32 = 0x10B981;
    pub const GOLD_METALLIC: u32 = 0xFFD700;
    pub const GOLD_ROSE: u32 = 0xE0BFB8;
    pub const SILVER_METALLIC: u32 = 0xE2E8F0;
    pub const SILVER_BRIGHT: u32 = 0xF8FAFC;
    pub const PINK_RIBBON: u32 = 0xEC4899;
    pub const PINK_LIGHT: u32 = 0xFBCFE8;
    pub const RED_VELVET: u32 = 0x9F1239;
    pub const RED_BRIGHT: u32 = 0xF43F5E;
    /// Background.
    pub const VOID: u32 = 0x010806;
}

/// Surface description a renderer uses for one category.
///
/// `base_color` is `None` when every instance carries its own color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialSpec {
    pub base_color: Option<Color>,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Option<Color>,
    pub emissive_intensity: f32,
    /// Draw both faces (thin flakes).
    pub double_sided: bool,
}

impl Category {
    /// Material for this category's geometry.
    pub fn material(self) -> MaterialSpec {
        match self {
            Category::Needles => MaterialSpec {
                base_color: Some(Color::from_hex(hex::EMERALD_DEEP)),
                roughness: 0.4,
                metalness: 0.6,
                emissive: Some(Color::from_hex(hex::EMERALD_DEEP)),
                emissive_intensity: 0.2,
                double_sided: false,
            },
            Category::Ornaments => MaterialSpec {
                base_color: None,
                roughness: 0.15,
                metalness: 0.9,
                emissive: None,
                emissive_intensity: 0.0,
                double_sided: false,
            },
            Category::Ribbons => MaterialSpec {
                base_color: None,
                roughness: 0.2,
                metalness: 0.8,
                emissive: None,
                emissive_intensity: 0.0,
                double_sided: false,
            },
            Category::Confetti => MaterialSpec {
                base_color: None,
                roughness: 0.5,
                metalness: 0.4,
                emissive: None,
                emissive_intensity: 0.0,
                double_sided: true,
            },
            Category::Star => MaterialSpec {
                base_color: Some(Color::from_hex(hex::GOLD_METALLIC)),
                roughness: 0.5,
                metalness: 0.0,
                emissive: Some(Color::from_hex(hex::GOLD_METALLIC)),
                emissive_intensity: 2.0,
                double_sided: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let gold = Color::from_hex(hex::GOLD_METALLIC);
        assert_eq!(gold.r, 1.0);
        assert!((gold.g - 215.0 / 255.0).abs() < 1e-6);
        assert_eq!(gold.b, 0.0);
        assert_eq!(gold.to_hex(), hex::GOLD_METALLIC);
    }

    #[test]
    fn test_to_linear_darkens_midtones() {
        let c = Color::from_hex(0x808080).to_linear();
        assert!(c.r > 0.2 && c.r < 0.23);
        let white = Color::from_hex(0xFFFFFF).to_linear();
        assert!((white.g - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_instanced_color_categories_have_no_base_color() {
        assert!(Category::Ornaments.material().base_color.is_none());
        assert!(Category::Ribbons.material().base_color.is_none());
        assert!(Category::Confetti.material().base_color.is_none());
        assert!(Category::Needles.material().base_color.is_some());
        assert!(Category::Star.material().base_color.is_some());
        assert!(Category::Confetti.material().double_sided);
    }
}

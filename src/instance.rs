//! Per-category instance buffers handed to the renderer.
//!
//! Each instanced category owns one [`InstanceBuffer`] with one slot per
//! particle. A slot holds the particle's current [`Transform`] and a GPU-ready
//! [`InstanceRaw`] (model matrix + color). Colors are written once when the
//! buffer is created; transforms are rewritten every frame by the
//! synthesizer.

use crate::palette::Color;
use crate::particle::{Category, ParticleRecord};
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, orientation and scale of one rendered element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Model matrix: scale, then rotate, then translate.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// True when every component is a finite number.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// The resting scattered pose of a record: scatter position, base
    /// rotation, base scale.
    pub fn scattered(record: &ParticleRecord) -> Self {
        let (x, y, z) = record.rotation;
        Self {
            translation: record.scatter_position,
            rotation: Quat::from_euler(EulerRot::XYZ, x, y, z),
            scale: record.scale,
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// GPU layout of one instance: column-major model matrix followed by RGBA.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceRaw {
    fn new(transform: &Transform, color: Color) -> Self {
        Self {
            model: transform.matrix().to_cols_array_2d(),
            color: color.to_rgba(1.0),
        }
    }
}

/// One category's instance slots.
#[derive(Clone, Debug)]
pub struct InstanceBuffer {
    category: Category,
    transforms: Vec<Transform>,
    raw: Vec<InstanceRaw>,
    ready_frame: u64,
}

impl InstanceBuffer {
    /// Buffer for `records`, initialised to their scattered pose.
    ///
    /// Records without their own color take the category material's base
    /// color, or white.
    pub fn new(category: Category, records: &[ParticleRecord]) -> Self {
        let fallback = category
            .material()
            .base_color
            .unwrap_or(Color { r: 1.0, g: 1.0, b: 1.0 });

        let transforms: Vec<Transform> = records.iter().map(Transform::scattered).collect();
        let raw = transforms
            .iter()
            .zip(records)
            .map(|(t, r)| InstanceRaw::new(t, r.color.unwrap_or(fallback)))
            .collect();

        Self {
            category,
            transforms,
            raw,
            ready_frame: 0,
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Current transform of every slot.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// GPU-ready slots.
    pub fn raw(&self) -> &[InstanceRaw] {
        &self.raw
    }

    /// The slots as bytes for uploading.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.raw)
    }

    /// Frame number of the last complete synthesis pass (0 = never).
    pub fn ready_frame(&self) -> u64 {
        self.ready_frame
    }

    /// Write slot `index`. Non-finite transforms are dropped and the slot
    /// keeps its previous value. Returns whether the write happened.
    pub(crate) fn write(&mut self, index: usize, transform: Transform) -> bool {
        if !transform.is_finite() {
            log::trace!(
                "{} slot {} kept previous transform (non-finite result)",
                self.category,
                index
            );
            return false;
        }
        self.transforms[index] = transform;
        self.raw[index].model = transform.matrix().to_cols_array_2d();
        true
    }

    pub(crate) fn mark_ready(&mut self, frame: u64) {
        self.ready_frame = frame;
    }
}

/// The star's standalone transform plus its spin clock.
#[derive(Clone, Debug)]
pub struct StarInstance {
    transform: Transform,
    /// Accumulated yaw, radians in [0, 2π).
    pub(crate) spin: f32,
    ready_frame: u64,
}

impl StarInstance {
    pub fn new(record: &ParticleRecord) -> Self {
        Self {
            transform: Transform::scattered(record),
            spin: 0.0,
            ready_frame: 0,
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn raw(&self) -> InstanceRaw {
        let color = Category::Star
            .material()
            .base_color
            .unwrap_or(Color { r: 1.0, g: 1.0, b: 1.0 });
        InstanceRaw::new(&self.transform, color)
    }

    pub fn ready_frame(&self) -> u64 {
        self.ready_frame
    }

    pub(crate) fn write(&mut self, transform: Transform) -> bool {
        if !transform.is_finite() {
            log::trace!("star kept previous transform (non-finite result)");
            return false;
        }
        self.transform = transform;
        true
    }

    pub(crate) fn mark_ready(&mut self, frame: u64) {
        self.ready_frame = frame;
    }
}

/// Every buffer the renderer consumes.
#[derive(Clone, Debug)]
pub struct InstanceSet {
    pub needles: InstanceBuffer,
    pub ornaments: InstanceBuffer,
    pub ribbons: InstanceBuffer,
    pub confetti: InstanceBuffer,
    pub star: StarInstance,
}

impl InstanceSet {
    /// Instance buffer of an instanced category; `None` for the star.
    pub fn buffer(&self, category: Category) -> Option<&InstanceBuffer> {
        match category {
            Category::Needles => Some(&self.needles),
            Category::Ornaments => Some(&self.ornaments),
            Category::Ribbons => Some(&self.ribbons),
            Category::Confetti => Some(&self.confetti),
            Category::Star => None,
        }
    }

    pub(crate) fn buffer_mut(&mut self, category: Category) -> Option<&mut InstanceBuffer> {
        match category {
            Category::Needles => Some(&mut self.needles),
            Category::Ornaments => Some(&mut self.ornaments),
            Category::Ribbons => Some(&mut self.ribbons),
            Category::Confetti => Some(&mut self.confetti),
            Category::Star => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::hex;

    fn record(color: Option<Color>) -> ParticleRecord {
        ParticleRecord {
            scatter_position: Vec3::new(1.0, 2.0, 3.0),
            tree_position: Vec3::new(0.5, 0.0, 0.5),
            rotation: (0.1, 0.2, 0.3),
            scale: Vec3::splat(2.0),
            speed: 0.5,
            phase: 0.0,
            color,
        }
    }

    #[test]
    fn test_instance_raw_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 80);
    }

    #[test]
    fn test_new_buffer_starts_scattered() {
        let records = vec![record(None), record(None)];
        let buffer = InstanceBuffer::new(Category::Needles, &records);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.ready_frame(), 0);
        assert_eq!(buffer.transforms()[0].translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(buffer.raw()[0].model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(buffer.as_bytes().len(), 2 * 80);
    }

    #[test]
    fn test_colors_written_at_creation() {
        let red = Color::from_hex(hex::RED_VELVET);
        let buffer = InstanceBuffer::new(Category::Ornaments, &[record(Some(red))]);
        assert_eq!(buffer.raw()[0].color, red.to_rgba(1.0));

        let needles = InstanceBuffer::new(Category::Needles, &[record(None)]);
        let emerald = Color::from_hex(hex::EMERALD_DEEP);
        assert_eq!(needles.raw()[0].color, emerald.to_rgba(1.0));
    }

    #[test]
    fn test_non_finite_write_keeps_previous() {
        let mut buffer = InstanceBuffer::new(Category::Confetti, &[record(None)]);
        let before = buffer.transforms()[0];
        let mut bad = before;
        bad.translation.x = f32::NAN;
        assert!(!buffer.write(0, bad));
        assert_eq!(buffer.transforms()[0], before);

        let mut good = before;
        good.translation = Vec3::ZERO;
        assert!(buffer.write(0, good));
        assert_eq!(buffer.raw()[0].model[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_write_preserves_color() {
        let pink = Color::from_hex(hex::PINK_LIGHT);
        let mut buffer = InstanceBuffer::new(Category::Confetti, &[record(Some(pink))]);
        buffer.write(0, Transform::IDENTITY);
        assert_eq!(buffer.raw()[0].color, pink.to_rgba(1.0));
    }
}

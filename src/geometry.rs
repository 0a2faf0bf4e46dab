//! Procedural meshes for each category.
//!
//! Meshes are plain triangle lists (no index buffer) with per-vertex normals,
//! centered on the origin so instance transforms place them directly.
//!
//! # Built-in Shapes
//!
//! ```ignore
//! Mesh::cone(0.15, 0.6, 3)          // needle
//! Mesh::sphere(0.3, 24, 24)         // ornament
//! Mesh::cuboid(Vec3::ONE)           // ribbon strip (scaled per instance)
//! Mesh::quad(1.0, 1.0)              // confetti flake
//! Mesh::star(5, 1.5, 0.7, 0.4)      // topper
//! ```

use crate::particle::Category;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

/// GPU vertex layout: position followed by normal.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// A triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
}

impl Mesh {
    /// The mesh a category is drawn with.
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Needles => Self::cone(0.15, 0.6, 3),
            Category::Ornaments => Self::sphere(0.3, 24, 24),
            Category::Ribbons => Self::cuboid(Vec3::ONE),
            Category::Confetti => Self::quad(1.0, 1.0),
            Category::Star => Self::star(5, 1.5, 0.7, 0.4),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flat-shaded triangle; the normal follows counter-clockwise winding.
    fn push_flat(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        for p in [a, b, c] {
            self.vertices.push(Vertex {
                position: p.to_array(),
                normal: normal.to_array(),
            });
        }
    }

    fn push_smooth(&mut self, points: [(Vec3, Vec3); 3]) {
        for (p, n) in points {
            self.vertices.push(Vertex {
                position: p.to_array(),
                normal: n.to_array(),
            });
        }
    }

    /// Cone along +Y with its apex at `height / 2` and a closed base.
    pub fn cone(radius: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let mut mesh = Mesh::default();
        let apex = Vec3::new(0.0, height / 2.0, 0.0);
        let base_center = Vec3::new(0.0, -height / 2.0, 0.0);

        let rim = |i: u32| {
            let angle = i as f32 / segments as f32 * TAU;
            Vec3::new(angle.sin() * radius, -height / 2.0, angle.cos() * radius)
        };

        for i in 0..segments {
            let a = rim(i);
            let b = rim(i + 1);
            mesh.push_flat(apex, a, b);
            mesh.push_flat(base_center, b, a);
        }
        mesh
    }

    /// UV sphere with smooth normals.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let w = width_segments.max(3);
        let h = height_segments.max(2);
        let mut mesh = Mesh::default();

        let point = |ix: u32, iy: u32| {
            let u = ix as f32 / w as f32;
            let v = iy as f32 / h as f32;
            let normal = Vec3::new(
                -(u * TAU).cos() * (v * PI).sin(),
                (v * PI).cos(),
                (u * TAU).sin() * (v * PI).sin(),
            );
            (normal * radius, normal)
        };

        for iy in 0..h {
            for ix in 0..w {
                let a = point(ix, iy);
                let b = point(ix, iy + 1);
                let c = point(ix + 1, iy + 1);
                let d = point(ix + 1, iy);
                if iy != 0 {
                    mesh.push_smooth([a, b, d]);
                }
                if iy != h - 1 {
                    mesh.push_smooth([b, c, d]);
                }
            }
        }
        mesh
    }

    /// Axis-aligned box with the given full extents.
    pub fn cuboid(size: Vec3) -> Self {
        let h = size * 0.5;
        let mut mesh = Mesh::default();
        // (normal, u axis, v axis); u × v = normal keeps the winding outward.
        let faces = [
            (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        ];
        for (n, u, v) in faces {
            let center = n * h;
            let du = u * h;
            let dv = v * h;
            let p00 = center - du - dv;
            let p10 = center + du - dv;
            let p11 = center + du + dv;
            let p01 = center - du + dv;
            mesh.push_flat(p00, p10, p11);
            mesh.push_flat(p00, p11, p01);
        }
        mesh
    }

    /// Quad in the XY plane facing +Z.
    pub fn quad(width: f32, height: f32) -> Self {
        let (w, h) = (width / 2.0, height / 2.0);
        let mut mesh = Mesh::default();
        let p00 = Vec3::new(-w, -h, 0.0);
        let p10 = Vec3::new(w, -h, 0.0);
        let p11 = Vec3::new(w, h, 0.0);
        let p01 = Vec3::new(-w, h, 0.0);
        mesh.push_flat(p00, p10, p11);
        mesh.push_flat(p00, p11, p01);
        mesh
    }

    /// Extruded star prism centered on the origin, facing ±Z.
    pub fn star(points: u32, outer: f32, inner: f32, depth: f32) -> Self {
        let outline = star_outline(points, outer, inner);
        let front = depth / 2.0;
        let back = -depth / 2.0;
        let mut mesh = Mesh::default();

        let n = outline.len();
        for i in 0..n {
            let p = outline[i];
            let q = outline[(i + 1) % n];

            // The outline runs clockwise seen from +Z.
            mesh.push_flat(
                Vec3::new(0.0, 0.0, front),
                q.extend(front),
                p.extend(front),
            );
            mesh.push_flat(
                Vec3::new(0.0, 0.0, back),
                p.extend(back),
                q.extend(back),
            );

            mesh.push_flat(p.extend(front), q.extend(front), q.extend(back));
            mesh.push_flat(p.extend(front), q.extend(back), p.extend(back));
        }
        mesh
    }
}

/// Star outline alternating between `outer` and `inner` radius, starting at
/// the top point and running clockwise.
pub fn star_outline(points: u32, outer: f32, inner: f32) -> Vec<Vec2> {
    let corners = points.max(2) * 2;
    (0..corners)
        .map(|i| {
            let angle = i as f32 / corners as f32 * TAU;
            let radius = if i % 2 == 0 { outer } else { inner };
            Vec2::new(angle.sin() * radius, angle.cos() * radius)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(mesh: &Mesh) -> impl Iterator<Item = Vec3> + '_ {
        mesh.vertices.iter().map(|v| Vec3::from_array(v.position))
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }

    #[test]
    fn test_meshes_are_triangle_lists() {
        for category in Category::ALL {
            let mesh = Mesh::for_category(category);
            assert!(mesh.vertex_count() > 0);
            assert_eq!(mesh.vertex_count() % 3, 0);
        }
    }

    #[test]
    fn test_normals_are_unit() {
        for category in Category::ALL {
            for v in Mesh::for_category(category).vertices {
                let n = Vec3::from_array(v.normal);
                assert!((n.length() - 1.0).abs() < 1e-3, "{:?}", category);
            }
        }
    }

    #[test]
    fn test_cone_bounds() {
        let mesh = Mesh::cone(0.15, 0.6, 3);
        assert_eq!(mesh.vertex_count(), 3 * 2 * 3);
        for p in positions(&mesh) {
            assert!(p.y >= -0.3 - 1e-6 && p.y <= 0.3 + 1e-6);
            assert!(Vec2::new(p.x, p.z).length() <= 0.15 + 1e-6);
        }
    }

    #[test]
    fn test_sphere_radius() {
        for p in positions(&Mesh::sphere(0.3, 24, 24)) {
            assert!((p.length() - 0.3).abs() < 1e-4);
        }
    }

    #[test]
    fn test_cuboid_normals_point_outward() {
        let mesh = Mesh::cuboid(Vec3::ONE);
        assert_eq!(mesh.vertex_count(), 36);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            let n = Vec3::from_array(v.normal);
            assert!(p.dot(n) > 0.0);
        }
    }

    #[test]
    fn test_star_outline_alternates() {
        let outline = star_outline(5, 1.5, 0.7);
        assert_eq!(outline.len(), 10);
        for (i, p) in outline.iter().enumerate() {
            let expected = if i % 2 == 0 { 1.5 } else { 0.7 };
            assert!((p.length() - expected).abs() < 1e-5);
        }
        assert!((outline[0] - Vec2::new(0.0, 1.5)).length() < 1e-6);
    }

    #[test]
    fn test_star_is_centered() {
        let mesh = Mesh::star(5, 1.5, 0.7, 0.4);
        let (min_z, max_z) = positions(&mesh).fold((f32::MAX, f32::MIN), |(lo, hi), p| {
            (lo.min(p.z), hi.max(p.z))
        });
        assert!((min_z + 0.2).abs() < 1e-6);
        assert!((max_z - 0.2).abs() < 1e-6);

        // Front cap faces +Z, back cap -Z.
        let front = &mesh.vertices[0];
        assert!(front.normal[2] > 0.99);
        let back = &mesh.vertices[3];
        assert!(back.normal[2] < -0.99);
    }
}

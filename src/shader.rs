use bytemuck::{Pod, Zeroable};
use treemorph::MaterialSpec;

pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// Scene-wide values, bind group 0.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Globals {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    /// xyz: light travel direction, w: ambient strength.
    pub light_dir: [f32; 4],
    /// x: elapsed seconds.
    pub params: [f32; 4],
}

/// Per-category surface, bind group 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    pub emissive: [f32; 4],
    pub surface: [f32; 4],
}

impl From<MaterialSpec> for MaterialUniform {
    fn from(spec: MaterialSpec) -> Self {
        let emissive = spec
            .emissive
            .map(|c| c.to_linear().to_rgba(0.0))
            .unwrap_or([0.0; 4]);
        let k = spec.emissive_intensity;
        Self {
            emissive: [emissive[0] * k, emissive[1] * k, emissive[2] * k, 0.0],
            surface: [
                spec.roughness,
                spec.metalness,
                if spec.double_sided { 1.0 } else { 0.0 },
                0.0,
            ],
        }
    }
}

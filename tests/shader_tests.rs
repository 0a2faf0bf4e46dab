//! WGSL validation for the viewer's instance shader.

use treemorph::{InstanceRaw, Vertex};

const SHADER_SOURCE: &str = include_str!("../src/shader.wgsl");

fn parse_and_validate(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("WGSL parse error: {:?}", e))?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|e| format!("WGSL validation error: {:?}", e))?;

    Ok(module)
}

#[test]
fn test_instance_shader_validates() {
    parse_and_validate(SHADER_SOURCE).expect("instance shader should be valid");
}

#[test]
fn test_shader_entry_points() {
    let module = parse_and_validate(SHADER_SOURCE).unwrap();
    let names: Vec<&str> = module
        .entry_points
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert!(names.contains(&"vs_main"));
    assert!(names.contains(&"fs_main"));
}

#[test]
fn test_vertex_strides_match_shader_inputs() {
    // Two vec3 attributes per vertex; four vec4 matrix columns plus a vec4
    // color per instance.
    assert_eq!(std::mem::size_of::<Vertex>(), 2 * 3 * 4);
    assert_eq!(std::mem::size_of::<InstanceRaw>(), 5 * 4 * 4);
}

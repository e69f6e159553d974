//! Parse and validate the generated point-field shader with naga.

use memory_garden::deform::DeformParams;
use memory_garden::shader::render_shader;

fn validate_wgsl(source: &str) -> Result<naga::Module, String> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| format!("WGSL parse error: {}", e.emit_to_string(source)))?;

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
fn test_default_shader_validates() {
    let src = render_shader(&DeformParams::default());
    validate_wgsl(&src).expect("default render shader should be valid");
}

#[test]
fn test_custom_params_validate() {
    let params = DeformParams {
        influence_exponent: 1.0,
        time_scale: 1.25,
        repulsion_radius: 0.5,
        repulsion_strength: 10.0,
        perspective: 120.0,
        ..Default::default()
    };
    validate_wgsl(&render_shader(&params)).expect("custom render shader should be valid");
}

#[test]
fn test_entry_points_present() {
    let module = validate_wgsl(&render_shader(&DeformParams::default())).unwrap();
    let stages: Vec<(&str, naga::ShaderStage)> = module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect();
    assert!(stages.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(stages.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn test_uniform_block_matches_cpu_layout() {
    let module = validate_wgsl(&render_shader(&DeformParams::default())).unwrap();
    let uniforms = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Uniforms"))
        .map(|(_, ty)| ty)
        .expect("Uniforms struct");

    match &uniforms.inner {
        naga::TypeInner::Struct { span, .. } => {
            assert_eq!(*span as usize, std::mem::size_of::<memory_garden::driver::GpuUniforms>());
        }
        other => panic!("Uniforms is not a struct: {other:?}"),
    }
}

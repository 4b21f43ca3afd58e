//! Unit tests for the concrete shader families

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3};
use crate::config::RendererConfig;
use crate::gpu::mock_gpu_binding::{MockGpuBinding, UploadedValue};
use crate::gpu::{GpuBinding, ProgramHandle, VertexAttribs};
use crate::shader::{
    AlphaGen, ColorGen, ColorModulate, GenericShader, LightMappingShader, ShaderFamily,
    ShaderProgram, VertexLightingDbsEntityShader, VertexLightingDbsWorldShader,
};

fn mock_gpu() -> (Arc<Mutex<MockGpuBinding>>, Arc<Mutex<dyn GpuBinding>>) {
    let mock = Arc::new(Mutex::new(MockGpuBinding::new()));
    let gpu: Arc<Mutex<dyn GpuBinding>> = mock.clone();
    (mock, gpu)
}

fn config() -> Arc<RendererConfig> {
    Arc::new(RendererConfig::default())
}

/// Int uploads made to `handle` while it was being set up
fn sampler_uploads(mock: &MockGpuBinding, handle: ProgramHandle) -> Vec<i32> {
    mock.uploads()
        .into_iter()
        .filter(|(program, _, _)| *program == handle)
        .filter_map(|(_, _, value)| match value {
            UploadedValue::Int(unit) => Some(unit),
            _ => None,
        })
        .collect()
}

fn assert_macro_order(program: &ShaderProgram, expected: &[&str]) {
    assert_eq!(program.macro_names().collect::<Vec<_>>(), expected);
    for (index, _) in expected.iter().enumerate() {
        assert_eq!(program.variant_macros(1 << index), Some(format!("{} ", expected[index]).as_str()));
    }
}

// ============================================================================
// GENERIC
// ============================================================================

#[test]
fn test_generic_layout() {
    let (mock, gpu) = mock_gpu();
    let shader = GenericShader::new(gpu, config());
    let program = shader.program();

    assert_eq!(shader.name(), "generic");
    assert_eq!(program.variant_count(), 64);
    assert_macro_order(program, &[
        "USE_PORTAL_CLIPPING",
        "USE_ALPHA_TESTING",
        "USE_VERTEX_SKINNING",
        "USE_VERTEX_ANIMATION",
        "USE_DEFORM_VERTEXES",
        "USE_TCGEN_ENVIRONMENT",
    ]);
    assert_eq!(program.uniform_names().count(), 13);

    let mock = mock.lock().unwrap();
    let desc = &mock.program(program.variant_program(0).unwrap()).desc;
    assert_eq!(desc.vertex_main, "glsl/generic_vp.glsl");
    assert_eq!(desc.fragment_main, "glsl/generic_fp.glsl");
    assert_eq!(desc.vertex_libs, vec!["vertexSkinning", "vertexAnimation", "deformVertexes"]);
    assert!(desc.fragment_libs.is_empty());
    assert_eq!(sampler_uploads(&mock, program.variant_program(63).unwrap()), vec![0]);
}

#[test]
fn test_generic_vertex_color_stream_follows_color_gen() {
    let (mock, gpu) = mock_gpu();
    let mut shader = GenericShader::new(gpu, config());

    shader.bind_program();
    shader.set_uniform(shader.u_color_gen, &ColorGen::Vertex);
    shader.set_uniform(shader.u_alpha_gen, &AlphaGen::Vertex);
    shader.set_vertex_attribs();
    let attribs = mock.lock().unwrap().last_vertex_attribs().unwrap();
    assert!(attribs.contains(VertexAttribs::POSITION | VertexAttribs::TEXCOORD | VertexAttribs::NORMAL | VertexAttribs::COLOR));

    shader.set_uniform(shader.u_alpha_gen, &AlphaGen::Identity);
    shader.set_vertex_attribs();
    let attribs = mock.lock().unwrap().last_vertex_attribs().unwrap();
    assert!(!attribs.contains(VertexAttribs::COLOR));
}

#[test]
fn test_generic_skinned_draw_sequence() {
    let (mock, gpu) = mock_gpu();
    let mut shader = GenericShader::new(gpu, config());
    let bones = vec![Mat4::IDENTITY; 4];

    shader.enable_macro(shader.use_vertex_skinning);
    shader.bind_program();
    shader.set_uniform(shader.u_bone_matrix, &bones[..]);
    shader.set_uniform(shader.u_model_view_projection_matrix, &Mat4::IDENTITY);
    shader.set_vertex_attribs();

    let program = shader.program();
    assert_eq!(program.current_variant_index(), 4);
    assert_eq!(program.variant_macros(4), Some("USE_VERTEX_SKINNING "));

    let mock = mock.lock().unwrap();
    assert_eq!(mock.bound, Some(program.current_program()));
    let attribs = mock.last_vertex_attribs().unwrap();
    assert!(attribs.contains(VertexAttribs::BONE_INDEXES | VertexAttribs::BONE_WEIGHTS));

    let (target, _, value) = mock.uploads().into_iter().rev().nth(1).unwrap();
    assert_eq!(target, program.current_program());
    assert!(matches!(value, UploadedValue::Matrix4Array(ref floats) if floats.len() == 64));
}

// ============================================================================
// LIGHT MAPPING
// ============================================================================

#[test]
fn test_light_mapping_layout() {
    let (mock, gpu) = mock_gpu();
    let shader = LightMappingShader::new(gpu, config());
    let program = shader.program();

    assert_eq!(shader.name(), "lightMapping");
    assert_eq!(program.variant_count(), 16);
    assert_macro_order(program, &[
        "USE_PORTAL_CLIPPING",
        "USE_ALPHA_TESTING",
        "USE_DEFORM_VERTEXES",
        "USE_PARALLAX_MAPPING",
    ]);
    assert!(program.required_attribs().contains(VertexAttribs::LIGHTCOORD));

    let mock = mock.lock().unwrap();
    let desc = &mock.program(program.variant_program(8).unwrap()).desc;
    assert_eq!(desc.vertex_libs, vec!["deformVertexes"]);
    assert_eq!(desc.fragment_libs, vec!["reliefMapping"]);
    assert_eq!(desc.macros, "USE_PARALLAX_MAPPING ");
    assert_eq!(sampler_uploads(&mock, program.variant_program(8).unwrap()), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_light_mapping_color_modulate() {
    let (mock, gpu) = mock_gpu();
    let mut shader = LightMappingShader::new(gpu, config());

    shader.bind_program();
    shader.set_uniform(shader.u_color_modulate, &ColorModulate::new(ColorGen::Vertex, AlphaGen::Identity));

    assert!(shader.program().vertex_attribs().contains(VertexAttribs::COLOR));
    let (_, _, value) = mock.lock().unwrap().uploads().last().cloned().unwrap();
    assert_eq!(value, UploadedValue::Vec4(glam::Vec4::new(1.0, 1.0, 1.0, 0.0)));
}

// ============================================================================
// VERTEX LIGHTING
// ============================================================================

#[test]
fn test_vertex_lighting_entity_layout() {
    let (mock, gpu) = mock_gpu();
    let shader = VertexLightingDbsEntityShader::new(gpu, config());
    let program = shader.program();

    assert_eq!(shader.name(), "vertexLighting_DBS_entity");
    assert_eq!(program.variant_count(), 32);
    assert_macro_order(program, &[
        "USE_PORTAL_CLIPPING",
        "USE_ALPHA_TESTING",
        "USE_VERTEX_SKINNING",
        "USE_VERTEX_ANIMATION",
        "USE_PARALLAX_MAPPING",
    ]);
    assert_eq!(program.unsupported_attribs(), VertexAttribs::LIGHTCOORD | VertexAttribs::LIGHTDIRECTION);

    let mock = mock.lock().unwrap();
    let desc = &mock.program(program.variant_program(0).unwrap()).desc;
    assert_eq!(desc.vertex_main, "glsl/vertexLighting_DBS_entity_vp.glsl");
    assert_eq!(desc.vertex_libs, vec!["vertexSkinning", "vertexAnimation"]);
    assert_eq!(sampler_uploads(&mock, program.variant_program(31).unwrap()), vec![0, 1, 2]);
}

#[test]
fn test_vertex_lighting_entity_animation_uses_live_normal_mapping() {
    let (_mock, gpu) = mock_gpu();
    let config = config();
    let mut shader = VertexLightingDbsEntityShader::new(gpu, config.clone());

    config.set_normal_mapping(false);
    shader.set_macro(shader.use_vertex_animation, true);
    assert_eq!(shader.program().vertex_attribs(), VertexAttribs::POSITION2 | VertexAttribs::NORMAL2);
    shader.set_macro(shader.use_vertex_animation, false);

    config.set_normal_mapping(true);
    shader.set_macro(shader.use_vertex_animation, true);
    assert!(shader.program().vertex_attribs().contains(VertexAttribs::TANGENT2 | VertexAttribs::BINORMAL2));
}

#[test]
fn test_vertex_lighting_entity_light_uniforms() {
    let (mock, gpu) = mock_gpu();
    let mut shader = VertexLightingDbsEntityShader::new(gpu, config());

    shader.bind_program();
    shader.set_uniform(shader.u_light_dir, &Vec3::Z);
    shader.set_uniform(shader.u_light_color, &Vec3::ONE);
    shader.set_uniform(shader.u_ambient_color, &Vec3::splat(0.25));

    let uploads = mock.lock().unwrap().uploads();
    let values: Vec<UploadedValue> = uploads.into_iter().rev().take(3).map(|(_, _, v)| v).collect();
    assert_eq!(values, vec![
        UploadedValue::Vec3(Vec3::splat(0.25)),
        UploadedValue::Vec3(Vec3::ONE),
        UploadedValue::Vec3(Vec3::Z),
    ]);
    assert_eq!(shader.program().stats().uniform_uploads, 3);
}

#[test]
fn test_vertex_lighting_world_layout() {
    let (mock, gpu) = mock_gpu();
    let shader = VertexLightingDbsWorldShader::new(gpu, config());
    let program = shader.program();

    assert_eq!(shader.name(), "vertexLighting_DBS_world");
    assert_eq!(program.variant_count(), 16);
    assert_macro_order(program, &[
        "USE_PORTAL_CLIPPING",
        "USE_ALPHA_TESTING",
        "USE_DEFORM_VERTEXES",
        "USE_PARALLAX_MAPPING",
    ]);
    assert!(program.required_attribs().contains(VertexAttribs::COLOR));
    assert!(program.unsupported_attribs().contains(VertexAttribs::BONE_INDEXES | VertexAttribs::POSITION2));
    assert!(program.uniform_index("u_LightWrapAround").is_some());

    let mock = mock.lock().unwrap();
    assert_eq!(mock.live_program_count(), 16);
    assert_eq!(sampler_uploads(&mock, program.variant_program(15).unwrap()), vec![0, 1, 2]);
}

#[test]
fn test_vertex_lighting_world_deform_needs_normals() {
    let (mock, gpu) = mock_gpu();
    let mut shader = VertexLightingDbsWorldShader::new(gpu, config());

    let parms = [1.0f32, 0.0, 0.5, 2.0];

    shader.enable_macro(shader.use_deform_vertexes);
    shader.bind_program();
    shader.set_uniform(shader.u_deform_parms, &parms[..]);
    shader.set_uniform(shader.u_time, &0.75);
    shader.set_vertex_attribs();

    assert_eq!(shader.program().current_variant_index(), 4);
    let attribs = mock.lock().unwrap().last_vertex_attribs().unwrap();
    assert!(attribs.contains(VertexAttribs::NORMAL));
    assert!(!attribs.intersects(VertexAttribs::BONE_INDEXES | VertexAttribs::BONE_WEIGHTS));
}

#[test]
fn test_dropping_families_releases_programs() {
    let (mock, gpu) = mock_gpu();
    let generic = GenericShader::new(gpu.clone(), config());
    let world = VertexLightingDbsWorldShader::new(gpu, config());
    assert_eq!(mock.lock().unwrap().live_program_count(), 80);

    drop(generic);
    assert_eq!(mock.lock().unwrap().live_program_count(), 16);
    drop(world);
    assert_eq!(mock.lock().unwrap().live_program_count(), 0);
}

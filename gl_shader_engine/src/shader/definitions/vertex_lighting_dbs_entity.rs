/// Vertex lighting (diffuse/bump/specular) for entity models
///
/// Lit by a single directional light sampled from the light grid plus an
/// ambient term. Supports skeletal skinning and keyframe animation.

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3, Vec4};
use crate::config::RendererConfig;
use crate::gpu::{GpuBinding, VertexAttribs};
use crate::shader::{
    AlphaTest, CompileMacro, MacroKind, ShaderFamily, ShaderProgram, ShaderProgramDesc,
    ShaderSources, Uniform,
};

pub struct VertexLightingDbsEntityShader {
    program: ShaderProgram,

    pub u_diffuse_texture_matrix: Uniform<Mat4>,
    pub u_normal_texture_matrix: Uniform<Mat4>,
    pub u_specular_texture_matrix: Uniform<Mat4>,
    pub u_alpha_test: Uniform<AlphaTest>,
    pub u_ambient_color: Uniform<Vec3>,
    pub u_view_origin: Uniform<Vec3>,
    pub u_light_dir: Uniform<Vec3>,
    pub u_light_color: Uniform<Vec3>,
    pub u_model_matrix: Uniform<Mat4>,
    pub u_model_view_projection_matrix: Uniform<Mat4>,
    pub u_bone_matrix: Uniform<[Mat4]>,
    pub u_vertex_interpolation: Uniform<f32>,
    pub u_portal_plane: Uniform<Vec4>,
    pub u_depth_scale: Uniform<f32>,

    pub use_portal_clipping: CompileMacro,
    pub use_alpha_testing: CompileMacro,
    pub use_vertex_skinning: CompileMacro,
    pub use_vertex_animation: CompileMacro,
    pub use_parallax_mapping: CompileMacro,
}

impl VertexLightingDbsEntityShader {
    pub const NAME: &'static str = "vertexLighting_DBS_entity";
    pub const NUM_COMPILE_MACROS: usize = 5;

    pub fn new(gpu: Arc<Mutex<dyn GpuBinding>>, config: Arc<RendererConfig>) -> Self {
        let required_attribs = VertexAttribs::POSITION | VertexAttribs::TEXCOORD | VertexAttribs::NORMAL;
        let optional_attribs = VertexAttribs::TANGENT | VertexAttribs::BINORMAL;
        // Models carry neither lightmap coordinates nor baked light directions
        let unsupported_attribs = VertexAttribs::LIGHTCOORD | VertexAttribs::LIGHTDIRECTION;

        let mut program = ShaderProgram::new(ShaderProgramDesc {
            name: Self::NAME.to_string(),
            num_compile_macros: Self::NUM_COMPILE_MACROS,
            required_attribs,
            optional_attribs,
            unsupported_attribs,
            gpu,
            config: config.clone(),
        });

        let u_diffuse_texture_matrix = program.register_uniform("u_DiffuseTextureMatrix");
        let u_normal_texture_matrix = program.register_uniform("u_NormalTextureMatrix");
        let u_specular_texture_matrix = program.register_uniform("u_SpecularTextureMatrix");
        let u_alpha_test = program.register_uniform("u_AlphaTest");
        let u_ambient_color = program.register_uniform("u_AmbientColor");
        let u_view_origin = program.register_uniform("u_ViewOrigin");
        let u_light_dir = program.register_uniform("u_LightDir");
        let u_light_color = program.register_uniform("u_LightColor");
        let u_model_matrix = program.register_uniform("u_ModelMatrix");
        let u_model_view_projection_matrix = program.register_uniform("u_ModelViewProjectionMatrix");
        let u_bone_matrix = program.register_uniform("u_BoneMatrix");
        let u_vertex_interpolation = program.register_uniform("u_VertexInterpolation");
        let u_portal_plane = program.register_uniform("u_PortalPlane");
        let u_depth_scale = program.register_uniform("u_DepthScale");

        let use_portal_clipping = program.register_compile_macro(MacroKind::PortalClipping);
        let use_alpha_testing = program.register_compile_macro(MacroKind::AlphaTesting);
        let use_vertex_skinning = program.register_compile_macro(MacroKind::VertexSkinning);
        let use_vertex_animation = program.register_compile_macro(MacroKind::VertexAnimation);
        let use_parallax_mapping = program.register_compile_macro(MacroKind::ParallaxMapping);

        program.compile_all_variants(&ShaderSources {
            vertex_main: config.vertex_source(Self::NAME),
            fragment_main: config.fragment_source(Self::NAME),
            vertex_libs: vec!["vertexSkinning".to_string(), "vertexAnimation".to_string()],
            fragment_libs: vec!["reliefMapping".to_string()],
            base_attribs: required_attribs | optional_attribs,
            optimize: config.optimize_shaders,
            sampler_units: vec![
                ("u_DiffuseMap", 0),
                ("u_NormalMap", 1),
                ("u_SpecularMap", 2),
            ],
        });

        Self {
            program,
            u_diffuse_texture_matrix,
            u_normal_texture_matrix,
            u_specular_texture_matrix,
            u_alpha_test,
            u_ambient_color,
            u_view_origin,
            u_light_dir,
            u_light_color,
            u_model_matrix,
            u_model_view_projection_matrix,
            u_bone_matrix,
            u_vertex_interpolation,
            u_portal_plane,
            u_depth_scale,
            use_portal_clipping,
            use_alpha_testing,
            use_vertex_skinning,
            use_vertex_animation,
            use_parallax_mapping,
        }
    }
}

impl ShaderFamily for VertexLightingDbsEntityShader {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn program_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }
}

/// Vertex lighting (diffuse/bump/specular) for world surfaces without lightmaps

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3, Vec4};
use crate::config::RendererConfig;
use crate::gpu::{GpuBinding, VertexAttribs};
use crate::shader::{
    AlphaTest, ColorModulate, CompileMacro, MacroKind, ShaderFamily, ShaderProgram,
    ShaderProgramDesc, ShaderSources, Uniform,
};

pub struct VertexLightingDbsWorldShader {
    program: ShaderProgram,

    pub u_diffuse_texture_matrix: Uniform<Mat4>,
    pub u_normal_texture_matrix: Uniform<Mat4>,
    pub u_specular_texture_matrix: Uniform<Mat4>,
    pub u_color_modulate: Uniform<ColorModulate>,
    pub u_color: Uniform<Vec4>,
    pub u_alpha_test: Uniform<AlphaTest>,
    pub u_view_origin: Uniform<Vec3>,
    pub u_model_matrix: Uniform<Mat4>,
    pub u_model_view_projection_matrix: Uniform<Mat4>,
    pub u_portal_plane: Uniform<Vec4>,
    pub u_depth_scale: Uniform<f32>,
    pub u_light_wrap_around: Uniform<f32>,
    pub u_deform_parms: Uniform<[f32]>,
    pub u_time: Uniform<f32>,

    pub use_portal_clipping: CompileMacro,
    pub use_alpha_testing: CompileMacro,
    pub use_deform_vertexes: CompileMacro,
    pub use_parallax_mapping: CompileMacro,
}

impl VertexLightingDbsWorldShader {
    pub const NAME: &'static str = "vertexLighting_DBS_world";
    pub const NUM_COMPILE_MACROS: usize = 4;

    pub fn new(gpu: Arc<Mutex<dyn GpuBinding>>, config: Arc<RendererConfig>) -> Self {
        let required_attribs = VertexAttribs::POSITION
            | VertexAttribs::TEXCOORD
            | VertexAttribs::NORMAL
            | VertexAttribs::COLOR;
        let optional_attribs = VertexAttribs::TANGENT | VertexAttribs::BINORMAL | VertexAttribs::LIGHTDIRECTION;
        // World geometry is never skinned or keyframe animated
        let unsupported_attribs = VertexAttribs::BONE_INDEXES
            | VertexAttribs::BONE_WEIGHTS
            | VertexAttribs::POSITION2
            | VertexAttribs::NORMAL2
            | VertexAttribs::TANGENT2
            | VertexAttribs::BINORMAL2;

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
        let u_color_modulate = program.register_uniform("u_ColorModulate");
        let u_color = program.register_uniform("u_Color");
        let u_alpha_test = program.register_uniform("u_AlphaTest");
        let u_view_origin = program.register_uniform("u_ViewOrigin");
        let u_model_matrix = program.register_uniform("u_ModelMatrix");
        let u_model_view_projection_matrix = program.register_uniform("u_ModelViewProjectionMatrix");
        let u_portal_plane = program.register_uniform("u_PortalPlane");
        let u_depth_scale = program.register_uniform("u_DepthScale");
        let u_light_wrap_around = program.register_uniform("u_LightWrapAround");
        let u_deform_parms = program.register_uniform("u_DeformParms");
        let u_time = program.register_uniform("u_Time");

        let use_portal_clipping = program.register_compile_macro(MacroKind::PortalClipping);
        let use_alpha_testing = program.register_compile_macro(MacroKind::AlphaTesting);
        let use_deform_vertexes = program.register_compile_macro(MacroKind::DeformVertexes);
        let use_parallax_mapping = program.register_compile_macro(MacroKind::ParallaxMapping);

        program.compile_all_variants(&ShaderSources {
            vertex_main: config.vertex_source(Self::NAME),
            fragment_main: config.fragment_source(Self::NAME),
            vertex_libs: vec!["deformVertexes".to_string()],
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
            u_color_modulate,
            u_color,
            u_alpha_test,
            u_view_origin,
            u_model_matrix,
            u_model_view_projection_matrix,
            u_portal_plane,
            u_depth_scale,
            u_light_wrap_around,
            u_deform_parms,
            u_time,
            use_portal_clipping,
            use_alpha_testing,
            use_deform_vertexes,
            use_parallax_mapping,
        }
    }
}

impl ShaderFamily for VertexLightingDbsWorldShader {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn program_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }
}

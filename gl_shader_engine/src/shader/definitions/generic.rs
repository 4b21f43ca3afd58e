/// Generic shader: unlit stages (sky, effects, 2D, fog-less entity stages)

use std::sync::{Arc, Mutex};
use glam::{Mat4, Vec3, Vec4};
use crate::config::RendererConfig;
use crate::gpu::{GpuBinding, VertexAttribs};
use crate::shader::{
    AlphaGen, AlphaTest, ColorGen, CompileMacro, MacroKind, ShaderFamily, ShaderProgram,
    ShaderProgramDesc, ShaderSources, Uniform,
};

pub struct GenericShader {
    program: ShaderProgram,

    pub u_color_texture_matrix: Uniform<Mat4>,
    pub u_view_origin: Uniform<Vec3>,
    pub u_alpha_test: Uniform<AlphaTest>,
    pub u_model_matrix: Uniform<Mat4>,
    pub u_model_view_projection_matrix: Uniform<Mat4>,
    pub u_color_gen: Uniform<ColorGen>,
    pub u_alpha_gen: Uniform<AlphaGen>,
    pub u_color: Uniform<Vec4>,
    pub u_bone_matrix: Uniform<[Mat4]>,
    pub u_vertex_interpolation: Uniform<f32>,
    pub u_portal_plane: Uniform<Vec4>,
    pub u_deform_parms: Uniform<[f32]>,
    pub u_time: Uniform<f32>,

    pub use_portal_clipping: CompileMacro,
    pub use_alpha_testing: CompileMacro,
    pub use_vertex_skinning: CompileMacro,
    pub use_vertex_animation: CompileMacro,
    pub use_deform_vertexes: CompileMacro,
    pub use_tcgen_environment: CompileMacro,
}

impl GenericShader {
    pub const NAME: &'static str = "generic";
    pub const NUM_COMPILE_MACROS: usize = 6;

    /// Register all slots and compile the 64 variants
    pub fn new(gpu: Arc<Mutex<dyn GpuBinding>>, config: Arc<RendererConfig>) -> Self {
        let required_attribs = VertexAttribs::POSITION | VertexAttribs::TEXCOORD | VertexAttribs::NORMAL;
        let optional_attribs = VertexAttribs::COLOR;

        let mut program = ShaderProgram::new(ShaderProgramDesc {
            name: Self::NAME.to_string(),
            num_compile_macros: Self::NUM_COMPILE_MACROS,
            required_attribs,
            optional_attribs,
            unsupported_attribs: VertexAttribs::empty(),
            gpu,
            config: config.clone(),
        });

        let u_color_texture_matrix = program.register_uniform("u_ColorTextureMatrix");
        let u_view_origin = program.register_uniform("u_ViewOrigin");
        let u_alpha_test = program.register_uniform("u_AlphaTest");
        let u_model_matrix = program.register_uniform("u_ModelMatrix");
        let u_model_view_projection_matrix = program.register_uniform("u_ModelViewProjectionMatrix");
        let u_color_gen = program.register_uniform("u_ColorGen");
        let u_alpha_gen = program.register_uniform("u_AlphaGen");
        let u_color = program.register_uniform("u_Color");
        let u_bone_matrix = program.register_uniform("u_BoneMatrix");
        let u_vertex_interpolation = program.register_uniform("u_VertexInterpolation");
        let u_portal_plane = program.register_uniform("u_PortalPlane");
        let u_deform_parms = program.register_uniform("u_DeformParms");
        let u_time = program.register_uniform("u_Time");

        let use_portal_clipping = program.register_compile_macro(MacroKind::PortalClipping);
        let use_alpha_testing = program.register_compile_macro(MacroKind::AlphaTesting);
        let use_vertex_skinning = program.register_compile_macro(MacroKind::VertexSkinning);
        let use_vertex_animation = program.register_compile_macro(MacroKind::VertexAnimation);
        let use_deform_vertexes = program.register_compile_macro(MacroKind::DeformVertexes);
        let use_tcgen_environment = program.register_compile_macro(MacroKind::TcGenEnvironment);

        program.compile_all_variants(&ShaderSources {
            vertex_main: config.vertex_source(Self::NAME),
            fragment_main: config.fragment_source(Self::NAME),
            vertex_libs: vec![
                "vertexSkinning".to_string(),
                "vertexAnimation".to_string(),
                "deformVertexes".to_string(),
            ],
            fragment_libs: vec![],
            base_attribs: required_attribs | optional_attribs,
            optimize: config.optimize_shaders,
            sampler_units: vec![("u_ColorMap", 0)],
        });

        Self {
            program,
            u_color_texture_matrix,
            u_view_origin,
            u_alpha_test,
            u_model_matrix,
            u_model_view_projection_matrix,
            u_color_gen,
            u_alpha_gen,
            u_color,
            u_bone_matrix,
            u_vertex_interpolation,
            u_portal_plane,
            u_deform_parms,
            u_time,
            use_portal_clipping,
            use_alpha_testing,
            use_vertex_skinning,
            use_vertex_animation,
            use_deform_vertexes,
            use_tcgen_environment,
        }
    }
}

impl ShaderFamily for GenericShader {
    fn program(&self) -> &ShaderProgram {
        &self.program
    }

    fn program_mut(&mut self) -> &mut ShaderProgram {
        &mut self.program
    }
}

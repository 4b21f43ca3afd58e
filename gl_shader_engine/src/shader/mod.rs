//! Shader module
//!
//! Compile-macro permutations, typed uniform slots, the four shader families
//! and the registry that owns them.

pub mod shader_program;
pub mod uniform;
pub mod compile_macro;
pub mod attrib_effects;
pub mod definitions;
mod shader_registry;

pub use shader_program::{
    ShaderProgram, ShaderProgramDesc, ShaderProgramStats, ShaderSources,
    ProgramId, MAX_COMPILE_MACROS,
};
pub use uniform::{
    Uniform, UniformValue,
    AlphaTest, ColorGen, AlphaGen, ColorModulate,
};
pub use compile_macro::{CompileMacro, MacroKind};
pub use definitions::{
    ShaderFamily,
    GenericShader, LightMappingShader,
    VertexLightingDbsEntityShader, VertexLightingDbsWorldShader,
};
pub use shader_registry::ShaderRegistry;

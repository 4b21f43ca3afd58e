//! Concrete shader families
//!
//! Each family composes one `ShaderProgram` with named uniform and compile
//! macro slots. Registration order inside each constructor fixes the macro
//! bits, so it must not be reshuffled.

mod generic;
mod light_mapping;
mod vertex_lighting_dbs_entity;
mod vertex_lighting_dbs_world;

pub use generic::GenericShader;
pub use light_mapping::LightMappingShader;
pub use vertex_lighting_dbs_entity::VertexLightingDbsEntityShader;
pub use vertex_lighting_dbs_world::VertexLightingDbsWorldShader;

use crate::shader::{CompileMacro, ShaderProgram, Uniform, UniformValue};

/// Shared draw-time API of every shader family
///
/// Typical draw sequence:
///
/// ```ignore
/// shader.set_macro(shader.use_vertex_skinning, skinned);
/// shader.bind_program();
/// shader.set_uniform(shader.u_model_view_projection_matrix, &mvp);
/// shader.set_vertex_attribs();
/// // draw
/// ```
pub trait ShaderFamily {
    fn program(&self) -> &ShaderProgram;

    fn program_mut(&mut self) -> &mut ShaderProgram;

    fn name(&self) -> &str {
        self.program().name()
    }

    fn set_uniform<T: UniformValue + ?Sized>(&mut self, slot: Uniform<T>, value: &T)
    where
        Self: Sized,
    {
        self.program_mut().set_uniform(slot, value);
    }

    fn enable_macro(&mut self, slot: CompileMacro) {
        self.program_mut().enable_macro(slot);
    }

    fn disable_macro(&mut self, slot: CompileMacro) {
        self.program_mut().disable_macro(slot);
    }

    fn set_macro(&mut self, slot: CompileMacro, enabled: bool) {
        self.program_mut().set_macro(slot, enabled);
    }

    fn bind_program(&mut self) {
        self.program_mut().bind_program();
    }

    fn unbind_program(&mut self) {
        self.program_mut().unbind_program();
    }

    fn set_vertex_attribs(&mut self) {
        self.program_mut().set_vertex_attribs();
    }
}

#[cfg(test)]
#[path = "definitions_tests.rs"]
mod tests;

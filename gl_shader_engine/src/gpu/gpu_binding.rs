/// GpuBinding trait - the driver calls the shader core depends on

use glam::{Mat4, Vec3, Vec4};
use crate::error::Result;
use crate::gpu::{ProgramDesc, ProgramHandle, UniformLocation, VertexAttribs};

/// Driver boundary consumed by the shader core
///
/// Implemented by the GL backend that owns the context. All calls happen on the
/// thread that owns that context; `Send` lets the binding move to it.
///
/// Uniform uploads name the program and location they target. A GL backend
/// writes to the currently bound program, so callers must bind the variant
/// first (see `ShaderProgram::bind_program`).
pub trait GpuBinding: Send {
    /// Compile both stages with the given macros and link them
    ///
    /// # Errors
    ///
    /// `SourceNotFound`, `CompileFailed` or `LinkFailed` describing the failure.
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle>;

    /// Release a linked program
    fn delete_program(&mut self, program: ProgramHandle);

    /// Look up a uniform by its GLSL identifier
    ///
    /// Returns `UniformLocation::INVALID` if the compiler stripped it.
    fn resolve_uniform_location(&mut self, program: ProgramHandle, name: &str) -> UniformLocation;

    /// Make `program` the active program
    fn bind_program(&mut self, program: ProgramHandle);

    /// Clear the active program
    fn unbind_program(&mut self);

    /// The active program, if any
    ///
    /// Lets uniform validation catch a bind made by another shader family.
    fn bound_program(&self) -> Option<ProgramHandle>;

    /// Upload a float uniform
    fn upload_uniform_float(&mut self, program: ProgramHandle, location: UniformLocation, value: f32);

    /// Upload a vec3 uniform
    fn upload_uniform_vec3(&mut self, program: ProgramHandle, location: UniformLocation, value: Vec3);

    /// Upload a vec4 uniform
    fn upload_uniform_vec4(&mut self, program: ProgramHandle, location: UniformLocation, value: Vec4);

    /// Upload a column-major mat4 uniform
    fn upload_uniform_matrix4(&mut self, program: ProgramHandle, location: UniformLocation, value: Mat4);

    /// Upload an int uniform (also used for samplers and small enums)
    fn upload_uniform_int(&mut self, program: ProgramHandle, location: UniformLocation, value: i32);

    /// Upload an array of column-major mat4, 16 floats per matrix
    fn upload_uniform_matrix4_array(&mut self, program: ProgramHandle, location: UniformLocation, values: &[f32]);

    /// Upload a float array
    fn upload_uniform_float_array(&mut self, program: ProgramHandle, location: UniformLocation, values: &[f32]);

    /// Enable exactly these vertex attribute streams for the next draw
    fn set_vertex_attrib_state(&mut self, attribs: VertexAttribs);

    /// Drain pending driver errors
    ///
    /// Diagnostics only: the shader core logs them and carries on.
    fn check_for_driver_errors(&mut self) -> Vec<String>;
}

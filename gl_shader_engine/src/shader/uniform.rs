/// Typed uniform slots and the values they upload
///
/// A `Uniform<T>` is a copyable handle returned by `ShaderProgram::register_uniform`.
/// It knows its owner only by `ProgramId` and its registration index; the resolved
/// location lives in each compiled variant. Writes always target the owner's
/// *current* variant, so select and bind the intended variant first.

use std::fmt;
use std::marker::PhantomData;
use glam::{Mat4, Vec3, Vec4};
use crate::gpu::{AttribDelta, GpuBinding, ProgramHandle, UniformLocation};
use crate::shader::attrib_effects;
use crate::shader::ProgramId;

// ===== UNIFORM VALUE =====

/// A value that can be written to a uniform location
pub trait UniformValue {
    /// Upload this value through the GPU binding
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation);

    /// Vertex attribute change implied by this value, if any
    fn attrib_delta(&self) -> Option<AttribDelta> {
        None
    }
}

impl UniformValue for f32 {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_float(program, location, *self);
    }
}

impl UniformValue for i32 {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_int(program, location, *self);
    }
}

impl UniformValue for Vec3 {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_vec3(program, location, *self);
    }
}

impl UniformValue for Vec4 {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_vec4(program, location, *self);
    }
}

impl UniformValue for Mat4 {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_matrix4(program, location, *self);
    }
}

impl UniformValue for [f32] {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_float_array(program, location, self);
    }
}

/// Bone palette: uploaded as consecutive column-major matrices
impl UniformValue for [Mat4] {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_matrix4_array(program, location, bytemuck::cast_slice(self));
    }
}

// ===== ENUM-VALUED UNIFORMS =====

/// Alpha test function, uploaded as int
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AlphaTest {
    None = 0,
    Gt0 = 1,
    Lt128 = 2,
    Ge128 = 3,
}

/// How a stage generates its RGB color, uploaded as int
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ColorGen {
    Bad = 0,
    IdentityLighting,
    Identity,
    Entity,
    OneMinusEntity,
    Vertex,
    OneMinusVertex,
    Waveform,
    LightingDiffuse,
    Fog,
    Const,
    CustomRgb,
    CustomRgbs,
}

/// How a stage generates its alpha, uploaded as int
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum AlphaGen {
    Identity = 0,
    Entity,
    OneMinusEntity,
    Vertex,
    OneMinusVertex,
    LightingSpecular,
    Waveform,
    Portal,
    Const,
    Custom,
}

impl UniformValue for AlphaTest {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_int(program, location, *self as i32);
    }
}

impl UniformValue for ColorGen {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_int(program, location, *self as i32);
    }

    fn attrib_delta(&self) -> Option<AttribDelta> {
        Some(attrib_effects::color_gen_attrib_delta(*self))
    }
}

impl UniformValue for AlphaGen {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_int(program, location, *self as i32);
    }

    fn attrib_delta(&self) -> Option<AttribDelta> {
        Some(attrib_effects::alpha_gen_attrib_delta(*self))
    }
}

/// Per-vertex color modulation derived from a stage's color and alpha generators
///
/// Uploaded as vec4: each RGB component is 1 for `Vertex`, -1 for `OneMinusVertex`
/// and 0 otherwise; alpha follows the same rule for the alpha generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorModulate {
    pub color_gen: ColorGen,
    pub alpha_gen: AlphaGen,
}

impl ColorModulate {
    pub fn new(color_gen: ColorGen, alpha_gen: AlphaGen) -> Self {
        Self { color_gen, alpha_gen }
    }

    /// The vec4 written to the shader
    pub fn to_vec4(&self) -> Vec4 {
        let rgb = match self.color_gen {
            ColorGen::Vertex => 1.0,
            ColorGen::OneMinusVertex => -1.0,
            _ => 0.0,
        };
        let alpha = match self.alpha_gen {
            AlphaGen::Vertex => 1.0,
            AlphaGen::OneMinusVertex => -1.0,
            _ => 0.0,
        };
        Vec4::new(rgb, rgb, rgb, alpha)
    }
}

impl UniformValue for ColorModulate {
    fn upload(&self, gpu: &mut dyn GpuBinding, program: ProgramHandle, location: UniformLocation) {
        gpu.upload_uniform_vec4(program, location, self.to_vec4());
    }

    fn attrib_delta(&self) -> Option<AttribDelta> {
        Some(attrib_effects::color_modulate_attrib_delta(self.color_gen, self.alpha_gen))
    }
}

// ===== UNIFORM SLOT =====

/// Handle to one registered uniform of one shader program
pub struct Uniform<T: ?Sized> {
    program: ProgramId,
    index: usize,
    _value: PhantomData<fn(&T)>,
}

impl<T: ?Sized> Uniform<T> {
    pub(crate) fn new(program: ProgramId, index: usize) -> Self {
        Self {
            program,
            index,
            _value: PhantomData,
        }
    }

    /// Registration index inside the owning program
    pub fn index(&self) -> usize {
        self.index
    }

    /// Program this slot was registered with
    pub fn program_id(&self) -> ProgramId {
        self.program
    }
}

impl<T: ?Sized> Clone for Uniform<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Uniform<T> {}

impl<T: ?Sized> fmt::Debug for Uniform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uniform")
            .field("program", &self.program)
            .field("index", &self.index)
            .finish()
    }
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;

/// Mock GpuBinding for unit tests (no GL context required)
///
/// Records every call, hands out sequential program handles and per-program
/// uniform locations, and can simulate compile failures and optimized-out uniforms.

#[cfg(test)]
use glam::{Mat4, Vec3, Vec4};
#[cfg(test)]
use rustc_hash::FxHashMap;
#[cfg(test)]
use crate::error::{Error, Result};
#[cfg(test)]
use crate::gpu::{GpuBinding, ProgramDesc, ProgramHandle, UniformLocation, VertexAttribs};

// ============================================================================
// Recorded calls
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum UploadedValue {
    Float(f32),
    Vec3(Vec3),
    Vec4(Vec4),
    Matrix4(Mat4),
    Int(i32),
    Matrix4Array(Vec<f32>),
    FloatArray(Vec<f32>),
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    Compile(ProgramHandle),
    Delete(ProgramHandle),
    Bind(ProgramHandle),
    Unbind,
    Upload {
        program: ProgramHandle,
        location: UniformLocation,
        value: UploadedValue,
    },
    SetVertexAttribs(VertexAttribs),
}

// ============================================================================
// Mock program
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockProgram {
    pub desc: ProgramDesc,
    pub locations: FxHashMap<String, UniformLocation>,
    pub deleted: bool,
}

// ============================================================================
// Mock GpuBinding
// ============================================================================

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockGpuBinding {
    /// Program `ProgramHandle(n)` lives at index `n - 1`
    pub programs: Vec<MockProgram>,
    pub calls: Vec<GpuCall>,
    pub bound: Option<ProgramHandle>,
    /// Compile fails for any variant defining this macro
    pub fail_when_defined: Option<String>,
    /// (uniform, macro): the uniform is stripped from variants lacking the macro
    pub strip_unless_defined: Vec<(String, String)>,
    /// Returned (and cleared) by the next `check_for_driver_errors`
    pub pending_driver_errors: Vec<String>,
}

#[cfg(test)]
impl MockGpuBinding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(&self, handle: ProgramHandle) -> &MockProgram {
        &self.programs[(handle.0 - 1) as usize]
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.iter().filter(|p| !p.deleted).count()
    }

    pub fn compiled_macros(&self) -> Vec<String> {
        self.programs.iter().map(|p| p.desc.macros.clone()).collect()
    }

    pub fn uploads(&self) -> Vec<(ProgramHandle, UniformLocation, UploadedValue)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                GpuCall::Upload { program, location, value } => Some((*program, *location, value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn bind_count(&self) -> usize {
        self.calls.iter().filter(|c| matches!(c, GpuCall::Bind(_))).count()
    }

    pub fn last_vertex_attribs(&self) -> Option<VertexAttribs> {
        self.calls.iter().rev().find_map(|call| match call {
            GpuCall::SetVertexAttribs(attribs) => Some(*attribs),
            _ => None,
        })
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn upload(&mut self, program: ProgramHandle, location: UniformLocation, value: UploadedValue) {
        self.calls.push(GpuCall::Upload { program, location, value });
    }
}

#[cfg(test)]
impl GpuBinding for MockGpuBinding {
    fn compile_program(&mut self, desc: &ProgramDesc) -> Result<ProgramHandle> {
        if let Some(bad) = &self.fail_when_defined {
            if desc.defines(bad) {
                return Err(Error::CompileFailed(format!("0:1: '{}' path does not compile", bad)));
            }
        }

        self.programs.push(MockProgram {
            desc: desc.clone(),
            locations: FxHashMap::default(),
            deleted: false,
        });
        let handle = ProgramHandle(self.programs.len() as u32);
        self.calls.push(GpuCall::Compile(handle));
        Ok(handle)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs[(program.0 - 1) as usize].deleted = true;
        if self.bound == Some(program) {
            self.bound = None;
        }
        self.calls.push(GpuCall::Delete(program));
    }

    fn resolve_uniform_location(&mut self, program: ProgramHandle, name: &str) -> UniformLocation {
        let stripped = {
            let desc = &self.program(program).desc;
            self.strip_unless_defined
                .iter()
                .any(|(uniform, macro_name)| uniform == name && !desc.defines(macro_name))
        };
        if stripped {
            return UniformLocation::INVALID;
        }

        let entry = &mut self.programs[(program.0 - 1) as usize];
        let next = entry.locations.len() as i32;
        *entry.locations.entry(name.to_string()).or_insert(UniformLocation(next))
    }

    fn bind_program(&mut self, program: ProgramHandle) {
        self.bound = Some(program);
        self.calls.push(GpuCall::Bind(program));
    }

    fn unbind_program(&mut self) {
        self.bound = None;
        self.calls.push(GpuCall::Unbind);
    }

    fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound
    }

    fn upload_uniform_float(&mut self, program: ProgramHandle, location: UniformLocation, value: f32) {
        self.upload(program, location, UploadedValue::Float(value));
    }

    fn upload_uniform_vec3(&mut self, program: ProgramHandle, location: UniformLocation, value: Vec3) {
        self.upload(program, location, UploadedValue::Vec3(value));
    }

    fn upload_uniform_vec4(&mut self, program: ProgramHandle, location: UniformLocation, value: Vec4) {
        self.upload(program, location, UploadedValue::Vec4(value));
    }

    fn upload_uniform_matrix4(&mut self, program: ProgramHandle, location: UniformLocation, value: Mat4) {
        self.upload(program, location, UploadedValue::Matrix4(value));
    }

    fn upload_uniform_int(&mut self, program: ProgramHandle, location: UniformLocation, value: i32) {
        self.upload(program, location, UploadedValue::Int(value));
    }

    fn upload_uniform_matrix4_array(&mut self, program: ProgramHandle, location: UniformLocation, values: &[f32]) {
        self.upload(program, location, UploadedValue::Matrix4Array(values.to_vec()));
    }

    fn upload_uniform_float_array(&mut self, program: ProgramHandle, location: UniformLocation, values: &[f32]) {
        self.upload(program, location, UploadedValue::FloatArray(values.to_vec()));
    }

    fn set_vertex_attrib_state(&mut self, attribs: VertexAttribs) {
        self.calls.push(GpuCall::SetVertexAttribs(attribs));
    }

    fn check_for_driver_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending_driver_errors)
    }
}

#[cfg(test)]
#[path = "mock_gpu_binding_tests.rs"]
mod tests;

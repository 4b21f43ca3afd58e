/// GPU binding module - the boundary between the shader core and the driver

// Module declarations
pub mod gpu_binding;
pub mod program;
pub mod vertex_attribs;

// Re-export everything from gpu_binding.rs
pub use gpu_binding::*;

// Re-export from other modules
pub use program::*;
pub use vertex_attribs::*;

// Mock GPU binding for tests (no GL context required)
#[cfg(test)]
pub mod mock_gpu_binding;

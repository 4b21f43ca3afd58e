/*!
# GL Shader Engine

Shader permutation and uniform binding core for an OpenGL renderer.

Each shader family declares up to nine compile macros and compiles every
combination up front. At draw time the renderer toggles macros, which
selects the matching precompiled program, binds it and writes typed
uniforms into it. The driver itself sits behind the `GpuBinding` trait.

## Architecture

- **ShaderProgram**: variant table, active macro mask, vertex attribute mask
- **Uniform**: typed handle to a named uniform, resolved per variant
- **CompileMacro**: handle to one macro bit of one program
- **ShaderFamily**: the four concrete shaders (generic, light mapping,
  vertex lighting for entities and for world surfaces)
- **ShaderRegistry**: owns one lock-guarded instance of each family
- **GpuBinding**: compile, resolve, bind and upload through the driver
*/

// Internal modules
mod error;
mod engine;
mod config;
pub mod log;
pub mod gpu;
pub mod shader;

// Main glshader namespace module
pub mod glshader {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton (logging)
    pub use crate::engine::Engine;

    // Renderer configuration
    pub use crate::config::RendererConfig;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // GPU binding boundary
    pub mod gpu {
        pub use crate::gpu::*;
    }

    // Shader programs, slots, families and registry
    pub mod shader {
        pub use crate::shader::*;
    }
}

// Re-export math library at crate root
pub use glam;

/// Renderer configuration consumed by the shader subsystem

use std::sync::atomic::{AtomicBool, Ordering};

/// Renderer configuration
///
/// Static fields are fixed at registry construction. `normal_mapping` is a live
/// console variable: compile macros that depend on it read it at toggle time.
#[derive(Debug)]
pub struct RendererConfig {
    /// Directory prefix for GLSL sources (`<shader_path><name>_vp.glsl`)
    pub shader_path: String,
    /// Ask the driver to optimize linked programs
    pub optimize_shaders: bool,
    /// Fail fast when a uniform is written while the current variant is not bound
    pub validate_uniform_binding: bool,
    /// Poll the driver for errors after each compile and sampler setup
    pub check_driver_errors: bool,
    normal_mapping: AtomicBool,
}

impl RendererConfig {
    /// Whether normal mapping is currently enabled
    pub fn normal_mapping(&self) -> bool {
        self.normal_mapping.load(Ordering::Relaxed)
    }

    /// Toggle normal mapping at runtime
    pub fn set_normal_mapping(&self, enabled: bool) {
        self.normal_mapping.store(enabled, Ordering::Relaxed);
    }

    /// Builder-style variant of `set_normal_mapping` for construction
    pub fn with_normal_mapping(self, enabled: bool) -> Self {
        self.set_normal_mapping(enabled);
        self
    }

    /// Vertex program file name for a shader family
    pub fn vertex_source(&self, name: &str) -> String {
        format!("{}{}_vp.glsl", self.shader_path, name)
    }

    /// Fragment program file name for a shader family
    pub fn fragment_source(&self, name: &str) -> String {
        format!("{}{}_fp.glsl", self.shader_path, name)
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            shader_path: "glsl/".to_string(),
            optimize_shaders: true,
            validate_uniform_binding: cfg!(debug_assertions),
            check_driver_errors: cfg!(debug_assertions),
            normal_mapping: AtomicBool::new(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.shader_path, "glsl/");
        assert!(config.optimize_shaders);
        assert!(config.normal_mapping());
        assert_eq!(config.validate_uniform_binding, cfg!(debug_assertions));
    }

    #[test]
    fn test_normal_mapping_is_live() {
        let config = RendererConfig::default().with_normal_mapping(false);
        assert!(!config.normal_mapping());
        config.set_normal_mapping(true);
        assert!(config.normal_mapping());
    }

    #[test]
    fn test_source_file_names() {
        let config = RendererConfig {
            shader_path: "shaders/".to_string(),
            ..RendererConfig::default()
        };
        assert_eq!(config.vertex_source("generic"), "shaders/generic_vp.glsl");
        assert_eq!(config.fragment_source("lightMapping"), "shaders/lightMapping_fp.glsl");
    }
}

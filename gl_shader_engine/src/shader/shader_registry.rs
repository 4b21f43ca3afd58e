/// Registry owning one instance of every shader family
///
/// Built once the GPU context exists, before the first frame. Each family sits
/// behind its own lock: a draw takes the guard, toggles macros, binds, writes
/// uniforms, sets attributes and draws, then releases it. Holding the guard
/// across that sequence keeps another thread from re-selecting the variant
/// between bind and uniform writes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use crate::config::RendererConfig;
use crate::gpu::GpuBinding;
use crate::shader::{
    GenericShader, LightMappingShader, ShaderFamily, VertexLightingDbsEntityShader,
    VertexLightingDbsWorldShader,
};
use crate::{engine_fatal, engine_info};

const SOURCE: &str = "glshader::ShaderRegistry";

pub struct ShaderRegistry {
    config: Arc<RendererConfig>,
    generic: Mutex<GenericShader>,
    light_mapping: Mutex<LightMappingShader>,
    vertex_lighting_dbs_entity: Mutex<VertexLightingDbsEntityShader>,
    vertex_lighting_dbs_world: Mutex<VertexLightingDbsWorldShader>,
}

fn lock_family<'a, S>(family: &'a Mutex<S>, name: &str) -> MutexGuard<'a, S> {
    match family.lock() {
        Ok(guard) => guard,
        Err(_) => engine_fatal!(SOURCE, "shader '{}': lock poisoned by a panicking draw", name),
    }
}

impl ShaderRegistry {
    /// Compile every shader family
    ///
    /// Blocking: runs every variant compile of every family. Any compile
    /// failure is fatal.
    pub fn new(gpu: Arc<Mutex<dyn GpuBinding>>, config: Arc<RendererConfig>) -> Self {
        let start = Instant::now();
        engine_info!(SOURCE, "Compiling shader families from '{}'", config.shader_path);

        let generic = GenericShader::new(gpu.clone(), config.clone());
        let light_mapping = LightMappingShader::new(gpu.clone(), config.clone());
        let vertex_lighting_dbs_entity = VertexLightingDbsEntityShader::new(gpu.clone(), config.clone());
        let vertex_lighting_dbs_world = VertexLightingDbsWorldShader::new(gpu, config.clone());

        let registry = Self {
            config,
            generic: Mutex::new(generic),
            light_mapping: Mutex::new(light_mapping),
            vertex_lighting_dbs_entity: Mutex::new(vertex_lighting_dbs_entity),
            vertex_lighting_dbs_world: Mutex::new(vertex_lighting_dbs_world),
        };

        engine_info!(SOURCE, "Shader registry ready: {} variants in {:.1} ms",
            registry.total_variant_count(), start.elapsed().as_secs_f64() * 1000.0);
        registry
    }

    pub fn generic(&self) -> MutexGuard<'_, GenericShader> {
        lock_family(&self.generic, GenericShader::NAME)
    }

    pub fn light_mapping(&self) -> MutexGuard<'_, LightMappingShader> {
        lock_family(&self.light_mapping, LightMappingShader::NAME)
    }

    pub fn vertex_lighting_dbs_entity(&self) -> MutexGuard<'_, VertexLightingDbsEntityShader> {
        lock_family(&self.vertex_lighting_dbs_entity, VertexLightingDbsEntityShader::NAME)
    }

    pub fn vertex_lighting_dbs_world(&self) -> MutexGuard<'_, VertexLightingDbsWorldShader> {
        lock_family(&self.vertex_lighting_dbs_world, VertexLightingDbsWorldShader::NAME)
    }

    pub fn config(&self) -> &Arc<RendererConfig> {
        &self.config
    }

    /// Family names, in construction order
    pub fn family_names(&self) -> [&'static str; 4] {
        [
            GenericShader::NAME,
            LightMappingShader::NAME,
            VertexLightingDbsEntityShader::NAME,
            VertexLightingDbsWorldShader::NAME,
        ]
    }

    /// Compiled variants across all families
    pub fn total_variant_count(&self) -> usize {
        self.generic().program().variant_count()
            + self.light_mapping().program().variant_count()
            + self.vertex_lighting_dbs_entity().program().variant_count()
            + self.vertex_lighting_dbs_world().program().variant_count()
    }

    /// Concatenated `debug_dump` of every family
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.generic().program().debug_dump());
        out.push_str(&self.light_mapping().program().debug_dump());
        out.push_str(&self.vertex_lighting_dbs_entity().program().debug_dump());
        out.push_str(&self.vertex_lighting_dbs_world().program().debug_dump());
        out
    }
}

#[cfg(test)]
#[path = "shader_registry_tests.rs"]
mod tests;

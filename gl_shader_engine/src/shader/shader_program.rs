/// Shader program core: compile macros, program variants and uniform dispatch.
///
/// A ShaderProgram owns one dense table of linked GPU programs, one per
/// combination of its compile macros. Macro `i` is assigned bit `1 << i` at
/// registration, so the active macro mask is directly the variant index:
///
/// ```text
/// macros:   USE_A (1)  USE_B (2)  USE_C (4)
/// variant 5 = 0b101  ->  compiled with "USE_A USE_C "
/// ```
///
/// All variants are compiled once by `compile_all_variants`. At draw time
/// callers toggle macros (which re-selects the current variant), bind, write
/// uniforms, set vertex attributes and draw, in that order. Uniform writes go
/// to whichever variant is current; writing before binding the intended
/// variant silently lands on the wrong program unless
/// `RendererConfig::validate_uniform_binding` is on.
///
/// Every failure here is a configuration error and is fatal (`engine_fatal!`).

use std::fmt::Write as _;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use rustc_hash::FxHashMap;
use crate::config::RendererConfig;
use crate::gpu::{GpuBinding, ProgramDesc, ProgramHandle, UniformLocation, VertexAttribs};
use crate::shader::attrib_effects;
use crate::shader::{CompileMacro, MacroKind, Uniform, UniformValue};
use crate::{engine_debug, engine_fatal, engine_info, engine_trace, engine_warn};

const SOURCE: &str = "glshader::ShaderProgram";

/// Most compile macros a single program may declare (512 variants)
pub const MAX_COMPILE_MACROS: usize = 9;

static NEXT_PROGRAM_ID: AtomicU32 = AtomicU32::new(1);

// ===== IDS AND STATS =====

/// Process-unique identity of a ShaderProgram, carried by its slot handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(u32);

impl ProgramId {
    fn next() -> Self {
        ProgramId(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Counters for one shader program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShaderProgramStats {
    /// Variant re-selections (one per effective macro toggle)
    pub selections: u32,
    /// Program binds issued
    pub binds: u32,
    /// Uniform uploads that reached the driver
    pub uniform_uploads: u32,
    /// Uniform writes dropped because the current variant has no such uniform
    pub skipped_uploads: u32,
}

// ===== DESCRIPTORS =====

/// ShaderProgram creation descriptor
pub struct ShaderProgramDesc {
    /// Shader family name, used in diagnostics
    pub name: String,
    /// Number of compile macros that will be registered
    pub num_compile_macros: usize,
    /// Streams every draw with this family needs
    pub required_attribs: VertexAttribs,
    /// Streams the programs bind but draws only use when a feature asks for them
    pub optional_attribs: VertexAttribs,
    /// Streams never enabled for this family, whatever features ask for
    pub unsupported_attribs: VertexAttribs,
    pub gpu: Arc<Mutex<dyn GpuBinding>>,
    pub config: Arc<RendererConfig>,
}

/// Source files and one-time setup for `compile_all_variants`
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex_main: String,
    pub fragment_main: String,
    pub vertex_libs: Vec<String>,
    pub fragment_libs: Vec<String>,
    /// Attribute streams each variant binds locations for
    pub base_attribs: VertexAttribs,
    pub optimize: bool,
    /// Sampler uniforms set once per variant right after linking
    pub sampler_units: Vec<(&'static str, i32)>,
}

// ===== INTERNAL ENTRIES =====

struct UniformEntry {
    name: String,
}

struct MacroEntry {
    kind: MacroKind,
    bit: u32,
}

/// One linked program and the uniform locations resolved against it
struct ProgramVariant {
    handle: ProgramHandle,
    macros: String,
    /// Indexed like `ShaderProgram::uniforms`
    uniform_locations: Vec<UniformLocation>,
}

// ===== SHADER PROGRAM =====

/// Permutation state machine for one shader family
pub struct ShaderProgram {
    id: ProgramId,
    name: String,
    gpu: Arc<Mutex<dyn GpuBinding>>,
    config: Arc<RendererConfig>,
    num_compile_macros: usize,
    required_attribs: VertexAttribs,
    optional_attribs: VertexAttribs,
    unsupported_attribs: VertexAttribs,
    active_macros: u32,
    vertex_attribs: VertexAttribs,
    /// Empty until compiled, then exactly `1 << num_compile_macros` entries
    variants: Vec<ProgramVariant>,
    current_variant: usize,
    bound_variant: Option<usize>,
    uniforms: Vec<UniformEntry>,
    uniform_names: FxHashMap<String, usize>,
    macros: Vec<MacroEntry>,
    stats: ShaderProgramStats,
}

impl ShaderProgram {
    /// Create a program with room for `2^num_compile_macros` variants
    ///
    /// # Panics
    ///
    /// If `num_compile_macros` exceeds `MAX_COMPILE_MACROS`.
    pub fn new(desc: ShaderProgramDesc) -> Self {
        if desc.num_compile_macros > MAX_COMPILE_MACROS {
            engine_fatal!(SOURCE,
                "shader '{}' declares {} compile macros, at most {} are supported",
                desc.name, desc.num_compile_macros, MAX_COMPILE_MACROS);
        }

        Self {
            id: ProgramId::next(),
            name: desc.name,
            gpu: desc.gpu,
            config: desc.config,
            num_compile_macros: desc.num_compile_macros,
            required_attribs: desc.required_attribs,
            optional_attribs: desc.optional_attribs,
            unsupported_attribs: desc.unsupported_attribs,
            active_macros: 0,
            vertex_attribs: VertexAttribs::empty(),
            variants: Vec::new(),
            current_variant: 0,
            bound_variant: None,
            uniforms: Vec::new(),
            uniform_names: FxHashMap::default(),
            macros: Vec::new(),
            stats: ShaderProgramStats::default(),
        }
    }

    fn gpu(&self) -> MutexGuard<'_, dyn GpuBinding + 'static> {
        match self.gpu.lock() {
            Ok(guard) => guard,
            Err(_) => engine_fatal!(SOURCE, "shader '{}': GPU binding lock poisoned", self.name),
        }
    }

    fn check_owner(&self, owner: ProgramId, what: &str) {
        if owner != self.id {
            engine_fatal!(SOURCE,
                "shader '{}': {} slot belongs to another shader program", self.name, what);
        }
    }

    fn check_not_compiled(&self, what: &str) {
        if !self.variants.is_empty() {
            engine_fatal!(SOURCE,
                "shader '{}': cannot register {} after variants were compiled", self.name, what);
        }
    }

    // ===== REGISTRATION =====

    /// Register a uniform by its GLSL identifier
    ///
    /// Locations are resolved per variant by `compile_all_variants`.
    pub fn register_uniform<T: UniformValue + ?Sized>(&mut self, name: &str) -> Uniform<T> {
        self.check_not_compiled(&format!("uniform '{}'", name));
        if self.uniform_names.contains_key(name) {
            engine_fatal!(SOURCE, "shader '{}': uniform '{}' registered twice", self.name, name);
        }

        let index = self.uniforms.len();
        self.uniforms.push(UniformEntry { name: name.to_string() });
        self.uniform_names.insert(name.to_string(), index);
        Uniform::new(self.id, index)
    }

    /// Register a compile macro; the n-th registration gets bit `1 << n`
    ///
    /// # Panics
    ///
    /// When a 10th macro is registered, when more macros are registered than
    /// declared, or after `compile_all_variants`.
    pub fn register_compile_macro(&mut self, kind: MacroKind) -> CompileMacro {
        if self.macros.len() >= MAX_COMPILE_MACROS {
            engine_fatal!(SOURCE,
                "shader '{}': cannot register '{}', at most {} compile macros are supported",
                self.name, kind.name(), MAX_COMPILE_MACROS);
        }
        if self.macros.len() >= self.num_compile_macros {
            engine_fatal!(SOURCE,
                "shader '{}': cannot register '{}', only {} compile macros were declared",
                self.name, kind.name(), self.num_compile_macros);
        }
        self.check_not_compiled(&format!("compile macro '{}'", kind.name()));

        let slot = CompileMacro::new(self.id, self.macros.len());
        self.macros.push(MacroEntry { kind, bit: slot.bit() });
        slot
    }

    // ===== COMPILATION =====

    /// Macro definition string for variant `index`
    ///
    /// Names of the macros whose bit is set, in registration order, each
    /// followed by one space.
    pub fn macro_string(&self, index: usize) -> String {
        let mut macros = String::new();
        for entry in &self.macros {
            if index & entry.bit as usize != 0 {
                macros.push_str(entry.kind.name());
                macros.push(' ');
            }
        }
        macros
    }

    /// Compile and link every variant, resolve uniform locations and set samplers
    ///
    /// Runs `2^k` full compiles. Calling it again first deletes the old programs.
    ///
    /// # Panics
    ///
    /// If the registered macro count differs from the declared one, or if any
    /// variant fails to compile or link. The message names the shader and the
    /// failing macro combination.
    pub fn compile_all_variants(&mut self, sources: &ShaderSources) {
        if self.macros.len() != self.num_compile_macros {
            engine_fatal!(SOURCE,
                "shader '{}' declares {} compile macros but {} were registered",
                self.name, self.num_compile_macros, self.macros.len());
        }
        if !self.variants.is_empty() {
            engine_warn!(SOURCE, "shader '{}': recompiling, deleting {} old variants",
                self.name, self.variants.len());
            self.delete_variants();
        }

        let start = Instant::now();
        let count = 1usize << self.num_compile_macros;
        let mut variants = Vec::with_capacity(count);

        for index in 0..count {
            let macros = self.macro_string(index);
            let desc = ProgramDesc {
                vertex_main: sources.vertex_main.clone(),
                fragment_main: sources.fragment_main.clone(),
                vertex_libs: sources.vertex_libs.clone(),
                fragment_libs: sources.fragment_libs.clone(),
                macros,
                attribs: sources.base_attribs,
                optimize: sources.optimize,
            };

            let result = self.gpu().compile_program(&desc);
            let handle = match result {
                Ok(handle) => handle,
                Err(err) => engine_fatal!(SOURCE,
                    "shader '{}' variant {} with macros [{}] failed: {}",
                    self.name, index, desc.macros.trim_end(), err),
            };

            let uniform_locations: Vec<UniformLocation> = {
                let mut gpu = self.gpu();
                let locations: Vec<UniformLocation> = self.uniforms
                    .iter()
                    .map(|u| gpu.resolve_uniform_location(handle, &u.name))
                    .collect();

                if !sources.sampler_units.is_empty() {
                    gpu.bind_program(handle);
                    for (sampler, unit) in &sources.sampler_units {
                        let location = gpu.resolve_uniform_location(handle, sampler);
                        if location.is_valid() {
                            gpu.upload_uniform_int(handle, location, *unit);
                        }
                    }
                    gpu.unbind_program();
                }
                locations
            };

            self.report_driver_errors(index, &desc.macros);
            engine_trace!(SOURCE, "shader '{}': variant {} [{}] -> program {}",
                self.name, index, desc.macros.trim_end(), handle.0);

            variants.push(ProgramVariant {
                handle,
                macros: desc.macros,
                uniform_locations,
            });
        }

        self.variants = variants;
        self.bound_variant = None;
        self.select_program();

        engine_info!(SOURCE, "shader '{}': compiled {} variants in {:.1} ms",
            self.name, count, start.elapsed().as_secs_f64() * 1000.0);
    }

    fn report_driver_errors(&self, index: usize, macros: &str) {
        if !self.config.check_driver_errors {
            return;
        }
        for message in self.gpu().check_for_driver_errors() {
            engine_warn!(SOURCE, "shader '{}' variant {} [{}]: driver reported {}",
                self.name, index, macros.trim_end(), message);
        }
    }

    fn delete_variants(&mut self) {
        let variants = std::mem::take(&mut self.variants);
        match self.gpu.lock() {
            Ok(mut gpu) => {
                for variant in &variants {
                    gpu.delete_program(variant.handle);
                }
            }
            Err(_) => engine_warn!(SOURCE,
                "shader '{}': GPU binding lock poisoned, leaking {} programs", self.name, variants.len()),
        }
        self.bound_variant = None;
    }

    // ===== SELECTION =====

    /// Enable a compile macro; no-op (no re-selection) if already enabled
    pub fn enable_macro(&mut self, slot: CompileMacro) {
        self.check_owner(slot.program_id(), "compile macro");
        if self.active_macros & slot.bit() != 0 {
            return;
        }
        self.active_macros |= slot.bit();
        self.apply_macro_attribs(slot.index(), true);
        self.select_program();
    }

    /// Disable a compile macro; no-op (no re-selection) if already disabled
    pub fn disable_macro(&mut self, slot: CompileMacro) {
        self.check_owner(slot.program_id(), "compile macro");
        if self.active_macros & slot.bit() == 0 {
            return;
        }
        self.active_macros &= !slot.bit();
        self.apply_macro_attribs(slot.index(), false);
        self.select_program();
    }

    /// Enable or disable a compile macro
    pub fn set_macro(&mut self, slot: CompileMacro, enabled: bool) {
        if enabled {
            self.enable_macro(slot);
        } else {
            self.disable_macro(slot);
        }
    }

    fn apply_macro_attribs(&mut self, index: usize, enabled: bool) {
        let normal_mapping = self.config.normal_mapping();
        let kind = &self.macros[index].kind;
        if let Some(delta) = attrib_effects::compile_macro_attrib_delta(kind, enabled, normal_mapping) {
            self.vertex_attribs = delta.apply(self.vertex_attribs);
        }
    }

    /// Recompute the current variant from the active macros
    ///
    /// Sums the bits of enabled macros, which equals the active mask because
    /// bits are assigned contiguously from 1.
    pub fn select_program(&mut self) {
        let index: u32 = self.macros
            .iter()
            .filter(|m| self.active_macros & m.bit != 0)
            .map(|m| m.bit)
            .sum();
        self.current_variant = index as usize;
        self.stats.selections += 1;
    }

    fn current(&self) -> &ProgramVariant {
        match self.variants.get(self.current_variant) {
            Some(variant) => variant,
            None => engine_fatal!(SOURCE,
                "shader '{}': variant {} used before compile_all_variants", self.name, self.current_variant),
        }
    }

    /// The current variant's program handle
    pub fn current_program(&self) -> ProgramHandle {
        self.current().handle
    }

    /// Make the current variant the active GPU program
    pub fn bind_program(&mut self) {
        let handle = self.current_program();
        self.gpu().bind_program(handle);
        self.bound_variant = Some(self.current_variant);
        self.stats.binds += 1;
    }

    /// Clear the active GPU program
    pub fn unbind_program(&mut self) {
        self.gpu().unbind_program();
        self.bound_variant = None;
    }

    /// Attribute streams the next draw needs
    pub fn draw_attribs(&self) -> VertexAttribs {
        (self.required_attribs | self.vertex_attribs) & !self.unsupported_attribs
    }

    /// Tell the driver which attribute streams to enable for the next draw
    pub fn set_vertex_attribs(&mut self) {
        let attribs = self.draw_attribs();
        self.gpu().set_vertex_attrib_state(attribs);
    }

    // ===== UNIFORMS =====

    /// Write a uniform into the current variant
    ///
    /// Skipped silently if the current variant has no such uniform.
    /// Applies the value's vertex attribute side effect, if any.
    ///
    /// # Panics
    ///
    /// If the slot belongs to another program, or, with
    /// `validate_uniform_binding`, if the current variant is not the bound one
    /// or the driver has another program bound.
    pub fn set_uniform<T: UniformValue + ?Sized>(&mut self, slot: Uniform<T>, value: &T) {
        self.check_owner(slot.program_id(), "uniform");
        if self.config.validate_uniform_binding && self.bound_variant != Some(self.current_variant) {
            engine_fatal!(SOURCE,
                "shader '{}': uniform '{}' written to variant {} while {} is bound",
                self.name, self.uniforms[slot.index()].name, self.current_variant,
                self.bound_variant.map_or("no variant".to_string(), |v| format!("variant {}", v)));
        }

        let (handle, location) = {
            let variant = self.current();
            (variant.handle, variant.uniform_locations[slot.index()])
        };

        if self.config.validate_uniform_binding {
            let active = self.gpu().bound_program();
            if active != Some(handle) {
                engine_fatal!(SOURCE,
                    "shader '{}': uniform '{}' written to program {} while the driver has {} bound",
                    self.name, self.uniforms[slot.index()].name, handle.0,
                    active.map_or("no program".to_string(), |p| format!("program {}", p.0)));
            }
        }

        if location.is_valid() {
            value.upload(&mut *self.gpu(), handle, location);
            self.stats.uniform_uploads += 1;
        } else {
            self.stats.skipped_uploads += 1;
        }

        if let Some(delta) = value.attrib_delta() {
            self.vertex_attribs = delta.apply(self.vertex_attribs);
        }
    }

    // ===== INTROSPECTION =====

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Arc<RendererConfig> {
        &self.config
    }

    /// Active macro mask, which is also the current variant index
    pub fn active_macros(&self) -> u32 {
        self.active_macros
    }

    /// Attribute streams accumulated from macros and uniform values
    pub fn vertex_attribs(&self) -> VertexAttribs {
        self.vertex_attribs
    }

    pub fn required_attribs(&self) -> VertexAttribs {
        self.required_attribs
    }

    pub fn optional_attribs(&self) -> VertexAttribs {
        self.optional_attribs
    }

    pub fn unsupported_attribs(&self) -> VertexAttribs {
        self.unsupported_attribs
    }

    pub fn current_variant_index(&self) -> usize {
        self.current_variant
    }

    pub fn is_compiled(&self) -> bool {
        !self.variants.is_empty()
    }

    /// Number of compiled variants (0 before compilation)
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Program handle of variant `index`
    pub fn variant_program(&self, index: usize) -> Option<ProgramHandle> {
        self.variants.get(index).map(|v| v.handle)
    }

    /// Macro string variant `index` was compiled with
    pub fn variant_macros(&self, index: usize) -> Option<&str> {
        self.variants.get(index).map(|v| v.macros.as_str())
    }

    /// Location of `slot` in variant `index`
    pub fn uniform_location<T: UniformValue + ?Sized>(&self, slot: Uniform<T>, index: usize) -> Option<UniformLocation> {
        self.variants.get(index).map(|v| v.uniform_locations[slot.index()])
    }

    pub fn uniform_index(&self, name: &str) -> Option<usize> {
        self.uniform_names.get(name).copied()
    }

    pub fn uniform_names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.iter().map(|u| u.name.as_str())
    }

    pub fn macro_names(&self) -> impl Iterator<Item = &str> {
        self.macros.iter().map(|m| m.kind.name())
    }

    pub fn stats(&self) -> ShaderProgramStats {
        self.stats
    }

    /// Multi-line description of the program state, logged at debug level
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "shader '{}' ({} variants, {} uniforms)",
            self.name, self.variants.len(), self.uniforms.len());
        let _ = writeln!(out, "  active macros: 0x{:x} [{}]",
            self.active_macros, self.macro_string(self.active_macros as usize).trim_end());
        let _ = writeln!(out, "  draw attribs: {:?}", self.draw_attribs());
        for (index, uniform) in self.uniforms.iter().enumerate() {
            let location = self.variants
                .get(self.current_variant)
                .map(|v| v.uniform_locations[index]);
            match location {
                Some(loc) if loc.is_valid() => {
                    let _ = writeln!(out, "  {} @ {}", uniform.name, loc.0);
                }
                Some(_) => {
                    let _ = writeln!(out, "  {} (optimized out)", uniform.name);
                }
                None => {
                    let _ = writeln!(out, "  {} (unresolved)", uniform.name);
                }
            }
        }
        engine_debug!(SOURCE, "{}", out.trim_end());
        out
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        if !self.variants.is_empty() {
            self.delete_variants();
        }
    }
}

#[cfg(test)]
#[path = "shader_program_tests.rs"]
mod tests;

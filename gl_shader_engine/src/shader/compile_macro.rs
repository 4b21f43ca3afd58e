/// Compile macro slots - feature flags that pick a program variant

use crate::shader::{ProgramId, ShaderProgram};

/// The feature a compile macro stands for
///
/// Known kinds carry vertex attribute side effects (see `attrib_effects`);
/// `Custom` macros only take part in variant selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroKind {
    PortalClipping,
    AlphaTesting,
    VertexSkinning,
    VertexAnimation,
    DeformVertexes,
    ParallaxMapping,
    TcGenEnvironment,
    Custom(String),
}

impl MacroKind {
    /// Preprocessor identifier defined in variants using this feature
    pub fn name(&self) -> &str {
        match self {
            MacroKind::PortalClipping => "USE_PORTAL_CLIPPING",
            MacroKind::AlphaTesting => "USE_ALPHA_TESTING",
            MacroKind::VertexSkinning => "USE_VERTEX_SKINNING",
            MacroKind::VertexAnimation => "USE_VERTEX_ANIMATION",
            MacroKind::DeformVertexes => "USE_DEFORM_VERTEXES",
            MacroKind::ParallaxMapping => "USE_PARALLAX_MAPPING",
            MacroKind::TcGenEnvironment => "USE_TCGEN_ENVIRONMENT",
            MacroKind::Custom(name) => name,
        }
    }
}

/// Handle to one registered compile macro
///
/// `bit` is `1 << registration_index` and doubles as the macro's weight in
/// the variant index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileMacro {
    program: ProgramId,
    index: usize,
    bit: u32,
}

impl CompileMacro {
    pub(crate) fn new(program: ProgramId, index: usize) -> Self {
        Self {
            program,
            index,
            bit: 1 << index,
        }
    }

    /// Bit assigned at registration
    pub fn bit(&self) -> u32 {
        self.bit
    }

    /// Registration index inside the owning program
    pub fn index(&self) -> usize {
        self.index
    }

    /// Program this slot was registered with
    pub fn program_id(&self) -> ProgramId {
        self.program
    }

    /// Enable this macro on its owner; no-op if already enabled
    pub fn enable(self, program: &mut ShaderProgram) {
        program.enable_macro(self);
    }

    /// Disable this macro on its owner; no-op if already disabled
    pub fn disable(self, program: &mut ShaderProgram) {
        program.disable_macro(self);
    }

    /// Enable or disable
    pub fn set(self, program: &mut ShaderProgram, enabled: bool) {
        program.set_macro(self, enabled);
    }

    /// Whether the owner currently has this macro enabled
    pub fn is_enabled(self, program: &ShaderProgram) -> bool {
        program.active_macros() & self.bit != 0
    }
}

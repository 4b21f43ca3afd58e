/// Program handles, uniform locations and the program compile descriptor

use crate::gpu::VertexAttribs;

/// Opaque handle to a linked GPU program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Location of a uniform inside one linked program
///
/// `INVALID` marks a uniform the driver optimized out; writes to it are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// Sentinel for "not present in this program"
    pub const INVALID: UniformLocation = UniformLocation(-1);

    /// Whether uploads to this location reach the program
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

/// Descriptor for compiling and linking one program variant
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramDesc {
    /// Vertex program main file (e.g. "glsl/generic_vp.glsl")
    pub vertex_main: String,
    /// Fragment program main file
    pub fragment_main: String,
    /// Library files prepended to the vertex program (e.g. "vertexSkinning")
    pub vertex_libs: Vec<String>,
    /// Library files prepended to the fragment program (e.g. "reliefMapping")
    pub fragment_libs: Vec<String>,
    /// Space-separated list of macros to define, one trailing space per name
    pub macros: String,
    /// Attribute streams the program binds locations for
    pub attribs: VertexAttribs,
    /// Ask the driver to optimize the program
    pub optimize: bool,
}

impl ProgramDesc {
    /// Macro names in this descriptor, in order
    pub fn macro_names(&self) -> impl Iterator<Item = &str> {
        self.macros.split_whitespace()
    }

    /// Whether `name` is defined for this variant
    pub fn defines(&self, name: &str) -> bool {
        self.macro_names().any(|m| m == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_location_validity() {
        assert!(!UniformLocation::INVALID.is_valid());
        assert!(UniformLocation(0).is_valid());
        assert!(UniformLocation(12).is_valid());
    }

    #[test]
    fn test_program_desc_macro_queries() {
        let desc = ProgramDesc {
            vertex_main: "glsl/generic_vp.glsl".to_string(),
            fragment_main: "glsl/generic_fp.glsl".to_string(),
            vertex_libs: vec![],
            fragment_libs: vec![],
            macros: "USE_A USE_C ".to_string(),
            attribs: VertexAttribs::POSITION,
            optimize: true,
        };

        assert_eq!(desc.macro_names().collect::<Vec<_>>(), vec!["USE_A", "USE_C"]);
        assert!(desc.defines("USE_A"));
        assert!(!desc.defines("USE_B"));
        assert!(!desc.defines("USE"));
    }
}

/// Vertex attribute stream bits

use bitflags::bitflags;

bitflags! {
    /// Set of vertex attribute streams a draw call needs enabled
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VertexAttribs: u32 {
        const POSITION       = 1 << 0;
        const TEXCOORD       = 1 << 1;
        const LIGHTCOORD     = 1 << 2;
        const TANGENT        = 1 << 3;
        const BINORMAL       = 1 << 4;
        const NORMAL         = 1 << 5;
        const COLOR          = 1 << 6;
        const LIGHTDIRECTION = 1 << 7;
        const BONE_INDEXES   = 1 << 8;
        const BONE_WEIGHTS   = 1 << 9;
        // Second keyframe for vertex animation
        const POSITION2      = 1 << 10;
        const TANGENT2       = 1 << 11;
        const BINORMAL2      = 1 << 12;
        const NORMAL2        = 1 << 13;
    }
}

/// A change to a vertex attribute mask caused by a macro toggle or a uniform value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttribDelta {
    /// Require these streams
    Add(VertexAttribs),
    /// Stop requiring these streams
    Remove(VertexAttribs),
}

impl AttribDelta {
    /// Apply this delta to a mask
    pub fn apply(self, mask: VertexAttribs) -> VertexAttribs {
        match self {
            AttribDelta::Add(bits) => mask | bits,
            AttribDelta::Remove(bits) => mask & !bits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_apply() {
        let mask = VertexAttribs::POSITION | VertexAttribs::COLOR;

        let added = AttribDelta::Add(VertexAttribs::NORMAL).apply(mask);
        assert!(added.contains(VertexAttribs::NORMAL | VertexAttribs::COLOR));

        let removed = AttribDelta::Remove(VertexAttribs::COLOR).apply(mask);
        assert_eq!(removed, VertexAttribs::POSITION);
    }

    #[test]
    fn test_bits_are_distinct() {
        let all: Vec<VertexAttribs> = VertexAttribs::all().iter().collect();
        assert_eq!(all.len(), 14);
        assert_eq!(VertexAttribs::all().bits().count_ones(), 14);
    }
}

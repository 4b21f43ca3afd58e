/// Vertex attribute side effects of macro toggles and uniform values
///
/// These tables are the only place where features turn into attribute
/// requirements. `ShaderProgram` applies the returned deltas to its
/// accumulated attribute mask.

use crate::gpu::{AttribDelta, VertexAttribs};
use crate::shader::{AlphaGen, ColorGen, MacroKind};

/// Streams read by the second keyframe of vertex animation
const ANIMATION_ATTRIBS: VertexAttribs = VertexAttribs::POSITION2.union(VertexAttribs::NORMAL2);

/// Extra animation streams only meaningful for tangent-space lighting
const ANIMATION_TANGENT_ATTRIBS: VertexAttribs = VertexAttribs::TANGENT2.union(VertexAttribs::BINORMAL2);

const SKINNING_ATTRIBS: VertexAttribs = VertexAttribs::BONE_INDEXES.union(VertexAttribs::BONE_WEIGHTS);

fn toggle(bits: VertexAttribs, enabled: bool) -> AttribDelta {
    if enabled {
        AttribDelta::Add(bits)
    } else {
        AttribDelta::Remove(bits)
    }
}

/// Attribute change when a compile macro is enabled or disabled
///
/// `normal_mapping` is the renderer's normal mapping switch at toggle time.
/// Vertex animation only adds or removes the tangent/binormal keyframe when it
/// is on, so toggling the switch between enable and disable leaves those bits
/// behind (or never removes them).
pub fn compile_macro_attrib_delta(kind: &MacroKind, enabled: bool, normal_mapping: bool) -> Option<AttribDelta> {
    match kind {
        MacroKind::VertexSkinning => Some(toggle(SKINNING_ATTRIBS, enabled)),
        MacroKind::VertexAnimation => {
            let bits = if normal_mapping {
                ANIMATION_ATTRIBS | ANIMATION_TANGENT_ATTRIBS
            } else {
                ANIMATION_ATTRIBS
            };
            Some(toggle(bits, enabled))
        }
        MacroKind::DeformVertexes => Some(toggle(VertexAttribs::NORMAL, enabled)),
        MacroKind::PortalClipping
        | MacroKind::AlphaTesting
        | MacroKind::ParallaxMapping
        | MacroKind::TcGenEnvironment
        | MacroKind::Custom(_) => None,
    }
}

/// `u_ColorGen`: per-vertex generators need the color stream
pub fn color_gen_attrib_delta(color_gen: ColorGen) -> AttribDelta {
    let per_vertex = matches!(color_gen, ColorGen::Vertex | ColorGen::OneMinusVertex);
    toggle(VertexAttribs::COLOR, per_vertex)
}

/// `u_AlphaGen`: per-vertex generators need the color stream
///
/// Shares the COLOR bit with `u_ColorGen`; whichever is set last wins.
pub fn alpha_gen_attrib_delta(alpha_gen: AlphaGen) -> AttribDelta {
    let per_vertex = matches!(alpha_gen, AlphaGen::Vertex | AlphaGen::OneMinusVertex);
    toggle(VertexAttribs::COLOR, per_vertex)
}

/// `u_ColorModulate`: the color stream is needed if either generator is per-vertex
pub fn color_modulate_attrib_delta(color_gen: ColorGen, alpha_gen: AlphaGen) -> AttribDelta {
    let per_vertex = matches!(color_gen, ColorGen::Vertex | ColorGen::OneMinusVertex)
        || matches!(alpha_gen, AlphaGen::Vertex | AlphaGen::OneMinusVertex);
    toggle(VertexAttribs::COLOR, per_vertex)
}

#[cfg(test)]
#[path = "attrib_effects_tests.rs"]
mod tests;

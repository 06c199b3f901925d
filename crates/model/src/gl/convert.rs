//! GL enum name conversions
//!
//! Each function maps a `GL_*` name to its normalized value, returning `None`
//! for names it does not know. The adapter decides what default to fall back
//! to and reports the field.

use crate::state::{BlendFactor, BlendOp, CompareFunc, CullMode, FillMode, LogicOp, StencilOp, Topology};
use crate::{AddressMode, ComponentType, FilterMode, ResourceFormat};

pub fn topology(mode: &str, patch_vertices: u32) -> Option<Topology> {
    let topology = match mode {
        "GL_POINTS" => Topology::PointList,
        "GL_LINES" => Topology::LineList,
        "GL_LINE_STRIP" => Topology::LineStrip,
        "GL_LINE_LOOP" => Topology::LineLoop,
        "GL_TRIANGLES" => Topology::TriangleList,
        "GL_TRIANGLE_STRIP" => Topology::TriangleStrip,
        "GL_TRIANGLE_FAN" => Topology::TriangleFan,
        "GL_LINES_ADJACENCY" => Topology::LineListAdj,
        "GL_LINE_STRIP_ADJACENCY" => Topology::LineStripAdj,
        "GL_TRIANGLES_ADJACENCY" => Topology::TriangleListAdj,
        "GL_TRIANGLE_STRIP_ADJACENCY" => Topology::TriangleStripAdj,
        "GL_PATCHES" => Topology::PatchList(patch_vertices),
        _ => return None,
    };
    Some(topology)
}

/// Byte width of an element-array index type
pub fn index_byte_width(index_type: &str) -> Option<u32> {
    match index_type {
        "GL_UNSIGNED_BYTE" => Some(1),
        "GL_UNSIGNED_SHORT" => Some(2),
        "GL_UNSIGNED_INT" => Some(4),
        _ => None,
    }
}

/// Fill mode and the polygon offset capability that applies to it
pub fn polygon_mode(mode: &str) -> Option<(FillMode, &'static str)> {
    match mode {
        "GL_FILL" => Some((FillMode::Solid, "GL_POLYGON_OFFSET_FILL")),
        "GL_LINE" => Some((FillMode::Wireframe, "GL_POLYGON_OFFSET_LINE")),
        "GL_POINT" => Some((FillMode::Point, "GL_POLYGON_OFFSET_POINT")),
        _ => None,
    }
}

pub fn cull_face(face: &str) -> Option<CullMode> {
    match face {
        "GL_FRONT" => Some(CullMode::Front),
        "GL_BACK" => Some(CullMode::Back),
        "GL_FRONT_AND_BACK" => Some(CullMode::FrontAndBack),
        _ => None,
    }
}

/// Returns true for counter-clockwise front faces
pub fn front_ccw(front_face: &str) -> Option<bool> {
    match front_face {
        "GL_CCW" => Some(true),
        "GL_CW" => Some(false),
        _ => None,
    }
}

pub fn compare_func(func: &str) -> Option<CompareFunc> {
    let func = match func {
        "GL_NEVER" => CompareFunc::Never,
        "GL_LESS" => CompareFunc::Less,
        "GL_EQUAL" => CompareFunc::Equal,
        "GL_LEQUAL" => CompareFunc::LessEqual,
        "GL_GREATER" => CompareFunc::Greater,
        "GL_NOTEQUAL" => CompareFunc::NotEqual,
        "GL_GEQUAL" => CompareFunc::GreaterEqual,
        "GL_ALWAYS" => CompareFunc::Always,
        _ => return None,
    };
    Some(func)
}

pub fn stencil_op(op: &str) -> Option<StencilOp> {
    let op = match op {
        "GL_KEEP" => StencilOp::Keep,
        "GL_ZERO" => StencilOp::Zero,
        "GL_REPLACE" => StencilOp::Replace,
        "GL_INCR" => StencilOp::IncrementSaturate,
        "GL_DECR" => StencilOp::DecrementSaturate,
        "GL_INVERT" => StencilOp::Invert,
        "GL_INCR_WRAP" => StencilOp::IncrementWrap,
        "GL_DECR_WRAP" => StencilOp::DecrementWrap,
        _ => return None,
    };
    Some(op)
}

pub fn blend_factor(factor: &str) -> Option<BlendFactor> {
    let factor = match factor {
        "GL_ZERO" => BlendFactor::Zero,
        "GL_ONE" => BlendFactor::One,
        "GL_SRC_COLOR" => BlendFactor::SrcColor,
        "GL_ONE_MINUS_SRC_COLOR" => BlendFactor::InvSrcColor,
        "GL_DST_COLOR" => BlendFactor::DstColor,
        "GL_ONE_MINUS_DST_COLOR" => BlendFactor::InvDstColor,
        "GL_SRC_ALPHA" => BlendFactor::SrcAlpha,
        "GL_ONE_MINUS_SRC_ALPHA" => BlendFactor::InvSrcAlpha,
        "GL_DST_ALPHA" => BlendFactor::DstAlpha,
        "GL_ONE_MINUS_DST_ALPHA" => BlendFactor::InvDstAlpha,
        "GL_CONSTANT_COLOR" => BlendFactor::ConstantColor,
        "GL_ONE_MINUS_CONSTANT_COLOR" => BlendFactor::InvConstantColor,
        "GL_CONSTANT_ALPHA" => BlendFactor::ConstantAlpha,
        "GL_ONE_MINUS_CONSTANT_ALPHA" => BlendFactor::InvConstantAlpha,
        "GL_SRC_ALPHA_SATURATE" => BlendFactor::SrcAlphaSaturate,
        "GL_SRC1_COLOR" => BlendFactor::Src1Color,
        "GL_ONE_MINUS_SRC1_COLOR" => BlendFactor::InvSrc1Color,
        "GL_SRC1_ALPHA" => BlendFactor::Src1Alpha,
        "GL_ONE_MINUS_SRC1_ALPHA" => BlendFactor::InvSrc1Alpha,
        _ => return None,
    };
    Some(factor)
}

pub fn blend_op(equation: &str) -> Option<BlendOp> {
    match equation {
        "GL_FUNC_ADD" => Some(BlendOp::Add),
        "GL_FUNC_SUBTRACT" => Some(BlendOp::Subtract),
        "GL_FUNC_REVERSE_SUBTRACT" => Some(BlendOp::ReverseSubtract),
        "GL_MIN" => Some(BlendOp::Min),
        "GL_MAX" => Some(BlendOp::Max),
        _ => None,
    }
}

pub fn logic_op(op: &str) -> Option<LogicOp> {
    let op = match op {
        "GL_CLEAR" => LogicOp::Clear,
        "GL_AND" => LogicOp::And,
        "GL_AND_REVERSE" => LogicOp::AndReverse,
        "GL_COPY" => LogicOp::Copy,
        "GL_AND_INVERTED" => LogicOp::AndInverted,
        "GL_NOOP" => LogicOp::NoOp,
        "GL_XOR" => LogicOp::Xor,
        "GL_OR" => LogicOp::Or,
        "GL_NOR" => LogicOp::Nor,
        "GL_EQUIV" => LogicOp::Equivalent,
        "GL_INVERT" => LogicOp::Invert,
        "GL_OR_REVERSE" => LogicOp::OrReverse,
        "GL_COPY_INVERTED" => LogicOp::CopyInverted,
        "GL_OR_INVERTED" => LogicOp::OrInverted,
        "GL_NAND" => LogicOp::Nand,
        "GL_SET" => LogicOp::Set,
        _ => return None,
    };
    Some(op)
}

pub fn address_mode(wrap: &str) -> Option<AddressMode> {
    match wrap {
        "GL_REPEAT" => Some(AddressMode::Wrap),
        "GL_MIRRORED_REPEAT" => Some(AddressMode::Mirror),
        "GL_MIRROR_CLAMP_TO_EDGE" => Some(AddressMode::MirrorOnce),
        "GL_CLAMP_TO_EDGE" => Some(AddressMode::Clamp),
        "GL_CLAMP_TO_BORDER" => Some(AddressMode::Border),
        _ => None,
    }
}

/// Splits a minification filter into `(min, mip)`
///
/// Filters without a mipmap part sample only the base level, which is shown
/// as point mip filtering.
pub fn min_filter(filter: &str) -> Option<(FilterMode, FilterMode)> {
    match filter {
        "GL_NEAREST" => Some((FilterMode::Point, FilterMode::Point)),
        "GL_LINEAR" => Some((FilterMode::Linear, FilterMode::Point)),
        "GL_NEAREST_MIPMAP_NEAREST" => Some((FilterMode::Point, FilterMode::Point)),
        "GL_LINEAR_MIPMAP_NEAREST" => Some((FilterMode::Linear, FilterMode::Point)),
        "GL_NEAREST_MIPMAP_LINEAR" => Some((FilterMode::Point, FilterMode::Linear)),
        "GL_LINEAR_MIPMAP_LINEAR" => Some((FilterMode::Linear, FilterMode::Linear)),
        _ => None,
    }
}

pub fn mag_filter(filter: &str) -> Option<FilterMode> {
    match filter {
        "GL_NEAREST" => Some(FilterMode::Point),
        "GL_LINEAR" => Some(FilterMode::Linear),
        _ => None,
    }
}

/// Builds the format of a vertex attribute from its `glVertexAttrib*Format` parameters
///
/// # Arguments
/// * `size` - Component count
/// * `bgra` - Whether the size was given as `GL_BGRA`
/// * `kind` - Component type name, e.g. `GL_UNSIGNED_BYTE`
/// * `normalized` - Whether fixed-point values are normalized
/// * `integer` - Whether the attribute is read as an integer (`glVertexAttribIFormat`)
///
/// # Returns
/// * `Some(ResourceFormat)` - The normalized format
/// * `None` - If `kind` is not a vertex attribute type
pub fn attribute_format(size: u32, bgra: bool, kind: &str, normalized: bool, integer: bool) -> Option<ResourceFormat> {
    let int_component = !normalized || integer;
    let signed = if int_component { ComponentType::SInt } else { ComponentType::SNorm };
    let unsigned = if int_component { ComponentType::UInt } else { ComponentType::UNorm };

    if bgra {
        return match kind {
            "GL_UNSIGNED_BYTE" => Some(ResourceFormat::special("B8G8R8A8", ComponentType::UNorm)),
            "GL_UNSIGNED_INT_2_10_10_10_REV" => Some(ResourceFormat::special("B10G10R10A2", ComponentType::UInt)),
            "GL_INT_2_10_10_10_REV" => Some(ResourceFormat::special("B10G10R10A2", ComponentType::SInt)),
            _ => None,
        };
    }

    let components = size.clamp(1, 4) as u8;
    let format = match kind {
        "GL_BYTE" => ResourceFormat::new(components, 1, signed),
        "GL_UNSIGNED_BYTE" => ResourceFormat::new(components, 1, unsigned),
        "GL_SHORT" => ResourceFormat::new(components, 2, signed),
        "GL_UNSIGNED_SHORT" => ResourceFormat::new(components, 2, unsigned),
        "GL_INT" => ResourceFormat::new(components, 4, signed),
        "GL_UNSIGNED_INT" => ResourceFormat::new(components, 4, unsigned),
        "GL_HALF_FLOAT" => ResourceFormat::new(components, 2, ComponentType::Float),
        "GL_FLOAT" => ResourceFormat::new(components, 4, ComponentType::Float),
        "GL_DOUBLE" => ResourceFormat::new(components, 8, ComponentType::Double),
        "GL_INT_2_10_10_10_REV" => ResourceFormat::special("R10G10B10A2", ComponentType::SInt),
        "GL_UNSIGNED_INT_2_10_10_10_REV" => ResourceFormat::special("R10G10B10A2", ComponentType::UInt),
        "GL_UNSIGNED_INT_10F_11F_11F_REV" => ResourceFormat::special("R11G11B10", ComponentType::Float),
        _ => return None,
    };
    Some(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology() {
        assert_eq!(topology("GL_TRIANGLE_STRIP", 3), Some(Topology::TriangleStrip));
        assert_eq!(topology("GL_PATCHES", 4), Some(Topology::PatchList(4)));
        assert_eq!(topology("GL_QUADS", 3), None);
    }

    #[test]
    fn test_polygon_mode_pairs_offset_capability() {
        assert_eq!(polygon_mode("GL_LINE"), Some((FillMode::Wireframe, "GL_POLYGON_OFFSET_LINE")));
        assert_eq!(polygon_mode("GL_LINES"), None);
    }

    #[test]
    fn test_min_filter_splits_mip_part() {
        assert_eq!(min_filter("GL_LINEAR_MIPMAP_NEAREST"), Some((FilterMode::Linear, FilterMode::Point)));
        assert_eq!(min_filter("GL_NEAREST_MIPMAP_LINEAR"), Some((FilterMode::Point, FilterMode::Linear)));
    }

    #[test]
    fn test_attribute_formats() {
        let normalized = attribute_format(4, false, "GL_UNSIGNED_BYTE", true, false).unwrap();
        assert_eq!(normalized.to_string(), "R8G8B8A8_UNORM");

        let integer = attribute_format(2, false, "GL_SHORT", true, true).unwrap();
        assert_eq!(integer.to_string(), "R16G16_SINT");

        let float = attribute_format(3, false, "GL_FLOAT", false, false).unwrap();
        assert_eq!(float.to_string(), "R32G32B32_FLOAT");

        let bgra = attribute_format(4, true, "GL_UNSIGNED_BYTE", true, false).unwrap();
        assert_eq!(bgra.to_string(), "B8G8R8A8");

        assert!(attribute_format(4, false, "GL_FIXED", false, false).is_none());
    }
}

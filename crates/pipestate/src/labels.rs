//! Backend-specific display names
//!
//! Stages and slot categories are backend neutral in the model; the names an
//! API user expects ("Pixel Shader", "Uniform Buffers", `t3`) are applied
//! only when rows are rendered.

use pipestate_model::wgpu_backend::GROUP_SLOT_STRIDE;
use pipestate_model::{BackendKind, SlotCategory, StageKind};

/// Returns the name `backend` uses for `stage`
pub fn stage_name(backend: BackendKind, stage: StageKind) -> &'static str {
    match (backend, stage) {
        (BackendKind::Direct3D, StageKind::VertexInput) => "Input Assembler",
        (BackendKind::Direct3D, StageKind::TessControl) => "Hull Shader",
        (BackendKind::Direct3D, StageKind::TessEval) => "Domain Shader",
        (BackendKind::Direct3D, StageKind::FragmentShader) => "Pixel Shader",
        (BackendKind::Direct3D, StageKind::FrameBuffer) => "Output Merger",
        (BackendKind::Vulkan, StageKind::FrameBuffer) => "Color Blend",
        (BackendKind::WebGpu, StageKind::FrameBuffer) => "Color Targets",
        (BackendKind::WebGpu, StageKind::VertexInput) => "Vertex State",
        (BackendKind::WebGpu, StageKind::Rasterizer) => "Primitive State",
        (_, stage) => stage.name(),
    }
}

/// Returns the heading `backend` uses for `category`
pub fn category_name(backend: BackendKind, category: SlotCategory) -> &'static str {
    match (backend, category) {
        (BackendKind::OpenGl, SlotCategory::Resource) => "Textures",
        (BackendKind::OpenGl, SlotCategory::ConstantBuffer) => "Uniform Buffers",
        (BackendKind::OpenGl, SlotCategory::Uav) => "Images",
        (BackendKind::OpenGl, SlotCategory::VertexAttribute) => "Vertex Attribute Formats",
        (BackendKind::OpenGl, SlotCategory::ClassInstance) => "Subroutines",
        (BackendKind::OpenGl, SlotCategory::RenderTarget) => "Color Attachments",
        (BackendKind::Direct3D, SlotCategory::Resource) => "Shader Resources",
        (BackendKind::Direct3D, SlotCategory::VertexAttribute) => "Input Layouts",
        (BackendKind::Vulkan, SlotCategory::Resource) => "Sampled Images",
        (BackendKind::Vulkan, SlotCategory::ConstantBuffer) => "Uniform Buffers",
        (BackendKind::Vulkan, SlotCategory::Uav) => "Storage Images",
        (BackendKind::Vulkan, SlotCategory::RenderTarget) => "Color Attachments",
        (BackendKind::WebGpu, SlotCategory::Resource) => "Textures",
        (BackendKind::WebGpu, SlotCategory::ConstantBuffer) => "Uniform Buffers",
        (BackendKind::WebGpu, SlotCategory::Uav) => "Storage Bindings",
        (BackendKind::WebGpu, SlotCategory::RenderTarget) => "Color Targets",
        (_, category) => category.name(),
    }
}

/// Formats a slot index the way `backend` addresses it
///
/// Direct3D slots are shown as registers (`t0`, `s1`, `b2`, `u3`), WebGPU
/// bind group slots as `group/binding`, everything else as the plain index.
pub fn slot_label(backend: BackendKind, category: SlotCategory, slot_index: u32) -> String {
    match backend {
        BackendKind::Direct3D => {
            let register = match category {
                SlotCategory::Resource => Some('t'),
                SlotCategory::Sampler => Some('s'),
                SlotCategory::ConstantBuffer => Some('b'),
                SlotCategory::Uav => Some('u'),
                _ => None,
            };
            match register {
                Some(register) => format!("{register}{slot_index}"),
                None => slot_index.to_string(),
            }
        }
        BackendKind::WebGpu if matches!(category, SlotCategory::Resource | SlotCategory::Sampler | SlotCategory::ConstantBuffer | SlotCategory::Uav) => {
            format!("{}/{}", slot_index / GROUP_SLOT_STRIDE, slot_index % GROUP_SLOT_STRIDE)
        }
        _ => slot_index.to_string(),
    }
}

/// Formats an RGBA write mask (bits 1/2/4/8), with `_` for masked channels
pub fn write_mask_label(mask: u8) -> String {
    ['R', 'G', 'B', 'A']
        .iter()
        .enumerate()
        .map(|(bit, channel)| if mask & (1 << bit) != 0 { *channel } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(stage_name(BackendKind::Direct3D, StageKind::FragmentShader), "Pixel Shader");
        assert_eq!(stage_name(BackendKind::OpenGl, StageKind::FragmentShader), "Fragment Shader");
        assert_eq!(stage_name(BackendKind::Direct3D, StageKind::Compute), "Compute Shader");
        for backend in [BackendKind::OpenGl, BackendKind::Direct3D, BackendKind::Vulkan, BackendKind::WebGpu] {
            for stage in StageKind::ALL {
                assert!(!stage_name(backend, stage).is_empty());
            }
        }
    }

    #[test]
    fn test_category_names() {
        assert_eq!(category_name(BackendKind::OpenGl, SlotCategory::ConstantBuffer), "Uniform Buffers");
        assert_eq!(category_name(BackendKind::Direct3D, SlotCategory::ConstantBuffer), "Constant Buffers");
        assert_eq!(category_name(BackendKind::Direct3D, SlotCategory::Uav), "UAVs");
        assert_eq!(category_name(BackendKind::OpenGl, SlotCategory::ClassInstance), "Subroutines");
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(slot_label(BackendKind::Direct3D, SlotCategory::Resource, 3), "t3");
        assert_eq!(slot_label(BackendKind::Direct3D, SlotCategory::Uav, 1), "u1");
        assert_eq!(slot_label(BackendKind::Direct3D, SlotCategory::VertexBuffer, 2), "2");
        assert_eq!(slot_label(BackendKind::OpenGl, SlotCategory::Resource, 3), "3");
        assert_eq!(slot_label(BackendKind::WebGpu, SlotCategory::Sampler, 2 * GROUP_SLOT_STRIDE + 5), "2/5");
        assert_eq!(slot_label(BackendKind::WebGpu, SlotCategory::RenderTarget, 1), "1");
    }

    #[test]
    fn test_write_mask_label() {
        assert_eq!(write_mask_label(0xF), "RGBA");
        assert_eq!(write_mask_label(0b0101), "R_B_");
        assert_eq!(write_mask_label(0), "____");
    }
}

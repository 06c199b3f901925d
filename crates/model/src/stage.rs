//! Pipeline stages, slot categories and backend kinds
//!
//! These three enums are the shared vocabulary of every snapshot. Their
//! declaration order is meaningful: stages follow the logical GPU pipeline and
//! slot categories define the grouping order inside a stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One logical step of the graphics or compute pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StageKind {
    VertexInput,
    VertexShader,
    TessControl,
    TessEval,
    Geometry,
    Rasterizer,
    FragmentShader,
    FrameBuffer,
    Compute,
}

impl StageKind {
    /// Every stage in pipeline order
    pub const ALL: [StageKind; 9] = [
        StageKind::VertexInput,
        StageKind::VertexShader,
        StageKind::TessControl,
        StageKind::TessEval,
        StageKind::Geometry,
        StageKind::Rasterizer,
        StageKind::FragmentShader,
        StageKind::FrameBuffer,
        StageKind::Compute,
    ];

    /// Returns the backend-neutral name of this stage
    pub fn name(&self) -> &'static str {
        match self {
            StageKind::VertexInput => "Vertex Input",
            StageKind::VertexShader => "Vertex Shader",
            StageKind::TessControl => "Tess. Control Shader",
            StageKind::TessEval => "Tess. Eval. Shader",
            StageKind::Geometry => "Geometry Shader",
            StageKind::Rasterizer => "Rasterizer",
            StageKind::FragmentShader => "Fragment Shader",
            StageKind::FrameBuffer => "Framebuffer Output",
            StageKind::Compute => "Compute Shader",
        }
    }

    /// Position of this stage in [`StageKind::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Returns true for programmable stages that bind a shader
    pub fn is_shader_stage(&self) -> bool {
        matches!(
            self,
            StageKind::VertexShader | StageKind::TessControl | StageKind::TessEval | StageKind::Geometry | StageKind::FragmentShader | StageKind::Compute
        )
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of binding point a slot represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotCategory {
    /// Read-only shader resource (texture or buffer view)
    Resource,
    Sampler,
    ConstantBuffer,
    /// Read-write resource (storage image / storage buffer)
    Uav,
    VertexBuffer,
    /// Input-layout attribute reading from a vertex buffer
    VertexAttribute,
    /// Interface instance (D3D class instance, GL subroutine)
    ClassInstance,
    RenderTarget,
}

impl SlotCategory {
    /// Every category in grouping order
    pub const ALL: [SlotCategory; 8] = [
        SlotCategory::Resource,
        SlotCategory::Sampler,
        SlotCategory::ConstantBuffer,
        SlotCategory::Uav,
        SlotCategory::VertexBuffer,
        SlotCategory::VertexAttribute,
        SlotCategory::ClassInstance,
        SlotCategory::RenderTarget,
    ];

    /// Returns the backend-neutral name of this category
    pub fn name(&self) -> &'static str {
        match self {
            SlotCategory::Resource => "Resources",
            SlotCategory::Sampler => "Samplers",
            SlotCategory::ConstantBuffer => "Constant Buffers",
            SlotCategory::Uav => "UAVs",
            SlotCategory::VertexBuffer => "Vertex Buffers",
            SlotCategory::VertexAttribute => "Vertex Attributes",
            SlotCategory::ClassInstance => "Class Instances",
            SlotCategory::RenderTarget => "Render Targets",
        }
    }
}

impl fmt::Display for SlotCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Family of graphics API a capture was recorded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    OpenGl,
    Direct3D,
    Vulkan,
    WebGpu,
}

impl BackendKind {
    /// Returns the human-readable name of this backend
    pub fn name(&self) -> &'static str {
        match self {
            BackendKind::OpenGl => "OpenGL",
            BackendKind::Direct3D => "Direct3D",
            BackendKind::Vulkan => "Vulkan",
            BackendKind::WebGpu => "WebGPU",
        }
    }

    /// Returns true if slots of this category are meaningful on this backend
    ///
    /// Views use this to decide which optional tables to lay out at all.
    pub fn supports(&self, category: SlotCategory) -> bool {
        match category {
            SlotCategory::ClassInstance => matches!(self, BackendKind::Direct3D | BackendKind::OpenGl),
            _ => true,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order_matches_pipeline() {
        let mut sorted = StageKind::ALL;
        sorted.sort();
        assert_eq!(sorted, StageKind::ALL);

        for (i, stage) in StageKind::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
        assert!(StageKind::VertexInput < StageKind::Rasterizer);
        assert!(StageKind::FrameBuffer < StageKind::Compute);
    }

    #[test]
    fn test_shader_stages() {
        let shader_stages: Vec<_> = StageKind::ALL.iter().filter(|s| s.is_shader_stage()).collect();
        assert_eq!(shader_stages.len(), 6);
        assert!(!StageKind::Rasterizer.is_shader_stage());
        assert!(!StageKind::FrameBuffer.is_shader_stage());
    }

    #[test]
    fn test_backend_category_support() {
        assert!(BackendKind::Direct3D.supports(SlotCategory::ClassInstance));
        assert!(!BackendKind::Vulkan.supports(SlotCategory::ClassInstance));
        assert!(BackendKind::WebGpu.supports(SlotCategory::Uav));
    }
}

//! Static stage descriptors
//!
//! Every stage shares one schema; what differs is which slot categories it
//! carries and which fixed-function value object belongs to it. This table is
//! the single place that knowledge lives, so snapshot validation, row listing
//! and diffing can all iterate stages generically.

use crate::{SlotCategory, StageKind};
use serde::Serialize;

/// Shape of the fixed-function state attached to a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FixedFunctionKind {
    /// Purely programmable stage
    None,
    /// Index buffer and primitive restart
    InputAssembly,
    /// Rasterizer state; viewports and scissors live on the snapshot root
    Rasterizer,
    /// Depth/stencil, blending and attachments
    Output,
}

/// Immutable definition of one pipeline stage's shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Stage this descriptor belongs to
    pub kind: StageKind,
    /// Slot categories applicable to this stage, in grouping order
    pub categories: &'static [SlotCategory],
    /// Whether a shader can be bound at this stage
    pub has_shader: bool,
    /// Fixed-function value object carried by this stage
    pub fixed_function: FixedFunctionKind,
}

impl StageDescriptor {
    /// Returns true if slots of `category` may appear at this stage
    pub fn accepts(&self, category: SlotCategory) -> bool {
        self.categories.contains(&category)
    }
}

const SHADER_CATEGORIES: &[SlotCategory] = &[SlotCategory::Resource, SlotCategory::Sampler, SlotCategory::ConstantBuffer, SlotCategory::ClassInstance];

const SHADER_CATEGORIES_WITH_UAV: &[SlotCategory] = &[
    SlotCategory::Resource,
    SlotCategory::Sampler,
    SlotCategory::ConstantBuffer,
    SlotCategory::Uav,
    SlotCategory::ClassInstance,
];

const fn shader_stage(kind: StageKind, categories: &'static [SlotCategory]) -> StageDescriptor {
    StageDescriptor {
        kind,
        categories,
        has_shader: true,
        fixed_function: FixedFunctionKind::None,
    }
}

/// Descriptors indexed by [`StageKind::index`]
static DESCRIPTORS: [StageDescriptor; 9] = [
    StageDescriptor {
        kind: StageKind::VertexInput,
        categories: &[SlotCategory::VertexBuffer, SlotCategory::VertexAttribute],
        has_shader: false,
        fixed_function: FixedFunctionKind::InputAssembly,
    },
    shader_stage(StageKind::VertexShader, SHADER_CATEGORIES),
    shader_stage(StageKind::TessControl, SHADER_CATEGORIES),
    shader_stage(StageKind::TessEval, SHADER_CATEGORIES),
    shader_stage(StageKind::Geometry, SHADER_CATEGORIES),
    StageDescriptor {
        kind: StageKind::Rasterizer,
        categories: &[],
        has_shader: false,
        fixed_function: FixedFunctionKind::Rasterizer,
    },
    shader_stage(StageKind::FragmentShader, SHADER_CATEGORIES_WITH_UAV),
    StageDescriptor {
        kind: StageKind::FrameBuffer,
        categories: &[SlotCategory::RenderTarget],
        has_shader: false,
        fixed_function: FixedFunctionKind::Output,
    },
    shader_stage(StageKind::Compute, SHADER_CATEGORIES_WITH_UAV),
];

/// Returns the descriptor for `kind`
pub fn descriptor(kind: StageKind) -> &'static StageDescriptor {
    &DESCRIPTORS[kind.index()]
}

impl StageKind {
    /// Returns the descriptor for this stage
    pub fn descriptor(&self) -> &'static StageDescriptor {
        descriptor(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_table_is_indexed_by_stage() {
        for kind in StageKind::ALL {
            assert_eq!(descriptor(kind).kind, kind);
        }
    }

    #[test]
    fn test_categories_follow_grouping_order() {
        for kind in StageKind::ALL {
            let categories = descriptor(kind).categories;
            assert!(categories.windows(2).all(|pair| pair[0] < pair[1]), "{kind} categories out of order");
        }
    }

    #[test]
    fn test_stage_shapes() {
        let rasterizer = descriptor(StageKind::Rasterizer);
        assert!(rasterizer.categories.is_empty());
        assert!(!rasterizer.has_shader);
        assert_eq!(rasterizer.fixed_function, FixedFunctionKind::Rasterizer);

        assert!(descriptor(StageKind::Compute).accepts(SlotCategory::Uav));
        assert!(descriptor(StageKind::FragmentShader).accepts(SlotCategory::Uav));
        assert!(!descriptor(StageKind::VertexShader).accepts(SlotCategory::Uav));
        assert!(descriptor(StageKind::FrameBuffer).accepts(SlotCategory::RenderTarget));
        assert!(descriptor(StageKind::VertexInput).accepts(SlotCategory::VertexAttribute));

        for kind in StageKind::ALL {
            assert_eq!(descriptor(kind).has_shader, kind.is_shader_stage());
        }
    }
}

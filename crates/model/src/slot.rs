//! Slot bindings and the resource metadata cached alongside them
//!
//! A slot never owns the resource bound to it. It stores the resource's
//! [`ObjectId`] together with a descriptive copy of its metadata taken at
//! snapshot time, so views can show names and dimensions without asking the
//! replay engine again.

use crate::SlotCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a recorded event (draw, dispatch, clear, ...) in a capture
pub type EventId = u32;

/// Opaque identity of a GPU object owned by the replay engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind of resource a slot can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Buffer,
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture2DMultisample,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    Sampler,
    Shader,
}

impl ResourceKind {
    /// Returns true for any texture type
    pub fn is_texture(&self) -> bool {
        !matches!(self, ResourceKind::Buffer | ResourceKind::Sampler | ResourceKind::Shader)
    }
}

/// Numeric interpretation of a format's components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentType {
    Float,
    UNorm,
    SNorm,
    UInt,
    SInt,
    Depth,
    Double,
}

impl ComponentType {
    fn suffix(&self) -> &'static str {
        match self {
            ComponentType::Float | ComponentType::Double => "FLOAT",
            ComponentType::UNorm => "UNORM",
            ComponentType::SNorm => "SNORM",
            ComponentType::UInt => "UINT",
            ComponentType::SInt => "SINT",
            ComponentType::Depth => "DEPTH",
        }
    }
}

/// Backend-neutral resource or attribute format
///
/// Regular formats are described by component count, width and type. Packed
/// or compressed formats that do not fit that scheme carry their name in
/// `special` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFormat {
    pub components: u8,
    pub component_bytes: u8,
    pub component_type: ComponentType,
    #[serde(default)]
    pub srgb: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special: Option<String>,
}

impl ResourceFormat {
    /// Creates a regular format
    pub fn new(components: u8, component_bytes: u8, component_type: ComponentType) -> Self {
        Self {
            components,
            component_bytes,
            component_type,
            srgb: false,
            special: None,
        }
    }

    /// Creates a format identified only by name (packed, compressed, ...)
    pub fn special(name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            components: 0,
            component_bytes: 0,
            component_type,
            srgb: false,
            special: Some(name.into()),
        }
    }

    /// Marks the format as sRGB-encoded
    pub fn with_srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// Size of one element in bytes, zero for special formats
    pub fn element_bytes(&self) -> u32 {
        self.components as u32 * self.component_bytes as u32
    }
}

impl fmt::Display for ResourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.special {
            return f.write_str(name);
        }

        let bits = self.component_bytes as u32 * 8;
        for channel in ["R", "G", "B", "A"].iter().take(self.components as usize) {
            write!(f, "{channel}{bits}")?;
        }
        write!(f, "_{}", self.component_type.suffix())?;
        if self.srgb {
            f.write_str("_SRGB")?;
        }
        Ok(())
    }
}

/// Descriptive metadata of a bound resource, copied at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub name: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub width: u32,
    #[serde(default = "one")]
    pub height: u32,
    #[serde(default = "one")]
    pub depth: u32,
    #[serde(default = "one")]
    pub array_size: u32,
    #[serde(default = "one")]
    pub mip_levels: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ResourceFormat>,
    #[serde(default)]
    pub byte_size: u64,
}

fn one() -> u32 {
    1
}

impl ResourceInfo {
    /// Human-readable dimensions, e.g. `1920x1080` or `64x64x16`
    pub fn dimensions(&self) -> String {
        match self.kind {
            ResourceKind::Buffer => format!("{} bytes", self.byte_size),
            ResourceKind::Texture1D | ResourceKind::Texture1DArray => format!("{}", self.width),
            ResourceKind::Texture3D => format!("{}x{}x{}", self.width, self.height, self.depth),
            _ => format!("{}x{}", self.width, self.height),
        }
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressMode {
    Wrap,
    Mirror,
    MirrorOnce,
    Clamp,
    Border,
}

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterMode {
    Point,
    Linear,
    Anisotropic,
}

/// Sampler state shown next to a sampler slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerInfo {
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    pub mip_filter: FilterMode,
    pub max_anisotropy: u32,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub border_color: [f32; 4],
    /// Comparison function for shadow samplers
    pub compare: Option<crate::CompareFunc>,
}

impl Default for SamplerInfo {
    fn default() -> Self {
        Self {
            address_u: AddressMode::Wrap,
            address_v: AddressMode::Wrap,
            address_w: AddressMode::Wrap,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            mip_filter: FilterMode::Linear,
            max_anisotropy: 1,
            min_lod: -1000.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
            border_color: [0.0; 4],
            compare: None,
        }
    }
}

/// Category-specific extras of a slot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum SlotDetail {
    #[default]
    None,
    VertexBuffer {
        /// Instance step rate, 0 for per-vertex data
        divisor: u32,
    },
    VertexAttribute {
        /// Vertex buffer slot the attribute reads from
        source_slot: u32,
        format: ResourceFormat,
        /// Constant value used when the attribute array is disabled
        generic_value: [f32; 4],
    },
    Sampler(SamplerInfo),
    RenderTarget {
        /// Colour write mask, RGBA in bits 1/2/4/8
        write_mask: u8,
    },
    ClassInstance {
        interface: String,
    },
}

/// One binding point of one stage at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotBinding {
    pub slot_index: u32,
    pub category: SlotCategory,
    /// Reflected binding name, if the shader provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bound_object: Option<ObjectId>,
    /// Whether the current shader or fixed-function unit actually uses the slot
    pub enabled: bool,
    #[serde(default)]
    pub byte_offset: u64,
    #[serde(default)]
    pub byte_length: Option<u64>,
    #[serde(default)]
    pub stride: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceInfo>,
    /// Element count of an arrayed binding; `bound_object` is its first element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array_size: Option<u32>,
    #[serde(default)]
    pub detail: SlotDetail,
}

impl SlotBinding {
    /// Creates an unbound, disabled slot
    pub fn new(category: SlotCategory, slot_index: u32) -> Self {
        Self {
            slot_index,
            category,
            name: None,
            bound_object: None,
            enabled: false,
            byte_offset: 0,
            byte_length: None,
            stride: None,
            resource: None,
            array_size: None,
            detail: SlotDetail::None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_object(mut self, object: Option<ObjectId>) -> Self {
        self.bound_object = object;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the bound byte range; a zero length means "whole resource"
    pub fn with_range(mut self, offset: u64, length: Option<u64>) -> Self {
        self.byte_offset = offset;
        self.byte_length = length.filter(|&len| len != 0);
        self
    }

    pub fn with_stride(mut self, stride: u32) -> Self {
        self.stride = Some(stride);
        self
    }

    pub fn with_resource(mut self, resource: Option<ResourceInfo>) -> Self {
        self.resource = resource;
        self
    }

    pub fn with_array_size(mut self, array_size: Option<u32>) -> Self {
        self.array_size = array_size;
        self
    }

    pub fn with_detail(mut self, detail: SlotDetail) -> Self {
        self.detail = detail;
        self
    }

    /// Returns true if nothing meaningful is bound to the slot
    ///
    /// Render targets are also empty when their write mask is zero, since
    /// nothing can reach them. Emptiness is independent of `enabled`.
    pub fn is_empty(&self) -> bool {
        if self.bound_object.is_none() {
            return true;
        }
        match (&self.category, &self.detail) {
            (SlotCategory::RenderTarget, SlotDetail::RenderTarget { write_mask }) => *write_mask == 0,
            _ => false,
        }
    }

    /// Identity of the slot within its stage
    pub fn key(&self) -> (SlotCategory, u32) {
        (self.category, self.slot_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_iff_unbound() {
        for category in SlotCategory::ALL {
            let unbound = SlotBinding::new(category, 0);
            assert!(unbound.is_empty(), "{category} unbound should be empty");
            assert!(unbound.clone().with_enabled(true).is_empty());

            let bound = SlotBinding::new(category, 0).with_object(Some(ObjectId(7)));
            assert!(!bound.is_empty(), "{category} bound should not be empty");
            assert!(!bound.with_enabled(false).is_empty());
        }
    }

    #[test]
    fn test_render_target_without_color_writes_is_empty() {
        let target = SlotBinding::new(SlotCategory::RenderTarget, 0).with_object(Some(ObjectId(3)));

        let masked = target.clone().with_detail(SlotDetail::RenderTarget { write_mask: 0 });
        assert!(masked.is_empty());

        let writing = target.with_detail(SlotDetail::RenderTarget { write_mask: 0xF });
        assert!(!writing.is_empty());
    }

    #[test]
    fn test_zero_length_means_whole_resource() {
        let slot = SlotBinding::new(SlotCategory::ConstantBuffer, 1).with_range(256, Some(0));
        assert_eq!(slot.byte_offset, 256);
        assert_eq!(slot.byte_length, None);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ResourceFormat::new(4, 1, ComponentType::UNorm).with_srgb(true).to_string(), "R8G8B8A8_UNORM_SRGB");
        assert_eq!(ResourceFormat::new(3, 4, ComponentType::Float).to_string(), "R32G32B32_FLOAT");
        assert_eq!(ResourceFormat::special("D24S8", ComponentType::Depth).to_string(), "D24S8");
        assert_eq!(ResourceFormat::new(2, 2, ComponentType::SInt).element_bytes(), 4);
    }

    #[test]
    fn test_resource_defaults_from_yaml() {
        let yaml = r#"
name: "Albedo"
kind: Texture2D
width: 512
height: 256
mip_levels: 10
format: { components: 4, component_bytes: 1, component_type: UNorm }
"#;
        let info: ResourceInfo = serde_norway::from_str(yaml).unwrap();
        assert_eq!(info.depth, 1);
        assert_eq!(info.array_size, 1);
        assert_eq!(info.mip_levels, 10);
        assert_eq!(info.dimensions(), "512x256");
        assert!(info.kind.is_texture());
    }
}

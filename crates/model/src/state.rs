//! Fixed-function state and per-stage state
//!
//! Every enum here uses backend-neutral vocabulary. Adapters translate their
//! native names into these values; display wording per backend is a concern of
//! the viewer crate, never of the model.

use crate::descriptor::{FixedFunctionKind, descriptor};
use crate::fields::{self, Field};
use crate::{ObjectId, SlotBinding, SlotCategory, StageKind};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Primitive topology of a draw
///
/// Serialised as its display string (`TriangleList`, `PatchList(3)`), so it
/// flattens to a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    LineLoop,
    #[default]
    TriangleList,
    TriangleStrip,
    TriangleFan,
    LineListAdj,
    LineStripAdj,
    TriangleListAdj,
    TriangleStripAdj,
    PatchList(u32),
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topology::PointList => write!(f, "PointList"),
            Topology::LineList => write!(f, "LineList"),
            Topology::LineStrip => write!(f, "LineStrip"),
            Topology::LineLoop => write!(f, "LineLoop"),
            Topology::TriangleList => write!(f, "TriangleList"),
            Topology::TriangleStrip => write!(f, "TriangleStrip"),
            Topology::TriangleFan => write!(f, "TriangleFan"),
            Topology::LineListAdj => write!(f, "LineListAdj"),
            Topology::LineStripAdj => write!(f, "LineStripAdj"),
            Topology::TriangleListAdj => write!(f, "TriangleListAdj"),
            Topology::TriangleStripAdj => write!(f, "TriangleStripAdj"),
            Topology::PatchList(points) => write!(f, "PatchList({points})"),
        }
    }
}

/// Error returned when a topology name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown topology `{0}`")]
pub struct TopologyParseError(pub String);

impl FromStr for Topology {
    type Err = TopologyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(points) = s.strip_prefix("PatchList(").and_then(|rest| rest.strip_suffix(')')) {
            let points = points.parse::<u32>().map_err(|_| TopologyParseError(s.to_string()))?;
            return Ok(Topology::PatchList(points));
        }

        match s {
            "PointList" => Ok(Topology::PointList),
            "LineList" => Ok(Topology::LineList),
            "LineStrip" => Ok(Topology::LineStrip),
            "LineLoop" => Ok(Topology::LineLoop),
            "TriangleList" => Ok(Topology::TriangleList),
            "TriangleStrip" => Ok(Topology::TriangleStrip),
            "TriangleFan" => Ok(Topology::TriangleFan),
            "LineListAdj" => Ok(Topology::LineListAdj),
            "LineStripAdj" => Ok(Topology::LineStripAdj),
            "TriangleListAdj" => Ok(Topology::TriangleListAdj),
            "TriangleStripAdj" => Ok(Topology::TriangleStripAdj),
            _ => Err(TopologyParseError(s.to_string())),
        }
    }
}

impl Serialize for Topology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Topology {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
    Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CullMode {
    None,
    Front,
    #[default]
    Back,
    FrontAndBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    #[default]
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StencilOp {
    #[default]
    Keep,
    Zero,
    Replace,
    IncrementSaturate,
    DecrementSaturate,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    DstColor,
    InvDstColor,
    SrcAlpha,
    InvSrcAlpha,
    DstAlpha,
    InvDstAlpha,
    ConstantColor,
    InvConstantColor,
    ConstantAlpha,
    InvConstantAlpha,
    SrcAlphaSaturate,
    Src1Color,
    InvSrc1Color,
    Src1Alpha,
    InvSrc1Alpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendOp {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    Clear,
    And,
    AndReverse,
    Copy,
    AndInverted,
    NoOp,
    Xor,
    Or,
    Nor,
    Equivalent,
    Invert,
    OrReverse,
    CopyInverted,
    OrInverted,
    Nand,
    Set,
}

/// Viewport rectangle and depth range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

/// Scissor rectangle; `enabled` mirrors the per-rectangle enable some backends expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScissorRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StencilFace {
    pub func: CompareFunc,
    pub fail_op: StencilOp,
    pub depth_fail_op: StencilOp,
    pub pass_op: StencilOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthStencilState {
    pub depth_enable: bool,
    pub depth_write: bool,
    pub depth_func: CompareFunc,
    pub depth_bounds_enable: bool,
    pub depth_bounds: DepthRange,
    pub stencil_enable: bool,
    pub stencil_read_mask: u32,
    pub stencil_write_mask: u32,
    pub stencil_ref: u32,
    pub front_face: StencilFace,
    pub back_face: StencilFace,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        Self {
            depth_enable: false,
            depth_write: true,
            depth_func: CompareFunc::Less,
            depth_bounds_enable: false,
            depth_bounds: DepthRange::default(),
            stencil_enable: false,
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
            stencil_ref: 0,
            front_face: StencilFace::default(),
            back_face: StencilFace::default(),
        }
    }
}

/// Source factor, destination factor and operator of one blend equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendEquation {
    pub source: BlendFactor,
    pub destination: BlendFactor,
    pub op: BlendOp,
}

impl Default for BlendEquation {
    fn default() -> Self {
        Self {
            source: BlendFactor::One,
            destination: BlendFactor::Zero,
            op: BlendOp::Add,
        }
    }
}

/// Blending of a single render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBlend {
    pub enabled: bool,
    pub color: BlendEquation,
    pub alpha: BlendEquation,
    pub logic_op: Option<LogicOp>,
    /// RGBA in bits 1/2/4/8
    pub write_mask: u8,
}

impl Default for TargetBlend {
    fn default() -> Self {
        Self {
            enabled: false,
            color: BlendEquation::default(),
            alpha: BlendEquation::default(),
            logic_op: None,
            write_mask: 0xF,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendState {
    pub blend_factor: [f32; 4],
    pub alpha_to_coverage: bool,
    pub independent_blend: bool,
    pub targets: Vec<TargetBlend>,
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            blend_factor: [1.0; 4],
            alpha_to_coverage: false,
            independent_blend: false,
            targets: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputAssemblyState {
    pub index_buffer: Option<ObjectId>,
    /// 0 when the draw is not indexed
    pub index_byte_width: u32,
    pub index_byte_offset: u64,
    pub primitive_restart: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterizerState {
    pub fill_mode: FillMode,
    pub cull_mode: CullMode,
    pub front_ccw: bool,
    pub depth_bias: f32,
    pub slope_scaled_bias: f32,
    pub depth_bias_clamp: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_lines: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            fill_mode: FillMode::Solid,
            cull_mode: CullMode::Back,
            front_ccw: false,
            depth_bias: 0.0,
            slope_scaled_bias: 0.0,
            depth_bias_clamp: 0.0,
            depth_clip_enable: true,
            scissor_enable: false,
            multisample_enable: false,
            antialiased_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OutputState {
    pub depth_stencil: DepthStencilState,
    pub blend: BlendState,
    pub depth_target: Option<ObjectId>,
    pub stencil_target: Option<ObjectId>,
    pub framebuffer_srgb: bool,
}

/// Fixed-function value object of one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FixedFunctionState {
    None,
    InputAssembly(InputAssemblyState),
    Rasterizer(RasterizerState),
    Output(OutputState),
}

impl FixedFunctionState {
    /// Default state of the shape `kind`
    pub fn default_for(kind: FixedFunctionKind) -> Self {
        match kind {
            FixedFunctionKind::None => FixedFunctionState::None,
            FixedFunctionKind::InputAssembly => FixedFunctionState::InputAssembly(InputAssemblyState::default()),
            FixedFunctionKind::Rasterizer => FixedFunctionState::Rasterizer(RasterizerState::default()),
            FixedFunctionKind::Output => FixedFunctionState::Output(OutputState::default()),
        }
    }

    pub fn kind(&self) -> FixedFunctionKind {
        match self {
            FixedFunctionState::None => FixedFunctionKind::None,
            FixedFunctionState::InputAssembly(_) => FixedFunctionKind::InputAssembly,
            FixedFunctionState::Rasterizer(_) => FixedFunctionKind::Rasterizer,
            FixedFunctionState::Output(_) => FixedFunctionKind::Output,
        }
    }

    /// Flattens the inner state into `path = value` leaves
    pub fn fields(&self) -> Result<Vec<Field>, serde_json::Error> {
        match self {
            FixedFunctionState::None => Ok(Vec::new()),
            FixedFunctionState::InputAssembly(state) => fields::flatten(state),
            FixedFunctionState::Rasterizer(state) => fields::flatten(state),
            FixedFunctionState::Output(state) => fields::flatten(state),
        }
    }

    pub fn as_rasterizer(&self) -> Option<&RasterizerState> {
        match self {
            FixedFunctionState::Rasterizer(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_output(&self) -> Option<&OutputState> {
        match self {
            FixedFunctionState::Output(state) => Some(state),
            _ => None,
        }
    }

    pub fn as_input_assembly(&self) -> Option<&InputAssemblyState> {
        match self {
            FixedFunctionState::InputAssembly(state) => Some(state),
            _ => None,
        }
    }
}

/// State of one pipeline stage at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageState {
    kind: StageKind,
    shader: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    shader_name: Option<String>,
    slots: Vec<SlotBinding>,
    fixed_function: FixedFunctionState,
}

impl StageState {
    /// Creates an unbound stage with the default fixed-function state of its shape
    pub fn new(kind: StageKind) -> Self {
        Self {
            kind,
            shader: None,
            shader_name: None,
            slots: Vec::new(),
            fixed_function: FixedFunctionState::default_for(descriptor(kind).fixed_function),
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn shader(&self) -> Option<ObjectId> {
        self.shader
    }

    pub fn shader_name(&self) -> Option<&str> {
        self.shader_name.as_deref()
    }

    /// All slots, grouped by category in category order
    pub fn slots(&self) -> &[SlotBinding] {
        &self.slots
    }

    /// Slots of one category in capture order
    pub fn slots_of(&self, category: SlotCategory) -> impl Iterator<Item = &SlotBinding> + '_ {
        self.slots.iter().filter(move |slot| slot.category == category)
    }

    /// Looks up a slot by its `(category, index)` key
    pub fn slot(&self, category: SlotCategory, slot_index: u32) -> Option<&SlotBinding> {
        self.slots.iter().find(|slot| slot.category == category && slot.slot_index == slot_index)
    }

    pub fn fixed_function(&self) -> &FixedFunctionState {
        &self.fixed_function
    }

    pub(crate) fn set_shader(&mut self, shader: Option<ObjectId>, name: Option<String>) {
        self.shader = shader;
        self.shader_name = name;
    }

    pub(crate) fn push_slot(&mut self, slot: SlotBinding) {
        self.slots.push(slot);
    }

    pub(crate) fn set_fixed_function(&mut self, state: FixedFunctionState) {
        self.fixed_function = state;
    }

    /// Groups slots by category, keeping capture order within a category
    pub(crate) fn sort_slots(&mut self) {
        self.slots.sort_by_key(|slot| slot.category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_string_form() {
        assert_eq!(Topology::PatchList(3).to_string(), "PatchList(3)");
        assert_eq!("PatchList(16)".parse::<Topology>().unwrap(), Topology::PatchList(16));
        assert_eq!("TriangleStrip".parse::<Topology>().unwrap(), Topology::TriangleStrip);
        assert!("Quads".parse::<Topology>().is_err());
        assert!("PatchList(x)".parse::<Topology>().is_err());

        let json = serde_json::to_string(&Topology::LineLoop).unwrap();
        assert_eq!(json, "\"LineLoop\"");
    }

    #[test]
    fn test_new_stage_uses_descriptor_shape() {
        for kind in StageKind::ALL {
            let stage = StageState::new(kind);
            assert_eq!(stage.fixed_function().kind(), descriptor(kind).fixed_function);
            assert!(stage.slots().is_empty());
        }
        assert!(StageState::new(StageKind::VertexShader).fixed_function().fields().unwrap().is_empty());
    }

    #[test]
    fn test_sort_slots_keeps_capture_order_within_category() {
        let mut stage = StageState::new(StageKind::FragmentShader);
        stage.push_slot(SlotBinding::new(SlotCategory::Sampler, 4));
        stage.push_slot(SlotBinding::new(SlotCategory::Resource, 2));
        stage.push_slot(SlotBinding::new(SlotCategory::Sampler, 1));
        stage.push_slot(SlotBinding::new(SlotCategory::Resource, 0));
        stage.sort_slots();

        let keys: Vec<_> = stage.slots().iter().map(SlotBinding::key).collect();
        assert_eq!(
            keys,
            vec![
                (SlotCategory::Resource, 2),
                (SlotCategory::Resource, 0),
                (SlotCategory::Sampler, 4),
                (SlotCategory::Sampler, 1),
            ]
        );
        assert_eq!(stage.slots_of(SlotCategory::Sampler).count(), 2);
        assert!(stage.slot(SlotCategory::Resource, 0).is_some());
        assert!(stage.slot(SlotCategory::Uav, 0).is_none());
    }

    #[test]
    fn test_rasterizer_fields_are_flat() {
        let state = FixedFunctionState::Rasterizer(RasterizerState::default());
        let fields = state.fields().unwrap();
        assert_eq!(fields[0].path, "fill_mode");
        assert_eq!(fields[1].path, "cull_mode");
        assert_eq!(fields[1].value, serde_json::json!("Back"));
    }
}

//! wgpu adapter
//!
//! [`WgpuState`] is what a capture layer wrapping a `wgpu::Device` records at
//! a draw or dispatch: the descriptor state of the bound pipeline (in `wgpu`'s
//! own types), the bind groups with their layout entries, and the dynamic pass
//! state. Bind group entries are flattened to slot `group * 1000 + binding`
//! and placed on every stage their visibility names; binding numbers of 1000
//! and above are reported as unsupported. A binding array stays one slot
//! carrying its element count.
//!
//! WebGPU has no tessellation or geometry stages, depth-bounds test, logic
//! ops or line anti-aliasing; those stay at their defaults and the
//! fixed-function ones are reported as unsupported.

use crate::adapter::{BackendAdapter, NativeEvent};
use crate::descriptor::descriptor;
use crate::state::{
    BlendEquation, BlendFactor, BlendOp, BlendState, CompareFunc, CullMode, DepthStencilState, FillMode, FixedFunctionState, InputAssemblyState, OutputState, RasterizerState,
    ScissorRect, StencilFace, StencilOp, TargetBlend, Topology, Viewport,
};
use crate::{
    AddressMode, BackendKind, ComponentType, FilterMode, ObjectId, PipelineSnapshot, ResourceFormat, SamplerInfo, SlotBinding, SlotCategory, SlotDetail, SnapshotBuilder, SnapshotError,
    StageKind,
};

/// Slot index stride between bind groups
pub const GROUP_SLOT_STRIDE: u32 = 1000;

/// Kind of pass the event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    Render,
    Compute,
}

/// Shader module and entry point of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderRef {
    pub module: ObjectId,
    pub entry_point: String,
}

/// Sampler parameters recorded at `create_sampler`
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerState {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub address_mode_w: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::FilterMode,
    pub lod_min_clamp: f32,
    pub lod_max_clamp: f32,
    pub compare: Option<wgpu::CompareFunction>,
    pub anisotropy_clamp: u16,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            compare: None,
            anisotropy_clamp: 1,
        }
    }
}

/// Resource bound to one bind group entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundResource {
    pub object: Option<ObjectId>,
    pub offset: u64,
    /// `None` binds the rest of the buffer
    pub size: Option<u64>,
    /// Present for sampler bindings
    pub sampler: Option<SamplerState>,
}

/// One layout entry of a bind group and what is bound to it
#[derive(Debug, Clone)]
pub struct BindGroupEntryState {
    pub layout: wgpu::BindGroupLayoutEntry,
    pub bound: BoundResource,
    pub label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BindGroupState {
    pub index: u32,
    pub entries: Vec<BindGroupEntryState>,
}

/// Vertex buffer layout of the pipeline and the buffer set for it
#[derive(Debug, Clone)]
pub struct VertexBufferState {
    pub array_stride: u64,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
    pub buffer: Option<ObjectId>,
    pub offset: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexBufferState {
    pub buffer: ObjectId,
    pub format: wgpu::IndexFormat,
    pub offset: u64,
}

/// State recorded at one wgpu draw or dispatch
#[derive(Debug, Clone)]
pub struct WgpuState {
    pub pass: PassKind,
    pub vertex_shader: Option<ShaderRef>,
    pub fragment_shader: Option<ShaderRef>,
    pub compute_shader: Option<ShaderRef>,
    pub bind_groups: Vec<BindGroupState>,
    pub vertex_buffers: Vec<VertexBufferState>,
    pub index_buffer: Option<IndexBufferState>,
    pub primitive: wgpu::PrimitiveState,
    pub depth_stencil: Option<wgpu::DepthStencilState>,
    pub multisample: wgpu::MultisampleState,
    pub targets: Vec<Option<wgpu::ColorTargetState>>,
    pub color_attachments: Vec<Option<ObjectId>>,
    pub depth_stencil_attachment: Option<ObjectId>,
    pub viewport: Option<Viewport>,
    pub scissor: Option<ScissorRect>,
    pub blend_constant: wgpu::Color,
    pub stencil_reference: u32,
}

impl WgpuState {
    /// Creates the state of a render pass with nothing bound
    pub fn render() -> Self {
        Self {
            pass: PassKind::Render,
            vertex_shader: None,
            fragment_shader: None,
            compute_shader: None,
            bind_groups: Vec::new(),
            vertex_buffers: Vec::new(),
            index_buffer: None,
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            targets: Vec::new(),
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
            viewport: None,
            scissor: None,
            blend_constant: wgpu::Color::TRANSPARENT,
            stencil_reference: 0,
        }
    }

    /// Creates the state of a compute pass with nothing bound
    pub fn compute() -> Self {
        Self {
            pass: PassKind::Compute,
            ..Self::render()
        }
    }
}

/// Translates recorded [`WgpuState`] into pipeline snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct WgpuAdapter;

impl BackendAdapter for WgpuAdapter {
    type Native = WgpuState;

    fn backend_kind(&self) -> BackendKind {
        BackendKind::WebGpu
    }

    fn build_snapshot(&self, event: NativeEvent<'_, WgpuState>) -> Result<PipelineSnapshot, SnapshotError> {
        let state = event.state;
        let mut builder = SnapshotBuilder::new(event.event_id, BackendKind::WebGpu);

        let shaders = match state.pass {
            PassKind::Render => [
                (StageKind::VertexShader, wgpu::ShaderStages::VERTEX, &state.vertex_shader),
                (StageKind::FragmentShader, wgpu::ShaderStages::FRAGMENT, &state.fragment_shader),
            ]
            .to_vec(),
            PassKind::Compute => vec![(StageKind::Compute, wgpu::ShaderStages::COMPUTE, &state.compute_shader)],
        };

        for &(stage, _, shader) in &shaders {
            if let Some(shader) = shader {
                builder.set_shader(stage, Some(shader.module), Some(shader.entry_point.clone()));
            }
        }
        for group in &state.bind_groups {
            for entry in &group.entries {
                bind_entry(&mut builder, &event, group.index, entry, &shaders);
            }
        }

        if state.pass == PassKind::Render {
            vertex_input(&mut builder, &event);
            rasterizer(&mut builder, state);
            output(&mut builder, &event);
        }

        builder.build()
    }
}

fn bind_entry(builder: &mut SnapshotBuilder, event: &NativeEvent<'_, WgpuState>, group: u32, entry: &BindGroupEntryState, shaders: &[(StageKind, wgpu::ShaderStages, &Option<ShaderRef>)]) {
    if entry.layout.binding >= GROUP_SLOT_STRIDE {
        for &(stage, visibility, _) in shaders {
            if entry.layout.visibility.contains(visibility) {
                builder.report_unsupported(
                    stage,
                    format!("bind_groups[{group}].bindings[{}]", entry.layout.binding),
                    format!("binding numbers from {GROUP_SLOT_STRIDE} up cannot be shown"),
                );
            }
        }
        return;
    }
    let slot_index = group * GROUP_SLOT_STRIDE + entry.layout.binding;
    let category = match entry.layout.ty {
        wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            ..
        } => SlotCategory::ConstantBuffer,
        wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: true },
            ..
        } => SlotCategory::Resource,
        wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            ..
        } => SlotCategory::Uav,
        wgpu::BindingType::Texture { .. } => SlotCategory::Resource,
        wgpu::BindingType::StorageTexture {
            access: wgpu::StorageTextureAccess::ReadOnly,
            ..
        } => SlotCategory::Resource,
        wgpu::BindingType::StorageTexture { .. } => SlotCategory::Uav,
        wgpu::BindingType::Sampler(_) => SlotCategory::Sampler,
        ref other => {
            for &(stage, visibility, _) in shaders {
                if entry.layout.visibility.contains(visibility) {
                    builder.report_unsupported(stage, format!("bindings[{slot_index}]"), format!("binding type {other:?} has no slot category"));
                }
            }
            return;
        }
    };

    let detail = match (&category, &entry.bound.sampler) {
        (SlotCategory::Sampler, Some(sampler)) => SlotDetail::Sampler(sampler_info(sampler)),
        _ => SlotDetail::None,
    };

    for &(stage, visibility, _) in shaders {
        if !entry.layout.visibility.contains(visibility) {
            continue;
        }
        if !descriptor(stage).accepts(category) {
            builder.report_unsupported(stage, format!("bindings[{slot_index}]"), format!("{category} are not shown for this stage"));
            continue;
        }

        let mut slot = SlotBinding::new(category, slot_index)
            .with_object(entry.bound.object)
            .with_enabled(true)
            .with_range(entry.bound.offset, entry.bound.size)
            .with_resource(event.resource(entry.bound.object))
            .with_array_size(entry.layout.count.map(|count| count.get()))
            .with_detail(detail.clone());
        if let Some(label) = &entry.label {
            slot = slot.with_name(label);
        }
        builder.push_slot(stage, slot);
    }
}

fn vertex_input(builder: &mut SnapshotBuilder, event: &NativeEvent<'_, WgpuState>) {
    let state = event.state;
    let stage = StageKind::VertexInput;

    for (index, buffer) in state.vertex_buffers.iter().enumerate() {
        let divisor = match buffer.step_mode {
            wgpu::VertexStepMode::Vertex => 0,
            wgpu::VertexStepMode::Instance => 1,
        };
        let slot = SlotBinding::new(SlotCategory::VertexBuffer, index as u32)
            .with_object(buffer.buffer)
            .with_enabled(!buffer.attributes.is_empty())
            .with_range(buffer.offset, None)
            .with_stride(buffer.array_stride as u32)
            .with_resource(event.resource(buffer.buffer))
            .with_detail(SlotDetail::VertexBuffer { divisor });
        builder.push_slot(stage, slot);
    }

    let mut attributes: Vec<_> = state
        .vertex_buffers
        .iter()
        .enumerate()
        .flat_map(|(index, buffer)| buffer.attributes.iter().map(move |attribute| (index as u32, buffer.buffer, attribute)))
        .collect();
    attributes.sort_by_key(|(_, _, attribute)| attribute.shader_location);
    for (source_slot, buffer, attribute) in attributes {
        let slot = SlotBinding::new(SlotCategory::VertexAttribute, attribute.shader_location)
            .with_object(buffer)
            .with_enabled(true)
            .with_range(attribute.offset, None)
            .with_detail(SlotDetail::VertexAttribute {
                source_slot,
                format: vertex_format(attribute.format),
                generic_value: [0.0, 0.0, 0.0, 1.0],
            });
        builder.push_slot(stage, slot);
    }

    let primitive = &state.primitive;
    let topology = match primitive.topology {
        wgpu::PrimitiveTopology::PointList => Topology::PointList,
        wgpu::PrimitiveTopology::LineList => Topology::LineList,
        wgpu::PrimitiveTopology::LineStrip => Topology::LineStrip,
        wgpu::PrimitiveTopology::TriangleList => Topology::TriangleList,
        wgpu::PrimitiveTopology::TriangleStrip => Topology::TriangleStrip,
    };
    // Strips always restart on the all-ones index of their index format
    let restart_index = match (primitive.topology.is_strip(), primitive.strip_index_format) {
        (true, Some(wgpu::IndexFormat::Uint16)) => Some(0xFFFF),
        (true, Some(wgpu::IndexFormat::Uint32)) => Some(0xFFFF_FFFF),
        _ => None,
    };
    builder.set_topology(topology, restart_index);

    let input_assembly = InputAssemblyState {
        index_buffer: state.index_buffer.map(|index| index.buffer),
        index_byte_width: state.index_buffer.map_or(0, |index| index_byte_width(index.format)),
        index_byte_offset: state.index_buffer.map_or(0, |index| index.offset),
        primitive_restart: restart_index.is_some(),
    };
    builder.set_fixed_function(stage, FixedFunctionState::InputAssembly(input_assembly));
}

fn rasterizer(builder: &mut SnapshotBuilder, state: &WgpuState) {
    let primitive = &state.primitive;
    let bias = state.depth_stencil.as_ref().map(|depth_stencil| depth_stencil.bias).unwrap_or_default();

    let rasterizer = RasterizerState {
        fill_mode: match primitive.polygon_mode {
            wgpu::PolygonMode::Fill => FillMode::Solid,
            wgpu::PolygonMode::Line => FillMode::Wireframe,
            wgpu::PolygonMode::Point => FillMode::Point,
        },
        cull_mode: match primitive.cull_mode {
            None => CullMode::None,
            Some(wgpu::Face::Front) => CullMode::Front,
            Some(wgpu::Face::Back) => CullMode::Back,
        },
        front_ccw: primitive.front_face == wgpu::FrontFace::Ccw,
        depth_bias: bias.constant as f32,
        slope_scaled_bias: bias.slope_scale,
        depth_bias_clamp: bias.clamp,
        depth_clip_enable: !primitive.unclipped_depth,
        scissor_enable: state.scissor.is_some(),
        multisample_enable: state.multisample.count > 1,
        antialiased_lines: false,
    };
    builder.set_fixed_function(StageKind::Rasterizer, FixedFunctionState::Rasterizer(rasterizer));
    builder.report_unsupported(StageKind::Rasterizer, "antialiased_lines", "WebGPU has no line anti-aliasing");

    if let Some(viewport) = state.viewport {
        builder.push_viewport(viewport);
    }
    if let Some(scissor) = state.scissor {
        builder.push_scissor(scissor);
    }
}

fn output(builder: &mut SnapshotBuilder, event: &NativeEvent<'_, WgpuState>) {
    let state = event.state;
    let stage = StageKind::FrameBuffer;

    let mut depth_stencil = DepthStencilState::default();
    let mut depth_target = None;
    let mut stencil_target = None;
    if let Some(native) = &state.depth_stencil {
        let has_depth = native.format.has_depth_aspect();
        let has_stencil = native.format.has_stencil_aspect();
        depth_stencil = DepthStencilState {
            depth_enable: has_depth,
            depth_write: native.depth_write_enabled,
            depth_func: compare_func(native.depth_compare),
            stencil_enable: has_stencil && native.stencil.is_enabled(),
            stencil_read_mask: native.stencil.read_mask,
            stencil_write_mask: native.stencil.write_mask,
            stencil_ref: state.stencil_reference,
            front_face: stencil_face(&native.stencil.front),
            back_face: stencil_face(&native.stencil.back),
            ..DepthStencilState::default()
        };
        depth_target = state.depth_stencil_attachment.filter(|_| has_depth);
        stencil_target = state.depth_stencil_attachment.filter(|_| has_stencil);
    }
    builder.report_unsupported(stage, "depth_stencil.depth_bounds_enable", "WebGPU has no depth bounds test");

    let targets: Vec<TargetBlend> = state.targets.iter().map(target_blend).collect();
    builder.report_unsupported(stage, "blend.targets.logic_op", "WebGPU has no logic ops");

    for (index, attachment) in state.color_attachments.iter().enumerate() {
        let target = state.targets.get(index).and_then(Option::as_ref);
        let write_mask = targets.get(index).map_or(0, |target| target.write_mask);
        let slot = SlotBinding::new(SlotCategory::RenderTarget, index as u32)
            .with_object(*attachment)
            .with_enabled(target.is_some())
            .with_resource(event.resource(*attachment))
            .with_detail(SlotDetail::RenderTarget { write_mask });
        builder.push_slot(stage, slot);
    }

    let constant = state.blend_constant;
    let output = OutputState {
        depth_stencil,
        blend: BlendState {
            blend_factor: [constant.r as f32, constant.g as f32, constant.b as f32, constant.a as f32],
            alpha_to_coverage: state.multisample.alpha_to_coverage_enabled,
            independent_blend: targets.windows(2).any(|pair| pair[0] != pair[1]),
            targets,
        },
        depth_target,
        stencil_target,
        framebuffer_srgb: state.targets.iter().flatten().any(|target| target.format.is_srgb()),
    };
    builder.set_fixed_function(stage, FixedFunctionState::Output(output));
}

/// Blend of one colour target; a hole in the target list writes nothing
fn target_blend(target: &Option<wgpu::ColorTargetState>) -> TargetBlend {
    let Some(target) = target else {
        return TargetBlend {
            write_mask: 0,
            ..TargetBlend::default()
        };
    };

    let mut blend = TargetBlend {
        write_mask: target.write_mask.bits() as u8,
        ..TargetBlend::default()
    };
    if let Some(state) = target.blend {
        blend.enabled = true;
        blend.color = blend_equation(state.color);
        blend.alpha = blend_equation(state.alpha);
    }
    blend
}

fn blend_equation(component: wgpu::BlendComponent) -> BlendEquation {
    BlendEquation {
        source: blend_factor(component.src_factor),
        destination: blend_factor(component.dst_factor),
        op: match component.operation {
            wgpu::BlendOperation::Add => BlendOp::Add,
            wgpu::BlendOperation::Subtract => BlendOp::Subtract,
            wgpu::BlendOperation::ReverseSubtract => BlendOp::ReverseSubtract,
            wgpu::BlendOperation::Min => BlendOp::Min,
            wgpu::BlendOperation::Max => BlendOp::Max,
        },
    }
}

fn blend_factor(factor: wgpu::BlendFactor) -> BlendFactor {
    match factor {
        wgpu::BlendFactor::Zero => BlendFactor::Zero,
        wgpu::BlendFactor::One => BlendFactor::One,
        wgpu::BlendFactor::Src => BlendFactor::SrcColor,
        wgpu::BlendFactor::OneMinusSrc => BlendFactor::InvSrcColor,
        wgpu::BlendFactor::SrcAlpha => BlendFactor::SrcAlpha,
        wgpu::BlendFactor::OneMinusSrcAlpha => BlendFactor::InvSrcAlpha,
        wgpu::BlendFactor::Dst => BlendFactor::DstColor,
        wgpu::BlendFactor::OneMinusDst => BlendFactor::InvDstColor,
        wgpu::BlendFactor::DstAlpha => BlendFactor::DstAlpha,
        wgpu::BlendFactor::OneMinusDstAlpha => BlendFactor::InvDstAlpha,
        wgpu::BlendFactor::SrcAlphaSaturated => BlendFactor::SrcAlphaSaturate,
        wgpu::BlendFactor::Constant => BlendFactor::ConstantColor,
        wgpu::BlendFactor::OneMinusConstant => BlendFactor::InvConstantColor,
        wgpu::BlendFactor::Src1 => BlendFactor::Src1Color,
        wgpu::BlendFactor::OneMinusSrc1 => BlendFactor::InvSrc1Color,
        wgpu::BlendFactor::Src1Alpha => BlendFactor::Src1Alpha,
        wgpu::BlendFactor::OneMinusSrc1Alpha => BlendFactor::InvSrc1Alpha,
    }
}

fn compare_func(func: wgpu::CompareFunction) -> CompareFunc {
    match func {
        wgpu::CompareFunction::Never => CompareFunc::Never,
        wgpu::CompareFunction::Less => CompareFunc::Less,
        wgpu::CompareFunction::Equal => CompareFunc::Equal,
        wgpu::CompareFunction::LessEqual => CompareFunc::LessEqual,
        wgpu::CompareFunction::Greater => CompareFunc::Greater,
        wgpu::CompareFunction::NotEqual => CompareFunc::NotEqual,
        wgpu::CompareFunction::GreaterEqual => CompareFunc::GreaterEqual,
        wgpu::CompareFunction::Always => CompareFunc::Always,
    }
}

fn stencil_op(op: wgpu::StencilOperation) -> StencilOp {
    match op {
        wgpu::StencilOperation::Keep => StencilOp::Keep,
        wgpu::StencilOperation::Zero => StencilOp::Zero,
        wgpu::StencilOperation::Replace => StencilOp::Replace,
        wgpu::StencilOperation::Invert => StencilOp::Invert,
        wgpu::StencilOperation::IncrementClamp => StencilOp::IncrementSaturate,
        wgpu::StencilOperation::DecrementClamp => StencilOp::DecrementSaturate,
        wgpu::StencilOperation::IncrementWrap => StencilOp::IncrementWrap,
        wgpu::StencilOperation::DecrementWrap => StencilOp::DecrementWrap,
    }
}

fn stencil_face(face: &wgpu::StencilFaceState) -> StencilFace {
    StencilFace {
        func: compare_func(face.compare),
        fail_op: stencil_op(face.fail_op),
        depth_fail_op: stencil_op(face.depth_fail_op),
        pass_op: stencil_op(face.pass_op),
    }
}

fn index_byte_width(format: wgpu::IndexFormat) -> u32 {
    match format {
        wgpu::IndexFormat::Uint16 => 2,
        wgpu::IndexFormat::Uint32 => 4,
    }
}

fn address_mode(mode: wgpu::AddressMode) -> AddressMode {
    match mode {
        wgpu::AddressMode::ClampToEdge => AddressMode::Clamp,
        wgpu::AddressMode::Repeat => AddressMode::Wrap,
        wgpu::AddressMode::MirrorRepeat => AddressMode::Mirror,
        wgpu::AddressMode::ClampToBorder => AddressMode::Border,
    }
}

fn filter_mode(mode: wgpu::FilterMode) -> FilterMode {
    match mode {
        wgpu::FilterMode::Nearest => FilterMode::Point,
        wgpu::FilterMode::Linear => FilterMode::Linear,
    }
}

fn sampler_info(sampler: &SamplerState) -> SamplerInfo {
    let anisotropic = sampler.anisotropy_clamp > 1;
    let filter = |mode| if anisotropic { FilterMode::Anisotropic } else { filter_mode(mode) };
    SamplerInfo {
        address_u: address_mode(sampler.address_mode_u),
        address_v: address_mode(sampler.address_mode_v),
        address_w: address_mode(sampler.address_mode_w),
        min_filter: filter(sampler.min_filter),
        mag_filter: filter(sampler.mag_filter),
        mip_filter: filter_mode(sampler.mipmap_filter),
        max_anisotropy: sampler.anisotropy_clamp as u32,
        min_lod: sampler.lod_min_clamp,
        max_lod: sampler.lod_max_clamp,
        lod_bias: 0.0,
        border_color: [0.0; 4],
        compare: sampler.compare.map(compare_func),
    }
}

/// Normalizes a vertex format; packed formats keep their wgpu name
fn vertex_format(format: wgpu::VertexFormat) -> ResourceFormat {
    use ComponentType::*;
    use wgpu::VertexFormat as V;

    let (components, bytes, component_type) = match format {
        V::Uint8x2 => (2, 1, UInt),
        V::Uint8x4 => (4, 1, UInt),
        V::Sint8x2 => (2, 1, SInt),
        V::Sint8x4 => (4, 1, SInt),
        V::Unorm8x2 => (2, 1, UNorm),
        V::Unorm8x4 => (4, 1, UNorm),
        V::Snorm8x2 => (2, 1, SNorm),
        V::Snorm8x4 => (4, 1, SNorm),
        V::Uint16x2 => (2, 2, UInt),
        V::Uint16x4 => (4, 2, UInt),
        V::Sint16x2 => (2, 2, SInt),
        V::Sint16x4 => (4, 2, SInt),
        V::Unorm16x2 => (2, 2, UNorm),
        V::Unorm16x4 => (4, 2, UNorm),
        V::Snorm16x2 => (2, 2, SNorm),
        V::Snorm16x4 => (4, 2, SNorm),
        V::Float16x2 => (2, 2, Float),
        V::Float16x4 => (4, 2, Float),
        V::Float32 => (1, 4, Float),
        V::Float32x2 => (2, 4, Float),
        V::Float32x3 => (3, 4, Float),
        V::Float32x4 => (4, 4, Float),
        V::Uint32 => (1, 4, UInt),
        V::Uint32x2 => (2, 4, UInt),
        V::Uint32x3 => (3, 4, UInt),
        V::Uint32x4 => (4, 4, UInt),
        V::Sint32 => (1, 4, SInt),
        V::Sint32x2 => (2, 4, SInt),
        V::Sint32x3 => (3, 4, SInt),
        V::Sint32x4 => (4, 4, SInt),
        V::Float64 => (1, 8, Double),
        V::Float64x2 => (2, 8, Double),
        V::Float64x3 => (3, 8, Double),
        V::Float64x4 => (4, 8, Double),
        other => return ResourceFormat::special(format!("{other:?}"), UNorm),
    };
    ResourceFormat::new(components, bytes, component_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::capture_snapshot;
    use crate::capture::{CapturedEvent, CaptureLog};

    fn entry(binding: u32, visibility: wgpu::ShaderStages, ty: wgpu::BindingType, object: u64) -> BindGroupEntryState {
        BindGroupEntryState {
            layout: wgpu::BindGroupLayoutEntry {
                binding,
                visibility,
                ty,
                count: None,
            },
            bound: BoundResource {
                object: Some(ObjectId(object)),
                ..BoundResource::default()
            },
            label: None,
        }
    }

    fn render_state() -> WgpuState {
        let mut state = WgpuState::render();
        state.vertex_shader = Some(ShaderRef {
            module: ObjectId(1),
            entry_point: "vs_main".to_string(),
        });
        state.fragment_shader = Some(ShaderRef {
            module: ObjectId(1),
            entry_point: "fs_main".to_string(),
        });
        state.bind_groups = vec![BindGroupState {
            index: 1,
            entries: vec![
                entry(
                    0,
                    wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    10,
                ),
                entry(
                    1,
                    wgpu::ShaderStages::FRAGMENT,
                    wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    11,
                ),
                entry(2, wgpu::ShaderStages::FRAGMENT, wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering), 12),
            ],
        }];
        state.vertex_buffers = vec![VertexBufferState {
            array_stride: 20,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: vec![
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
            ],
            buffer: Some(ObjectId(30)),
            offset: 0,
        }];
        state.primitive.cull_mode = Some(wgpu::Face::Back);
        state.targets = vec![Some(wgpu::ColorTargetState {
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        state.color_attachments = vec![Some(ObjectId(40))];
        state
    }

    fn build(state: WgpuState) -> PipelineSnapshot {
        let mut log = CaptureLog::new(BackendKind::WebGpu);
        log.events.push(CapturedEvent {
            event_id: 5,
            name: "draw".to_string(),
            state,
        });
        capture_snapshot(&log, &WgpuAdapter, 5).unwrap()
    }

    #[test]
    fn test_bindings_split_by_visibility() {
        let snapshot = build(render_state());

        let vertex = snapshot.stage(StageKind::VertexShader).unwrap();
        assert_eq!(vertex.shader_name(), Some("vs_main"));
        let keys: Vec<_> = vertex.slots().iter().map(SlotBinding::key).collect();
        assert_eq!(keys, vec![(SlotCategory::ConstantBuffer, 1000)]);

        let fragment = snapshot.stage(StageKind::FragmentShader).unwrap();
        let keys: Vec<_> = fragment.slots().iter().map(SlotBinding::key).collect();
        assert_eq!(keys, vec![(SlotCategory::Resource, 1001), (SlotCategory::Sampler, 1002), (SlotCategory::ConstantBuffer, 1000)]);

        assert!(snapshot.stage(StageKind::Compute).unwrap().slots().is_empty());
        assert!(snapshot.stage(StageKind::Geometry).unwrap().slots().is_empty());
    }

    #[test]
    fn test_vertex_input_and_fixed_function() {
        let snapshot = build(render_state());

        let input = snapshot.stage(StageKind::VertexInput).unwrap();
        let locations: Vec<_> = input.slots_of(SlotCategory::VertexAttribute).map(|slot| (slot.slot_index, slot.byte_offset)).collect();
        assert_eq!(locations, vec![(0, 0), (1, 12)]);
        assert_eq!(input.slot(SlotCategory::VertexBuffer, 0).unwrap().stride, Some(20));
        assert_eq!(snapshot.topology(), Topology::TriangleList);
        assert_eq!(snapshot.restart_index(), None);

        let rasterizer = snapshot.stage(StageKind::Rasterizer).unwrap().fixed_function().as_rasterizer().unwrap();
        assert_eq!(rasterizer.cull_mode, CullMode::Back);
        assert!(rasterizer.front_ccw);

        let output = snapshot.stage(StageKind::FrameBuffer).unwrap().fixed_function().as_output().unwrap();
        assert!(output.framebuffer_srgb);
        assert!(output.blend.targets[0].enabled);
        assert_eq!(output.blend.targets[0].color.source, BlendFactor::SrcAlpha);
        assert_eq!(output.blend.targets[0].write_mask, 0xF);
        assert!(!output.depth_stencil.depth_enable);
    }

    #[test]
    fn test_unsupported_fields_are_reported() {
        let snapshot = build(render_state());
        let fields: Vec<_> = snapshot.unsupported().iter().map(|report| report.field.as_str()).collect();
        assert_eq!(fields, vec!["antialiased_lines", "depth_stencil.depth_bounds_enable", "blend.targets.logic_op"]);
    }

    #[test]
    fn test_compute_pass_uses_storage_as_uav() {
        let mut state = WgpuState::compute();
        state.compute_shader = Some(ShaderRef {
            module: ObjectId(2),
            entry_point: "main".to_string(),
        });
        state.bind_groups = vec![BindGroupState {
            index: 0,
            entries: vec![
                entry(
                    0,
                    wgpu::ShaderStages::COMPUTE,
                    wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: wgpu::TextureFormat::Rgba16Float,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    50,
                ),
                entry(
                    1,
                    wgpu::ShaderStages::COMPUTE,
                    wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    51,
                ),
            ],
        }];

        let snapshot = build(state);
        let compute = snapshot.stage(StageKind::Compute).unwrap();
        assert_eq!(compute.shader(), Some(ObjectId(2)));
        assert_eq!(compute.slot(SlotCategory::Uav, 0).unwrap().bound_object, Some(ObjectId(50)));
        assert_eq!(compute.slot(SlotCategory::Resource, 1).unwrap().bound_object, Some(ObjectId(51)));
        assert!(snapshot.unsupported().is_empty());
        assert!(snapshot.stage(StageKind::VertexShader).unwrap().slots().is_empty());
    }

    #[test]
    fn test_writable_storage_in_vertex_stage_is_reported() {
        let mut state = render_state();
        state.bind_groups[0].entries.push(entry(
            3,
            wgpu::ShaderStages::VERTEX,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            60,
        ));

        let snapshot = build(state);
        assert_eq!(snapshot.unsupported()[0].stage, StageKind::VertexShader);
        assert_eq!(snapshot.unsupported()[0].field, "bindings[1003]");
    }

    #[test]
    fn test_binding_beyond_group_stride_is_reported() {
        let mut state = render_state();
        let group = state.bind_groups[0].index;
        state.bind_groups[0].entries.push(entry(
            GROUP_SLOT_STRIDE,
            wgpu::ShaderStages::FRAGMENT,
            wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            61,
        ));

        let snapshot = build(state);
        let report = snapshot.unsupported().iter().find(|report| report.stage == StageKind::FragmentShader).unwrap();
        assert_eq!(report.field, format!("bind_groups[{group}].bindings[{GROUP_SLOT_STRIDE}]"));

        let fragment = snapshot.stage(StageKind::FragmentShader).unwrap();
        assert!(fragment.slots().iter().all(|slot| slot.slot_index / GROUP_SLOT_STRIDE == group));
        assert!(fragment.slots().iter().all(|slot| slot.bound_object != Some(ObjectId(61))));
    }

    #[test]
    fn test_binding_array_keeps_element_count() {
        let mut state = render_state();
        let mut textures = entry(
            5,
            wgpu::ShaderStages::FRAGMENT,
            wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            62,
        );
        textures.layout.count = std::num::NonZeroU32::new(4);
        state.bind_groups[0].entries.push(textures);

        let snapshot = build(state);
        let fragment = snapshot.stage(StageKind::FragmentShader).unwrap();
        let slot = fragment.slot(SlotCategory::Resource, GROUP_SLOT_STRIDE + 5).unwrap();
        assert_eq!(slot.array_size, Some(4));
        assert_eq!(slot.bound_object, Some(ObjectId(62)));
        assert_eq!(fragment.slot(SlotCategory::Resource, GROUP_SLOT_STRIDE + 1).unwrap().array_size, None);
    }
}

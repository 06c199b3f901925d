//! OpenGL reference adapter

use super::convert;
use super::state::{GlProgramStage, GlSamplerParams, GlShaderStage, GlState, GlStencilFace};
use crate::adapter::{BackendAdapter, NativeEvent};
use crate::descriptor::descriptor;
use crate::state::{
    BlendEquation, BlendFactor, BlendOp, BlendState, CompareFunc, CullMode, DepthRange, DepthStencilState, FillMode, FixedFunctionState, InputAssemblyState, OutputState,
    RasterizerState, ScissorRect, StencilFace, StencilOp, TargetBlend, Topology, Viewport,
};
use crate::{
    AddressMode, BackendKind, ComponentType, FilterMode, PipelineSnapshot, ResourceFormat, SamplerInfo, SlotBinding, SlotCategory, SlotDetail, SnapshotBuilder, SnapshotError, StageKind,
};
use std::fmt::Debug;

/// Translates recorded [`GlState`] into pipeline snapshots
#[derive(Debug, Clone, Copy, Default)]
pub struct GlAdapter;

impl GlAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl BackendAdapter for GlAdapter {
    type Native = GlState;

    fn backend_kind(&self) -> BackendKind {
        BackendKind::OpenGl
    }

    fn build_snapshot(&self, event: NativeEvent<'_, GlState>) -> Result<PipelineSnapshot, SnapshotError> {
        let mut translator = Translator {
            builder: SnapshotBuilder::new(event.event_id, BackendKind::OpenGl),
            event,
            state: event.state,
        };

        translator.vertex_input();
        for (&stage, program) in &event.state.programs {
            translator.shader_stage(stage_kind(stage), program);
        }
        translator.rasterizer();
        translator.output();

        translator.builder.build()
    }
}

fn stage_kind(stage: GlShaderStage) -> StageKind {
    match stage {
        GlShaderStage::Vertex => StageKind::VertexShader,
        GlShaderStage::TessControl => StageKind::TessControl,
        GlShaderStage::TessEval => StageKind::TessEval,
        GlShaderStage::Geometry => StageKind::Geometry,
        GlShaderStage::Fragment => StageKind::FragmentShader,
        GlShaderStage::Compute => StageKind::Compute,
    }
}

struct Translator<'a> {
    builder: SnapshotBuilder,
    event: NativeEvent<'a, GlState>,
    state: &'a GlState,
}

impl Translator<'_> {
    /// Unwraps a converted enum, reporting the field and using `default` if the name was unknown
    fn normalize<T: Debug>(&mut self, stage: StageKind, field: &str, name: &str, value: Option<T>, default: T) -> T {
        match value {
            Some(value) => value,
            None => {
                self.builder.report_unsupported(stage, field, format!("unknown GL enum `{name}`, using {default:?}"));
                default
            }
        }
    }

    fn vertex_input(&mut self) {
        let state = self.state;
        let stage = StageKind::VertexInput;
        let vertex_array = &state.vertex_array;

        for (index, buffer) in vertex_array.buffers.iter().enumerate() {
            let index = index as u32;
            let used = vertex_array.attributes.iter().any(|attrib| attrib.enabled && attrib.binding == index);
            let slot = SlotBinding::new(SlotCategory::VertexBuffer, index)
                .with_object(buffer.buffer)
                .with_enabled(used)
                .with_range(buffer.offset, None)
                .with_stride(buffer.stride)
                .with_resource(self.event.resource(buffer.buffer))
                .with_detail(SlotDetail::VertexBuffer { divisor: buffer.divisor });
            self.builder.push_slot(stage, slot);
        }

        for (index, attrib) in vertex_array.attributes.iter().enumerate() {
            let converted = convert::attribute_format(attrib.size, attrib.bgra, &attrib.kind, attrib.normalized, attrib.integer);
            let format = self.normalize(
                stage,
                &format!("attributes[{index}].format"),
                &attrib.kind,
                converted,
                ResourceFormat::new(4, 4, ComponentType::Float),
            );
            let source = vertex_array.buffers.get(attrib.binding as usize).and_then(|buffer| buffer.buffer);
            let slot = SlotBinding::new(SlotCategory::VertexAttribute, index as u32)
                .with_object(source)
                .with_enabled(attrib.enabled)
                .with_range(attrib.relative_offset as u64, None)
                .with_detail(SlotDetail::VertexAttribute {
                    source_slot: attrib.binding,
                    format,
                    generic_value: attrib.generic_value,
                });
            self.builder.push_slot(stage, slot);
        }

        let topology = convert::topology(&state.primitive_mode, state.patch_vertices);
        let topology = self.normalize(stage, "topology", &state.primitive_mode, topology, Topology::TriangleList);

        let fixed_index = state.is_enabled("GL_PRIMITIVE_RESTART_FIXED_INDEX");
        let restart = state.is_enabled("GL_PRIMITIVE_RESTART");
        let restart_index = if fixed_index {
            Some(u32::MAX)
        } else if restart {
            Some(state.restart_index)
        } else {
            None
        };
        self.builder.set_topology(topology, restart_index);

        let index_byte_width = match &state.index_type {
            Some(index_type) => {
                let width = convert::index_byte_width(index_type);
                self.normalize(stage, "index_byte_width", index_type, width, 0)
            }
            None => 0,
        };
        let input_assembly = InputAssemblyState {
            index_buffer: vertex_array.element_buffer,
            index_byte_width,
            index_byte_offset: state.index_offset,
            primitive_restart: fixed_index || restart,
        };
        self.builder.set_fixed_function(stage, FixedFunctionState::InputAssembly(input_assembly));
    }

    fn shader_stage(&mut self, stage: StageKind, program: &GlProgramStage) {
        let state = self.state;
        self.builder.set_shader(stage, Some(program.shader), program.name.clone());

        for (unit, texture_unit) in state.texture_units.iter().enumerate() {
            let unit = unit as u32;
            let reader = program.texture_units.get(&unit);

            let mut resource = SlotBinding::new(SlotCategory::Resource, unit)
                .with_object(texture_unit.texture)
                .with_enabled(reader.is_some())
                .with_resource(self.event.resource(texture_unit.texture));
            if let Some(name) = reader {
                resource = resource.with_name(name);
            }
            self.builder.push_slot(stage, resource);

            // Texture buffers are fetched, never sampled
            let mut sampler = SlotBinding::new(SlotCategory::Sampler, unit).with_enabled(reader.is_some());
            if texture_unit.target != "GL_TEXTURE_BUFFER" {
                let object = texture_unit.sampler.or(texture_unit.texture);
                let info = self.sampler_info(stage, unit, &texture_unit.params);
                sampler = sampler
                    .with_object(object)
                    .with_resource(self.event.resource(texture_unit.sampler))
                    .with_detail(SlotDetail::Sampler(info));
            }
            if let Some(name) = reader {
                sampler = sampler.with_name(name);
            }
            self.builder.push_slot(stage, sampler);
        }

        for (binding, buffer) in state.uniform_buffers.iter().enumerate() {
            let binding = binding as u32;
            let reader = program.uniform_blocks.get(&binding);
            let mut slot = SlotBinding::new(SlotCategory::ConstantBuffer, binding)
                .with_object(buffer.buffer)
                .with_enabled(reader.is_some())
                .with_range(buffer.offset, Some(buffer.size))
                .with_resource(self.event.resource(buffer.buffer));
            if let Some(name) = reader {
                slot = slot.with_name(name);
            }
            self.builder.push_slot(stage, slot);
        }

        if descriptor(stage).accepts(SlotCategory::Uav) {
            for (unit, image) in state.image_units.iter().enumerate() {
                let unit = unit as u32;
                let reader = program.image_units.get(&unit);
                let mut slot = SlotBinding::new(SlotCategory::Uav, unit)
                    .with_object(image.texture)
                    .with_enabled(reader.is_some())
                    .with_resource(self.event.resource(image.texture));
                if let Some(name) = reader {
                    slot = slot.with_name(name);
                }
                self.builder.push_slot(stage, slot);
            }
        } else if !program.image_units.is_empty() {
            self.builder
                .report_unsupported(stage, "image_units", "image load/store is only shown for fragment and compute shaders");
        }

        for (index, subroutine) in program.subroutines.iter().enumerate() {
            let slot = SlotBinding::new(SlotCategory::ClassInstance, index as u32)
                .with_name(&subroutine.uniform)
                .with_object(subroutine.function)
                .with_enabled(true)
                .with_detail(SlotDetail::ClassInstance {
                    interface: subroutine.uniform.clone(),
                });
            self.builder.push_slot(stage, slot);
        }
    }

    fn sampler_info(&mut self, stage: StageKind, unit: u32, params: &GlSamplerParams) -> SamplerInfo {
        let address_u = self.normalize(
            stage,
            &format!("samplers[{unit}].address_u"),
            &params.wrap_s,
            convert::address_mode(&params.wrap_s),
            AddressMode::Wrap,
        );
        let address_v = self.normalize(
            stage,
            &format!("samplers[{unit}].address_v"),
            &params.wrap_t,
            convert::address_mode(&params.wrap_t),
            AddressMode::Wrap,
        );
        let address_w = self.normalize(
            stage,
            &format!("samplers[{unit}].address_w"),
            &params.wrap_r,
            convert::address_mode(&params.wrap_r),
            AddressMode::Wrap,
        );
        let (mut min_filter, mip_filter) = self.normalize(
            stage,
            &format!("samplers[{unit}].min_filter"),
            &params.min_filter,
            convert::min_filter(&params.min_filter),
            (FilterMode::Point, FilterMode::Linear),
        );
        let mut mag_filter = self.normalize(
            stage,
            &format!("samplers[{unit}].mag_filter"),
            &params.mag_filter,
            convert::mag_filter(&params.mag_filter),
            FilterMode::Linear,
        );
        if params.max_anisotropy > 1.0 {
            min_filter = FilterMode::Anisotropic;
            mag_filter = FilterMode::Anisotropic;
        }
        let compare = match &params.compare_func {
            Some(func) => Some(self.normalize(
                stage,
                &format!("samplers[{unit}].compare"),
                func,
                convert::compare_func(func),
                CompareFunc::LessEqual,
            )),
            None => None,
        };

        SamplerInfo {
            address_u,
            address_v,
            address_w,
            min_filter,
            mag_filter,
            mip_filter,
            max_anisotropy: params.max_anisotropy.max(1.0) as u32,
            min_lod: params.min_lod,
            max_lod: params.max_lod,
            lod_bias: params.lod_bias,
            border_color: params.border_color,
            compare,
        }
    }

    fn rasterizer(&mut self) {
        let state = self.state;
        let stage = StageKind::Rasterizer;

        let (fill_mode, offset_capability) = self.normalize(
            stage,
            "fill_mode",
            &state.polygon_mode,
            convert::polygon_mode(&state.polygon_mode),
            (FillMode::Solid, "GL_POLYGON_OFFSET_FILL"),
        );
        let [factor, units, clamp] = if state.is_enabled(offset_capability) { state.polygon_offset } else { [0.0; 3] };

        let cull_mode = if state.is_enabled("GL_CULL_FACE") {
            self.normalize(stage, "cull_mode", &state.cull_face, convert::cull_face(&state.cull_face), CullMode::Back)
        } else {
            CullMode::None
        };
        let front_ccw = self.normalize(stage, "front_ccw", &state.front_face, convert::front_ccw(&state.front_face), true);

        let scissor_test = state.is_enabled("GL_SCISSOR_TEST");
        let rasterizer = RasterizerState {
            fill_mode,
            cull_mode,
            front_ccw,
            depth_bias: units,
            slope_scaled_bias: factor,
            depth_bias_clamp: clamp,
            depth_clip_enable: !state.is_enabled("GL_DEPTH_CLAMP"),
            scissor_enable: scissor_test || state.scissors.iter().any(|scissor| scissor.enabled),
            multisample_enable: state.is_enabled("GL_MULTISAMPLE"),
            antialiased_lines: state.is_enabled("GL_LINE_SMOOTH"),
        };
        self.builder.set_fixed_function(stage, FixedFunctionState::Rasterizer(rasterizer));

        for (index, &[x, y, width, height]) in state.viewports.iter().enumerate() {
            let [min_depth, max_depth] = state.depth_ranges.get(index).copied().unwrap_or([0.0, 1.0]);
            self.builder.push_viewport(Viewport {
                x,
                y,
                width,
                height,
                min_depth,
                max_depth,
            });
        }
        for scissor in &state.scissors {
            self.builder.push_scissor(ScissorRect {
                x: scissor.x,
                y: scissor.y,
                width: scissor.width,
                height: scissor.height,
                enabled: scissor.enabled || scissor_test,
            });
        }
    }

    fn stencil_face(&mut self, field: &str, face: &GlStencilFace) -> StencilFace {
        let stage = StageKind::FrameBuffer;
        StencilFace {
            func: self.normalize(stage, &format!("{field}.func"), &face.func, convert::compare_func(&face.func), CompareFunc::Always),
            fail_op: self.normalize(stage, &format!("{field}.fail_op"), &face.stencil_fail, convert::stencil_op(&face.stencil_fail), StencilOp::Keep),
            depth_fail_op: self.normalize(stage, &format!("{field}.depth_fail_op"), &face.depth_fail, convert::stencil_op(&face.depth_fail), StencilOp::Keep),
            pass_op: self.normalize(stage, &format!("{field}.pass_op"), &face.pass, convert::stencil_op(&face.pass), StencilOp::Keep),
        }
    }

    fn blend_equation(&mut self, field: &str, source: &str, destination: &str, equation: &str) -> BlendEquation {
        let stage = StageKind::FrameBuffer;
        BlendEquation {
            source: self.normalize(stage, &format!("{field}.source"), source, convert::blend_factor(source), BlendFactor::One),
            destination: self.normalize(stage, &format!("{field}.destination"), destination, convert::blend_factor(destination), BlendFactor::Zero),
            op: self.normalize(stage, &format!("{field}.op"), equation, convert::blend_op(equation), BlendOp::Add),
        }
    }

    fn output(&mut self) {
        let state = self.state;
        let stage = StageKind::FrameBuffer;

        let front = &state.stencil_front;
        let back = &state.stencil_back;
        if (back.value_mask, back.write_mask, back.reference) != (front.value_mask, front.write_mask, front.reference) {
            self.builder.report_unsupported(
                stage,
                "depth_stencil.back_face",
                "separate back-face stencil masks and reference are not representable, showing front-face values",
            );
        }

        let depth_func = self.normalize(stage, "depth_stencil.depth_func", &state.depth_func, convert::compare_func(&state.depth_func), CompareFunc::Less);
        let depth_stencil = DepthStencilState {
            depth_enable: state.is_enabled("GL_DEPTH_TEST"),
            depth_write: state.depth_write_mask,
            depth_func,
            depth_bounds_enable: state.is_enabled("GL_DEPTH_BOUNDS_TEST_EXT"),
            depth_bounds: DepthRange {
                min: state.depth_bounds[0],
                max: state.depth_bounds[1],
            },
            stencil_enable: state.is_enabled("GL_STENCIL_TEST"),
            stencil_read_mask: front.value_mask,
            stencil_write_mask: front.write_mask,
            stencil_ref: front.reference,
            front_face: self.stencil_face("depth_stencil.front_face", front),
            back_face: self.stencil_face("depth_stencil.back_face", back),
        };

        let logic_op = if state.is_enabled("GL_COLOR_LOGIC_OP") && state.logic_op != "GL_COPY" {
            convert::logic_op(&state.logic_op).or_else(|| {
                self.builder
                    .report_unsupported(stage, "blend.targets.logic_op", format!("unknown GL enum `{}`, logic op ignored", state.logic_op));
                None
            })
        } else {
            None
        };

        let target_count = state.blends.len().max(state.color_masks.len());
        let mut targets = Vec::with_capacity(target_count);
        for index in 0..target_count {
            let blend = state.blends.get(index).cloned().unwrap_or_default();
            let field = format!("blend.targets[{index}]");
            let color = self.blend_equation(&format!("{field}.color"), &blend.source_rgb, &blend.destination_rgb, &blend.equation_rgb);
            let alpha = self.blend_equation(&format!("{field}.alpha"), &blend.source_alpha, &blend.destination_alpha, &blend.equation_alpha);
            let mask = state.color_masks.get(index).copied().unwrap_or([true; 4]);
            let write_mask = mask.iter().enumerate().filter(|(_, on)| **on).fold(0u8, |bits, (bit, _)| bits | (1 << bit));
            targets.push(TargetBlend {
                enabled: blend.enabled,
                color,
                alpha,
                logic_op,
                write_mask,
            });
        }
        let independent_blend = targets.windows(2).any(|pair| pair[0] != pair[1]);

        for (index, attachment) in state.framebuffer.color.iter().enumerate() {
            let write_mask = targets.get(index).map_or(0xF, |target| target.write_mask);
            let slot = SlotBinding::new(SlotCategory::RenderTarget, index as u32)
                .with_object(*attachment)
                .with_enabled(state.framebuffer.draws_to(index as u32))
                .with_resource(self.event.resource(*attachment))
                .with_detail(SlotDetail::RenderTarget { write_mask });
            self.builder.push_slot(stage, slot);
        }

        let output = OutputState {
            depth_stencil,
            blend: BlendState {
                blend_factor: state.blend_color,
                alpha_to_coverage: state.is_enabled("GL_SAMPLE_ALPHA_TO_COVERAGE"),
                independent_blend,
                targets,
            },
            depth_target: state.framebuffer.depth,
            stencil_target: state.framebuffer.stencil,
            framebuffer_srgb: state.is_enabled("GL_FRAMEBUFFER_SRGB"),
        };
        self.builder.set_fixed_function(stage, FixedFunctionState::Output(output));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::capture_snapshot;
    use crate::capture::{CaptureLog, ResourceTable};
    use crate::ObjectId;

    const FIXTURE: &str = include_str!("../../fixtures/gl_two_draws.yaml");

    fn snapshot_of(state: &GlState) -> PipelineSnapshot {
        let resources = ResourceTable::new();
        let event = NativeEvent {
            event_id: 1,
            state,
            resources: &resources,
        };
        GlAdapter.build_snapshot(event).unwrap()
    }

    fn rasterizer(snapshot: &PipelineSnapshot) -> RasterizerState {
        *snapshot.stage(StageKind::Rasterizer).unwrap().fixed_function().as_rasterizer().unwrap()
    }

    #[test]
    fn test_fixture_builds_every_event() {
        let log = CaptureLog::<GlState>::from_yaml(FIXTURE).unwrap();
        for (event_id, _) in log.events() {
            let snapshot = capture_snapshot(&log, &GlAdapter, event_id).unwrap();
            assert_eq!(snapshot.event_id(), event_id);
            assert!(snapshot.unsupported().is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        let log = CaptureLog::<GlState>::from_yaml(FIXTURE).unwrap();
        let first = capture_snapshot(&log, &GlAdapter, 1).unwrap();
        let second = capture_snapshot(&log, &GlAdapter, 1).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixture_fragment_stage() {
        let log = CaptureLog::<GlState>::from_yaml(FIXTURE).unwrap();
        let snapshot = capture_snapshot(&log, &GlAdapter, 1).unwrap();
        let fragment = snapshot.stage(StageKind::FragmentShader).unwrap();

        assert_eq!(fragment.shader(), Some(ObjectId(21)));
        let resources: Vec<_> = fragment.slots_of(SlotCategory::Resource).collect();
        assert_eq!(resources.len(), 3);
        assert!(resources.iter().all(|slot| slot.enabled));
        assert!(resources[1].is_empty());
        assert_eq!(resources[0].resource.as_ref().unwrap().name, "Albedo");
        assert_eq!(resources[0].name.as_deref(), Some("albedo"));

        let tessellation = snapshot.stage(StageKind::TessControl).unwrap();
        assert!(tessellation.slots().is_empty());
        assert_eq!(tessellation.shader(), None);
    }

    #[test]
    fn test_cull_face_disabled_means_no_culling() {
        let mut state = GlState::default();
        state.cull_face = "GL_FRONT".to_string();
        assert_eq!(rasterizer(&snapshot_of(&state)).cull_mode, CullMode::None);

        state.enabled.insert("GL_CULL_FACE".to_string());
        assert_eq!(rasterizer(&snapshot_of(&state)).cull_mode, CullMode::Front);
    }

    #[test]
    fn test_polygon_offset_follows_polygon_mode_capability() {
        let mut state = GlState::default();
        state.polygon_offset = [2.0, 4.0, 0.5];
        state.enabled.insert("GL_POLYGON_OFFSET_LINE".to_string());

        let filled = rasterizer(&snapshot_of(&state));
        assert_eq!(filled.depth_bias, 0.0);

        state.polygon_mode = "GL_LINE".to_string();
        let lines = rasterizer(&snapshot_of(&state));
        assert_eq!(lines.fill_mode, FillMode::Wireframe);
        assert_eq!(lines.depth_bias, 4.0);
        assert_eq!(lines.slope_scaled_bias, 2.0);
        assert_eq!(lines.depth_bias_clamp, 0.5);
    }

    #[test]
    fn test_depth_clamp_and_restart() {
        let mut state = GlState::default();
        state.enabled.insert("GL_DEPTH_CLAMP".to_string());
        state.enabled.insert("GL_PRIMITIVE_RESTART".to_string());
        state.restart_index = 0xFFFF;

        let snapshot = snapshot_of(&state);
        assert!(!rasterizer(&snapshot).depth_clip_enable);
        assert_eq!(snapshot.restart_index(), Some(0xFFFF));

        state.enabled.insert("GL_PRIMITIVE_RESTART_FIXED_INDEX".to_string());
        assert_eq!(snapshot_of(&state).restart_index(), Some(u32::MAX));
    }

    #[test]
    fn test_unknown_enum_reports_and_defaults() {
        let mut state = GlState::default();
        state.polygon_mode = "GL_QUADS".to_string();
        state.depth_func = "GL_SOMETIMES".to_string();

        let snapshot = snapshot_of(&state);
        assert_eq!(rasterizer(&snapshot).fill_mode, FillMode::Solid);
        let output = snapshot.stage(StageKind::FrameBuffer).unwrap().fixed_function().as_output().unwrap();
        assert_eq!(output.depth_stencil.depth_func, CompareFunc::Less);

        let fields: Vec<_> = snapshot.unsupported().iter().map(|report| report.field.as_str()).collect();
        assert_eq!(fields, vec!["fill_mode", "depth_stencil.depth_func"]);
    }

    #[test]
    fn test_logic_op_and_color_masks() {
        let mut state = GlState::default();
        state.logic_op = "GL_XOR".to_string();
        state.color_masks = vec![[true, false, true, false], [false; 4]];
        state.framebuffer.color = vec![Some(ObjectId(1)), Some(ObjectId(2))];
        state.framebuffer.draw_buffers = Some(vec![0, 1]);

        let snapshot = snapshot_of(&state);
        let output = snapshot.stage(StageKind::FrameBuffer).unwrap().fixed_function().as_output().unwrap();
        assert_eq!(output.blend.targets[0].logic_op, None);
        assert_eq!(output.blend.targets[0].write_mask, 0b0101);
        assert!(output.blend.independent_blend);

        let targets: Vec<_> = snapshot.stage(StageKind::FrameBuffer).unwrap().slots_of(SlotCategory::RenderTarget).collect();
        assert!(!targets[0].is_empty());
        assert!(targets[1].is_empty());

        state.enabled.insert("GL_COLOR_LOGIC_OP".to_string());
        let snapshot = snapshot_of(&state);
        let output = snapshot.stage(StageKind::FrameBuffer).unwrap().fixed_function().as_output().unwrap();
        assert_eq!(output.blend.targets[1].logic_op, Some(crate::state::LogicOp::Xor));
    }

    #[test]
    fn test_differing_back_stencil_is_reported() {
        let mut state = GlState::default();
        state.stencil_front.reference = 1;
        state.stencil_back.reference = 2;

        let snapshot = snapshot_of(&state);
        let output = snapshot.stage(StageKind::FrameBuffer).unwrap().fixed_function().as_output().unwrap();
        assert_eq!(output.depth_stencil.stencil_ref, 1);
        assert_eq!(snapshot.unsupported()[0].field, "depth_stencil.back_face");
    }

    #[test]
    fn test_image_units_outside_uav_stages() {
        let yaml = r#"
programs:
  Vertex: { shader: 5, image_units: { 0: "heightmap" } }
  Compute: { shader: 6, image_units: { 1: "output" } }
image_units:
  - { texture: 70 }
  - { texture: 71, access: GL_WRITE_ONLY }
"#;
        let state: GlState = serde_norway::from_str(yaml).unwrap();
        let snapshot = snapshot_of(&state);

        assert_eq!(snapshot.stage(StageKind::VertexShader).unwrap().slots_of(SlotCategory::Uav).count(), 0);
        assert_eq!(snapshot.unsupported()[0].stage, StageKind::VertexShader);

        let compute = snapshot.stage(StageKind::Compute).unwrap();
        let uavs: Vec<_> = compute.slots_of(SlotCategory::Uav).collect();
        assert_eq!(uavs.len(), 2);
        assert!(!uavs[0].enabled);
        assert!(uavs[1].enabled);
        assert_eq!(uavs[1].bound_object, Some(ObjectId(71)));
    }
}

//! Native OpenGL state as recorded by a capture
//!
//! Everything is kept in GL vocabulary: enums are their `GL_*` names and
//! capabilities are the set of names passed to `glEnable`. Every field has the
//! GL initial value as its default, so a capture only needs to record what the
//! application changed.

use crate::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Programmable GL stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GlShaderStage {
    Vertex,
    TessControl,
    TessEval,
    Geometry,
    Fragment,
    Compute,
}

/// Full GL state at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlState {
    /// Capabilities passed to `glEnable`, e.g. `GL_DEPTH_TEST`
    pub enabled: BTreeSet<String>,
    pub vertex_array: GlVertexArray,
    /// Mode of the draw call, e.g. `GL_TRIANGLES`
    pub primitive_mode: String,
    /// `GL_PATCH_VERTICES`, used with `GL_PATCHES`
    pub patch_vertices: u32,
    pub restart_index: u32,
    /// Index type of an indexed draw, `None` for array draws
    pub index_type: Option<String>,
    pub index_offset: u64,
    /// Active program (or program pipeline) per stage
    pub programs: BTreeMap<GlShaderStage, GlProgramStage>,
    pub texture_units: Vec<GlTextureUnit>,
    pub uniform_buffers: Vec<GlBufferBinding>,
    pub image_units: Vec<GlImageUnit>,
    pub polygon_mode: String,
    /// `[factor, units, clamp]`
    pub polygon_offset: [f32; 3],
    pub cull_face: String,
    pub front_face: String,
    pub depth_func: String,
    pub depth_write_mask: bool,
    /// `GL_EXT_depth_bounds_test` range
    pub depth_bounds: [f32; 2],
    pub stencil_front: GlStencilFace,
    pub stencil_back: GlStencilFace,
    pub framebuffer: GlFramebuffer,
    pub blends: Vec<GlBlend>,
    /// Per draw buffer `[red, green, blue, alpha]`
    pub color_masks: Vec<[bool; 4]>,
    pub blend_color: [f32; 4],
    pub logic_op: String,
    /// `[x, y, width, height]`
    pub viewports: Vec<[f32; 4]>,
    /// `[near, far]`, parallel to `viewports`
    pub depth_ranges: Vec<[f32; 2]>,
    pub scissors: Vec<GlScissor>,
}

impl Default for GlState {
    fn default() -> Self {
        Self {
            enabled: BTreeSet::from(["GL_DITHER".to_string(), "GL_MULTISAMPLE".to_string()]),
            vertex_array: GlVertexArray::default(),
            primitive_mode: "GL_TRIANGLES".to_string(),
            patch_vertices: 3,
            restart_index: 0,
            index_type: None,
            index_offset: 0,
            programs: BTreeMap::new(),
            texture_units: Vec::new(),
            uniform_buffers: Vec::new(),
            image_units: Vec::new(),
            polygon_mode: "GL_FILL".to_string(),
            polygon_offset: [0.0; 3],
            cull_face: "GL_BACK".to_string(),
            front_face: "GL_CCW".to_string(),
            depth_func: "GL_LESS".to_string(),
            depth_write_mask: true,
            depth_bounds: [0.0, 1.0],
            stencil_front: GlStencilFace::default(),
            stencil_back: GlStencilFace::default(),
            framebuffer: GlFramebuffer::default(),
            blends: Vec::new(),
            color_masks: Vec::new(),
            blend_color: [0.0; 4],
            logic_op: "GL_COPY".to_string(),
            viewports: Vec::new(),
            depth_ranges: Vec::new(),
            scissors: Vec::new(),
        }
    }
}

impl GlState {
    /// Returns true if `capability` is enabled
    pub fn is_enabled(&self, capability: &str) -> bool {
        self.enabled.contains(capability)
    }
}

/// Bound vertex array object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlVertexArray {
    pub element_buffer: Option<ObjectId>,
    pub buffers: Vec<GlVertexBuffer>,
    pub attributes: Vec<GlVertexAttrib>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlVertexBuffer {
    pub buffer: Option<ObjectId>,
    pub stride: u32,
    pub offset: u64,
    pub divisor: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlVertexAttrib {
    pub enabled: bool,
    /// Vertex buffer binding the attribute reads from
    pub binding: u32,
    pub relative_offset: u32,
    /// Component count; `bgra` replaces it with `GL_BGRA`
    pub size: u32,
    pub bgra: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub normalized: bool,
    pub integer: bool,
    /// `GL_CURRENT_VERTEX_ATTRIB`
    pub generic_value: [f32; 4],
}

impl Default for GlVertexAttrib {
    fn default() -> Self {
        Self {
            enabled: false,
            binding: 0,
            relative_offset: 0,
            size: 4,
            bgra: false,
            kind: "GL_FLOAT".to_string(),
            normalized: false,
            integer: false,
            generic_value: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Shader attached to one stage, with the bindings its reflection reports
///
/// Each map goes from unit / binding index to the name of the uniform reading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlProgramStage {
    pub shader: ObjectId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub texture_units: BTreeMap<u32, String>,
    #[serde(default)]
    pub uniform_blocks: BTreeMap<u32, String>,
    #[serde(default)]
    pub image_units: BTreeMap<u32, String>,
    #[serde(default)]
    pub subroutines: Vec<GlSubroutine>,
}

/// Subroutine uniform and the function currently selected for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlSubroutine {
    pub uniform: String,
    #[serde(default)]
    pub function: Option<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlTextureUnit {
    pub texture: Option<ObjectId>,
    pub target: String,
    /// Sampler object; when absent the texture's own parameters apply
    pub sampler: Option<ObjectId>,
    pub params: GlSamplerParams,
}

impl Default for GlTextureUnit {
    fn default() -> Self {
        Self {
            texture: None,
            target: "GL_TEXTURE_2D".to_string(),
            sampler: None,
            params: GlSamplerParams::default(),
        }
    }
}

/// Effective sampling parameters of a texture unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlSamplerParams {
    pub wrap_s: String,
    pub wrap_t: String,
    pub wrap_r: String,
    pub min_filter: String,
    pub mag_filter: String,
    pub max_anisotropy: f32,
    pub min_lod: f32,
    pub max_lod: f32,
    pub lod_bias: f32,
    pub border_color: [f32; 4],
    /// Set when `GL_TEXTURE_COMPARE_MODE` is `GL_COMPARE_REF_TO_TEXTURE`
    pub compare_func: Option<String>,
}

impl Default for GlSamplerParams {
    fn default() -> Self {
        Self {
            wrap_s: "GL_REPEAT".to_string(),
            wrap_t: "GL_REPEAT".to_string(),
            wrap_r: "GL_REPEAT".to_string(),
            min_filter: "GL_NEAREST_MIPMAP_LINEAR".to_string(),
            mag_filter: "GL_LINEAR".to_string(),
            max_anisotropy: 1.0,
            min_lod: -1000.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
            border_color: [0.0; 4],
            compare_func: None,
        }
    }
}

/// Indexed buffer binding (`glBindBufferRange`); size 0 binds the whole buffer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlBufferBinding {
    pub buffer: Option<ObjectId>,
    pub offset: u64,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlImageUnit {
    pub texture: Option<ObjectId>,
    pub level: u32,
    pub layered: bool,
    pub access: String,
}

impl Default for GlImageUnit {
    fn default() -> Self {
        Self {
            texture: None,
            level: 0,
            layered: false,
            access: "GL_READ_ONLY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlStencilFace {
    pub func: String,
    #[serde(rename = "ref")]
    pub reference: u32,
    pub value_mask: u32,
    pub write_mask: u32,
    pub stencil_fail: String,
    pub depth_fail: String,
    pub pass: String,
}

impl Default for GlStencilFace {
    fn default() -> Self {
        Self {
            func: "GL_ALWAYS".to_string(),
            reference: 0,
            value_mask: 0xFF,
            write_mask: 0xFF,
            stencil_fail: "GL_KEEP".to_string(),
            depth_fail: "GL_KEEP".to_string(),
            pass: "GL_KEEP".to_string(),
        }
    }
}

/// Draw framebuffer attachments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlFramebuffer {
    pub fbo: Option<ObjectId>,
    pub color: Vec<Option<ObjectId>>,
    pub depth: Option<ObjectId>,
    pub stencil: Option<ObjectId>,
    /// Colour attachments written by `glDrawBuffers`; `None` means attachment 0 only
    pub draw_buffers: Option<Vec<u32>>,
}

impl GlFramebuffer {
    /// Returns true if colour attachment `index` is a draw buffer
    pub fn draws_to(&self, index: u32) -> bool {
        match &self.draw_buffers {
            Some(buffers) => buffers.contains(&index),
            None => index == 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlBlend {
    pub enabled: bool,
    pub source_rgb: String,
    pub destination_rgb: String,
    pub equation_rgb: String,
    pub source_alpha: String,
    pub destination_alpha: String,
    pub equation_alpha: String,
}

impl Default for GlBlend {
    fn default() -> Self {
        Self {
            enabled: false,
            source_rgb: "GL_ONE".to_string(),
            destination_rgb: "GL_ZERO".to_string(),
            equation_rgb: "GL_FUNC_ADD".to_string(),
            source_alpha: "GL_ONE".to_string(),
            destination_alpha: "GL_ZERO".to_string(),
            equation_alpha: "GL_FUNC_ADD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlScissor {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub enabled: bool,
}

//! OpenGL backend
//!
//! [`GlState`] records GL state the way a GL replay fetches it, and
//! [`GlAdapter`] normalizes it. Polygon offset only applies when the offset
//! capability matching the polygon mode is enabled, culling is reported as
//! `None` while `GL_CULL_FACE` is disabled, and fixed-index primitive restart
//! uses `0xFFFFFFFF` as the restart value.

mod adapter;
pub mod convert;
mod state;

pub use adapter::GlAdapter;
pub use state::*;

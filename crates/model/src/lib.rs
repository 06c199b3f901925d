//! Normalized GPU pipeline state
//!
//! This crate defines a backend-agnostic snapshot of the GPU pipeline at one
//! captured event. Backend adapters translate native API state into a
//! [`PipelineSnapshot`]; the static [`StageDescriptor`] table describes the
//! shape every stage shares, so consumers iterate stages as data.

mod adapter;
mod descriptor;
mod error;
mod slot;
mod snapshot;
mod stage;

pub mod capture;
pub mod fields;
pub mod gl;
pub mod state;
pub mod wgpu_backend;

pub use adapter::{BackendAdapter, NativeEvent, ReplayContext, capture_snapshot};
pub use descriptor::{FixedFunctionKind, StageDescriptor, descriptor};
pub use error::{CaptureError, SnapshotError, UnsupportedFeature};
pub use slot::*;
pub use snapshot::{PipelineSnapshot, SnapshotBuilder};
pub use stage::{BackendKind, SlotCategory, StageKind};
pub use state::*;

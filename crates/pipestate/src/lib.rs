//! Pipeline state inspection
//!
//! Consumer side of [`pipestate_model`]: the visibility filter and its
//! persisted configuration, table rows with backend-specific labels, point
//! queries, snapshot diffs and the session that keeps the snapshot of the
//! selected event current.

pub use pipestate_model as model;

pub mod config;
pub mod diff;
pub mod filter;
pub mod labels;
pub mod query;
pub mod rows;
pub mod session;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, VisibilityConfig};
pub use diff::{Change, FieldChange, SlotChange, SnapshotDiff, StageDiff, diff};
pub use filter::{VisibilityFlags, is_row_visible, visible_slots};
pub use query::{ObjectUse, Resolved, find_object_uses, resolve};
pub use rows::{FieldRow, SlotRow, fixed_function_rows, list_visible_rows};
pub use session::{BuildTicket, Completion, PipelineSession};

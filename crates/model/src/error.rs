//! Error taxonomy for snapshot construction and capture loading
//!
//! Snapshot builds fail in exactly two recoverable ways (the replay context is
//! not ready, or the event does not exist) and one fatal way (the produced
//! snapshot is malformed). Fields a backend cannot express are not failures at
//! all: they are reported as [`UnsupportedFeature`] and left at their default.

use crate::{EventId, StageKind};
use serde::{Deserialize, Serialize};

/// Errors that can occur while producing or validating a pipeline snapshot
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The replay context is not currently replayed or valid
    ///
    /// Not retried internally; the caller re-requests once the context is ready.
    #[error("backend unavailable: {reason}")]
    BackendUnavailable {
        /// Why the context could not serve the request
        reason: String,
    },
    /// The requested event is not part of the capture
    #[error("event {0} is not part of the capture")]
    UnknownEvent(EventId),
    /// A snapshot broke a structural invariant
    ///
    /// This always indicates a bug in snapshot construction and must abort the
    /// operation that observed it.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    /// The capture backing the replay context could not be loaded
    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl SnapshotError {
    /// Shorthand for an [`SnapshotError::InvariantViolation`]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Returns true if re-requesting later may succeed
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BackendUnavailable { .. } | Self::UnknownEvent(_))
    }
}

/// Errors that can occur while loading a recorded capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to read capture: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid capture YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
    #[error("invalid capture JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Two recorded events share one event id
    #[error("event {0} appears more than once in the capture")]
    DuplicateEvent(EventId),
}

/// A fixed-function field the backend cannot express
///
/// Raised per field while building a snapshot. The field keeps its documented
/// default and the report travels with the snapshot so a view can flag it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{stage}: `{field}` is not supported ({reason})")]
pub struct UnsupportedFeature {
    /// Stage owning the field
    pub stage: StageKind,
    /// Field path, in the same notation the diff engine reports
    pub field: String,
    /// Human-readable explanation
    pub reason: String,
}

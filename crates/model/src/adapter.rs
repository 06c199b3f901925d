//! Backend adapter contract
//!
//! A [`ReplayContext`] hands out the native GPU state at an event; a
//! [`BackendAdapter`] translates that native state into a normalized
//! [`PipelineSnapshot`]. Nothing downstream of the adapter ever sees native
//! vocabulary.

use crate::capture::ResourceTable;
use crate::{BackendKind, EventId, ObjectId, PipelineSnapshot, ResourceInfo, SnapshotError};

/// Native GPU state at one event, borrowed from a replay context
#[derive(Debug)]
pub struct NativeEvent<'a, S> {
    pub event_id: EventId,
    pub state: &'a S,
    /// Metadata of every resource known to the capture
    pub resources: &'a ResourceTable,
}

impl<S> Clone for NativeEvent<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for NativeEvent<'_, S> {}

impl<S> NativeEvent<'_, S> {
    /// Returns cached metadata for `object`, if the capture knows it
    pub fn resource(&self, object: Option<ObjectId>) -> Option<ResourceInfo> {
        object.and_then(|id| self.resources.get(id)).cloned()
    }
}

/// Translates one backend's native state into a [`PipelineSnapshot`]
///
/// Implementations must be deterministic and must not mutate the native
/// state. A field the backend cannot express is reported through
/// [`crate::SnapshotBuilder::report_unsupported`] and left at its default.
pub trait BackendAdapter {
    /// Native state type this adapter reads
    type Native;

    fn backend_kind(&self) -> BackendKind;

    /// Builds the snapshot for `event`
    ///
    /// # Returns
    /// * `Ok(PipelineSnapshot)` - A validated snapshot
    /// * `Err(SnapshotError::InvariantViolation)` - If translation produced malformed state
    fn build_snapshot(&self, event: NativeEvent<'_, Self::Native>) -> Result<PipelineSnapshot, SnapshotError>;
}

/// Source of native state, typically a replay engine positioned on a capture
pub trait ReplayContext {
    type State;

    fn backend_kind(&self) -> BackendKind;

    /// Returns the native state at `event`
    ///
    /// # Returns
    /// * `Ok(NativeEvent)` - State borrowed from the context
    /// * `Err(SnapshotError::BackendUnavailable)` - If the context is not currently replayed
    /// * `Err(SnapshotError::UnknownEvent)` - If `event` is not part of the capture
    fn event_state(&self, event: EventId) -> Result<NativeEvent<'_, Self::State>, SnapshotError>;
}

/// Fetches the native state at `event` from `context` and translates it with `adapter`
///
/// # Arguments
/// * `context` - Replay context to read from
/// * `adapter` - Adapter matching the context's backend
/// * `event` - Event to snapshot
///
/// # Returns
/// * `Ok(PipelineSnapshot)` - The snapshot
/// * `Err(SnapshotError)` - If the context cannot serve the event or the adapter does not match it
pub fn capture_snapshot<C, A>(context: &C, adapter: &A, event: EventId) -> Result<PipelineSnapshot, SnapshotError>
where
    C: ReplayContext,
    A: BackendAdapter<Native = C::State>,
{
    if context.backend_kind() != adapter.backend_kind() {
        return Err(SnapshotError::invariant(format!(
            "{} adapter cannot translate a {} capture",
            adapter.backend_kind(),
            context.backend_kind()
        )));
    }

    let native = context.event_state(event)?;
    adapter.build_snapshot(native)
}

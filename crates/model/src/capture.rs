//! Recorded captures
//!
//! A [`CaptureLog`] is the on-disk form of a capture: the backend it was
//! recorded on, the resources it references and, for every recorded event,
//! the native pipeline state at that point. It implements [`ReplayContext`],
//! so adapters can be driven from a file exactly as from a live replay.

use crate::adapter::{NativeEvent, ReplayContext};
use crate::{BackendKind, CaptureError, EventId, ObjectId, ResourceInfo, SnapshotError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Metadata of every resource a capture references
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceTable(BTreeMap<ObjectId, ResourceInfo>);

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ObjectId, info: ResourceInfo) -> Option<ResourceInfo> {
        self.0.insert(id, info)
    }

    pub fn get(&self, id: ObjectId) -> Option<&ResourceInfo> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One recorded event and the native state at it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedEvent<S> {
    pub event_id: EventId,
    /// API call name, e.g. `glDrawElements`
    pub name: String,
    pub state: S,
}

/// A recorded capture usable as a replay context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureLog<S> {
    pub backend: BackendKind,
    #[serde(default)]
    pub resources: ResourceTable,
    pub events: Vec<CapturedEvent<S>>,
    #[serde(skip, default = "ready_by_default")]
    ready: bool,
}

fn ready_by_default() -> bool {
    true
}

impl<S> CaptureLog<S> {
    /// Creates an empty capture that is ready for replay
    pub fn new(backend: BackendKind) -> Self {
        Self {
            backend,
            resources: ResourceTable::new(),
            events: Vec::new(),
            ready: true,
        }
    }

    /// Marks the capture as replayed (or not)
    ///
    /// While not ready, every state request fails with
    /// [`SnapshotError::BackendUnavailable`].
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Lists `(event_id, name)` in capture order
    pub fn events(&self) -> impl Iterator<Item = (EventId, &str)> + '_ {
        self.events.iter().map(|event| (event.event_id, event.name.as_str()))
    }

    pub fn event(&self, event_id: EventId) -> Option<&CapturedEvent<S>> {
        self.events.iter().find(|event| event.event_id == event_id)
    }

    /// Returns the event recorded immediately before `event_id`
    pub fn previous_event(&self, event_id: EventId) -> Option<EventId> {
        let position = self.events.iter().position(|event| event.event_id == event_id)?;
        position.checked_sub(1).map(|prev| self.events[prev].event_id)
    }

    fn check_unique_events(&self) -> Result<(), CaptureError> {
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.event_id) {
                return Err(CaptureError::DuplicateEvent(event.event_id));
            }
        }
        Ok(())
    }
}

impl<S: DeserializeOwned> CaptureLog<S> {
    /// Parses a capture from YAML
    ///
    /// # Arguments
    /// * `yaml` - YAML document of the capture
    ///
    /// # Returns
    /// * `Ok(CaptureLog)` - The capture, ready for replay
    /// * `Err(CaptureError)` - If the document is malformed or repeats an event id
    pub fn from_yaml(yaml: &str) -> Result<Self, CaptureError> {
        let log: Self = serde_norway::from_str(yaml)?;
        log.check_unique_events()?;
        Ok(log)
    }

    /// Parses a capture from JSON
    pub fn from_json(json: &str) -> Result<Self, CaptureError> {
        let log: Self = serde_json::from_str(json)?;
        log.check_unique_events()?;
        Ok(log)
    }

    /// Loads a capture file; `.json` files are parsed as JSON, everything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { Self::from_json(&content) } else { Self::from_yaml(&content) }
    }
}

impl<S> ReplayContext for CaptureLog<S> {
    type State = S;

    fn backend_kind(&self) -> BackendKind {
        self.backend
    }

    fn event_state(&self, event: EventId) -> Result<NativeEvent<'_, S>, SnapshotError> {
        if !self.ready {
            return Err(SnapshotError::BackendUnavailable {
                reason: "capture is not replayed".to_string(),
            });
        }

        let captured = self.event(event).ok_or(SnapshotError::UnknownEvent(event))?;
        Ok(NativeEvent {
            event_id: captured.event_id,
            state: &captured.state,
            resources: &self.resources,
        })
    }
}

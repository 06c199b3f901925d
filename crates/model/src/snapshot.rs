//! Pipeline snapshots and their builder
//!
//! A [`PipelineSnapshot`] is the immutable root aggregate of pipeline state at
//! one event. It can only be produced by [`SnapshotBuilder::build`] (or by
//! deserialisation followed by [`PipelineSnapshot::validate`]), which enforces
//! the structural invariants every consumer relies on:
//!
//! - all nine stages are present, in pipeline order
//! - every slot's category is accepted by its stage's descriptor
//! - no two slots of a stage share a `(category, slot_index)` key
//! - slots are grouped by category in category order
//! - the fixed-function state has the shape the descriptor declares
//! - non-shader stages never carry a shader

use crate::descriptor::descriptor;
use crate::fields::{self, Field};
use crate::state::{FixedFunctionState, ScissorRect, StageState, Topology, Viewport};
use crate::{BackendKind, CaptureError, EventId, ObjectId, SlotBinding, SnapshotError, StageKind, UnsupportedFeature};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Immutable pipeline state at one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSnapshot {
    event_id: EventId,
    backend: BackendKind,
    stages: BTreeMap<StageKind, StageState>,
    topology: Topology,
    restart_index: Option<u32>,
    viewports: Vec<Viewport>,
    scissors: Vec<ScissorRect>,
    #[serde(default)]
    unsupported: Vec<UnsupportedFeature>,
}

impl PipelineSnapshot {
    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Returns the state of `kind`; always `Some` for a validated snapshot
    pub fn stage(&self, kind: StageKind) -> Option<&StageState> {
        self.stages.get(&kind)
    }

    /// Iterates stages in pipeline order
    pub fn stages(&self) -> impl Iterator<Item = &StageState> + '_ {
        self.stages.values()
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Index value that restarts a strip, if primitive restart is active
    pub fn restart_index(&self) -> Option<u32> {
        self.restart_index
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    pub fn scissors(&self) -> &[ScissorRect] {
        &self.scissors
    }

    /// Fields the backend could not express while this snapshot was built
    pub fn unsupported(&self) -> &[UnsupportedFeature] {
        &self.unsupported
    }

    /// Returns every scalar field displayed under `kind`
    ///
    /// Besides the stage's own fixed-function state this includes the root
    /// fields attributed to it: topology and restart index under
    /// [`StageKind::VertexInput`], viewports and scissors under
    /// [`StageKind::Rasterizer`].
    ///
    /// # Arguments
    /// * `kind` - Stage to flatten
    ///
    /// # Returns
    /// * `Ok(Vec<Field>)` - Leaves in display order
    /// * `Err(SnapshotError)` - If the stage is missing or cannot be flattened
    pub fn stage_fields(&self, kind: StageKind) -> Result<Vec<Field>, SnapshotError> {
        let stage = self.stage(kind).ok_or_else(|| SnapshotError::invariant(format!("snapshot is missing stage {kind}")))?;
        let to_invariant = |e: serde_json::Error| SnapshotError::invariant(format!("cannot flatten {kind} state: {e}"));

        let mut out = Vec::new();
        if kind == StageKind::VertexInput {
            out.extend(fields::flatten_prefixed("topology", &self.topology).map_err(to_invariant)?);
            out.extend(fields::flatten_prefixed("restart_index", &self.restart_index).map_err(to_invariant)?);
        }
        out.extend(stage.fixed_function().fields().map_err(to_invariant)?);
        if kind == StageKind::Rasterizer {
            out.extend(fields::flatten_prefixed("viewports", &self.viewports).map_err(to_invariant)?);
            out.extend(fields::flatten_prefixed("scissors", &self.scissors).map_err(to_invariant)?);
        }
        Ok(out)
    }

    /// Checks every structural invariant
    ///
    /// # Returns
    /// * `Ok(())` - The snapshot is well formed
    /// * `Err(SnapshotError::InvariantViolation)` - Describing the first breach found
    pub fn validate(&self) -> Result<(), SnapshotError> {
        for kind in StageKind::ALL {
            let Some(stage) = self.stages.get(&kind) else {
                return Err(SnapshotError::invariant(format!("snapshot for event {} is missing stage {kind}", self.event_id)));
            };
            if stage.kind() != kind {
                return Err(SnapshotError::invariant(format!("stage {} is stored under {kind}", stage.kind())));
            }
            validate_stage(stage)?;
        }
        if self.stages.len() != StageKind::ALL.len() {
            return Err(SnapshotError::invariant(format!("snapshot has {} stages", self.stages.len())));
        }
        Ok(())
    }

    /// Parses a snapshot exported with [`PipelineSnapshot::to_json`] and validates it
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: PipelineSnapshot = serde_json::from_str(json).map_err(CaptureError::from)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Serialises the snapshot as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn validate_stage(stage: &StageState) -> Result<(), SnapshotError> {
    let kind = stage.kind();
    let desc = descriptor(kind);

    if !desc.has_shader && stage.shader().is_some() {
        return Err(SnapshotError::invariant(format!("{kind} cannot bind a shader")));
    }

    if stage.fixed_function().kind() != desc.fixed_function {
        return Err(SnapshotError::invariant(format!(
            "{kind} carries {:?} fixed-function state, expected {:?}",
            stage.fixed_function().kind(),
            desc.fixed_function
        )));
    }

    let mut seen = HashSet::new();
    let mut previous = None;
    for slot in stage.slots() {
        if !desc.accepts(slot.category) {
            return Err(SnapshotError::invariant(format!("{kind} does not accept {} slots", slot.category)));
        }
        if !seen.insert(slot.key()) {
            return Err(SnapshotError::invariant(format!("{kind} has duplicate slot {} {}", slot.category, slot.slot_index)));
        }
        if previous.is_some_and(|prev| prev > slot.category) {
            return Err(SnapshotError::invariant(format!("{kind} slots are not grouped by category")));
        }
        previous = Some(slot.category);
    }
    Ok(())
}

/// Assembles a [`PipelineSnapshot`] stage by stage
///
/// Adapters push whatever they translate and call [`SnapshotBuilder::build`]
/// once; the snapshot either comes out whole and valid or not at all.
#[derive(Debug)]
pub struct SnapshotBuilder {
    snapshot: PipelineSnapshot,
}

impl SnapshotBuilder {
    /// Starts a snapshot with every stage unbound and at its default state
    pub fn new(event_id: EventId, backend: BackendKind) -> Self {
        let stages = StageKind::ALL.iter().map(|&kind| (kind, StageState::new(kind))).collect();
        Self {
            snapshot: PipelineSnapshot {
                event_id,
                backend,
                stages,
                topology: Topology::default(),
                restart_index: None,
                viewports: Vec::new(),
                scissors: Vec::new(),
                unsupported: Vec::new(),
            },
        }
    }

    fn stage_mut(&mut self, kind: StageKind) -> &mut StageState {
        self.snapshot.stages.entry(kind).or_insert_with(|| StageState::new(kind))
    }

    pub fn set_shader(&mut self, kind: StageKind, shader: Option<ObjectId>, name: Option<String>) -> &mut Self {
        self.stage_mut(kind).set_shader(shader, name);
        self
    }

    pub fn push_slot(&mut self, kind: StageKind, slot: SlotBinding) -> &mut Self {
        self.stage_mut(kind).push_slot(slot);
        self
    }

    pub fn set_fixed_function(&mut self, kind: StageKind, state: FixedFunctionState) -> &mut Self {
        self.stage_mut(kind).set_fixed_function(state);
        self
    }

    pub fn set_topology(&mut self, topology: Topology, restart_index: Option<u32>) -> &mut Self {
        self.snapshot.topology = topology;
        self.snapshot.restart_index = restart_index;
        self
    }

    pub fn push_viewport(&mut self, viewport: Viewport) -> &mut Self {
        self.snapshot.viewports.push(viewport);
        self
    }

    pub fn push_scissor(&mut self, scissor: ScissorRect) -> &mut Self {
        self.snapshot.scissors.push(scissor);
        self
    }

    /// Records a field the backend cannot express
    pub fn report_unsupported(&mut self, stage: StageKind, field: impl Into<String>, reason: impl Into<String>) -> &mut Self {
        let report = UnsupportedFeature {
            stage,
            field: field.into(),
            reason: reason.into(),
        };
        tracing::warn!(event = self.snapshot.event_id, "{report}");
        self.snapshot.unsupported.push(report);
        self
    }

    /// Finalises the snapshot
    ///
    /// Slots are grouped by category (capture order is kept inside a
    /// category) and every invariant is checked.
    ///
    /// # Returns
    /// * `Ok(PipelineSnapshot)` - The finished snapshot
    /// * `Err(SnapshotError::InvariantViolation)` - If the pushed state is malformed
    pub fn build(mut self) -> Result<PipelineSnapshot, SnapshotError> {
        for stage in self.snapshot.stages.values_mut() {
            stage.sort_slots();
        }
        self.snapshot.validate()?;

        let slot_count: usize = self.snapshot.stages.values().map(|stage| stage.slots().len()).sum();
        tracing::debug!(
            event = self.snapshot.event_id,
            backend = %self.snapshot.backend,
            slots = slot_count,
            unsupported = self.snapshot.unsupported.len(),
            "Built pipeline snapshot"
        );
        Ok(self.snapshot)
    }
}

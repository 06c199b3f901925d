//! Point queries against a snapshot

use pipestate_model::{ObjectId, PipelineSnapshot, SlotBinding, SlotCategory, StageKind};
use serde::Serialize;

/// Result of resolving one `(stage, category, slot)` cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    /// An object is bound at the cell
    Bound(&'a SlotBinding),
    /// The cell does not exist, or exists with nothing bound
    NotBound,
}

impl<'a> Resolved<'a> {
    pub fn binding(&self) -> Option<&'a SlotBinding> {
        match self {
            Resolved::Bound(slot) => Some(slot),
            Resolved::NotBound => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Resolved::Bound(_))
    }
}

/// Returns what is bound at one cell of the snapshot
///
/// # Arguments
/// * `snapshot` - Snapshot to query
/// * `stage` - Stage of the cell
/// * `category` - Slot category of the cell
/// * `slot_index` - Slot index within the category
///
/// # Returns
/// [`Resolved::Bound`] with the slot if an object is bound there, [`Resolved::NotBound`] otherwise
pub fn resolve(snapshot: &PipelineSnapshot, stage: StageKind, category: SlotCategory, slot_index: u32) -> Resolved<'_> {
    match snapshot.stage(stage).and_then(|state| state.slot(category, slot_index)) {
        Some(slot) if slot.bound_object.is_some() => Resolved::Bound(slot),
        _ => Resolved::NotBound,
    }
}

/// A place where an object is used in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectUse {
    /// The object is the shader of a stage
    Shader { stage: StageKind },
    /// The object is bound at a slot
    Slot {
        stage: StageKind,
        category: SlotCategory,
        slot_index: u32,
        enabled: bool,
    },
}

/// Lists every stage and slot that references `object`, in pipeline order
pub fn find_object_uses(snapshot: &PipelineSnapshot, object: ObjectId) -> Vec<ObjectUse> {
    let mut uses = Vec::new();
    for stage in snapshot.stages() {
        if stage.shader() == Some(object) {
            uses.push(ObjectUse::Shader { stage: stage.kind() });
        }
        for slot in stage.slots().iter().filter(|slot| slot.bound_object == Some(object)) {
            uses.push(ObjectUse::Slot {
                stage: stage.kind(),
                category: slot.category,
                slot_index: slot.slot_index,
                enabled: slot.enabled,
            });
        }
    }
    uses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_snapshot;

    #[test]
    fn test_resolve_bound_texture() {
        let snapshot = fixture_snapshot(1);
        let resolved = resolve(&snapshot, StageKind::FragmentShader, SlotCategory::Resource, 2);
        let slot = resolved.binding().unwrap();
        assert_eq!(slot.bound_object, Some(ObjectId(42)));
        assert_eq!(slot.resource.as_ref().unwrap().name, "Normal Map");
    }

    #[test]
    fn test_resolve_unbound_cells() {
        let snapshot = fixture_snapshot(1);
        assert_eq!(resolve(&snapshot, StageKind::Compute, SlotCategory::Uav, 2), Resolved::NotBound);
        assert_eq!(resolve(&snapshot, StageKind::FragmentShader, SlotCategory::Resource, 1), Resolved::NotBound);
        assert_eq!(resolve(&snapshot, StageKind::FragmentShader, SlotCategory::Resource, 99), Resolved::NotBound);
        assert!(!resolve(&snapshot, StageKind::Rasterizer, SlotCategory::Resource, 0).is_bound());
    }

    #[test]
    fn test_find_object_uses() {
        let snapshot = fixture_snapshot(1);

        let albedo = find_object_uses(&snapshot, ObjectId(40));
        let stages: Vec<_> = albedo
            .iter()
            .filter_map(|object_use| match object_use {
                ObjectUse::Slot { stage, category: SlotCategory::Resource, enabled, .. } => Some((*stage, *enabled)),
                _ => None,
            })
            .collect();
        assert_eq!(stages, vec![(StageKind::VertexShader, false), (StageKind::FragmentShader, true)]);

        assert_eq!(find_object_uses(&snapshot, ObjectId(21)), vec![ObjectUse::Shader { stage: StageKind::FragmentShader }]);
        assert!(find_object_uses(&snapshot, ObjectId(12345)).is_empty());
    }
}

//! Table rows for the pipeline panel
//!
//! Slot rows pass through the visibility filter; fixed-function rows are the
//! flattened stage fields and are always listed.

use crate::filter::{VisibilityFlags, visible_slots};
use crate::labels;
use pipestate_model::{ObjectId, PipelineSnapshot, SlotBinding, SlotCategory, SlotDetail, SnapshotError, StageKind};
use serde::Serialize;

/// One displayed slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRow {
    pub stage: StageKind,
    pub category: SlotCategory,
    pub slot_index: u32,
    /// Slot address in the backend's notation
    pub slot: String,
    /// Shader-side name of the binding, if known
    pub name: Option<String>,
    pub enabled: bool,
    pub empty: bool,
    pub object: Option<ObjectId>,
    /// Resource name, or the object id if the resource is unnamed
    pub resource: String,
    /// Category-specific summary, e.g. dimensions and format
    pub details: String,
}

/// One displayed fixed-function field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub stage: StageKind,
    pub path: String,
    pub value: String,
}

/// Lists the visible slot rows of one table
///
/// # Arguments
/// * `snapshot` - Snapshot to read
/// * `stage` - Stage of the table
/// * `category` - Category of the table
/// * `flags` - Visibility toggles that apply to the table
///
/// # Returns
/// Rows in capture order; empty if the stage does not accept `category`
pub fn list_visible_rows(snapshot: &PipelineSnapshot, stage: StageKind, category: SlotCategory, flags: VisibilityFlags) -> Vec<SlotRow> {
    let Some(state) = snapshot.stage(stage) else {
        return Vec::new();
    };
    visible_slots(state, category, flags).map(|slot| slot_row(snapshot, stage, slot)).collect()
}

/// Lists every fixed-function field of `stage`
pub fn fixed_function_rows(snapshot: &PipelineSnapshot, stage: StageKind) -> Result<Vec<FieldRow>, SnapshotError> {
    let fields = snapshot.stage_fields(stage)?;
    Ok(fields
        .into_iter()
        .map(|field| FieldRow {
            stage,
            value: field.display_value(),
            path: field.path,
        })
        .collect())
}

fn slot_row(snapshot: &PipelineSnapshot, stage: StageKind, slot: &SlotBinding) -> SlotRow {
    let resource = match (&slot.resource, slot.bound_object) {
        (Some(info), _) if !info.name.is_empty() => info.name.clone(),
        (_, Some(object)) => format!("Object {object}"),
        (_, None) => "-".to_string(),
    };

    SlotRow {
        stage,
        category: slot.category,
        slot_index: slot.slot_index,
        slot: labels::slot_label(snapshot.backend(), slot.category, slot.slot_index),
        name: slot.name.clone(),
        enabled: slot.enabled,
        empty: slot.is_empty(),
        object: slot.bound_object,
        resource,
        details: slot_details(slot),
    }
}

fn slot_details(slot: &SlotBinding) -> String {
    let mut parts = Vec::new();

    if let Some(info) = &slot.resource {
        parts.push(format!("{:?} {}", info.kind, info.dimensions()));
        if let Some(format) = &info.format {
            parts.push(format.to_string());
        }
        if info.mip_levels > 1 {
            parts.push(format!("{} mips", info.mip_levels));
        }
    }
    if slot.byte_offset != 0 || slot.byte_length.is_some() {
        match slot.byte_length {
            Some(length) => parts.push(format!("{} bytes at {}", length, slot.byte_offset)),
            None => parts.push(format!("offset {}", slot.byte_offset)),
        }
    }
    if let Some(stride) = slot.stride {
        parts.push(format!("stride {stride}"));
    }
    if let Some(size) = slot.array_size {
        parts.push(format!("array of {size}"));
    }

    match &slot.detail {
        SlotDetail::None => {}
        SlotDetail::VertexBuffer { divisor } => {
            if *divisor > 0 {
                parts.push(format!("per instance ({divisor})"));
            }
        }
        SlotDetail::VertexAttribute { source_slot, format, .. } => {
            parts.push(format!("{format} from buffer {source_slot}"));
        }
        SlotDetail::Sampler(info) => {
            parts.push(format!("{:?}/{:?}/{:?}", info.address_u, info.address_v, info.address_w));
            parts.push(format!("min {:?} mag {:?} mip {:?}", info.min_filter, info.mag_filter, info.mip_filter));
            if info.max_anisotropy > 1 {
                parts.push(format!("{}x aniso", info.max_anisotropy));
            }
            if let Some(compare) = info.compare {
                parts.push(format!("compare {compare:?}"));
            }
        }
        SlotDetail::RenderTarget { write_mask } => {
            parts.push(format!("write {}", labels::write_mask_label(*write_mask)));
        }
        SlotDetail::ClassInstance { interface } => {
            parts.push(format!("implements {interface}"));
        }
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_snapshot;

    #[test]
    fn test_fragment_empty_unit_hidden_by_default() {
        let snapshot = fixture_snapshot(1);

        let rows = list_visible_rows(&snapshot, StageKind::FragmentShader, SlotCategory::Resource, VisibilityFlags::default());
        let units: Vec<_> = rows.iter().map(|row| row.slot_index).collect();
        assert_eq!(units, vec![0, 2]);
        assert_eq!(rows[0].resource, "Albedo");
        assert_eq!(rows[0].name.as_deref(), Some("albedo"));
        assert!(rows[0].details.contains("R8G8B8A8_UNORM_SRGB"));

        let rows = list_visible_rows(&snapshot, StageKind::FragmentShader, SlotCategory::Resource, VisibilityFlags::new(false, true));
        let units: Vec<_> = rows.iter().map(|row| row.slot_index).collect();
        assert_eq!(units, vec![0, 1, 2]);
        assert!(rows[1].empty);
        assert_eq!(rows[1].resource, "-");
    }

    #[test]
    fn test_vertex_shader_unused_units_are_disabled() {
        let snapshot = fixture_snapshot(1);

        let hidden = list_visible_rows(&snapshot, StageKind::VertexShader, SlotCategory::Resource, VisibilityFlags::default());
        assert!(hidden.is_empty());

        let shown = list_visible_rows(&snapshot, StageKind::VertexShader, SlotCategory::Resource, VisibilityFlags::new(true, false));
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|row| !row.enabled));
    }

    #[test]
    fn test_vertex_input_rows() {
        let snapshot = fixture_snapshot(1);

        let buffers = list_visible_rows(&snapshot, StageKind::VertexInput, SlotCategory::VertexBuffer, VisibilityFlags::default());
        assert_eq!(buffers.len(), 1);
        assert_eq!(buffers[0].resource, "Mesh Vertices");
        assert!(buffers[0].details.contains("stride 32"));

        let attributes = list_visible_rows(&snapshot, StageKind::VertexInput, SlotCategory::VertexAttribute, VisibilityFlags::default());
        assert_eq!(attributes.len(), 3);
        assert!(attributes[0].details.starts_with("R32G32B32_FLOAT"));
    }

    #[test]
    fn test_category_not_accepted_gives_no_rows() {
        let snapshot = fixture_snapshot(1);
        assert!(list_visible_rows(&snapshot, StageKind::Rasterizer, SlotCategory::Resource, VisibilityFlags::ALL).is_empty());
    }

    #[test]
    fn test_fixed_function_rows_ignore_visibility() {
        let snapshot = fixture_snapshot(2);
        let rows = fixed_function_rows(&snapshot, StageKind::Rasterizer).unwrap();

        let cull = rows.iter().find(|row| row.path == "cull_mode").unwrap();
        assert_eq!(cull.value, "None");
        assert!(rows.iter().any(|row| row.path == "viewports[0].width" && row.value == "1280"));

        let input = fixed_function_rows(&snapshot, StageKind::VertexInput).unwrap();
        assert_eq!(input[0].path, "topology");
        assert_eq!(input[0].value, "TriangleList");
    }
}

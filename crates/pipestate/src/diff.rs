//! Snapshot comparison
//!
//! Two snapshots are compared stage by stage. Slots are matched by their
//! `(category, slot_index)` key; fixed-function state, shader identity and the
//! root fields attributed to a stage are compared as flattened fields matched
//! by path. Both sides are indexed once, so the cost is linear in the number
//! of slots and fields.

use pipestate_model::fields::{self, Field};
use pipestate_model::{EventId, PipelineSnapshot, SlotBinding, SlotCategory, SnapshotError, StageKind, StageState};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Comparison result of one flattened field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum FieldChange {
    Unchanged { path: String, value: Value },
    Changed { path: String, old: Value, new: Value },
    Added { path: String, new: Value },
    Removed { path: String, old: Value },
}

impl FieldChange {
    pub fn path(&self) -> &str {
        match self {
            FieldChange::Unchanged { path, .. } | FieldChange::Changed { path, .. } | FieldChange::Added { path, .. } | FieldChange::Removed { path, .. } => path,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, FieldChange::Unchanged { .. })
    }

    /// Returns the change seen from the other side
    pub fn inverted(&self) -> FieldChange {
        match self.clone() {
            FieldChange::Unchanged { path, value } => FieldChange::Unchanged { path, value },
            FieldChange::Changed { path, old, new } => FieldChange::Changed { path, old: new, new: old },
            FieldChange::Added { path, new } => FieldChange::Removed { path, old: new },
            FieldChange::Removed { path, old } => FieldChange::Added { path, new: old },
        }
    }
}

impl fmt::Display for FieldChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldChange::Unchanged { path, value } => write!(f, "{path}: {}", fields::display_value(value)),
            FieldChange::Changed { path, old, new } => write!(f, "{path}: {} -> {}", fields::display_value(old), fields::display_value(new)),
            FieldChange::Added { path, new } => write!(f, "{path}: added {}", fields::display_value(new)),
            FieldChange::Removed { path, old } => write!(f, "{path}: removed {}", fields::display_value(old)),
        }
    }
}

/// Comparison result of one slot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum SlotChange<'a> {
    Unchanged {
        slot: &'a SlotBinding,
    },
    Changed {
        old: &'a SlotBinding,
        new: &'a SlotBinding,
        /// Only the slot fields that differ, never empty
        fields: Vec<FieldChange>,
    },
    Added {
        new: &'a SlotBinding,
    },
    Removed {
        old: &'a SlotBinding,
    },
}

impl<'a> SlotChange<'a> {
    pub fn key(&self) -> (SlotCategory, u32) {
        match self {
            SlotChange::Unchanged { slot } => slot.key(),
            SlotChange::Changed { new, .. } | SlotChange::Added { new } => new.key(),
            SlotChange::Removed { old } => old.key(),
        }
    }

    pub fn is_unchanged(&self) -> bool {
        matches!(self, SlotChange::Unchanged { .. })
    }

    /// Returns the change seen from the other side
    pub fn inverted(&self) -> SlotChange<'a> {
        match self {
            SlotChange::Unchanged { slot } => SlotChange::Unchanged { slot: *slot },
            SlotChange::Changed { old, new, fields } => SlotChange::Changed {
                old: *new,
                new: *old,
                fields: fields.iter().map(FieldChange::inverted).collect(),
            },
            SlotChange::Added { new } => SlotChange::Removed { old: *new },
            SlotChange::Removed { old } => SlotChange::Added { new: *old },
        }
    }
}

impl fmt::Display for SlotChange<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (category, index) = self.key();
        let object = |slot: &SlotBinding| slot.bound_object.map_or_else(|| "-".to_string(), |object| object.to_string());
        write!(f, "{category}[{index}]: ")?;
        match self {
            SlotChange::Unchanged { slot } => write!(f, "{}", object(*slot)),
            SlotChange::Changed { old, new, fields } => {
                write!(f, "{} -> {}", object(*old), object(*new))?;
                let paths: Vec<_> = fields.iter().map(FieldChange::path).collect();
                if !paths.is_empty() {
                    write!(f, " ({})", paths.join(", "))?;
                }
                Ok(())
            }
            SlotChange::Added { new } => write!(f, "added {}", object(*new)),
            SlotChange::Removed { old } => write!(f, "removed {}", object(*old)),
        }
    }
}

/// Comparison of one stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageDiff<'a> {
    pub stage: StageKind,
    /// Slot results grouped by category
    pub slots: Vec<SlotChange<'a>>,
    /// Shader identity followed by the stage's fixed-function fields
    pub fields: Vec<FieldChange>,
}

impl StageDiff<'_> {
    pub fn is_identical(&self) -> bool {
        self.slots.iter().all(SlotChange::is_unchanged) && self.fields.iter().all(FieldChange::is_unchanged)
    }
}

/// One difference reported by [`SnapshotDiff::changes`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Change<'d, 'a> {
    Slot(&'d SlotChange<'a>),
    Field(&'d FieldChange),
}

impl fmt::Display for Change<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Slot(change) => fmt::Display::fmt(change, f),
            Change::Field(change) => fmt::Display::fmt(change, f),
        }
    }
}

/// Stage-by-stage comparison of two snapshots
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotDiff<'a> {
    pub from_event: EventId,
    pub to_event: EventId,
    /// One entry per stage, in pipeline order
    pub stages: Vec<StageDiff<'a>>,
}

impl<'a> SnapshotDiff<'a> {
    pub fn stage(&self, kind: StageKind) -> Option<&StageDiff<'a>> {
        self.stages.iter().find(|stage| stage.stage == kind)
    }

    /// Iterates every slot and field that is not unchanged, in pipeline order
    pub fn changes(&self) -> impl Iterator<Item = (StageKind, Change<'_, 'a>)> + '_ {
        self.stages.iter().flat_map(|stage| {
            let slots = stage.slots.iter().filter(|change| !change.is_unchanged()).map(move |change| (stage.stage, Change::Slot(change)));
            let fields = stage.fields.iter().filter(|change| !change.is_unchanged()).map(move |change| (stage.stage, Change::Field(change)));
            slots.chain(fields)
        })
    }

    pub fn is_identical(&self) -> bool {
        self.stages.iter().all(StageDiff::is_identical)
    }
}

/// Compares two snapshots
///
/// # Arguments
/// * `from` - Older snapshot
/// * `to` - Newer snapshot
///
/// # Returns
/// * `Ok(SnapshotDiff)` - Per-stage results; `diff(a, a)` is identical and `diff(b, a)` is the inverse of `diff(a, b)`
/// * `Err(SnapshotError::InvariantViolation)` - If either snapshot lacks a stage
pub fn diff<'a>(from: &'a PipelineSnapshot, to: &'a PipelineSnapshot) -> Result<SnapshotDiff<'a>, SnapshotError> {
    let mut stages = Vec::with_capacity(StageKind::ALL.len());
    for kind in StageKind::ALL {
        let (Some(old), Some(new)) = (from.stage(kind), to.stage(kind)) else {
            return Err(SnapshotError::invariant(format!(
                "cannot compare events {} and {}: stage {kind} is missing",
                from.event_id(),
                to.event_id()
            )));
        };

        let mut fields = diff_fields(stage_header(old)?, stage_header(new)?);
        fields.extend(diff_fields(from.stage_fields(kind)?, to.stage_fields(kind)?));

        stages.push(StageDiff {
            stage: kind,
            slots: diff_slots(old, new)?,
            fields,
        });
    }

    let result = SnapshotDiff {
        from_event: from.event_id(),
        to_event: to.event_id(),
        stages,
    };
    tracing::debug!(from = result.from_event, to = result.to_event, changes = result.changes().count(), "Compared snapshots");
    Ok(result)
}

fn flatten_error(e: serde_json::Error) -> SnapshotError {
    SnapshotError::invariant(format!("cannot flatten state for comparison: {e}"))
}

fn stage_header(stage: &StageState) -> Result<Vec<Field>, SnapshotError> {
    let mut header = fields::flatten_prefixed("shader", &stage.shader()).map_err(flatten_error)?;
    header.extend(fields::flatten_prefixed("shader_name", &stage.shader_name()).map_err(flatten_error)?);
    Ok(header)
}

fn diff_slots<'a>(old: &'a StageState, new: &'a StageState) -> Result<Vec<SlotChange<'a>>, SnapshotError> {
    let index: HashMap<(SlotCategory, u32), &SlotBinding> = new.slots().iter().map(|slot| (slot.key(), slot)).collect();
    let old_keys: HashSet<(SlotCategory, u32)> = old.slots().iter().map(SlotBinding::key).collect();

    let mut changes = Vec::with_capacity(old.slots().len().max(new.slots().len()));
    for slot in old.slots() {
        // Decided on flattened leaves, where NaN equals NaN and +inf differs from -inf
        let change = match index.get(&slot.key()) {
            Some(&other) => {
                let fields: Vec<_> = diff_fields(fields::flatten(slot).map_err(flatten_error)?, fields::flatten(other).map_err(flatten_error)?)
                    .into_iter()
                    .filter(|change| !change.is_unchanged())
                    .collect();
                if fields.is_empty() {
                    SlotChange::Unchanged { slot }
                } else {
                    SlotChange::Changed { old: slot, new: other, fields }
                }
            }
            None => SlotChange::Removed { old: slot },
        };
        changes.push(change);
    }
    for slot in new.slots().iter().filter(|slot| !old_keys.contains(&slot.key())) {
        changes.push(SlotChange::Added { new: slot });
    }

    changes.sort_by_key(|change| change.key().0);
    Ok(changes)
}

fn diff_fields(old: Vec<Field>, new: Vec<Field>) -> Vec<FieldChange> {
    let index: HashMap<&str, usize> = new.iter().enumerate().map(|(i, field)| (field.path.as_str(), i)).collect();
    let mut matched = vec![false; new.len()];

    let mut changes = Vec::with_capacity(old.len().max(new.len()));
    for field in old {
        let change = match index.get(field.path.as_str()) {
            Some(&i) => {
                matched[i] = true;
                if new[i].value == field.value {
                    FieldChange::Unchanged {
                        path: field.path,
                        value: field.value,
                    }
                } else {
                    FieldChange::Changed {
                        path: field.path,
                        old: field.value,
                        new: new[i].value.clone(),
                    }
                }
            }
            None => FieldChange::Removed {
                path: field.path,
                old: field.value,
            },
        };
        changes.push(change);
    }
    for (field, _) in new.iter().zip(&matched).filter(|(_, matched)| !**matched) {
        changes.push(FieldChange::Added {
            path: field.path.clone(),
            new: field.value.clone(),
        });
    }
    changes
}

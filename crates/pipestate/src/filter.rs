//! Row visibility
//!
//! A single predicate decides whether a slot row is shown. It only looks at
//! `(enabled, is_empty, flags)`, so new slot categories need no filter
//! changes. Fixed-function rows never go through it.

use pipestate_model::{SlotBinding, SlotCategory, StageState};
use serde::{Deserialize, Serialize};

/// View-scoped visibility toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFlags {
    /// Show slots the current shader or fixed-function unit does not use
    pub show_disabled: bool,
    /// Show slots with nothing bound
    pub show_empty: bool,
}

impl VisibilityFlags {
    /// Flags that show every row
    pub const ALL: VisibilityFlags = VisibilityFlags {
        show_disabled: true,
        show_empty: true,
    };

    pub fn new(show_disabled: bool, show_empty: bool) -> Self {
        Self { show_disabled, show_empty }
    }
}

/// Returns true if a row with the given state is shown under `flags`
pub fn is_row_visible(enabled: bool, is_empty: bool, flags: VisibilityFlags) -> bool {
    (flags.show_disabled || enabled) && (flags.show_empty || !is_empty)
}

/// Returns true if `slot` is shown under `flags`
pub fn is_slot_visible(slot: &SlotBinding, flags: VisibilityFlags) -> bool {
    is_row_visible(slot.enabled, slot.is_empty(), flags)
}

/// Lazily yields the slots of `category` in `stage` that are shown under `flags`
///
/// # Arguments
/// * `stage` - Stage to read slots from
/// * `category` - Category to list
/// * `flags` - Visibility toggles of the view
///
/// # Returns
/// Visible slots in capture order
pub fn visible_slots(stage: &StageState, category: SlotCategory, flags: VisibilityFlags) -> impl Iterator<Item = &SlotBinding> + '_ {
    stage.slots_of(category).filter(move |slot| is_slot_visible(slot, flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipestate_model::{BackendKind, ObjectId, SnapshotBuilder, StageKind};

    #[test]
    fn test_visibility_truth_table() {
        for show_disabled in [false, true] {
            for show_empty in [false, true] {
                for enabled in [false, true] {
                    for is_empty in [false, true] {
                        let flags = VisibilityFlags::new(show_disabled, show_empty);
                        let expected = match (enabled, is_empty) {
                            (true, false) => true,
                            (true, true) => show_empty,
                            (false, false) => show_disabled,
                            (false, true) => show_disabled && show_empty,
                        };
                        assert_eq!(
                            is_row_visible(enabled, is_empty, flags),
                            expected,
                            "enabled={enabled} is_empty={is_empty} flags={flags:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_flags_hide_disabled_and_empty() {
        let flags = VisibilityFlags::default();
        assert!(!flags.show_disabled);
        assert!(!flags.show_empty);
        assert!(is_row_visible(true, false, flags));
        assert!(!is_row_visible(false, false, flags));
        assert!(!is_row_visible(true, true, flags));
        assert!(is_row_visible(false, true, VisibilityFlags::ALL));
    }

    #[test]
    fn test_visible_slots_filters_one_category() {
        let mut builder = SnapshotBuilder::new(1, BackendKind::Direct3D);
        for (index, object, enabled) in [(0, Some(1), true), (1, None, true), (2, Some(3), false)] {
            let slot = SlotBinding::new(SlotCategory::Resource, index).with_object(object.map(ObjectId)).with_enabled(enabled);
            builder.push_slot(StageKind::FragmentShader, slot);
        }
        builder.push_slot(
            StageKind::FragmentShader,
            SlotBinding::new(SlotCategory::Sampler, 0).with_object(Some(ObjectId(9))).with_enabled(true),
        );
        let snapshot = builder.build().unwrap();
        let stage = snapshot.stage(StageKind::FragmentShader).unwrap();

        let indices = |flags| visible_slots(stage, SlotCategory::Resource, flags).map(|slot| slot.slot_index).collect::<Vec<_>>();
        assert_eq!(indices(VisibilityFlags::default()), vec![0]);
        assert_eq!(indices(VisibilityFlags::new(false, true)), vec![0, 1]);
        assert_eq!(indices(VisibilityFlags::new(true, false)), vec![0, 2]);
        assert_eq!(indices(VisibilityFlags::ALL), vec![0, 1, 2]);
    }
}

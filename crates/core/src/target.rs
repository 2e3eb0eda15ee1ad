//! Target object resolution for target-bearing trial labels.

use crate::error::{PlanError, PlanResult};
use crate::labels::{TargetRule, TrialLabel};
use crate::types::{Category, ObjectRef, Side};
use crate::video::VideoRecord;

/// Compute the target object of a trial from its label and source video.
///
/// - `pointed` → the object pointed at
/// - `unpointed` → the other object (`diff` pointing videos only)
/// - `nonpoint` → `same`: the only object; `diff`: the object on the label's side
///
/// Returns [`PlanError::TargetUnavailable`] for `notarget` labels and for
/// records that lack the object the label asks for.
pub fn resolve_target(label: TrialLabel, record: &VideoRecord) -> PlanResult<ObjectRef> {
    let unavailable = || PlanError::TargetUnavailable {
        label,
        word: record.word.clone(),
    };

    let target = match label.target_rule() {
        TargetRule::Pointed(_) => record.pointed_object(),
        TargetRule::Unpointed(_) => record.unpointed_object(),
        TargetRule::Nonpoint(side) => match record.category {
            Category::Same => Some(&record.object_refs[0]),
            Category::Diff => Some(match side {
                Side::Left => &record.object_refs[0],
                Side::Right => &record.object_refs[1],
            }),
        },
        TargetRule::NoTarget => None,
    };

    target.cloned().ok_or_else(unavailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::parse_video_record;
    use assert_matches::assert_matches;

    fn record(name: &str) -> VideoRecord {
        parse_video_record(name).unwrap()
    }

    #[test]
    fn pointed_target_is_pointed_object() {
        let r = record("1a_diff.rl_right_318-324_lemi.mp4");
        assert_eq!(r.pointed_side, Some(Side::Left));
        assert_eq!(
            resolve_target(TrialLabel::DiffPointedLeft, &r).unwrap(),
            ObjectRef::from("318")
        );
    }

    #[test]
    fn unpointed_target_is_other_object() {
        let r = record("1a_diff.rl_right_318-324_lemi.mp4");
        assert_eq!(
            resolve_target(TrialLabel::DiffUnpointedRight, &r).unwrap(),
            ObjectRef::from("324")
        );
    }

    #[test]
    fn same_pointed_target() {
        let r = record("1a_same.rl_right_010-010_apple.mp4");
        assert_eq!(
            resolve_target(TrialLabel::SamePointedLeft, &r).unwrap(),
            ObjectRef::from("010")
        );
    }

    #[test]
    fn nonpoint_diff_uses_label_side() {
        let r = record("1a_diff.lr_nop_101-102_dax.mp4");
        assert_eq!(
            resolve_target(TrialLabel::DiffNonpointLeft, &r).unwrap(),
            ObjectRef::from("101")
        );
        assert_eq!(
            resolve_target(TrialLabel::DiffNonpointRight, &r).unwrap(),
            ObjectRef::from("102")
        );
    }

    #[test]
    fn nonpoint_same_ignores_side() {
        let r = record("1a_same.lr_nop_020-020_dax.mp4");
        for label in [TrialLabel::SameNonpointLeft, TrialLabel::SameNonpointRight] {
            assert_eq!(resolve_target(label, &r).unwrap(), ObjectRef::from("020"));
        }
    }

    #[test]
    fn unpointed_on_same_is_rejected() {
        let r = record("1a_same.rl_right_010-010_apple.mp4");
        assert_matches!(
            resolve_target(TrialLabel::DiffUnpointedLeft, &r),
            Err(PlanError::TargetUnavailable { .. })
        );
    }

    #[test]
    fn notarget_labels_have_no_target() {
        let r = record("1a_diff.lr_nop_101-102_dax.mp4");
        assert_matches!(
            resolve_target(TrialLabel::DiffNonpointNotarget, &r),
            Err(PlanError::TargetUnavailable { .. })
        );
    }
}

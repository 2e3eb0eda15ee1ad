//! Test-trial labels and the fixed draw-to-label allocation table.
//!
//! Labels read `{category}_{point mode}_{side}`:
//!
//! - `pointed` = target is the object pointed at in the video
//! - `unpointed` = target is the object not pointed at (`diff` only)
//! - `nonpoint` = target comes from a non-pointing video, on `side`
//! - `notarget` = none of the three objects belong to the trial's word

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::partition::{DrawKey, Partition};
use crate::types::{Category, Side};
use crate::video::VideoRecord;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of distinct trial labels in a plan.
pub const LABEL_COUNT: usize = 13;

/// Number of trials in a complete plan.
pub const TRIALS_PER_PLAN: usize = 28;

// ---------------------------------------------------------------------------
// Trial label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialLabel {
    SamePointedLeft,
    SamePointedRight,
    SameNonpointLeft,
    SameNonpointRight,
    SameNonpointNotarget,
    SamePointingNotarget,
    DiffPointedLeft,
    DiffPointedRight,
    DiffNonpointLeft,
    DiffNonpointRight,
    DiffUnpointedLeft,
    DiffUnpointedRight,
    DiffNonpointNotarget,
}

/// How a label derives its target object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRule {
    Pointed(Side),
    Unpointed(Side),
    Nonpoint(Side),
    NoTarget,
}

impl TrialLabel {
    pub const ALL: [TrialLabel; LABEL_COUNT] = [
        Self::SamePointedLeft,
        Self::SamePointedRight,
        Self::SameNonpointLeft,
        Self::SameNonpointRight,
        Self::SameNonpointNotarget,
        Self::SamePointingNotarget,
        Self::DiffPointedLeft,
        Self::DiffPointedRight,
        Self::DiffNonpointLeft,
        Self::DiffNonpointRight,
        Self::DiffUnpointedLeft,
        Self::DiffUnpointedRight,
        Self::DiffNonpointNotarget,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SamePointedLeft => "same_pointed_left",
            Self::SamePointedRight => "same_pointed_right",
            Self::SameNonpointLeft => "same_nonpoint_left",
            Self::SameNonpointRight => "same_nonpoint_right",
            Self::SameNonpointNotarget => "same_nonpoint_notarget",
            Self::SamePointingNotarget => "same_pointing_notarget",
            Self::DiffPointedLeft => "diff_pointed_left",
            Self::DiffPointedRight => "diff_pointed_right",
            Self::DiffNonpointLeft => "diff_nonpoint_left",
            Self::DiffNonpointRight => "diff_nonpoint_right",
            Self::DiffUnpointedLeft => "diff_unpointed_left",
            Self::DiffUnpointedRight => "diff_unpointed_right",
            Self::DiffNonpointNotarget => "diff_nonpoint_notarget",
        }
    }

    /// Parse a label string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == s)
    }

    pub fn category(&self) -> Category {
        match self {
            Self::SamePointedLeft
            | Self::SamePointedRight
            | Self::SameNonpointLeft
            | Self::SameNonpointRight
            | Self::SameNonpointNotarget
            | Self::SamePointingNotarget => Category::Same,
            _ => Category::Diff,
        }
    }

    pub fn target_rule(&self) -> TargetRule {
        match self {
            Self::SamePointedLeft | Self::DiffPointedLeft => TargetRule::Pointed(Side::Left),
            Self::SamePointedRight | Self::DiffPointedRight => TargetRule::Pointed(Side::Right),
            Self::DiffUnpointedLeft => TargetRule::Unpointed(Side::Left),
            Self::DiffUnpointedRight => TargetRule::Unpointed(Side::Right),
            Self::SameNonpointLeft | Self::DiffNonpointLeft => TargetRule::Nonpoint(Side::Left),
            Self::SameNonpointRight | Self::DiffNonpointRight => TargetRule::Nonpoint(Side::Right),
            Self::SameNonpointNotarget
            | Self::SamePointingNotarget
            | Self::DiffNonpointNotarget => TargetRule::NoTarget,
        }
    }

    pub fn has_target(&self) -> bool {
        self.target_rule() != TargetRule::NoTarget
    }

    /// Distractors ("others") a trial with this label carries.
    pub fn distractor_count(&self) -> usize {
        if self.has_target() {
            2
        } else {
            3
        }
    }
}

impl std::fmt::Display for TrialLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Allocation table
// ---------------------------------------------------------------------------

/// A contiguous slice `start..end` of one category draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawSlice {
    pub draw: DrawKey,
    pub start: usize,
    pub end: usize,
}

const fn slice(draw: DrawKey, start: usize, end: usize) -> DrawSlice {
    DrawSlice { draw, start, end }
}

const SAME_PT_L: DrawKey = DrawKey::pointing(Category::Same, Side::Left);
const SAME_PT_R: DrawKey = DrawKey::pointing(Category::Same, Side::Right);
const SAME_NP_L: DrawKey = DrawKey::non_pointing(Category::Same, Side::Left);
const SAME_NP_R: DrawKey = DrawKey::non_pointing(Category::Same, Side::Right);
const DIFF_PT_L: DrawKey = DrawKey::pointing(Category::Diff, Side::Left);
const DIFF_PT_R: DrawKey = DrawKey::pointing(Category::Diff, Side::Right);
const DIFF_NP_L: DrawKey = DrawKey::non_pointing(Category::Diff, Side::Left);
const DIFF_NP_R: DrawKey = DrawKey::non_pointing(Category::Diff, Side::Right);

/// Which draw slices feed each label, in plan order.
///
/// `diff_unpointed_*` reuse the tail of the pointing draw for the opposite
/// side: a video pointing left has its unpointed object on the right.
pub const ALLOCATION_TABLE: [(TrialLabel, &[DrawSlice]); LABEL_COUNT] = [
    (TrialLabel::SamePointedLeft, &[slice(SAME_PT_L, 0, 2)]),
    (TrialLabel::SamePointedRight, &[slice(SAME_PT_R, 0, 2)]),
    (TrialLabel::SameNonpointLeft, &[slice(SAME_NP_L, 0, 2)]),
    (TrialLabel::SameNonpointRight, &[slice(SAME_NP_R, 0, 2)]),
    (
        TrialLabel::SameNonpointNotarget,
        &[slice(SAME_NP_L, 2, 3), slice(SAME_NP_R, 2, 3)],
    ),
    (
        TrialLabel::SamePointingNotarget,
        &[slice(SAME_PT_L, 2, 3), slice(SAME_PT_R, 2, 3)],
    ),
    (TrialLabel::DiffPointedLeft, &[slice(DIFF_PT_L, 0, 2)]),
    (TrialLabel::DiffPointedRight, &[slice(DIFF_PT_R, 0, 2)]),
    (TrialLabel::DiffNonpointLeft, &[slice(DIFF_NP_L, 0, 2)]),
    (TrialLabel::DiffNonpointRight, &[slice(DIFF_NP_R, 0, 2)]),
    (TrialLabel::DiffUnpointedLeft, &[slice(DIFF_PT_R, 2, 4)]),
    (TrialLabel::DiffUnpointedRight, &[slice(DIFF_PT_L, 2, 4)]),
    (
        TrialLabel::DiffNonpointNotarget,
        &[slice(DIFF_NP_L, 2, 4), slice(DIFF_NP_R, 2, 4)],
    ),
];

// ---------------------------------------------------------------------------
// Allocation
// ---------------------------------------------------------------------------

/// Records assigned to each label, plus drawn records no label uses.
#[derive(Debug, Clone)]
pub struct LabelAllocation {
    pub assignments: Vec<(TrialLabel, Vec<VideoRecord>)>,
    /// Drawn records outside every slice of [`ALLOCATION_TABLE`].
    pub reserve: Vec<VideoRecord>,
}

impl LabelAllocation {
    pub fn trial_count(&self) -> usize {
        self.assignments.iter().map(|(_, r)| r.len()).sum()
    }
}

/// Redistribute the category draws into the 13 trial labels.
///
/// Slicing is deterministic; all randomness happened in the draws.
pub fn allocate_labels(partition: &Partition) -> PlanResult<LabelAllocation> {
    let mut assignments = Vec::with_capacity(LABEL_COUNT);

    for (label, slices) in ALLOCATION_TABLE {
        let mut records = Vec::new();
        for s in slices {
            let draw = partition.draw(&s.draw).ok_or_else(|| {
                PlanError::AllocationMismatch(format!("draw {} missing for {label}", s.draw))
            })?;
            let part = draw.get(s.start..s.end).ok_or_else(|| {
                PlanError::AllocationMismatch(format!(
                    "draw {} has {} records, {label} needs {}..{}",
                    s.draw,
                    draw.len(),
                    s.start,
                    s.end
                ))
            })?;
            records.extend_from_slice(part);
        }
        assignments.push((label, records));
    }

    let reserve = partition
        .draws()
        .flat_map(|(key, draw)| {
            draw.iter()
                .enumerate()
                .filter(move |(i, _)| !is_allocated(key, *i))
                .map(|(_, r)| r.clone())
        })
        .collect();

    let allocation = LabelAllocation {
        assignments,
        reserve,
    };

    if allocation.assignments.len() != LABEL_COUNT {
        return Err(PlanError::AllocationMismatch(format!(
            "expected {LABEL_COUNT} labels, found {}",
            allocation.assignments.len()
        )));
    }
    if allocation.trial_count() != TRIALS_PER_PLAN {
        return Err(PlanError::AllocationMismatch(format!(
            "expected {TRIALS_PER_PLAN} trials, found {}",
            allocation.trial_count()
        )));
    }

    Ok(allocation)
}

fn is_allocated(key: &DrawKey, index: usize) -> bool {
    ALLOCATION_TABLE.iter().any(|(_, slices)| {
        slices
            .iter()
            .any(|s| s.draw == *key && (s.start..s.end).contains(&index))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

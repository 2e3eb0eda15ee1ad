//! Test trials and their persisted record shape.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, PlanResult};
use crate::labels::TrialLabel;
use crate::positions::{Position, SlotPositions};
use crate::types::ObjectRef;

/// An object placed at a screen position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placed {
    pub object: ObjectRef,
    pub position: Position,
}

/// A complete test trial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trial {
    pub label: TrialLabel,
    /// Uppercased word of the source video.
    pub word: String,
    pub target: Option<Placed>,
    /// Distractors in slot order (`other1`, `other2`, `other3`).
    pub others: Vec<Placed>,
    /// Objects of the source video. Empty for trials loaded from storage.
    pub source_objects: Vec<ObjectRef>,
}

impl Trial {
    /// Target (if any) followed by every distractor.
    pub fn objects(&self) -> impl Iterator<Item = &ObjectRef> {
        self.target
            .iter()
            .chain(self.others.iter())
            .map(|p| &p.object)
    }

    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.target
            .iter()
            .chain(self.others.iter())
            .map(|p| p.position)
    }
}

// ---------------------------------------------------------------------------
// Staged construction
// ---------------------------------------------------------------------------

/// A trial with label, word, source objects and target, before positions and
/// distractors are assigned.
#[derive(Debug, Clone)]
pub struct TrialDraft {
    pub label: TrialLabel,
    pub word: String,
    pub source_objects: Vec<ObjectRef>,
    pub target: Option<ObjectRef>,
}

impl TrialDraft {
    /// Combine the draft with its positions and distractors.
    pub fn complete(
        self,
        positions: SlotPositions,
        distractors: Vec<ObjectRef>,
    ) -> PlanResult<Trial> {
        if distractors.len() != positions.others.len()
            || distractors.len() != self.label.distractor_count()
            || self.target.is_some() != positions.target.is_some()
        {
            return Err(PlanError::AllocationMismatch(format!(
                "trial '{}' ({}) got {} distractors for {} slots",
                self.word,
                self.label,
                distractors.len(),
                positions.others.len()
            )));
        }

        let target = self
            .target
            .zip(positions.target)
            .map(|(object, position)| Placed { object, position });
        let others = distractors
            .into_iter()
            .zip(positions.others)
            .map(|(object, position)| Placed { object, position })
            .collect();

        Ok(Trial {
            label: self.label,
            word: self.word,
            target,
            others,
            source_objects: self.source_objects,
        })
    }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// Flat trial record read by the trial-presentation tooling.
///
/// `target` / `target_place` are absent on `notarget` trials, and
/// `other3` / `other3_place` are present only there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub label: TrialLabel,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_place: Option<Position>,
    pub other1: ObjectRef,
    pub other1_place: Position,
    pub other2: ObjectRef,
    pub other2_place: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other3: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other3_place: Option<Position>,
}

impl TryFrom<&Trial> for TrialRecord {
    type Error = PlanError;

    fn try_from(trial: &Trial) -> Result<Self, Self::Error> {
        let expected = trial.label.distractor_count();
        if trial.others.len() != expected || trial.target.is_some() != trial.label.has_target() {
            return Err(PlanError::AllocationMismatch(format!(
                "trial '{}' ({}) has {} distractors, expected {}",
                trial.word,
                trial.label,
                trial.others.len(),
                expected
            )));
        }

        let [other1, other2, rest @ ..] = trial.others.as_slice() else {
            return Err(PlanError::AllocationMismatch(format!(
                "trial '{}' has fewer than two distractors",
                trial.word
            )));
        };
        let other3 = rest.first();
        Ok(Self {
            label: trial.label,
            word: trial.word.clone(),
            target: trial.target.as_ref().map(|t| t.object.clone()),
            target_place: trial.target.as_ref().map(|t| t.position),
            other1: other1.object.clone(),
            other1_place: other1.position,
            other2: other2.object.clone(),
            other2_place: other2.position,
            other3: other3.map(|p| p.object.clone()),
            other3_place: other3.map(|p| p.position),
        })
    }
}

/// Persisted records for `trials`, in order.
pub fn trial_records(trials: &[Trial]) -> PlanResult<Vec<TrialRecord>> {
    trials.iter().map(TrialRecord::try_from).collect()
}

impl TryFrom<TrialRecord> for Trial {
    type Error = String;

    fn try_from(record: TrialRecord) -> Result<Self, Self::Error> {
        let target = match (record.target, record.target_place) {
            (Some(object), Some(position)) => Some(Placed { object, position }),
            (None, None) => None,
            _ => {
                return Err(format!(
                    "'{}': target and target_place must appear together",
                    record.word
                ))
            }
        };
        if target.is_some() != record.label.has_target() {
            return Err(format!(
                "'{}': label {} {} a target",
                record.word,
                record.label,
                if record.label.has_target() { "requires" } else { "forbids" }
            ));
        }

        let mut others = vec![
            Placed {
                object: record.other1,
                position: record.other1_place,
            },
            Placed {
                object: record.other2,
                position: record.other2_place,
            },
        ];
        match (record.other3, record.other3_place) {
            (Some(object), Some(position)) => others.push(Placed { object, position }),
            (None, None) => {}
            _ => {
                return Err(format!(
                    "'{}': other3 and other3_place must appear together",
                    record.word
                ))
            }
        }
        if others.len() != record.label.distractor_count() {
            return Err(format!(
                "'{}': label {} needs {} distractors, found {}",
                record.word,
                record.label,
                record.label.distractor_count(),
                others.len()
            ));
        }

        Ok(Trial {
            label: record.label,
            word: record.word,
            target,
            others,
            source_objects: Vec::new(),
        })
    }
}

//! Plan validation.
//!
//! Findings are data, not errors: a caller inspects the report and decides
//! whether to regenerate the plan.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::pool::MAX_OBJECT_USES;
use crate::trial::Trial;
use crate::types::ObjectRef;

/// An object that appears more than once within one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntraTrialDuplicate {
    pub word: String,
    pub object: ObjectRef,
    pub occurrences: usize,
}

/// An object that fills more than [`MAX_OBJECT_USES`] slots across the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverusedObject {
    pub object: ObjectRef,
    pub occurrences: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub trial_count: usize,
    pub distinct_objects: usize,
    pub object_occurrences: usize,
    pub intra_trial_duplicates: Vec<IntraTrialDuplicate>,
    pub overused_objects: Vec<OverusedObject>,
    /// Words of the trials that use an overused object.
    pub affected_words: Vec<String>,
    pub distinct_words: usize,
}

impl ValidationReport {
    pub fn has_intra_trial_duplicates(&self) -> bool {
        !self.intra_trial_duplicates.is_empty()
    }

    pub fn has_overused_objects(&self) -> bool {
        !self.overused_objects.is_empty()
    }

    pub fn has_repeated_words(&self) -> bool {
        self.distinct_words != self.trial_count
    }

    pub fn is_valid(&self) -> bool {
        !self.has_intra_trial_duplicates()
            && !self.has_overused_objects()
            && !self.has_repeated_words()
    }
}

/// Check a plan for intra-trial duplicates, global overuse and repeated words.
pub fn validate(trials: &[Trial]) -> ValidationReport {
    let mut intra_trial_duplicates = Vec::new();
    let mut totals: BTreeMap<&ObjectRef, usize> = BTreeMap::new();

    for trial in trials {
        let mut counts: BTreeMap<&ObjectRef, usize> = BTreeMap::new();
        for obj in trial.objects() {
            *counts.entry(obj).or_insert(0) += 1;
        }
        for (obj, n) in &counts {
            if *n > 1 {
                intra_trial_duplicates.push(IntraTrialDuplicate {
                    word: trial.word.clone(),
                    object: (*obj).clone(),
                    occurrences: *n,
                });
            }
            *totals.entry(*obj).or_insert(0) += *n;
        }
    }

    let overused_objects: Vec<OverusedObject> = totals
        .iter()
        .filter(|(_, n)| **n > usize::from(MAX_OBJECT_USES))
        .map(|(obj, n)| OverusedObject {
            object: (*obj).clone(),
            occurrences: *n,
        })
        .collect();

    let overused: HashSet<&ObjectRef> = overused_objects.iter().map(|o| &o.object).collect();
    let affected_words: BTreeSet<String> = trials
        .iter()
        .filter(|t| t.objects().any(|obj| overused.contains(obj)))
        .map(|t| t.word.clone())
        .collect();

    let distinct_words = trials
        .iter()
        .map(|t| t.word.as_str())
        .collect::<HashSet<_>>()
        .len();

    ValidationReport {
        trial_count: trials.len(),
        distinct_objects: totals.len(),
        object_occurrences: totals.values().sum(),
        intra_trial_duplicates,
        overused_objects,
        affected_words: affected_words.into_iter().collect(),
        distinct_words,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::TrialLabel;
    use crate::positions::Position;
    use crate::trial::Placed;

    fn trial(word: &str, target: Option<&str>, others: &[&str]) -> Trial {
        let label = if target.is_some() {
            TrialLabel::DiffPointedLeft
        } else {
            TrialLabel::DiffNonpointNotarget
        };
        let mut positions = Position::ALL.into_iter();
        let target = target.map(|t| Placed {
            object: t.into(),
            position: positions.next().unwrap(),
        });
        let others = others
            .iter()
            .map(|o| Placed {
                object: (*o).into(),
                position: positions.next().unwrap(),
            })
            .collect();
        Trial {
            label,
            word: word.to_string(),
            target,
            others,
            source_objects: Vec::new(),
        }
    }

    #[test]
    fn clean_plan_is_valid() {
        let trials = vec![
            trial("A", Some("1"), &["2", "3"]),
            trial("B", Some("4"), &["1", "2"]),
            trial("C", None, &["3", "4", "5"]),
        ];
        let report = validate(&trials);
        assert!(report.is_valid(), "{report:?}");
        assert_eq!(report.trial_count, 3);
        assert_eq!(report.distinct_objects, 5);
        assert_eq!(report.object_occurrences, 9);
    }

    #[test]
    fn detects_intra_trial_duplicates() {
        let trials = vec![trial("A", Some("1"), &["1", "2"])];
        let report = validate(&trials);
        assert!(report.has_intra_trial_duplicates());
        assert_eq!(report.intra_trial_duplicates[0].word, "A");
        assert_eq!(report.intra_trial_duplicates[0].object, ObjectRef::from("1"));
        assert!(!report.is_valid());
    }

    #[test]
    fn detects_objects_used_three_times() {
        let trials = vec![
            trial("A", Some("1"), &["2", "3"]),
            trial("B", Some("4"), &["1", "5"]),
            trial("C", Some("6"), &["1", "7"]),
            trial("D", Some("8"), &["9", "10"]),
        ];
        let report = validate(&trials);
        assert_eq!(
            report.overused_objects,
            vec![OverusedObject {
                object: "1".into(),
                occurrences: 3
            }]
        );
        assert_eq!(report.affected_words, vec!["A", "B", "C"]);
        assert!(!report.has_intra_trial_duplicates());
    }

    #[test]
    fn detects_repeated_words() {
        let trials = vec![
            trial("A", Some("1"), &["2", "3"]),
            trial("A", Some("4"), &["5", "6"]),
        ];
        let report = validate(&trials);
        assert!(report.has_repeated_words());
        assert_eq!(report.distinct_words, 1);
        assert!(!report.has_overused_objects());
    }
}

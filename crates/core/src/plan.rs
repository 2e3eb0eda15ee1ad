//! End-to-end plan generation for one group of familiarization videos.
//!
//! Pipeline: shape check → category draws → label allocation → targets →
//! positions → distractors. Any error aborts the whole group; no partial plan
//! is returned.

use rand::Rng;
use serde::Serialize;

use crate::error::PlanResult;
use crate::labels::{allocate_labels, TrialLabel};
use crate::partition::partition_group;
use crate::pool::DistractorPool;
use crate::positions::assign_positions;
use crate::target::resolve_target;
use crate::trial::{trial_records, Trial, TrialDraft, TrialRecord};
use crate::validation::{validate, ValidationReport};
use crate::video::{check_group_shape, object_universe, VideoRecord};

/// Default number of generation attempts before giving up on a valid plan.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// A generated plan of 28 trials.
#[derive(Debug, Clone)]
pub struct Plan {
    pub trials: Vec<Trial>,
    /// Drawn videos that no label uses.
    pub reserve: Vec<VideoRecord>,
    /// Number of distractor pool refills during generation.
    pub refills: u32,
}

impl Plan {
    pub fn records(&self) -> PlanResult<Vec<TrialRecord>> {
        trial_records(&self.trials)
    }
}

/// Outcome of [`generate_valid_plan`].
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub plan: Plan,
    pub report: ValidationReport,
    pub attempts: u32,
}

/// Generate one plan. The plan is not validated.
pub fn generate_plan<R: Rng + ?Sized>(
    records: Vec<VideoRecord>,
    rng: &mut R,
) -> PlanResult<Plan> {
    check_group_shape(&records)?;
    let universe = object_universe(&records);

    let partition = partition_group(records, rng)?;
    let allocation = allocate_labels(&partition)?;

    let mut drafts = Vec::with_capacity(allocation.trial_count());
    for (label, records) in &allocation.assignments {
        for record in records {
            let target = if label.has_target() {
                Some(resolve_target(*label, record)?)
            } else {
                None
            };
            drafts.push(TrialDraft {
                label: *label,
                word: record.word.to_uppercase(),
                source_objects: record.source_objects(),
                target,
            });
        }
    }

    let targets = drafts.iter().filter_map(|d| d.target.as_ref());
    let mut pool = DistractorPool::new(universe).claim_targets(targets);

    let mut trials = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let positions = assign_positions(draft.target.is_some(), rng);
        let (distractors, next) = pool.draw_distractors(
            &draft.word,
            &draft.source_objects,
            draft.label.distractor_count(),
            rng,
        )?;
        pool = next;
        trials.push(draft.complete(positions, distractors)?);
    }

    Ok(Plan {
        trials,
        reserve: allocation.reserve,
        refills: pool.refills(),
    })
}

/// Generate plans until one validates or `max_attempts` is reached.
///
/// Errors from [`generate_plan`] abort immediately. When no attempt is
/// valid, the last plan is returned with its failing report.
pub fn generate_valid_plan<R: Rng + ?Sized>(
    records: &[VideoRecord],
    rng: &mut R,
    max_attempts: u32,
) -> PlanResult<PlanOutcome> {
    retry_until_valid(max_attempts, || generate_plan(records.to_vec(), &mut *rng))
}

/// Run `attempt` until its plan validates, at most `max_attempts` times (at
/// least once).
pub fn retry_until_valid<F>(max_attempts: u32, mut attempt: F) -> PlanResult<PlanOutcome>
where
    F: FnMut() -> PlanResult<Plan>,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    loop {
        attempts += 1;
        let plan = attempt()?;
        let report = validate(&plan.trials);
        tracing::debug!(
            attempt = attempts,
            refills = plan.refills,
            valid = report.is_valid(),
            "Plan generated",
        );

        if report.is_valid() || attempts >= max_attempts {
            if !report.is_valid() {
                tracing::warn!(attempts, "No valid plan within attempt limit");
            }
            return Ok(PlanOutcome {
                plan,
                report,
                attempts,
            });
        }
    }
}

/// Per-label count summary, in plan order.
pub fn label_counts(trials: &[Trial]) -> Vec<(TrialLabel, usize)> {
    let mut counts: Vec<(TrialLabel, usize)> = Vec::new();
    for trial in trials {
        match counts.iter_mut().find(|(l, _)| *l == trial.label) {
            Some((_, n)) => *n += 1,
            None => counts.push((trial.label, 1)),
        }
    }
    counts
}

/// Summary of a plan for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub trials: usize,
    pub refills: u32,
    pub reserve_words: Vec<String>,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        Self {
            trials: plan.trials.len(),
            refills: plan.refills,
            reserve_words: plan.reserve.iter().map(|r| r.word.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;
    use crate::labels::{LABEL_COUNT, TRIALS_PER_PLAN};
    use crate::positions::Position;
    use crate::testing::{synthetic_group, synthetic_group_names};
    use crate::types::{ObjectRef, Side};
    use crate::video::parse_video_record;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn plan(seed: u64) -> Plan {
        let mut rng = StdRng::seed_from_u64(seed);
        generate_plan(synthetic_group(), &mut rng).unwrap()
    }

    #[test]
    fn plan_has_28_trials_over_13_labels() {
        let plan = plan(1);
        assert_eq!(plan.trials.len(), TRIALS_PER_PLAN);
        assert_eq!(label_counts(&plan.trials).len(), LABEL_COUNT);
        assert_eq!(plan.reserve.len(), 4);
    }

    #[test]
    fn generated_plans_satisfy_all_invariants() {
        for seed in 0..50 {
            let plan = plan(seed);
            let report = validate(&plan.trials);
            assert!(report.is_valid(), "seed {seed}: {report:?}");
        }
    }

    #[test]
    fn trial_objects_are_pairwise_distinct() {
        for seed in 0..20 {
            for trial in plan(seed).trials {
                let objs: Vec<&ObjectRef> = trial.objects().collect();
                let unique: HashSet<&ObjectRef> = objs.iter().copied().collect();
                assert_eq!(objs.len(), unique.len(), "{}", trial.word);
                assert_eq!(objs.len(), 3);
            }
        }
    }

    #[test]
    fn positions_are_a_bijection() {
        for trial in plan(3).trials {
            let positions: HashSet<Position> = trial.positions().collect();
            assert_eq!(positions, Position::ALL.into_iter().collect::<HashSet<_>>());
        }
    }

    #[test]
    fn distractors_exclude_source_objects() {
        for trial in plan(4).trials {
            for other in &trial.others {
                assert!(!trial.source_objects.contains(&other.object), "{}", trial.word);
            }
        }
    }

    #[test]
    fn words_are_unique_and_uppercased() {
        let plan = plan(5);
        let words: HashSet<&str> = plan.trials.iter().map(|t| t.word.as_str()).collect();
        assert_eq!(words.len(), TRIALS_PER_PLAN);
        assert!(plan.trials.iter().all(|t| t.word == t.word.to_uppercase()));
    }

    #[test]
    fn diff_pointed_left_targets_pointed_object() {
        let records = synthetic_group();
        for seed in 0..20 {
            for trial in plan(seed).trials {
                if trial.label != TrialLabel::DiffPointedLeft {
                    continue;
                }
                let source = records
                    .iter()
                    .find(|r| r.word.to_uppercase() == trial.word)
                    .unwrap();
                assert_eq!(source.pointed_side, Some(Side::Left));
                assert_eq!(
                    trial.target.as_ref().map(|t| &t.object),
                    source.pointed_object()
                );
            }
        }
    }

    #[test]
    fn apple_in_same_pointed_left_targets_its_object() {
        let apple = parse_video_record(&synthetic_group_names()[0]).unwrap();
        let universe = object_universe(&synthetic_group());
        let mut found = false;

        for seed in 0..40 {
            let plan = plan(seed);
            let Some(trial) = plan.trials.iter().find(|t| t.word == "APPLE") else {
                continue;
            };
            if trial.label != TrialLabel::SamePointedLeft {
                continue;
            }
            found = true;
            assert_eq!(trial.target.as_ref().unwrap().object, apple.object_refs[0]);
            assert_eq!(trial.others.len(), 2);
            for other in &trial.others {
                assert_ne!(other.object, ObjectRef::from("010"));
                assert!(universe.contains(&other.object));
            }
        }
        assert!(found, "apple should land in same_pointed_left for some seed");
    }

    #[test]
    fn notarget_trials_have_three_distractors() {
        let plan = plan(6);
        let notarget: Vec<&Trial> = plan
            .trials
            .iter()
            .filter(|t| t.label == TrialLabel::DiffNonpointNotarget)
            .collect();
        assert_eq!(notarget.len(), 4);
        for trial in notarget {
            assert!(trial.target.is_none());
            assert_eq!(trial.others.len(), 3);
            let positions: HashSet<Position> = trial.positions().collect();
            assert_eq!(positions.len(), 3);
        }
    }

    #[test]
    fn same_seed_reproduces_the_plan() {
        assert_eq!(plan(77).records().unwrap(), plan(77).records().unwrap());
    }

    #[test]
    fn malformed_group_aborts_generation() {
        let mut records = synthetic_group();
        records.truncate(31);
        let mut rng = StdRng::seed_from_u64(0);
        assert_matches!(
            generate_plan(records, &mut rng),
            Err(PlanError::InvalidGroup(_))
        );
    }

    #[test]
    fn valid_plan_found_on_first_attempt() {
        let mut rng = StdRng::seed_from_u64(8);
        let outcome = generate_valid_plan(&synthetic_group(), &mut rng, 3).unwrap();
        assert!(outcome.report.is_valid());
        assert_eq!(outcome.attempts, 1);
        assert_eq!(PlanSummary::from(&outcome.plan).reserve_words.len(), 4);
    }

    // -- retry_until_valid ---------------------------------------------------

    fn with_repeated_word(mut plan: Plan) -> Plan {
        plan.trials[1].word = plan.trials[0].word.clone();
        plan
    }

    #[test]
    fn retries_until_a_plan_validates() {
        let mut calls = 0;
        let outcome = retry_until_valid(DEFAULT_MAX_ATTEMPTS, || {
            calls += 1;
            let fresh = plan(calls);
            Ok(if calls < 3 { with_repeated_word(fresh) } else { fresh })
        })
        .unwrap();

        assert_eq!(outcome.attempts, 3);
        assert_eq!(calls, 3);
        assert!(outcome.report.is_valid());
    }

    #[test]
    fn attempt_limit_returns_the_last_failing_plan() {
        let mut calls = 0;
        let outcome = retry_until_valid(4, || {
            calls += 1;
            Ok(with_repeated_word(plan(calls)))
        })
        .unwrap();

        assert_eq!(outcome.attempts, 4);
        assert_eq!(calls, 4);
        assert!(!outcome.report.is_valid());
        assert!(outcome.report.has_repeated_words());
        assert_eq!(outcome.plan.trials.len(), TRIALS_PER_PLAN);
    }

    #[test]
    fn zero_attempt_limit_still_tries_once() {
        let mut calls = 0;
        let outcome = retry_until_valid(0, || {
            calls += 1;
            Ok(with_repeated_word(plan(7)))
        })
        .unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(calls, 1);
    }

    #[test]
    fn generation_error_stops_retrying() {
        let mut calls = 0;
        let result = retry_until_valid(5, || {
            calls += 1;
            Err(PlanError::InvalidGroup("empty".to_string()))
        });
        assert_matches!(result, Err(PlanError::InvalidGroup(_)));
        assert_eq!(calls, 1);
    }
}

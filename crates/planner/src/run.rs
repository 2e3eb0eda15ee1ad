//! Per-group orchestration for the two run modes.

use std::path::PathBuf;

use lexitrial_core::plan::{generate_valid_plan, PlanSummary};
use lexitrial_core::trial::Trial;
use lexitrial_core::validation::{validate, ValidationReport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{PlannerConfig, RunMode};
use crate::error::PlannerResult;
use crate::source::{discover_groups, load_group, GroupFolder};
use crate::store::{load_plan, save_plan, stored_groups};

/// Result of processing one group.
#[derive(Debug, Clone)]
pub struct GroupOutcome {
    pub group: String,
    pub trials: Vec<Trial>,
    pub report: ValidationReport,
    /// Present for generated plans.
    pub summary: Option<PlanSummary>,
    pub attempts: u32,
    /// Where the plan was written, when saving is enabled and it validated.
    pub saved_to: Option<PathBuf>,
}

/// The random source for a run: seeded when configured, fresh otherwise.
pub fn run_rng(config: &PlannerConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Process every selected group according to the configured mode.
pub fn run<R: Rng + ?Sized>(
    config: &PlannerConfig,
    rng: &mut R,
) -> PlannerResult<Vec<GroupOutcome>> {
    match config.mode {
        RunMode::Generate => {
            let groups = select(discover_groups(&config.video_root)?, &config.groups, |g| {
                g.name.as_str()
            });
            groups
                .iter()
                .map(|g| generate_group(config, g, &mut *rng))
                .collect()
        }
        RunMode::Load => {
            let groups = select(stored_groups(&config.output_dir)?, &config.groups, |g| {
                g.as_str()
            });
            groups.iter().map(|g| load_group_plan(config, g)).collect()
        }
    }
}

/// Generate, validate and optionally save the plan for one group folder.
pub fn generate_group<R: Rng + ?Sized>(
    config: &PlannerConfig,
    group: &GroupFolder,
    rng: &mut R,
) -> PlannerResult<GroupOutcome> {
    tracing::info!(group = %group.name, "Extracting data");
    let records = load_group(group)?;
    let outcome = generate_valid_plan(&records, rng, config.max_attempts)?;

    let saved_to = if config.save && outcome.report.is_valid() {
        Some(save_plan(
            &config.output_dir,
            &group.name,
            &outcome.plan.records()?,
        )?)
    } else {
        None
    };

    Ok(GroupOutcome {
        group: group.name.clone(),
        summary: Some(PlanSummary::from(&outcome.plan)),
        trials: outcome.plan.trials,
        report: outcome.report,
        attempts: outcome.attempts,
        saved_to,
    })
}

/// Load and re-validate a stored plan.
pub fn load_group_plan(config: &PlannerConfig, group: &str) -> PlannerResult<GroupOutcome> {
    let trials = load_plan(&config.output_dir, group)?;
    let report = validate(&trials);
    Ok(GroupOutcome {
        group: group.to_string(),
        trials,
        report,
        summary: None,
        attempts: 0,
        saved_to: None,
    })
}

fn select<T, F>(items: Vec<T>, wanted: &[String], name: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    if wanted.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| wanted.iter().any(|w| w == name(item)))
        .collect()
}

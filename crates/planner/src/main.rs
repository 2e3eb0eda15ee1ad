//! `lexitrial-planner` -- test-trial plan generator.
//!
//! Scans the video root for `group*` folders, generates a validated plan of
//! 28 test trials per group, and optionally saves each plan as JSON. In
//! `load` mode it re-validates previously saved plans instead.
//!
//! Configuration is read from the environment (and `.env`); see
//! [`PlannerConfig::from_env`] for the variables.

use anyhow::Context;
use lexitrial_planner::config::PlannerConfig;
use lexitrial_planner::report::{log_report, render_plan, render_report};
use lexitrial_planner::run::{run, run_rng};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexitrial_planner=info,lexitrial_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PlannerConfig::from_env().context("failed to load planner configuration")?;

    tracing::info!(
        video_root = %config.video_root.display(),
        output_dir = %config.output_dir.display(),
        mode = ?config.mode,
        seed = ?config.seed,
        "Starting lexitrial-planner",
    );

    let mut rng = run_rng(&config);
    let outcomes = run(&config, &mut rng).context("plan generation failed")?;

    if outcomes.is_empty() {
        tracing::warn!("No groups found");
    }

    let mut invalid = 0;
    for outcome in &outcomes {
        log_report(&outcome.group, &outcome.report);
        if let Some(summary) = &outcome.summary {
            tracing::info!(
                group = %outcome.group,
                attempts = outcome.attempts,
                refills = summary.refills,
                reserve = ?summary.reserve_words,
                "Plan generated",
            );
        }

        println!("{}", render_report(&outcome.group, &outcome.report, &outcome.trials));
        if config.print_plan {
            let plan = render_plan(&outcome.trials).context("failed to render plan")?;
            println!("Arrangements for {}:\n{plan}", outcome.group);
        }

        if !outcome.report.is_valid() {
            invalid += 1;
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} group(s) have no valid plan");
    }
    Ok(())
}

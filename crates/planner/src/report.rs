//! Console rendering of validation reports and plans.

use std::fmt::{self, Write};

use lexitrial_core::plan::label_counts;
use lexitrial_core::trial::{trial_records, Trial};
use lexitrial_core::validation::ValidationReport;

use crate::error::PlannerResult;

/// Render a human-readable validation report for one group.
pub fn render_report(group: &str, report: &ValidationReport, trials: &[Trial]) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, group, report, trials);
    out
}

/// Write the validation report for one group to `out`.
pub fn write_report<W: Write>(
    out: &mut W,
    group: &str,
    report: &ValidationReport,
    trials: &[Trial],
) -> fmt::Result {
    writeln!(out, "Testing {group} arrangements:")?;
    writeln!(out, "\tNumber of arrangements in group: {}", report.trial_count)?;
    writeln!(out, "\tNumber of objects used in group: {}", report.distinct_objects)?;
    writeln!(
        out,
        "\tNumber of object occurrences in group: {}",
        report.object_occurrences
    )?;

    for (label, count) in label_counts(trials) {
        writeln!(out, "\t  {label}: {count}")?;
    }

    for dup in &report.intra_trial_duplicates {
        writeln!(
            out,
            "--> object {} occurs {} times with {}",
            dup.object, dup.occurrences, dup.word
        )?;
    }

    if report.has_overused_objects() {
        let objects: Vec<String> = report
            .overused_objects
            .iter()
            .map(|o| format!("{} ({}x)", o.object, o.occurrences))
            .collect();
        writeln!(
            out,
            "--> object(s) {} occur more than 2 times in this group",
            objects.join(", ")
        )?;
        writeln!(out, "\t-> The affected words are: {}", report.affected_words.join(", "))?;
    }

    if report.has_repeated_words() {
        writeln!(
            out,
            "\t-> number of distinct words ({}) differs from number of arrangements ({})",
            report.distinct_words, report.trial_count
        )?;
    }

    if report.is_valid() {
        writeln!(out, "--> NO ERRORS found in this group.")
    } else {
        writeln!(out, "!! There is an ERROR in this group!")
    }
}

/// Pretty JSON of a plan's trial records.
pub fn render_plan(trials: &[Trial]) -> PlannerResult<String> {
    let records = trial_records(trials)?;
    Ok(serde_json::to_string_pretty(&records)?)
}

/// Log the findings of a report as structured events.
pub fn log_report(group: &str, report: &ValidationReport) {
    if report.is_valid() {
        tracing::info!(
            group,
            trials = report.trial_count,
            objects = report.distinct_objects,
            occurrences = report.object_occurrences,
            "Plan is valid",
        );
        return;
    }
    tracing::warn!(
        group,
        intra_trial_duplicates = report.intra_trial_duplicates.len(),
        overused_objects = report.overused_objects.len(),
        distinct_words = report.distinct_words,
        trials = report.trial_count,
        "Plan failed validation",
    );
}

use std::path::PathBuf;

use lexitrial_core::plan::DEFAULT_MAX_ATTEMPTS;

use crate::error::{PlannerError, PlannerResult};

/// What the planner does with each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Generate (and optionally save) new plans from the video folders.
    Generate,
    /// Load previously saved plans and re-validate them.
    Load,
}

impl RunMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "generate" => Some(Self::Generate),
            "load" => Some(Self::Load),
            _ => None,
        }
    }
}

/// Planner configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Directory holding the `group*` video folders.
    pub video_root: PathBuf,
    /// Where plans are saved to and loaded from.
    pub output_dir: PathBuf,
    pub mode: RunMode,
    /// Restrict the run to these groups; empty means every discovered group.
    pub groups: Vec<String>,
    /// Persist plans that pass validation.
    pub save: bool,
    pub max_attempts: u32,
    /// Fixed seed for reproducible runs; fresh randomness when `None`.
    pub seed: Option<u64>,
    /// Print every plan as pretty JSON after its report.
    pub print_plan: bool,
}

impl PlannerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default          |
    /// |--------------------------|------------------|
    /// | `LEXITRIAL_VIDEO_ROOT`   | `.`              |
    /// | `LEXITRIAL_OUTPUT_DIR`   | video root       |
    /// | `LEXITRIAL_MODE`         | `generate`       |
    /// | `LEXITRIAL_GROUPS`       | all groups       |
    /// | `LEXITRIAL_SAVE`         | `false`          |
    /// | `LEXITRIAL_MAX_ATTEMPTS` | `10`             |
    /// | `LEXITRIAL_SEED`         | unset            |
    /// | `LEXITRIAL_PRINT_PLAN`   | `false`          |
    pub fn from_env() -> PlannerResult<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> PlannerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let video_root = PathBuf::from(var("LEXITRIAL_VIDEO_ROOT").unwrap_or_else(|| ".".into()));
        let output_dir = var("LEXITRIAL_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| video_root.clone());

        let mode = match var("LEXITRIAL_MODE") {
            Some(raw) => RunMode::from_str(raw.trim()).ok_or_else(|| {
                PlannerError::Config(format!(
                    "LEXITRIAL_MODE must be 'generate' or 'load', got '{raw}'"
                ))
            })?,
            None => RunMode::Generate,
        };

        let groups: Vec<String> = var("LEXITRIAL_GROUPS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let save = parse_bool(&var, "LEXITRIAL_SAVE")?;
        let print_plan = parse_bool(&var, "LEXITRIAL_PRINT_PLAN")?;

        let max_attempts: u32 = match var("LEXITRIAL_MAX_ATTEMPTS") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    PlannerError::Config(format!(
                        "LEXITRIAL_MAX_ATTEMPTS must be a positive integer, got '{raw}'"
                    ))
                })?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let seed = var("LEXITRIAL_SEED")
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|_| {
                    PlannerError::Config(format!("LEXITRIAL_SEED must be a u64, got '{raw}'"))
                })
            })
            .transpose()?;

        Ok(Self {
            video_root,
            output_dir,
            mode,
            groups,
            save,
            max_attempts,
            seed,
            print_plan,
        })
    }
}

fn parse_bool<F>(var: &F, key: &str) -> PlannerResult<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key).as_deref().map(str::trim) {
        None | Some("") => Ok(false),
        Some("1" | "true" | "yes") => Ok(true),
        Some("0" | "false" | "no") => Ok(false),
        Some(other) => Err(PlannerError::Config(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> PlannerResult<PlannerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlannerConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.video_root, PathBuf::from("."));
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.mode, RunMode::Generate);
        assert!(cfg.groups.is_empty());
        assert!(!cfg.save);
        assert_eq!(cfg.max_attempts, DEFAULT_MAX_ATTEMPTS);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn output_dir_defaults_to_video_root() {
        let cfg = config(&[("LEXITRIAL_VIDEO_ROOT", "/data/videos")]).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/data/videos"));
    }

    #[test]
    fn parses_all_overrides() {
        let cfg = config(&[
            ("LEXITRIAL_MODE", "load"),
            ("LEXITRIAL_GROUPS", "group1A, group2B,"),
            ("LEXITRIAL_SAVE", "true"),
            ("LEXITRIAL_MAX_ATTEMPTS", "3"),
            ("LEXITRIAL_SEED", "42"),
            ("LEXITRIAL_PRINT_PLAN", "1"),
        ])
        .unwrap();
        assert_eq!(cfg.mode, RunMode::Load);
        assert_eq!(cfg.groups, vec!["group1A", "group2B"]);
        assert!(cfg.save);
        assert!(cfg.print_plan);
        assert_eq!(cfg.max_attempts, 3);
        assert_eq!(cfg.seed, Some(42));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(config(&[("LEXITRIAL_MODE", "replay")]).is_err());
        assert!(config(&[("LEXITRIAL_SAVE", "maybe")]).is_err());
        assert!(config(&[("LEXITRIAL_MAX_ATTEMPTS", "0")]).is_err());
        assert!(config(&[("LEXITRIAL_SEED", "-1")]).is_err());
    }
}

use lexitrial_core::error::PlanError;

/// Errors raised by the planner adapters.
///
/// Wraps [`PlanError`] for generation failures and adds I/O, storage and
/// configuration variants.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Core(#[from] PlanError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to render plan: {0}")]
    Render(#[from] serde_json::Error),

    #[error("Invalid stored trial: {0}")]
    InvalidRecord(String),

    #[error("Group '{group}' has {found} videos, expected {expected}")]
    GroupSize {
        group: String,
        found: usize,
        expected: usize,
    },
}

impl PlannerError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

pub type PlannerResult<T> = Result<T, PlannerError>;

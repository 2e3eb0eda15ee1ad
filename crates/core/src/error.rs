use crate::labels::TrialLabel;
use crate::partition::DrawKey;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("Malformed video name '{name}': {reason}")]
    MalformedName { name: String, reason: String },

    #[error("Invalid video group: {0}")]
    InvalidGroup(String),

    #[error("Insufficient pool for {key}: need {needed}, found {available}")]
    InsufficientPool {
        key: DrawKey,
        needed: usize,
        available: usize,
    },

    #[error("Allocation mismatch: {0}")]
    AllocationMismatch(String),

    #[error("Label {label} has no target for video word '{word}'")]
    TargetUnavailable { label: TrialLabel, word: String },

    #[error("Distractor pool exhausted for '{word}': need {needed}, found {available}")]
    DistractorPoolExhausted {
        word: String,
        needed: usize,
        available: usize,
    },
}

impl PlanError {
    pub(crate) fn malformed(name: &str, reason: impl Into<String>) -> Self {
        Self::MalformedName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

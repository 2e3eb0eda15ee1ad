//! Constrained random allocation of test trials for a word-learning
//! experiment.
//!
//! Pure domain logic with no I/O: callers hand in parsed video records and
//! receive a plan of trials plus a validation report. Directory scanning,
//! persistence and console output live in `lexitrial-planner`.

pub mod error;
pub mod labels;
pub mod partition;
pub mod plan;
pub mod pool;
pub mod positions;
pub mod target;
pub mod trial;
pub mod types;
pub mod validation;
pub mod video;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

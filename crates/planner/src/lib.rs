//! `lexitrial-planner` library crate.
//!
//! Adapters around `lexitrial-core`: configuration, group folder scanning,
//! plan persistence and console reporting. The binary entrypoint lives in
//! `main.rs`.

pub mod config;
pub mod error;
pub mod report;
pub mod run;
pub mod source;
pub mod store;

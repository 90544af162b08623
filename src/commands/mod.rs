//! CLI command implementations.
//!
//! - **assemble**: assemble a batch of exams against a JSON catalog
//! - **check-config**: print the effective configuration

pub mod assemble;
pub mod check_config;

pub use assemble::{assemble_batch, run_assemble, AssembleConfig, BatchReport, ExamFailure};
pub use check_config::{effective_config, run_check_config};

//! Segment and test assembly for standardized-test attempts.
//!
//! Given an assessment and an examinee's attempt, the engine decides which items
//! each segment may draw from, how long each adaptive segment can be, which
//! pre-built form each fixed-form segment uses, and which experimental
//! field-test item groups are seeded into the attempt and where.
//!
//! The entry point is [`SegmentAssembler`]; its collaborators (content catalog,
//! accommodations, field-test history, persistence, clock, randomness) come in
//! through an [`AssemblyEnv`](env::AssemblyEnv).

// Export modules for library usage
pub mod assembly;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod env;
pub mod errors;
pub mod io;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    Accommodation, AssemblyManifest, Assessment, DateWindow, Exam, ExamSegment,
    FieldTestItemGroup, Form, FormAssignment, Item, ItemConstraint, ItemProperty, Segment,
    SegmentPoolInfo, SelectionAlgorithm, Strand,
};

pub use crate::assembly::{
    assign_positions, calculate_segment_pool, eligible_items, is_field_test_eligible,
    FieldTestSelector, FieldTestUsage, FormSelector, Placement, SegmentAssembler,
    SelectionRequest,
};

pub use crate::config::{load_config, AssemblyConfig};
pub use crate::env::{AssemblyEnv, RealEnv};
pub use crate::errors::{AssemblyError, ErrorCode};

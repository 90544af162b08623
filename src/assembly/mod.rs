//! Segment and test assembly.
//!
//! - [`item_pool`]: accommodation-driven item eligibility
//! - [`segment_pool`]: adaptive pool sizing against strand minimums
//! - [`eligibility`]: whether a segment may receive field-test items now
//! - [`field_test`]: fair group selection and position assignment
//! - [`form_selector`]: round-robin forms for fixed-form segments
//! - [`orchestrator`]: one pass over an assessment's segments

pub mod eligibility;
pub mod field_test;
pub mod form_selector;
pub mod item_pool;
pub mod orchestrator;
pub mod segment_pool;

pub use eligibility::is_field_test_eligible;
pub use field_test::{
    assign_positions, FieldTestSelector, FieldTestUsage, GroupUsage, Placement, SelectionRequest,
};
pub use form_selector::FormSelector;
pub use item_pool::eligible_items;
pub use orchestrator::SegmentAssembler;
pub use segment_pool::{achievable_length, calculate_segment_pool, strand_coverage, StrandCoverage};

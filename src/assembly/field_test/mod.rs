//! Field-test seeding: group selection, usage tracking and placement.

pub mod positions;
pub mod selector;
pub mod usage;

pub use positions::{assign_positions, interval_size, Placement};
pub use selector::{FieldTestSelector, SelectionRequest};
pub use usage::{FieldTestUsage, GroupUsage};

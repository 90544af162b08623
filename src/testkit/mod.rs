//! Testing infrastructure for exam assembly.
//!
//! - **[`AssemblyTestEnv`]**: in-memory environment implementing
//!   [`AssemblyEnv`](crate::env::AssemblyEnv) with a fixed clock and scripted
//!   randomness
//! - **[`SequenceRandom`]**: a [`RandomSource`](crate::io::RandomSource) that
//!   replays given draws, for asserting exact field-test positions
//! - **Fixture builders**: [`ItemBuilder`], [`SegmentBuilder`] and small
//!   factory functions for forms, exams and assessments
//! - **Assertion macros**: `assert_result_ok!`, `assert_result_err!` and
//!   `assert_error_code!`, exported at the crate root
//!
//! # Quick Start
//!
//! ```rust
//! use exam_assembly::assembly::SegmentAssembler;
//! use exam_assembly::testkit::{
//!     assessment_with, exam, AssemblyTestEnv, ItemBuilder, SegmentBuilder,
//! };
//! use exam_assembly::assert_result_ok;
//!
//! let segment = SegmentBuilder::adaptive("MATH")
//!     .max_items(2)
//!     .strand("Algebra", 1, Some(0.0))
//!     .item(ItemBuilder::new("i1").strand("Algebra").build())
//!     .item(ItemBuilder::new("i2").strand("Algebra").build())
//!     .build();
//! let env = AssemblyTestEnv::new();
//! let assembler = SegmentAssembler::new(env.clone());
//!
//! let assessment = assessment_with(vec![segment]);
//! let manifest = assert_result_ok!(assembler.assemble(&exam("exam-1"), &assessment));
//! assert_eq!(manifest.total_items, 2);
//! assert_eq!(env.recorded().exam_segments().len(), 1);
//! ```

pub mod assertions;
pub mod helpers;
pub mod mock_env;
pub mod random;

// Assertion macros are exported at crate root via #[macro_export]
pub use helpers::{
    assessment_with, exam, form, language_constraint, ItemBuilder, SegmentBuilder,
    DEFAULT_LANGUAGE,
};
pub use mock_env::AssemblyTestEnv;
pub use random::SequenceRandom;

//! Collaborator traits for the assembly engine.
//!
//! Everything the engine needs from the outside world comes through these traits:
//! accommodation lookup, the content catalog, historical field-test assignments,
//! and persistence of the assembled records. The assembly algorithms themselves
//! stay pure and can be tested against in-memory implementations.
//!
//! All implementations must be `Send + Sync`: one assembler serves many
//! concurrent attempts.

use crate::core::{Accommodation, Assessment, ExamSegment, FieldTestItemGroup};
use crate::errors::AssemblyError;

/// Approved accommodations for an examinee.
pub trait AccommodationProvider: Send + Sync {
    /// Currently-approved accommodations for the attempt.
    ///
    /// # Errors
    ///
    /// Returns `AssemblyError::Collaborator` when the lookup fails.
    fn approved_accommodations(&self, exam_id: &str) -> Result<Vec<Accommodation>, AssemblyError>;
}

/// Read-only access to assessment content.
pub trait ContentCatalog: Send + Sync {
    /// The assessment with its segments, items, strands, forms and constraints.
    ///
    /// Returns `Ok(None)` when the catalog has no such assessment.
    fn find_assessment(
        &self,
        client_name: &str,
        assessment_key: &str,
    ) -> Result<Option<Assessment>, AssemblyError>;
}

/// Field-test groups assigned to an attempt by earlier assembly passes.
pub trait FieldTestHistory: Send + Sync {
    fn assigned_groups(
        &self,
        exam_id: &str,
        segment_key: &str,
    ) -> Result<Vec<FieldTestItemGroup>, AssemblyError>;
}

/// Durable storage for assembled records.
pub trait AssemblySink: Send + Sync {
    fn save_exam_segments(&self, segments: &[ExamSegment]) -> Result<(), AssemblyError>;

    fn save_field_test_groups(&self, groups: &[FieldTestItemGroup]) -> Result<(), AssemblyError>;
}

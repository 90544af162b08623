//! In-memory collaborator implementations.
//!
//! These back the command-line tool (which loads everything from a JSON catalog
//! file) and the test environments. They are thread-safe and can be shared
//! across concurrent assembly passes.

use crate::core::{Accommodation, Assessment, ExamSegment, FieldTestItemGroup};
use crate::errors::AssemblyError;
use crate::io::traits::{AccommodationProvider, AssemblySink, ContentCatalog, FieldTestHistory};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Everything the CLI needs to assemble exams, as read from one JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Client name -> assessments
    #[serde(default)]
    pub clients: BTreeMap<String, Vec<Assessment>>,
    /// Exam id -> approved accommodations
    #[serde(default)]
    pub accommodations: HashMap<String, Vec<Accommodation>>,
    #[serde(default)]
    pub field_test_history: Vec<FieldTestItemGroup>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self, AssemblyError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    assessments: RwLock<HashMap<(String, String), Assessment>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, client_name: impl Into<String>, assessment: Assessment) {
        self.assessments
            .write()
            .insert((client_name.into(), assessment.key.clone()), assessment);
    }
}

impl ContentCatalog for InMemoryCatalog {
    fn find_assessment(
        &self,
        client_name: &str,
        assessment_key: &str,
    ) -> Result<Option<Assessment>, AssemblyError> {
        Ok(self
            .assessments
            .read()
            .get(&(client_name.to_string(), assessment_key.to_string()))
            .cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccommodations {
    by_exam: RwLock<HashMap<String, Vec<Accommodation>>>,
}

impl InMemoryAccommodations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approve(&self, exam_id: impl Into<String>, accommodation: Accommodation) {
        self.by_exam
            .write()
            .entry(exam_id.into())
            .or_default()
            .push(accommodation);
    }
}

impl AccommodationProvider for InMemoryAccommodations {
    fn approved_accommodations(&self, exam_id: &str) -> Result<Vec<Accommodation>, AssemblyError> {
        Ok(self.by_exam.read().get(exam_id).cloned().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryHistory {
    groups: RwLock<Vec<FieldTestItemGroup>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, group: FieldTestItemGroup) {
        self.groups.write().push(group);
    }
}

impl FieldTestHistory for InMemoryHistory {
    fn assigned_groups(
        &self,
        exam_id: &str,
        segment_key: &str,
    ) -> Result<Vec<FieldTestItemGroup>, AssemblyError> {
        Ok(self
            .groups
            .read()
            .iter()
            .filter(|group| group.exam_id == exam_id && group.segment_key == segment_key)
            .cloned()
            .collect())
    }
}

/// Keeps every persisted record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    exam_segments: RwLock<Vec<ExamSegment>>,
    field_test_groups: RwLock<Vec<FieldTestItemGroup>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exam_segments(&self) -> Vec<ExamSegment> {
        self.exam_segments.read().clone()
    }

    pub fn field_test_groups(&self) -> Vec<FieldTestItemGroup> {
        self.field_test_groups.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.exam_segments.read().is_empty() && self.field_test_groups.read().is_empty()
    }
}

impl AssemblySink for RecordingSink {
    fn save_exam_segments(&self, segments: &[ExamSegment]) -> Result<(), AssemblyError> {
        self.exam_segments.write().extend_from_slice(segments);
        Ok(())
    }

    fn save_field_test_groups(&self, groups: &[FieldTestItemGroup]) -> Result<(), AssemblyError> {
        self.field_test_groups.write().extend_from_slice(groups);
        Ok(())
    }
}

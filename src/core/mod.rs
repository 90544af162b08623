pub mod window;

pub use window::DateWindow;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How the items of a segment are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionAlgorithm {
    /// Items come from a pre-built form
    FixedForm,
    /// Items are drawn from an eligible pool while the attempt runs
    Adaptive,
}

impl SelectionAlgorithm {
    pub fn is_fixed_form(&self) -> bool {
        matches!(self, SelectionAlgorithm::FixedForm)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProperty {
    pub name: String,
    pub value: String,
}

impl ItemProperty {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single test question as loaded from the content catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    /// Physical grouping of items delivered together (stimulus + questions)
    pub group_id: String,
    /// Group + block composite
    pub group_key: String,
    pub block_id: String,
    pub strand: String,
    #[serde(default)]
    pub field_test: bool,
    #[serde(default)]
    pub properties: Vec<ItemProperty>,
}

impl Item {
    /// Property names compare case-insensitively, values exactly.
    pub fn has_property(&self, name: &str, value: &str) -> bool {
        self.properties
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name) && p.value == value)
    }
}

/// Ties an accommodation (tool type + value) to an item property.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemConstraint {
    pub tool_type: String,
    pub tool_value: String,
    pub property_name: String,
    pub property_value: String,
    /// Inclusive: the item must carry the property. Exclusive: it must not.
    pub inclusive: bool,
}

impl ItemConstraint {
    pub fn applies_to(&self, accommodation: &Accommodation) -> bool {
        self.tool_type
            .eq_ignore_ascii_case(&accommodation.accommodation_type)
            && self.tool_value == accommodation.code
    }

    pub fn matches(&self, item: &Item) -> bool {
        item.has_property(&self.property_name, &self.property_value)
    }
}

/// An approved accommodation for one examinee
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    #[serde(rename = "type")]
    pub accommodation_type: String,
    pub code: String,
}

impl Accommodation {
    pub fn new(accommodation_type: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            accommodation_type: accommodation_type.into(),
            code: code.into(),
        }
    }
}

/// Content category of a segment with its coverage requirements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strand {
    pub name: String,
    pub min_items: u32,
    pub max_items: u32,
    /// Strands without a cut take no part in adaptive shortfall accounting
    #[serde(default)]
    pub adaptive_cut: Option<f64>,
}

/// A pre-built ordered item list for a fixed-form segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub key: String,
    pub id: String,
    pub language: String,
    pub cohort: String,
    #[serde(default)]
    pub item_ids: Vec<String>,
}

impl Form {
    pub fn item_count(&self) -> u32 {
        u32::try_from(self.item_ids.len()).unwrap_or(u32::MAX)
    }
}

/// One sub-test of an assessment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub key: String,
    pub id: String,
    pub position: u32,
    pub algorithm: SelectionAlgorithm,
    #[serde(default)]
    pub min_items: u32,
    pub max_items: u32,
    #[serde(default)]
    pub field_test_start_position: u32,
    #[serde(default)]
    pub field_test_end_position: u32,
    #[serde(default)]
    pub field_test_min_items: u32,
    #[serde(default)]
    pub field_test_max_items: u32,
    #[serde(default)]
    pub field_test_window: DateWindow,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub strands: Vec<Strand>,
    #[serde(default)]
    pub forms: Vec<Form>,
}

impl Segment {
    /// Items whose `language_property` equals `language`.
    pub fn items_in_language<'s, 'q>(
        &'s self,
        language_property: &'q str,
        language: &'q str,
    ) -> impl Iterator<Item = &'s Item> + use<'s, 'q> {
        self.items
            .iter()
            .filter(move |item| item.has_property(language_property, language))
    }

    pub fn forms_in_language<'s, 'q>(
        &'s self,
        language: &'q str,
    ) -> impl Iterator<Item = &'s Form> + use<'s, 'q> {
        self.forms.iter().filter(move |form| form.language == language)
    }

    pub fn strand(&self, name: &str) -> Option<&Strand> {
        self.strands.iter().find(|strand| strand.name == name)
    }
}

/// An assessment with its segments and accommodation-driven item constraints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub key: String,
    pub id: String,
    /// Content-segmented assessments also gate field tests per segment
    #[serde(default)]
    pub segmented: bool,
    #[serde(default)]
    pub field_test_window: DateWindow,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub item_constraints: Vec<ItemConstraint>,
}

impl Assessment {
    pub fn segment(&self, key: &str) -> Option<&Segment> {
        self.segments.iter().find(|segment| segment.key == key)
    }

    /// Segments in ascending position order.
    pub fn segments_by_position(&self) -> Vec<&Segment> {
        let mut segments: Vec<&Segment> = self.segments.iter().collect();
        segments.sort_by_key(|segment| segment.position);
        segments
    }
}

/// One examinee's attempt at an assessment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub session_id: String,
    pub client_name: String,
    pub assessment_key: String,
    pub language_code: String,
    pub environment: String,
}

/// A field-test item group, either as a selection candidate or as an assignment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTestItemGroup {
    pub exam_id: String,
    pub session_id: String,
    pub segment_key: String,
    pub segment_id: String,
    pub group_key: String,
    pub group_id: String,
    pub block_id: String,
    pub item_count: u32,
    /// Set once the group is placed
    #[serde(default)]
    pub language_code: Option<String>,
    /// Set once the group is placed
    #[serde(default)]
    pub position: Option<u32>,
}

/// Result of sizing an adaptive segment's pool.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentPoolInfo {
    /// Achievable test length
    pub length: u32,
    /// Eligible non-field-test items matched to a strand with an adaptive cut
    pub pool_count: u32,
    pub items: Vec<Item>,
}

impl SegmentPoolInfo {
    pub fn item_ids(&self) -> BTreeSet<String> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormAssignment {
    pub key: String,
    pub id: String,
    pub cohort: String,
}

impl From<&Form> for FormAssignment {
    fn from(form: &Form) -> Self {
        Self {
            key: form.key.clone(),
            id: form.id.clone(),
            cohort: form.cohort.clone(),
        }
    }
}

/// One assembled segment of one attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSegment {
    pub exam_id: String,
    pub segment_key: String,
    pub segment_id: String,
    pub segment_position: u32,
    pub algorithm: SelectionAlgorithm,
    pub form: Option<FormAssignment>,
    /// Eligible item ids, adaptive segments only
    pub item_pool: BTreeSet<String>,
    pub pool_count: u32,
    pub exam_item_count: u32,
    pub field_test_item_count: u32,
    /// No further item selection is owed for this segment
    pub satisfied: bool,
}

/// Everything produced by one assembly pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyManifest {
    pub exam_id: String,
    pub total_items: u32,
    pub segments: Vec<ExamSegment>,
    pub field_test_groups: Vec<FieldTestItemGroup>,
}

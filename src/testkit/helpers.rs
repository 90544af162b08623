//! Fixture builders for assembly tests.
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`ItemBuilder`] | Item with language, strand, group and properties |
//! | [`SegmentBuilder`] | Adaptive or fixed-form segment |
//! | [`form`] | Form with `n` placeholder items |
//! | [`exam`] | English production attempt at `ASMT-1` |
//! | [`assessment_with`] | `ASMT-1` wrapping the given segments |
//!
//! Items default to language [`DEFAULT_LANGUAGE`] under the `Language`
//! property, matching the default configuration.

use crate::core::{
    Assessment, DateWindow, Exam, Form, Item, ItemConstraint, ItemProperty, Segment,
    SelectionAlgorithm, Strand,
};

pub const DEFAULT_LANGUAGE: &str = "ENU";

const LANGUAGE_PROPERTY: &str = "Language";

/// Fluent builder for [`Item`].
///
/// Without [`group`](ItemBuilder::group) each item is its own group `g-<id>`.
#[derive(Debug, Clone)]
pub struct ItemBuilder {
    item: Item,
}

impl ItemBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let group_id = format!("g-{}", id);
        Self {
            item: Item {
                group_key: format!("G-{}", group_id),
                group_id,
                block_id: "A".to_string(),
                strand: "Reading".to_string(),
                field_test: false,
                properties: vec![ItemProperty::new(LANGUAGE_PROPERTY, DEFAULT_LANGUAGE)],
                id,
            },
        }
    }

    /// Replace the item's language.
    pub fn language(mut self, language: &str) -> Self {
        self.item
            .properties
            .retain(|p| !p.name.eq_ignore_ascii_case(LANGUAGE_PROPERTY));
        self.item
            .properties
            .push(ItemProperty::new(LANGUAGE_PROPERTY, language));
        self
    }

    pub fn property(mut self, name: &str, value: &str) -> Self {
        self.item.properties.push(ItemProperty::new(name, value));
        self
    }

    pub fn field_test(mut self) -> Self {
        self.item.field_test = true;
        self
    }

    /// Put the item in group `group_id`, keyed `G-<group_id>`.
    pub fn group(mut self, group_id: &str) -> Self {
        self.item.group_id = group_id.to_string();
        self.item.group_key = format!("G-{}", group_id);
        self
    }

    pub fn block(mut self, block_id: &str) -> Self {
        self.item.block_id = block_id.to_string();
        self
    }

    pub fn strand(mut self, strand: &str) -> Self {
        self.item.strand = strand.to_string();
        self
    }

    pub fn build(self) -> Item {
        self.item
    }
}

/// Fluent builder for [`Segment`].
///
/// Defaults: id equal to the key, position 1, `max_items` 10, no field-test
/// range or budget, unbounded field-test window.
#[derive(Debug, Clone)]
pub struct SegmentBuilder {
    segment: Segment,
}

impl SegmentBuilder {
    fn with_algorithm(key: &str, algorithm: SelectionAlgorithm) -> Self {
        Self {
            segment: Segment {
                key: key.to_string(),
                id: key.to_string(),
                position: 1,
                algorithm,
                min_items: 0,
                max_items: 10,
                field_test_start_position: 0,
                field_test_end_position: 0,
                field_test_min_items: 0,
                field_test_max_items: 0,
                field_test_window: DateWindow::Unbounded,
                items: Vec::new(),
                strands: Vec::new(),
                forms: Vec::new(),
            },
        }
    }

    pub fn adaptive(key: &str) -> Self {
        Self::with_algorithm(key, SelectionAlgorithm::Adaptive)
    }

    pub fn fixed_form(key: &str) -> Self {
        Self::with_algorithm(key, SelectionAlgorithm::FixedForm)
    }

    pub fn position(mut self, position: u32) -> Self {
        self.segment.position = position;
        self
    }

    pub fn min_items(mut self, min_items: u32) -> Self {
        self.segment.min_items = min_items;
        self
    }

    pub fn max_items(mut self, max_items: u32) -> Self {
        self.segment.max_items = max_items;
        self
    }

    /// Field-test positions `[start, end)`.
    pub fn field_test_range(mut self, start: u32, end: u32) -> Self {
        self.segment.field_test_start_position = start;
        self.segment.field_test_end_position = end;
        self
    }

    pub fn field_test_items(mut self, min: u32, max: u32) -> Self {
        self.segment.field_test_min_items = min;
        self.segment.field_test_max_items = max;
        self
    }

    pub fn field_test_window(mut self, window: DateWindow) -> Self {
        self.segment.field_test_window = window;
        self
    }

    /// Add a strand requiring `min_items`; `adaptive_cut` of `None` leaves it out
    /// of pool sizing.
    pub fn strand(mut self, name: &str, min_items: u32, adaptive_cut: Option<f64>) -> Self {
        self.segment.strands.push(Strand {
            name: name.to_string(),
            min_items,
            max_items: min_items.max(self.segment.max_items),
            adaptive_cut,
        });
        self
    }

    pub fn items(mut self, items: Vec<Item>) -> Self {
        self.segment.items.extend(items);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.segment.items.push(item);
        self
    }

    pub fn form(mut self, form: Form) -> Self {
        self.segment.forms.push(form);
        self
    }

    pub fn build(self) -> Segment {
        self.segment
    }
}

/// A form with `item_count` placeholder item ids.
pub fn form(key: &str, language: &str, cohort: &str, item_count: usize) -> Form {
    Form {
        key: key.to_string(),
        id: key.to_string(),
        language: language.to_string(),
        cohort: cohort.to_string(),
        item_ids: (0..item_count).map(|n| format!("{}-item{}", key, n)).collect(),
    }
}

/// An English production attempt at `ASMT-1` for client `SBAC`.
pub fn exam(id: &str) -> Exam {
    Exam {
        id: id.to_string(),
        session_id: "session-1".to_string(),
        client_name: "SBAC".to_string(),
        assessment_key: "ASMT-1".to_string(),
        language_code: DEFAULT_LANGUAGE.to_string(),
        environment: "PRODUCTION".to_string(),
    }
}

/// Segmented assessment `ASMT-1` with open field-test windows and no constraints.
pub fn assessment_with(segments: Vec<Segment>) -> Assessment {
    Assessment {
        key: "ASMT-1".to_string(),
        id: "ASMT-1".to_string(),
        segmented: true,
        field_test_window: DateWindow::Unbounded,
        segments,
        item_constraints: Vec::new(),
    }
}

/// Inclusive constraint tying a `Language` accommodation to the item language.
pub fn language_constraint(language: &str) -> ItemConstraint {
    ItemConstraint {
        tool_type: LANGUAGE_PROPERTY.to_string(),
        tool_value: language.to_string(),
        property_name: LANGUAGE_PROPERTY.to_string(),
        property_value: language.to_string(),
        inclusive: true,
    }
}

//! Equal-distribution field-test group selection.
//!
//! Candidates are the examinee's eligible field-test items, minus every group
//! already assigned to this attempt, grouped by group key. The shared
//! [`FieldTestUsage`] counters decide which groups are handed out: least used
//! first, until the requested number of items is reached.

use crate::assembly::item_pool::eligible_items;
use crate::core::{Accommodation, Assessment, Exam, FieldTestItemGroup, Item, Segment};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use super::usage::FieldTestUsage;

/// Inputs of one selection call.
#[derive(Debug, Clone, Copy)]
pub struct SelectionRequest<'a> {
    pub exam: &'a Exam,
    pub assessment: &'a Assessment,
    pub segment: &'a Segment,
    pub accommodations: &'a [Accommodation],
    /// Group ids assigned to this examinee by earlier passes
    pub assigned_group_ids: &'a HashSet<String>,
    pub language_property: &'a str,
    /// Number of field-test items wanted
    pub wanted: u32,
}

pub struct FieldTestSelector<'u> {
    usage: &'u FieldTestUsage,
}

impl<'u> FieldTestSelector<'u> {
    pub fn new(usage: &'u FieldTestUsage) -> Self {
        Self { usage }
    }

    /// Ordered candidate groups, one per selected group key, each carrying its
    /// item count.
    pub fn select(&self, request: &SelectionRequest<'_>) -> Vec<FieldTestItemGroup> {
        let segment = request.segment;
        let pool = eligible_items(
            request.accommodations,
            &request.assessment.item_constraints,
            segment.items_in_language(request.language_property, &request.exam.language_code),
            Some(true),
        );

        let groups = group_by_key(
            pool.into_iter()
                .filter(|item| !request.assigned_group_ids.contains(&item.group_id)),
        );
        if groups.is_empty() {
            debug!(segment = %segment.key, "no unassigned field-test groups");
            return Vec::new();
        }

        let eligible: HashMap<String, u32> = groups
            .iter()
            .map(|(group_key, items)| {
                (
                    group_key.to_string(),
                    u32::try_from(items.len()).unwrap_or(u32::MAX),
                )
            })
            .collect();

        let claimed = self
            .usage
            .claim_least_used(&segment.key, &eligible, request.wanted);

        debug!(
            segment = %segment.key,
            candidates = groups.len(),
            selected = claimed.len(),
            wanted = request.wanted,
            "selected field-test groups"
        );

        claimed
            .iter()
            .filter_map(|group_key| {
                let items = groups.get(group_key.as_str())?;
                Some(candidate_group(request, items))
            })
            .collect()
    }
}

fn group_by_key<'a, I>(items: I) -> BTreeMap<&'a str, Vec<&'a Item>>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut groups: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();
    for item in items {
        groups.entry(item.group_key.as_str()).or_default().push(item);
    }
    groups
}

/// `items` is never empty: it comes from grouping.
fn candidate_group(request: &SelectionRequest<'_>, items: &[&Item]) -> FieldTestItemGroup {
    let first = items[0];
    FieldTestItemGroup {
        exam_id: request.exam.id.clone(),
        session_id: request.exam.session_id.clone(),
        segment_key: request.segment.key.clone(),
        segment_id: request.segment.id.clone(),
        group_key: first.group_key.clone(),
        group_id: first.group_id.clone(),
        block_id: first.block_id.clone(),
        item_count: u32::try_from(items.len()).unwrap_or(u32::MAX),
        language_code: None,
        position: None,
    }
}

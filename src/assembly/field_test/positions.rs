//! Field-test position assignment.
//!
//! Selected groups are spread over the segment's field-test range
//! `[start, end)`. The range is divided into `max_items` intervals; each placed
//! group consumes `item_count` intervals and lands at a random offset within the
//! span its items will occupy.
//!
//! When the range is shorter than `max_items`, the interval size is zero. Groups
//! are then packed back to back, advancing one position per item, and multi-item
//! groups get no random offset.

use crate::core::{FieldTestItemGroup, Segment};
use crate::io::RandomSource;
use tracing::debug;

/// Groups actually placed and the resulting field-test item count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placement {
    pub groups: Vec<FieldTestItemGroup>,
    pub field_test_item_count: u32,
}

/// Integer width of one field-test interval; zero for a degenerate range.
pub fn interval_size(segment: &Segment) -> u32 {
    let span = segment
        .field_test_end_position
        .saturating_sub(segment.field_test_start_position);
    span.checked_div(segment.field_test_max_items).unwrap_or(0)
}

/// Place `candidates` in order, skipping groups with no items in the segment or
/// that would overflow `field_test_max_items`.
///
/// `previously_assigned` is the item count of groups placed by earlier passes;
/// it counts against the maximum.
pub fn assign_positions(
    segment: &Segment,
    language: &str,
    previously_assigned: u32,
    candidates: Vec<FieldTestItemGroup>,
    random: &dyn RandomSource,
    draw_bound: u32,
) -> Placement {
    let max_items = segment.field_test_max_items;
    let interval = interval_size(segment);
    let mut interval_index = segment.field_test_start_position;
    let mut item_total = previously_assigned;
    let mut placed = Vec::new();

    for mut group in candidates {
        let item_count = segment
            .items
            .iter()
            .filter(|item| item.group_key == group.group_key)
            .count();
        let item_count = u32::try_from(item_count).unwrap_or(u32::MAX);

        if item_count == 0 {
            debug!(group = %group.group_key, "field-test group has no items in segment; skipped");
            continue;
        }
        if item_total >= max_items {
            debug!(group = %group.group_key, "field-test budget exhausted; skipped");
            continue;
        }
        if item_total.saturating_add(item_count) > max_items {
            debug!(
                group = %group.group_key,
                item_count,
                "field-test group would exceed budget; skipped"
            );
            continue;
        }

        let span = if item_count == 1 {
            1
        } else {
            interval.saturating_mul(item_count - 1)
        };
        let offset = match span {
            0 => 0,
            span => random.next_below(draw_bound) % span,
        };
        let position = interval_index.saturating_add(offset);

        interval_index = interval_index.saturating_add(match interval {
            0 => item_count,
            interval => item_count.saturating_mul(interval),
        });

        group.item_count = item_count;
        group.position = Some(position);
        group.language_code = Some(language.to_string());
        item_total += item_count;
        placed.push(group);
    }

    Placement {
        groups: placed,
        field_test_item_count: item_total,
    }
}

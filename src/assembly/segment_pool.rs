//! Adaptive segment pool sizing.
//!
//! The achievable length of an adaptive segment is bounded by three things: the
//! segment's configured maximum, the number of eligible operational items that
//! fall into strands with an adaptive cut, and the per-strand minimums that the
//! pool cannot cover (the shortfall).

use crate::core::{Accommodation, Item, ItemConstraint, Segment, SegmentPoolInfo};
use std::collections::{HashMap, HashSet};
use tracing::warn;

use super::item_pool::eligible_items;

/// Strand accounting over an eligible pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrandCoverage {
    /// Eligible non-field-test items in strands with an adaptive cut
    pub strand_count: u32,
    /// Sum over those strands of `max(0, min_items - matched)`
    pub shortfall: u32,
}

/// Count strand coverage for `pool`.
///
/// Items whose strand is not configured on the segment, or is configured without
/// an adaptive cut, are left out of the accounting (they stay in the pool).
pub fn strand_coverage(segment: &Segment, pool: &[&Item]) -> StrandCoverage {
    let mut counted: HashMap<&str, u32> = HashMap::new();
    let mut reported: HashSet<&str> = HashSet::new();
    let mut coverage = StrandCoverage::default();

    for item in pool {
        let strand_name = item.strand.as_str();
        if counted.contains_key(strand_name) {
            continue;
        }

        let strand = match segment.strand(strand_name) {
            Some(strand) if strand.adaptive_cut.is_some() => strand,
            Some(_) => {
                if reported.insert(strand_name) {
                    warn!(
                        segment = %segment.key,
                        strand = strand_name,
                        "strand has no adaptive cut; excluded from pool sizing"
                    );
                }
                continue;
            }
            None => {
                if reported.insert(strand_name) {
                    warn!(
                        segment = %segment.key,
                        strand = strand_name,
                        item = %item.id,
                        "item strand is not configured on segment; excluded from pool sizing"
                    );
                }
                continue;
            }
        };

        let matched = pool
            .iter()
            .filter(|candidate| !candidate.field_test && candidate.strand == strand_name)
            .count();
        let matched = u32::try_from(matched).unwrap_or(u32::MAX);

        counted.insert(strand_name, matched);
        coverage.strand_count = coverage.strand_count.saturating_add(matched);
        coverage.shortfall = coverage
            .shortfall
            .saturating_add(strand.min_items.saturating_sub(matched));
    }

    coverage
}

/// Clamp the pool length to the segment maximum and strand minimums.
///
/// With `delta = max_items - shortfall`: when `delta < strand_count` the length is
/// `delta` if positive, otherwise `max_items`; else it is `strand_count`.
pub fn achievable_length(max_items: u32, coverage: StrandCoverage) -> u32 {
    let delta = i64::from(max_items) - i64::from(coverage.shortfall);
    if delta < i64::from(coverage.strand_count) {
        if delta > 0 {
            // delta <= max_items here
            u32::try_from(delta).unwrap_or(max_items)
        } else {
            max_items
        }
    } else {
        coverage.strand_count
    }
}

/// Size the adaptive pool of `segment` for an examinee taking it in `language`.
pub fn calculate_segment_pool(
    accommodations: &[Accommodation],
    segment: &Segment,
    constraints: &[ItemConstraint],
    language_property: &str,
    language: &str,
) -> SegmentPoolInfo {
    let pool = eligible_items(
        accommodations,
        constraints,
        segment.items_in_language(language_property, language),
        None,
    );
    let coverage = strand_coverage(segment, &pool);
    let length = achievable_length(segment.max_items, coverage);

    tracing::debug!(
        segment = %segment.key,
        eligible = pool.len(),
        strand_count = coverage.strand_count,
        shortfall = coverage.shortfall,
        length,
        "sized adaptive segment pool"
    );

    SegmentPoolInfo {
        length,
        pool_count: coverage.strand_count,
        items: pool.into_iter().cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{ItemBuilder, SegmentBuilder};
    use proptest::prelude::*;

    fn coverage(strand_count: u32, shortfall: u32) -> StrandCoverage {
        StrandCoverage {
            strand_count,
            shortfall,
        }
    }

    #[test]
    fn test_count_below_both_bounds_uses_count() {
        assert_eq!(achievable_length(10, coverage(4, 2)), 4);
    }

    #[test]
    fn test_positive_delta_below_count_uses_delta() {
        assert_eq!(achievable_length(10, coverage(12, 3)), 7);
    }

    #[test]
    fn test_non_positive_delta_falls_back_to_max() {
        assert_eq!(achievable_length(5, coverage(8, 5)), 5);
        assert_eq!(achievable_length(5, coverage(8, 9)), 5);
    }

    #[test]
    fn test_single_strand_scenario() {
        let items: Vec<_> = (0..4)
            .map(|n| ItemBuilder::new(format!("i{}", n)).strand("Algebra").build())
            .collect();
        let segment = SegmentBuilder::adaptive("SEG")
            .max_items(5)
            .strand("Algebra", 3, Some(0.5))
            .items(items)
            .build();

        let info = calculate_segment_pool(&[], &segment, &[], "Language", "ENU");
        assert_eq!(info.pool_count, 4);
        assert_eq!(info.length, 4);
        assert_eq!(info.items.len(), 4);
    }

    #[test]
    fn test_field_test_items_do_not_count_toward_strands() {
        let segment = SegmentBuilder::adaptive("SEG")
            .max_items(10)
            .strand("Algebra", 3, Some(0.5))
            .items(vec![
                ItemBuilder::new("op1").strand("Algebra").build(),
                ItemBuilder::new("ft1").strand("Algebra").field_test().build(),
                ItemBuilder::new("ft2").strand("Algebra").field_test().build(),
            ])
            .build();

        let pool: Vec<&Item> = segment.items.iter().collect();
        assert_eq!(strand_coverage(&segment, &pool), coverage(1, 2));
    }

    #[test]
    fn test_unconfigured_and_uncut_strands_are_skipped_but_stay_in_pool() {
        let segment = SegmentBuilder::adaptive("SEG")
            .max_items(10)
            .strand("Algebra", 1, Some(0.5))
            .strand("Geometry", 4, None)
            .items(vec![
                ItemBuilder::new("a").strand("Algebra").build(),
                ItemBuilder::new("g").strand("Geometry").build(),
                ItemBuilder::new("x").strand("Unknown").build(),
            ])
            .build();

        let info = calculate_segment_pool(&[], &segment, &[], "Language", "ENU");
        assert_eq!(info.pool_count, 1);
        assert_eq!(info.length, 1);
        assert_eq!(info.items.len(), 3);
    }

    #[test]
    fn test_pool_is_restricted_to_language() {
        let segment = SegmentBuilder::adaptive("SEG")
            .max_items(10)
            .strand("Algebra", 0, Some(0.5))
            .items(vec![
                ItemBuilder::new("en").strand("Algebra").language("ENU").build(),
                ItemBuilder::new("es").strand("Algebra").language("ESN").build(),
            ])
            .build();

        let info = calculate_segment_pool(&[], &segment, &[], "Language", "ESN");
        assert_eq!(info.item_ids().into_iter().collect::<Vec<_>>(), vec!["es"]);
        assert_eq!(info.length, 1);
    }

    proptest! {
        #[test]
        fn prop_length_never_exceeds_max_items(
            max_items in 0u32..200,
            strand_count in 0u32..400,
            shortfall in 0u32..400,
        ) {
            let length = achievable_length(max_items, coverage(strand_count, shortfall));
            prop_assert!(length <= max_items);
        }

        #[test]
        fn prop_length_matches_clamp(
            max_items in 1u32..200,
            strand_count in 0u32..400,
            shortfall in 0u32..400,
        ) {
            let length = achievable_length(max_items, coverage(strand_count, shortfall));
            let delta = i64::from(max_items) - i64::from(shortfall);
            if delta >= i64::from(strand_count) {
                prop_assert_eq!(length, strand_count);
            } else if delta > 0 {
                prop_assert_eq!(i64::from(length), delta);
            } else {
                prop_assert_eq!(length, max_items);
            }
        }
    }
}

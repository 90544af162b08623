//! Field-test eligibility gate.

use crate::config::AssemblyConfig;
use crate::core::{Assessment, Exam, Segment};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Decide whether `segment` may currently receive field-test items for `exam`.
///
/// Rules, in order:
/// 1. field testing disabled in config, or segment minimum of zero: ineligible
/// 2. no field-test item in the exam language: ineligible
/// 3. simulation environment: eligible, windows are ignored
/// 4. assessment window must be open; content-segmented assessments also need
///    the segment window open
pub fn is_field_test_eligible(
    config: &AssemblyConfig,
    exam: &Exam,
    assessment: &Assessment,
    segment: &Segment,
    now: DateTime<Utc>,
) -> bool {
    if !config.field_test.enabled || segment.field_test_min_items == 0 {
        return false;
    }

    let has_field_test_items = segment
        .items_in_language(&config.items.language_property, &exam.language_code)
        .any(|item| item.field_test);
    if !has_field_test_items {
        debug!(
            segment = %segment.key,
            language = %exam.language_code,
            "no field-test items in exam language"
        );
        return false;
    }

    if config.field_test.is_simulation(&exam.environment) {
        return true;
    }

    let assessment_open = assessment.field_test_window.is_open_at(now);
    if !assessment.segmented {
        return assessment_open;
    }

    assessment_open && segment.field_test_window.is_open_at(now)
}

//! Segment assembly for one attempt.
//!
//! [`SegmentAssembler`] walks the assessment's segments in position order. A
//! fixed-form segment gets a form (the first one through round-robin, later ones
//! locked to the same cohort); an adaptive segment gets its eligible pool sized
//! and, when the pool is full-length and field testing is open, a share of
//! field-test groups. Records are persisted only after every segment succeeded
//! and the attempt has at least one item.
//!
//! Field-test usage counters are updated as groups are selected. A pass that
//! later fails still counts those selections.

use crate::core::{
    Accommodation, AssemblyManifest, Assessment, Exam, ExamSegment, FieldTestItemGroup,
    FormAssignment, Segment,
};
use crate::env::AssemblyEnv;
use crate::errors::{AssemblyError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn};

use super::eligibility::is_field_test_eligible;
use super::field_test::{assign_positions, FieldTestSelector, FieldTestUsage, SelectionRequest};
use super::form_selector::FormSelector;
use super::segment_pool::calculate_segment_pool;

/// One segment's record plus the field-test groups placed in it.
struct AssembledSegment {
    record: ExamSegment,
    field_test_groups: Vec<FieldTestItemGroup>,
}

/// Assembles attempts against a shared environment.
///
/// Cloning is cheap and shares the field-test usage counters and form rotation,
/// so one assembler (or its clones) should serve the whole process.
#[derive(Clone)]
pub struct SegmentAssembler<E: AssemblyEnv> {
    env: E,
    usage: Arc<FieldTestUsage>,
    forms: Arc<FormSelector>,
}

impl<E: AssemblyEnv> SegmentAssembler<E> {
    pub fn new(env: E) -> Self {
        let forms = FormSelector::new(env.config().forms.idle_timeout());
        Self {
            env,
            usage: Arc::new(FieldTestUsage::new()),
            forms: Arc::new(forms),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn usage(&self) -> &FieldTestUsage {
        &self.usage
    }

    pub fn forms(&self) -> &FormSelector {
        &self.forms
    }

    /// Look the exam's assessment up in the content catalog and assemble it.
    pub fn initialize_segments(&self, exam: &Exam) -> Result<AssemblyManifest> {
        let assessment = self
            .env
            .catalog()
            .find_assessment(&exam.client_name, &exam.assessment_key)?
            .ok_or_else(|| AssemblyError::AssessmentNotFound {
                client_name: exam.client_name.clone(),
                assessment_key: exam.assessment_key.clone(),
            })?;
        self.assemble(exam, &assessment)
    }

    /// Assemble every segment of `assessment` for `exam` and persist the result.
    ///
    /// # Errors
    ///
    /// - `NoFormFound` / `NoCohortForm` when a fixed-form segment has no usable form
    /// - `NoContent` when the attempt would have zero items
    /// - `Collaborator` when a lookup or persistence call fails
    ///
    /// Nothing is persisted when an error is returned.
    pub fn assemble(&self, exam: &Exam, assessment: &Assessment) -> Result<AssemblyManifest> {
        let span = info_span!(
            "assemble_segments",
            exam_id = %exam.id,
            assessment = %assessment.key
        );
        let _enter = span.enter();

        let accommodations = self.env.accommodations().approved_accommodations(&exam.id)?;
        let now = self.env.clock().now();

        let expired = self.forms.evict_idle(now);
        if expired > 0 {
            debug!(
                expired,
                tracked = self.forms.tracked_segments(),
                "dropped idle form rotations"
            );
        }

        let mut cohort: Option<String> = None;
        let mut segments = Vec::with_capacity(assessment.segments.len());
        let mut field_test_groups = Vec::new();
        let mut total_items: u32 = 0;

        for segment in assessment.segments_by_position() {
            let assembled = if segment.algorithm.is_fixed_form() {
                self.assemble_fixed_form(exam, segment, &mut cohort, now)?
            } else {
                self.assemble_adaptive(exam, assessment, segment, &accommodations, now)?
            };

            total_items = total_items
                .saturating_add(assembled.record.exam_item_count)
                .saturating_add(assembled.record.field_test_item_count);
            segments.push(assembled.record);
            field_test_groups.extend(assembled.field_test_groups);
        }

        if total_items == 0 {
            warn!("every segment resolved to zero items");
            return Err(AssemblyError::no_content(&exam.id));
        }

        let sink = self.env.sink();
        sink.save_exam_segments(&segments)?;
        if !field_test_groups.is_empty() {
            sink.save_field_test_groups(&field_test_groups)?;
        }

        info!(
            total_items,
            segments = segments.len(),
            field_test_groups = field_test_groups.len(),
            "assembled exam segments"
        );

        Ok(AssemblyManifest {
            exam_id: exam.id.clone(),
            total_items,
            segments,
            field_test_groups,
        })
    }

    fn assemble_fixed_form(
        &self,
        exam: &Exam,
        segment: &Segment,
        cohort: &mut Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AssembledSegment> {
        let language = exam.language_code.as_str();
        let established = cohort.clone();
        let form = match established.as_deref() {
            None => {
                let form = self
                    .forms
                    .select(segment, language, now)
                    .ok_or_else(|| AssemblyError::no_form(&segment.key, language))?;
                *cohort = Some(form.cohort.clone());
                form
            }
            Some(established) => {
                FormSelector::select_for_cohort(segment, language, established).ok_or_else(
                    || AssemblyError::no_cohort_form(&segment.key, language, established),
                )?
            }
        };

        let mut item_count = form.item_count();
        if item_count > segment.max_items {
            warn!(
                segment = %segment.key,
                form = %form.key,
                form_items = item_count,
                max_items = segment.max_items,
                "form is longer than segment maximum; clamping"
            );
            item_count = segment.max_items;
        }
        debug!(
            segment = %segment.key,
            form = %form.key,
            cohort = %form.cohort,
            item_count,
            "selected form"
        );

        Ok(AssembledSegment {
            record: ExamSegment {
                exam_id: exam.id.clone(),
                segment_key: segment.key.clone(),
                segment_id: segment.id.clone(),
                segment_position: segment.position,
                algorithm: segment.algorithm,
                form: Some(FormAssignment::from(form)),
                item_pool: Default::default(),
                pool_count: item_count,
                exam_item_count: item_count,
                field_test_item_count: 0,
                satisfied: item_count == 0,
            },
            field_test_groups: Vec::new(),
        })
    }

    fn assemble_adaptive(
        &self,
        exam: &Exam,
        assessment: &Assessment,
        segment: &Segment,
        accommodations: &[Accommodation],
        now: DateTime<Utc>,
    ) -> Result<AssembledSegment> {
        let config = self.env.config();
        let pool = calculate_segment_pool(
            accommodations,
            segment,
            &assessment.item_constraints,
            &config.items.language_property,
            &exam.language_code,
        );

        let mut field_test_item_count = 0;
        let mut field_test_groups = Vec::new();
        if pool.length == segment.max_items
            && is_field_test_eligible(config, exam, assessment, segment, now)
        {
            let history = self.env.history().assigned_groups(&exam.id, &segment.key)?;
            let assigned_group_ids: HashSet<String> =
                history.iter().map(|group| group.group_id.clone()).collect();
            let previously_assigned: u32 = history.iter().map(|group| group.item_count).sum();

            let candidates = FieldTestSelector::new(&self.usage).select(&SelectionRequest {
                exam,
                assessment,
                segment,
                accommodations,
                assigned_group_ids: &assigned_group_ids,
                language_property: &config.items.language_property,
                wanted: segment.field_test_min_items,
            });
            let placement = assign_positions(
                segment,
                &exam.language_code,
                previously_assigned,
                candidates,
                self.env.random(),
                config.field_test.position_draw_bound,
            );
            field_test_item_count = placement.field_test_item_count;
            field_test_groups = placement.groups;
        }

        Ok(AssembledSegment {
            record: ExamSegment {
                exam_id: exam.id.clone(),
                segment_key: segment.key.clone(),
                segment_id: segment.id.clone(),
                segment_position: segment.position,
                algorithm: segment.algorithm,
                form: None,
                item_pool: pool.item_ids(),
                pool_count: pool.pool_count,
                exam_item_count: pool.length,
                field_test_item_count,
                satisfied: pool.length + field_test_item_count == 0,
            },
            field_test_groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Accommodation, ItemConstraint};
    use crate::testkit::{
        assessment_with, exam, form, AssemblyTestEnv, ItemBuilder, SegmentBuilder, SequenceRandom,
    };
    use pretty_assertions::assert_eq;

    fn adaptive_segment(key: &str, position: u32, operational: usize) -> Segment {
        let items = (0..operational)
            .map(|n| ItemBuilder::new(format!("{}-op{}", key, n)).strand("Reading").build())
            .collect();
        SegmentBuilder::adaptive(key)
            .position(position)
            .max_items(operational as u32)
            .strand("Reading", 0, Some(0.0))
            .items(items)
            .build()
    }

    fn with_field_test_groups(mut segment: Segment, groups: &[&str]) -> Segment {
        for group in groups {
            segment.items.push(
                ItemBuilder::new(format!("{}-{}", segment.key, group))
                    .group(*group)
                    .strand("Reading")
                    .field_test()
                    .build(),
            );
        }
        segment.field_test_min_items = 1;
        segment.field_test_max_items = 2;
        segment.field_test_start_position = 1;
        segment.field_test_end_position = 5;
        segment
    }

    #[test]
    fn test_adaptive_segment_record() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env.clone());
        let assessment = assessment_with(vec![adaptive_segment("SEG", 1, 4)]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        assert_eq!(manifest.total_items, 4);
        let record = &manifest.segments[0];
        assert_eq!(record.exam_item_count, 4);
        assert_eq!(record.pool_count, 4);
        assert_eq!(record.item_pool.len(), 4);
        assert_eq!(record.form, None);
        assert!(!record.satisfied);
        assert_eq!(env.recorded().exam_segments(), manifest.segments);
    }

    #[test]
    fn test_field_test_groups_are_seeded_and_persisted() {
        let env = AssemblyTestEnv::new().with_random(SequenceRandom::constant(0));
        let assembler = SegmentAssembler::new(env.clone());
        let segment = with_field_test_groups(adaptive_segment("SEG", 1, 3), &["g1", "g2"]);
        let assessment = assessment_with(vec![segment]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        assert_eq!(manifest.field_test_groups.len(), 1);
        assert_eq!(manifest.field_test_groups[0].group_id, "g1");
        assert_eq!(manifest.field_test_groups[0].position, Some(1));
        assert_eq!(manifest.segments[0].field_test_item_count, 1);
        assert_eq!(manifest.total_items, 4);
        assert_eq!(env.recorded().field_test_groups(), manifest.field_test_groups);
        assert_eq!(assembler.usage().occurrences("SEG", "G-g1"), Some(1));
        assert_eq!(assembler.usage().occurrences("SEG", "G-g2"), Some(0));
    }

    #[test]
    fn test_short_pool_gets_no_field_test() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env);
        let mut segment = with_field_test_groups(adaptive_segment("SEG", 1, 3), &["g1"]);
        segment.max_items = 10;
        let assessment = assessment_with(vec![segment]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        assert_eq!(manifest.segments[0].exam_item_count, 3);
        assert_eq!(manifest.segments[0].field_test_item_count, 0);
        assert!(manifest.field_test_groups.is_empty());
    }

    #[test]
    fn test_history_excludes_groups_and_counts_against_budget() {
        let history_group = FieldTestItemGroup {
            exam_id: "exam-1".into(),
            session_id: "session-1".into(),
            segment_key: "SEG".into(),
            segment_id: "SEG".into(),
            group_key: "G-g1".into(),
            group_id: "g1".into(),
            block_id: "A".into(),
            item_count: 1,
            language_code: Some("ENU".into()),
            position: Some(1),
        };
        let env = AssemblyTestEnv::new().with_history(history_group);
        let assembler = SegmentAssembler::new(env);
        let segment = with_field_test_groups(adaptive_segment("SEG", 1, 3), &["g1", "g2"]);
        let assessment = assessment_with(vec![segment]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        let ids: Vec<&str> = manifest
            .field_test_groups
            .iter()
            .map(|g| g.group_id.as_str())
            .collect();
        assert_eq!(ids, vec!["g2"]);
        assert_eq!(manifest.segments[0].field_test_item_count, 2);
    }

    #[test]
    fn test_fixed_form_segments_share_cohort() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env);
        let first = SegmentBuilder::fixed_form("S1")
            .position(1)
            .max_items(10)
            .form(form("S1-Blue", "ENU", "Blue", 4))
            .form(form("S1-Red", "ENU", "Red", 4))
            .build();
        let second = SegmentBuilder::fixed_form("S2")
            .position(2)
            .max_items(10)
            .form(form("S2-Red", "ENU", "Red", 6))
            .form(form("S2-Blue", "ENU", "Blue", 5))
            .build();
        let assessment = assessment_with(vec![second, first]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        let forms: Vec<&str> = manifest
            .segments
            .iter()
            .map(|s| s.form.as_ref().unwrap().key.as_str())
            .collect();
        assert_eq!(forms, vec!["S1-Blue", "S2-Blue"]);
        assert_eq!(manifest.total_items, 9);

        let manifest = assembler.assemble(&exam("exam-2"), &assessment).unwrap();
        let forms: Vec<&str> = manifest
            .segments
            .iter()
            .map(|s| s.form.as_ref().unwrap().key.as_str())
            .collect();
        assert_eq!(forms, vec!["S1-Red", "S2-Red"]);
    }

    #[test]
    fn test_missing_cohort_form_is_fatal_and_persists_nothing() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env.clone());
        let first = SegmentBuilder::fixed_form("S1")
            .position(1)
            .max_items(10)
            .form(form("S1-Blue", "ENU", "Blue", 4))
            .build();
        let second = SegmentBuilder::fixed_form("S2")
            .position(2)
            .max_items(10)
            .form(form("S2-Red", "ENU", "Red", 6))
            .build();
        let assessment = assessment_with(vec![first, second]);

        let err = assembler.assemble(&exam("exam-1"), &assessment).unwrap_err();
        assert!(matches!(err, AssemblyError::NoCohortForm { ref cohort, .. } if cohort == "Blue"));
        assert!(env.recorded().is_empty());
    }

    #[test]
    fn test_no_form_in_language_is_fatal() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env);
        let segment = SegmentBuilder::fixed_form("S1")
            .max_items(10)
            .form(form("S1-ESN", "ESN", "Default", 4))
            .build();

        let err = assembler
            .assemble(&exam("exam-1"), &assessment_with(vec![segment]))
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NoFormFound { .. }));
    }

    #[test]
    fn test_form_longer_than_segment_is_clamped() {
        let assembler = SegmentAssembler::new(AssemblyTestEnv::new());
        let segment = SegmentBuilder::fixed_form("S1")
            .max_items(3)
            .form(form("Long", "ENU", "Default", 8))
            .build();

        let manifest = assembler
            .assemble(&exam("exam-1"), &assessment_with(vec![segment]))
            .unwrap();
        assert_eq!(manifest.segments[0].exam_item_count, 3);
    }

    #[test]
    fn test_zero_items_everywhere_is_fatal() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env.clone());
        let empty = SegmentBuilder::adaptive("SEG").max_items(5).build();

        let err = assembler
            .assemble(&exam("exam-1"), &assessment_with(vec![empty]))
            .unwrap_err();
        assert!(matches!(err, AssemblyError::NoContent { .. }));
        assert!(env.recorded().is_empty());
    }

    #[test]
    fn test_empty_segment_alongside_content_is_satisfied() {
        let assembler = SegmentAssembler::new(AssemblyTestEnv::new());
        let assessment = assessment_with(vec![
            adaptive_segment("S1", 1, 2),
            SegmentBuilder::adaptive("S2").position(2).max_items(5).build(),
        ]);

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        assert!(!manifest.segments[0].satisfied);
        assert!(manifest.segments[1].satisfied);
        assert_eq!(manifest.total_items, 2);
    }

    #[test]
    fn test_accommodations_shape_the_pool() {
        let env = AssemblyTestEnv::new()
            .with_accommodation("exam-1", Accommodation::new("Language", "ESN"));
        let assembler = SegmentAssembler::new(env);
        let segment = SegmentBuilder::adaptive("SEG")
            .max_items(5)
            .strand("Reading", 0, Some(0.0))
            .items(vec![
                ItemBuilder::new("en").strand("Reading").build(),
                ItemBuilder::new("es").strand("Reading").property("Braille", "No").build(),
            ])
            .build();
        let mut assessment = assessment_with(vec![segment]);
        assessment.item_constraints.push(ItemConstraint {
            tool_type: "Language".into(),
            tool_value: "ESN".into(),
            property_name: "Braille".into(),
            property_value: "No".into(),
            inclusive: true,
        });

        let manifest = assembler.assemble(&exam("exam-1"), &assessment).unwrap();
        assert_eq!(
            manifest.segments[0].item_pool.iter().collect::<Vec<_>>(),
            vec!["es"]
        );
    }

    #[test]
    fn test_initialize_segments_reads_catalog() {
        let assessment = assessment_with(vec![adaptive_segment("SEG", 1, 2)]);
        let env = AssemblyTestEnv::new().with_assessment("SBAC", assessment);
        let assembler = SegmentAssembler::new(env);

        let manifest = assembler.initialize_segments(&exam("exam-1")).unwrap();
        assert_eq!(manifest.total_items, 2);

        let mut unknown = exam("exam-2");
        unknown.assessment_key = "MISSING".into();
        let err = assembler.initialize_segments(&unknown).unwrap_err();
        assert!(matches!(err, AssemblyError::AssessmentNotFound { .. }));
    }

    #[test]
    fn test_idle_form_rotations_are_evicted() {
        let env = AssemblyTestEnv::new();
        let assembler = SegmentAssembler::new(env.clone());
        let fixed = assessment_with(vec![SegmentBuilder::fixed_form("S1")
            .form(form("F0", "ENU", "Default", 2))
            .form(form("F1", "ENU", "Default", 2))
            .build()]);
        let adaptive = assessment_with(vec![adaptive_segment("A1", 1, 2)]);

        assembler.assemble(&exam("exam-1"), &fixed).unwrap();
        assert_eq!(assembler.forms().tracked_segments(), 1);

        env.fixed_clock().advance(chrono::Duration::seconds(3599));
        assembler.assemble(&exam("exam-2"), &adaptive).unwrap();
        assert_eq!(assembler.forms().tracked_segments(), 1);

        env.fixed_clock().advance(chrono::Duration::seconds(1));
        assembler.assemble(&exam("exam-3"), &adaptive).unwrap();
        assert_eq!(assembler.forms().tracked_segments(), 0);
    }
}

//! In-memory environment for assembly tests.
//!
//! [`AssemblyTestEnv`] implements [`AssemblyEnv`] over the in-memory
//! collaborators from [`crate::io`], a [`FixedClock`] and a scripted
//! [`RandomSource`]. Clones share every collaborator, so a test can hand one
//! clone to the assembler and inspect what was persisted through another.

use crate::config::AssemblyConfig;
use crate::core::{Accommodation, Assessment, FieldTestItemGroup};
use crate::env::AssemblyEnv;
use crate::io::{
    AccommodationProvider, AssemblySink, Clock, ContentCatalog, FieldTestHistory, FixedClock,
    InMemoryAccommodations, InMemoryCatalog, InMemoryHistory, RandomSource, RecordingSink,
};
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use super::random::SequenceRandom;

/// In-memory test environment.
///
/// Starts with an empty catalog, no accommodations, no history, the clock at
/// 2026-01-15 12:00 UTC, every random draw returning zero and the default
/// configuration.
///
/// # Example
///
/// ```rust
/// use exam_assembly::core::Accommodation;
/// use exam_assembly::env::AssemblyEnv;
/// use exam_assembly::testkit::AssemblyTestEnv;
///
/// let env = AssemblyTestEnv::new()
///     .with_accommodation("exam-1", Accommodation::new("Language", "ESN"));
/// let approved = env.accommodations().approved_accommodations("exam-1").unwrap();
/// assert_eq!(approved.len(), 1);
/// ```
#[derive(Clone)]
pub struct AssemblyTestEnv {
    catalog: Arc<InMemoryCatalog>,
    accommodations: Arc<InMemoryAccommodations>,
    history: Arc<InMemoryHistory>,
    sink: Arc<RecordingSink>,
    clock: Arc<FixedClock>,
    random: Arc<dyn RandomSource>,
    config: AssemblyConfig,
}

impl AssemblyTestEnv {
    pub fn new() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 1, 15, 12, 0, 0)
            .single()
            .unwrap_or_default();
        Self {
            catalog: Arc::new(InMemoryCatalog::new()),
            accommodations: Arc::new(InMemoryAccommodations::new()),
            history: Arc::new(InMemoryHistory::new()),
            sink: Arc::new(RecordingSink::new()),
            clock: Arc::new(FixedClock::new(start)),
            random: Arc::new(SequenceRandom::constant(0)),
            config: AssemblyConfig::default(),
        }
    }

    pub fn with_assessment(self, client_name: impl Into<String>, assessment: Assessment) -> Self {
        self.catalog.insert(client_name, assessment);
        self
    }

    pub fn with_accommodation(
        self,
        exam_id: impl Into<String>,
        accommodation: Accommodation,
    ) -> Self {
        self.accommodations.approve(exam_id, accommodation);
        self
    }

    /// Record a field-test group as assigned by an earlier pass.
    pub fn with_history(self, group: FieldTestItemGroup) -> Self {
        self.history.record(group);
        self
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Arc::new(random);
        self
    }

    pub fn with_config(mut self, config: AssemblyConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_now(self, now: DateTime<Utc>) -> Self {
        self.clock.set(now);
        self
    }

    /// Everything persisted through this environment so far.
    pub fn recorded(&self) -> &RecordingSink {
        &self.sink
    }

    pub fn fixed_clock(&self) -> &FixedClock {
        &self.clock
    }
}

impl Default for AssemblyTestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyEnv for AssemblyTestEnv {
    fn accommodations(&self) -> &dyn AccommodationProvider {
        self.accommodations.as_ref()
    }

    fn catalog(&self) -> &dyn ContentCatalog {
        self.catalog.as_ref()
    }

    fn history(&self) -> &dyn FieldTestHistory {
        self.history.as_ref()
    }

    fn sink(&self) -> &dyn AssemblySink {
        self.sink.as_ref()
    }

    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn random(&self) -> &dyn RandomSource {
        self.random.as_ref()
    }

    fn config(&self) -> &AssemblyConfig {
        &self.config
    }
}

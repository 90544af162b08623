//! Environment trait and implementations for exam assembly.
//!
//! The environment bundles every capability an assembly pass needs: the
//! collaborators of the surrounding service, the clock, the randomness source
//! and the configuration. Passing it explicitly keeps the algorithms free of
//! globals and lets tests swap any piece.
//!
//! # Usage
//!
//! ```rust,ignore
//! use exam_assembly::env::RealEnv;
//! use exam_assembly::config::load_config;
//!
//! let env = RealEnv::new(load_config(), catalog, accommodations, history, sink);
//! let assembler = SegmentAssembler::new(env);
//! ```
//!
//! For tests use [`crate::testkit::AssemblyTestEnv`].

use crate::config::AssemblyConfig;
use crate::io::{
    AccommodationProvider, AssemblySink, Clock, ContentCatalog, FieldTestHistory, RandomSource,
    SystemClock, ThreadRandom,
};
use std::sync::Arc;

/// Environment trait defining all external capabilities of an assembly pass.
///
/// # Thread Safety
///
/// Implementations must be `Clone + Send + Sync` so one assembler can serve
/// concurrent attempts. Share collaborators through `Arc`.
pub trait AssemblyEnv: Clone + Send + Sync {
    fn accommodations(&self) -> &dyn AccommodationProvider;

    fn catalog(&self) -> &dyn ContentCatalog;

    fn history(&self) -> &dyn FieldTestHistory;

    fn sink(&self) -> &dyn AssemblySink;

    fn clock(&self) -> &dyn Clock;

    fn random(&self) -> &dyn RandomSource;

    fn config(&self) -> &AssemblyConfig;
}

/// Production environment implementation.
#[derive(Clone)]
pub struct RealEnv {
    catalog: Arc<dyn ContentCatalog>,
    accommodations: Arc<dyn AccommodationProvider>,
    history: Arc<dyn FieldTestHistory>,
    sink: Arc<dyn AssemblySink>,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    config: AssemblyConfig,
}

impl RealEnv {
    /// Create an environment over the given collaborators, using the system
    /// clock and the thread RNG.
    pub fn new(
        config: AssemblyConfig,
        catalog: Arc<dyn ContentCatalog>,
        accommodations: Arc<dyn AccommodationProvider>,
        history: Arc<dyn FieldTestHistory>,
        sink: Arc<dyn AssemblySink>,
    ) -> Self {
        Self {
            catalog,
            accommodations,
            history,
            sink,
            clock: Arc::new(SystemClock),
            random: Arc::new(ThreadRandom),
            config,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn with_config(mut self, config: AssemblyConfig) -> Self {
        self.config = config;
        self
    }
}

impl AssemblyEnv for RealEnv {
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

//! Batch assembly against a JSON catalog.
//!
//! Every exam in the batch is assembled in parallel by one shared
//! [`SegmentAssembler`], so field-test usage counters and form rotation are
//! shared across the batch exactly as they would be across concurrent requests.

use crate::assembly::SegmentAssembler;
use crate::core::{AssemblyManifest, Exam};
use crate::env::{AssemblyEnv, RealEnv};
use crate::io::{
    CatalogFile, InMemoryAccommodations, InMemoryCatalog, InMemoryHistory, RecordingSink,
    SeededRandom,
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::check_config::effective_config;

#[derive(Debug, Clone)]
pub struct AssembleConfig {
    pub catalog: PathBuf,
    pub exams: PathBuf,
    pub config: Option<PathBuf>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

/// One exam whose assembly failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamFailure {
    pub exam_id: String,
    pub code: String,
    pub message: String,
}

/// Outcome of a batch, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub manifests: Vec<AssemblyManifest>,
    pub failures: Vec<ExamFailure>,
}

impl BatchReport {
    pub fn total_items(&self) -> u64 {
        self.manifests
            .iter()
            .map(|manifest| u64::from(manifest.total_items))
            .sum()
    }
}

/// Assemble `exams` in parallel, collecting successes and failures.
pub fn assemble_batch<E: AssemblyEnv>(
    assembler: &SegmentAssembler<E>,
    exams: &[Exam],
) -> BatchReport {
    let outcomes: Vec<_> = exams
        .par_iter()
        .map(|exam| {
            assembler
                .initialize_segments(exam)
                .map_err(|err| ExamFailure {
                    exam_id: exam.id.clone(),
                    code: err.code().to_string(),
                    message: err.to_string(),
                })
        })
        .collect();

    let mut report = BatchReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(manifest) => report.manifests.push(manifest),
            Err(failure) => {
                tracing::error!(
                    exam_id = %failure.exam_id,
                    code = %failure.code,
                    "{}",
                    failure.message
                );
                report.failures.push(failure);
            }
        }
    }
    report
}

fn build_env(config: &AssembleConfig, catalog: CatalogFile) -> Result<RealEnv> {
    let assembly_config = effective_config(config.config.as_deref())?;

    let content = InMemoryCatalog::new();
    for (client_name, assessments) in catalog.clients {
        for assessment in assessments {
            content.insert(client_name.clone(), assessment);
        }
    }

    let accommodations = InMemoryAccommodations::new();
    for (exam_id, approved) in catalog.accommodations {
        for accommodation in approved {
            accommodations.approve(exam_id.clone(), accommodation);
        }
    }

    let history = InMemoryHistory::new();
    for group in catalog.field_test_history {
        history.record(group);
    }

    let env = RealEnv::new(
        assembly_config,
        Arc::new(content),
        Arc::new(accommodations),
        Arc::new(history),
        Arc::new(RecordingSink::new()),
    );
    Ok(match config.seed {
        Some(seed) => env.with_random(Arc::new(SeededRandom::new(seed))),
        None => env,
    })
}

/// Load inputs, assemble the batch and write the report.
///
/// Fails after writing the report when any exam failed.
pub fn run_assemble(config: AssembleConfig) -> Result<()> {
    let catalog = CatalogFile::load(&config.catalog)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog.display()))?;
    let exams_json = std::fs::read_to_string(&config.exams)
        .with_context(|| format!("Failed to read exams from {}", config.exams.display()))?;
    let exams: Vec<Exam> = serde_json::from_str(&exams_json)
        .with_context(|| format!("Failed to parse exams from {}", config.exams.display()))?;

    let env = build_env(&config, catalog)?;
    let assembler = SegmentAssembler::new(env);
    let report = assemble_batch(&assembler, &exams);

    tracing::info!(
        exams = exams.len(),
        assembled = report.manifests.len(),
        failed = report.failures.len(),
        total_items = report.total_items(),
        "batch complete"
    );

    let rendered = serde_json::to_string_pretty(&report).context("Failed to render report")?;
    match &config.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{}", rendered),
    }

    if !report.failures.is_empty() {
        anyhow::bail!(
            "{} of {} exams failed to assemble",
            report.failures.len(),
            exams.len()
        );
    }
    Ok(())
}

//! Parallel extraction across independent documents
//!
//! Each job owns its tree; nothing is shared between jobs besides the
//! read-only extractor settings, so results are the same as running the jobs
//! one after another.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use tracing::info;

use super::list_extractor::{ExtractOptions, ListExtractor};
use crate::domain::{Extraction, ScanResult, SeedPoint};
use crate::infrastructure::config::{BatchConfig, ExtractionConfig};
use crate::infrastructure::error::ExtractionResult;
use crate::infrastructure::html_tree::StaticHtmlTree;
use crate::infrastructure::tree_accessor::TreeAccessor;

/// One document and the seeds to extract from it
#[derive(Debug, Clone)]
pub struct PageJob<A> {
    pub page: A,
    pub seeds: Vec<SeedPoint>,
    pub options: ExtractOptions,
}

impl<A> PageJob<A> {
    pub fn new(page: A, seeds: Vec<SeedPoint>) -> Self {
        Self {
            page,
            seeds,
            options: ExtractOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }
}

pub struct BatchExtractor {
    extractor: ListExtractor,
    pool: ThreadPool,
    workers: usize,
}

impl BatchExtractor {
    pub fn new(extraction: ExtractionConfig, batch: &BatchConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(batch.max_workers)
            .thread_name(|index| format!("listing-worker-{index}"))
            .build()?;

        Ok(Self {
            extractor: ListExtractor::new(extraction),
            pool,
            workers: batch.max_workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Results come back in job order
    pub fn run<A>(&self, jobs: &[PageJob<A>]) -> Vec<ExtractionResult<Extraction>>
    where
        A: TreeAccessor + Sync,
    {
        info!("Running {} extraction jobs on {} workers", jobs.len(), self.workers);
        self.pool.install(|| {
            jobs.par_iter()
                .map(|job| self.extractor.extract_with(&job.page, &job.seeds, &job.options))
                .collect()
        })
    }

    pub fn scan_all(&self, pages: &[StaticHtmlTree]) -> Vec<ScanResult> {
        info!("Scanning {} documents on {} workers", pages.len(), self.workers);
        self.pool
            .install(|| pages.par_iter().map(|page| self.extractor.scan_document(page)).collect())
    }
}

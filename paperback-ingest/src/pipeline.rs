//! Pipeline orchestrator
//!
//! Composes the ingestion stages in sequence:
//!
//! 1. Refuse a populated target
//! 2. Stream raw rows from the dataset file
//! 3. Validate each row; assemble accepted rows (resolvers + extractors)
//! 4. Integrity-check the full output
//! 5. Bulk-load everything in one transaction
//!
//! The run returns a structured report; it never exits the process. A
//! cancellation token is honored per row, and cancellation before the
//! final commit leaves the target untouched.

use crate::assemble::{DatasetBuilder, DEFAULT_CHUNK_SIZE};
use crate::error::IngestError;
use crate::source::RowSource;
use crate::validate::{MissingFieldStats, RowOutcome, RowValidator, DEFAULT_MAX_BOOKS};
use crate::{integrity, load, Result};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Path to the source CSV file
    pub dataset_path: PathBuf,
    /// Field delimiter
    pub delimiter: u8,
    /// Admission cap: maximum books accepted in one run
    pub max_books: usize,
    /// Records per INSERT batch
    pub chunk_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("books.csv"),
            delimiter: b',',
            max_books: DEFAULT_MAX_BOOKS,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Outcome summary of a completed ingestion run
#[derive(Debug, Clone, serde::Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub rows_rejected: usize,
    pub books: usize,
    pub authors: usize,
    pub author_roles: usize,
    pub publishers: usize,
    pub languages: usize,
    pub genres: usize,
    pub book_authors: usize,
    pub book_author_roles: usize,
    pub book_genres: usize,
    pub book_star_ratings: usize,
}

/// Dataset ingestion pipeline
pub struct IngestPipeline {
    config: PipelineConfig,
    cancel: CancellationToken,
}

impl IngestPipeline {
    /// Create pipeline with configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Create pipeline with an external cancellation token
    pub fn with_cancellation(config: PipelineConfig, cancel: CancellationToken) -> Self {
        Self { config, cancel }
    }

    /// Run the full ingestion against the target pool
    pub async fn run(&self, pool: &SqlitePool) -> Result<IngestReport> {
        load::assert_target_empty(pool).await?;

        info!(
            "--- READING DATASET - START ({})",
            self.config.dataset_path.display()
        );

        let mut source = RowSource::open(&self.config.dataset_path, self.config.delimiter)?;
        let validator = RowValidator::new(self.config.max_books);
        let mut builder = DatasetBuilder::new();
        let mut stats = MissingFieldStats::new();

        let mut rows_read = 0usize;
        let mut rows_rejected = 0usize;

        for row in source.rows() {
            if self.cancel.is_cancelled() {
                warn!("Ingestion cancelled after {} rows", rows_read);
                return Err(IngestError::Cancelled);
            }

            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    // A structurally broken row is a soft rejection too
                    warn!("Unreadable row skipped: {}", e);
                    rows_read += 1;
                    rows_rejected += 1;
                    continue;
                }
            };
            rows_read += 1;
            stats.record(&row);

            match validator.validate(&row, builder.book_count()) {
                RowOutcome::Accepted(validated) => builder.push_row(*validated),
                RowOutcome::Rejected(_) => rows_rejected += 1,
            }
        }

        info!(
            "--- READING DATASET - END ({} rows read, {} rejected, {} books accepted)",
            rows_read,
            rows_rejected,
            builder.book_count()
        );
        stats.log_summary();

        let dataset = builder.finish();

        integrity::check_dataset(&dataset)?;

        if self.cancel.is_cancelled() {
            return Err(IngestError::Cancelled);
        }

        load::load_dataset(pool, &dataset, self.config.chunk_size).await?;

        Ok(IngestReport {
            rows_read,
            rows_rejected,
            books: dataset.books.len(),
            authors: dataset.authors.len(),
            author_roles: dataset.author_roles.len(),
            publishers: dataset.publishers.len(),
            languages: dataset.languages.len(),
            genres: dataset.genres.len(),
            book_authors: dataset.book_authors.len(),
            book_author_roles: dataset.book_author_roles.len(),
            book_genres: dataset.book_genres.len(),
            book_star_ratings: dataset.book_star_ratings.len(),
        })
    }
}

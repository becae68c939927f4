//! paperback-ingest - One-shot dataset ingestion
//!
//! Reads the raw book CSV, normalizes and deduplicates it into the
//! relational catalog, and bulk-loads everything in one transaction.
//! Process-exit semantics live here and only here; the pipeline itself
//! returns structured results.

use anyhow::Result;
use clap::Parser;
use paperback_ingest::{IngestPipeline, PipelineConfig};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "paperback-ingest", about = "Populate the paperback catalog from a CSV dataset")]
struct Args {
    /// Path to the source CSV dataset
    #[arg(long, env = "PAPERBACK_DATASET")]
    dataset: Option<PathBuf>,

    /// Path to the SQLite database file
    #[arg(long, env = "PAPERBACK_DATABASE")]
    database: Option<PathBuf>,

    /// Field delimiter
    #[arg(long)]
    delimiter: Option<char>,

    /// Maximum books admitted in one run
    #[arg(long)]
    max_books: Option<usize>,

    /// Records per INSERT batch
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Explicit TOML config file path
    #[arg(long, env = "PAPERBACK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs on stderr; stdout carries the JSON run report
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting paperback-ingest");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    // CLI/env beat TOML, TOML beats compiled defaults
    let toml = paperback_common::config::load_toml_config(args.config.as_deref())?;
    let defaults = PipelineConfig::default();

    let database_path = args
        .database
        .or(toml.database_path)
        .unwrap_or_else(|| PathBuf::from("paperback.db"));

    let config = PipelineConfig {
        dataset_path: args
            .dataset
            .or(toml.dataset_path)
            .unwrap_or(defaults.dataset_path),
        delimiter: match args.delimiter.or(toml.delimiter) {
            Some(c) => paperback_common::config::delimiter_byte(c)?,
            None => defaults.delimiter,
        },
        max_books: args.max_books.or(toml.max_books).unwrap_or(defaults.max_books),
        chunk_size: args
            .chunk_size
            .or(toml.chunk_size)
            .unwrap_or(defaults.chunk_size),
    };

    info!("Database: {}", database_path.display());
    info!("Dataset: {}", config.dataset_path.display());

    let pool = paperback_common::db::init_database_pool(&database_path).await?;

    let pipeline = IngestPipeline::new(config);
    let report = pipeline.run(&pool).await?;

    info!(
        "Ingestion complete: {} books, {} authors ({} roles), {} publishers, \
         {} languages, {} genres",
        report.books,
        report.authors,
        report.author_roles,
        report.publishers,
        report.languages,
        report.genres
    );
    info!(
        "Join rows: {} bookAuthor, {} bookAuthorRole, {} bookGenre, {} bookStarRating",
        report.book_authors,
        report.book_author_roles,
        report.book_genres,
        report.book_star_ratings
    );
    info!(
        "{} of {} source rows rejected",
        report.rows_rejected, report.rows_read
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

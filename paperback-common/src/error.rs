//! Shared error type for the catalog crates

use thiserror::Error;

/// Result alias used throughout paperback-common
pub type Result<T> = std::result::Result<T, Error>;

/// Failures the shared layer can surface: storage, filesystem, and
/// configuration. Ingestion-specific failures live in the ingest crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file missing when explicitly requested, unreadable, or unparseable
    #[error("Configuration error: {0}")]
    Config(String),
}

//! Error types for paperback-ingest
//!
//! Row- and field-level rejections are ordinary control flow, expressed as
//! outcome enums in their modules. Only conditions that must abort the whole
//! run (and guarantee nothing was committed) surface here.

use thiserror::Error;

/// Fatal ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// CSV read or deserialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Database operation failed; the surrounding transaction is rolled back
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Target store already holds books; re-running would duplicate ids
    #[error("target already contains {0} books; refusing to ingest again")]
    AlreadyPopulated(i64),

    /// Pre-load invariant violated; nothing was written
    #[error("integrity violation in table '{table}': {violation}")]
    Integrity {
        table: &'static str,
        violation: IntegrityViolation,
    },

    /// Run cancelled before completion; nothing was committed
    #[error("ingestion cancelled")]
    Cancelled,

    /// paperback-common error
    #[error("Common error: {0}")]
    Common(#[from] paperback_common::Error),
}

/// What the integrity checker found wrong with a table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntegrityViolation {
    /// The run produced no records at all for this table
    #[error("no records produced")]
    Empty,

    /// Two records share an id; downstream foreign keys would be wrong
    #[error("duplicate id {0}")]
    DuplicateId(i64),
}

/// Result type for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

//! Database access for paperback
//!
//! One shared SQLite database holds the full book catalog. The ingestion
//! pipeline writes it once; the storefront query layer reads it by
//! foreign-key joins.

pub mod models;
pub mod schema;

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the parent directory and database file if missing, enables
/// foreign-key enforcement on every connection (SQLite leaves it off by
/// default), and applies the schema idempotently.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    tracing::debug!("Connecting to database: {}", db_path.display());

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options).await?;

    schema::initialize_schema(&pool).await?;

    Ok(pool)
}

/// In-memory pool for tests
///
/// Pinned to a single connection: each in-memory SQLite connection is its
/// own database, so a wider pool would lose the schema.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    schema::initialize_schema(&pool).await?;

    Ok(pool)
}

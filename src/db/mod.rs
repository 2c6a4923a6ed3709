//! Database access layer for eav-tidy

use crate::{Error, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

mod tables;
pub use tables::{value_tables, ValueKind, ValueTable};

/// Open the target database for reading and writing.
///
/// The database must already exist: this tool cleans up an existing store
/// and will not create one (mode=rw, not rwc).
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::Config(format!(
            "database not found: {}",
            db_path.display()
        )));
    }

    let db_url = format!("sqlite://{}?mode=rw", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    sqlx::query("PRAGMA foreign_keys = ON").execute(&pool).await?;

    // WAL keeps the scan cursor stable while deletes land on other connections
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;

    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    info!("Opened database: {}", db_path.display());

    Ok(pool)
}

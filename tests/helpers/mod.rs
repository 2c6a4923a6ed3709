//! Shared fixtures for integration tests
//!
//! Each test gets its own temp-file SQLite database with the value-table
//! family created, mirroring the physical shape the tool expects in the wild.

#![allow(dead_code)]

use eav_tidy::config::{Edition, EntityKind, RunConfig};
use eav_tidy::db::{self, value_tables, ValueKind};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A temp-file database with the value tables created.
pub struct TestStore {
    /// Keeps the temp dir (and database file) alive for the test's duration
    _dir: TempDir,
    pub pool: SqlitePool,
}

pub async fn setup_store(entity: EntityKind, edition: Edition) -> TestStore {
    setup_store_with_prefix(entity, edition, "").await
}

pub async fn setup_store_with_prefix(
    entity: EntityKind,
    edition: Edition,
    prefix: &str,
) -> TestStore {
    let dir = tempfile::tempdir().expect("Should create temp dir");
    let path = dir.path().join("eav.db");
    // A zero-byte file is a valid empty SQLite database
    std::fs::File::create(&path).expect("Should create database file");

    let pool = db::connect(&path).await.expect("Should open database");

    for table in value_tables(entity, edition, prefix) {
        let payload_type = match table.kind {
            ValueKind::Varchar | ValueKind::Text | ValueKind::Datetime => "TEXT",
            ValueKind::Int => "INTEGER",
            ValueKind::Decimal => "NUMERIC",
        };
        sqlx::query(&format!(
            "CREATE TABLE {} (
                value_id INTEGER PRIMARY KEY AUTOINCREMENT,
                attribute_id INTEGER NOT NULL,
                scope_id INTEGER NOT NULL DEFAULT 0,
                {} INTEGER NOT NULL,
                value {}
            )",
            table.name, table.identity_column, payload_type
        ))
        .execute(&pool)
        .await
        .expect("Should create value table");
    }

    TestStore { _dir: dir, pool }
}

/// Insert one value row and return its value_id.
pub async fn insert_value(
    pool: &SqlitePool,
    table: &str,
    identity_column: &str,
    attribute_id: i64,
    scope_id: i64,
    entity_key: i64,
    value: Option<&str>,
) -> i64 {
    sqlx::query(&format!(
        "INSERT INTO {table} (attribute_id, scope_id, {identity_column}, value) \
         VALUES (?, ?, ?, ?)"
    ))
    .bind(attribute_id)
    .bind(scope_id)
    .bind(entity_key)
    .bind(value)
    .execute(pool)
    .await
    .expect("Should insert row")
    .last_insert_rowid()
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("Should count rows")
}

pub async fn row_exists(pool: &SqlitePool, table: &str, value_id: i64) -> bool {
    let count: i64 =
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE value_id = ?"))
            .bind(value_id)
            .fetch_one(pool)
            .await
            .expect("Should query row");
    count > 0
}

/// Mutating exact-mode configuration with the confirmation prompt bypassed.
pub fn base_config() -> RunConfig {
    RunConfig {
        force: true,
        ..RunConfig::default()
    }
}

pub fn dry_run_config() -> RunConfig {
    RunConfig {
        dry_run: true,
        ..base_config()
    }
}

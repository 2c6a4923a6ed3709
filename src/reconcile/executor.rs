//! Mutation executor: the only component allowed to write

use crate::db::ValueTable;
use crate::reconcile::filter::ScopeFilter;
use sqlx::SqlitePool;

/// Performs deletions, or simulates them under dry-run.
///
/// The sole writer in the pipeline; everything else only reads.
#[derive(Debug, Clone, Copy)]
pub struct MutationExecutor<'a> {
    pool: &'a SqlitePool,
    dry_run: bool,
}

impl<'a> MutationExecutor<'a> {
    pub fn new(pool: &'a SqlitePool, dry_run: bool) -> Self {
        Self { pool, dry_run }
    }

    /// Delete one override row by its value id.
    ///
    /// A row that is already gone counts as success: the redundancy may have
    /// been resolved by an earlier or concurrent run.
    pub async fn delete_override(&self, table: &ValueTable, value_id: i64) -> sqlx::Result<()> {
        if self.dry_run {
            return Ok(());
        }
        sqlx::query(&format!(
            "DELETE FROM {} WHERE value_id = ?",
            table.name
        ))
        .bind(value_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Bulk-delete the NULL-valued overrides under the active filter.
    ///
    /// NULL cannot be value-compared, so presence alone is the redundancy
    /// criterion once scope-filtered. Returns the number of rows removed;
    /// under dry-run, the number that would have been removed.
    pub async fn delete_null_overrides(
        &self,
        table: &ValueTable,
        filter: &ScopeFilter,
    ) -> sqlx::Result<u64> {
        let predicate = format!("{} AND value IS NULL", filter.predicate());

        if self.dry_run {
            let sql = format!("SELECT COUNT(*) FROM {} WHERE {}", table.name, predicate);
            let mut query = sqlx::query_scalar::<_, i64>(&sql);
            for bind in filter.binds() {
                query = query.bind(bind);
            }
            return Ok(query.fetch_one(self.pool).await? as u64);
        }

        let sql = format!("DELETE FROM {} WHERE {}", table.name, predicate);
        let mut query = sqlx::query(&sql);
        for bind in filter.binds() {
            query = query.bind(bind);
        }
        Ok(query.execute(self.pool).await?.rows_affected())
    }
}

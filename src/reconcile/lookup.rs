//! Row types and the global-value point lookup

use crate::config::ComparisonMode;
use crate::db::ValueTable;
use crate::reconcile::filter::ScopeFilter;
use sqlx::SqlitePool;

/// One scoped override row, as streamed by the scan.
///
/// The payload is read as its canonical text rendering so one row type
/// serves all five value tables; equality against the global value is
/// decided on raw bytes in the lookup, never on this rendering's collation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OverrideRow {
    pub value_id: i64,
    pub attribute_id: i64,
    pub scope_id: i64,
    pub entity_key: i64,
    pub value: String,
}

/// A global-scope row matched to an override.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GlobalRow {
    pub value_id: i64,
    pub value: Option<String>,
}

/// SQL streaming all non-NULL overrides of one table under the filter.
///
/// NULL-valued overrides are excluded here; they cannot be value-compared
/// and are handled by the bulk NULL pass instead.
pub fn scan_sql(table: &ValueTable, filter: &ScopeFilter) -> String {
    format!(
        "SELECT value_id, attribute_id, scope_id, {id} AS entity_key, \
         CAST(value AS TEXT) AS value \
         FROM {table} WHERE {predicate} AND value IS NOT NULL",
        id = table.identity_column,
        table = table.name,
        predicate = filter.predicate(),
    )
}

/// Find the global-scope row(s) an override would fall back to.
///
/// In `Exact` mode the value comparison runs on the BLOB rendering of both
/// sides: SQLite compares blobs bytewise with no collation involved, so a
/// case-insensitive column collation cannot produce a false match.
///
/// Well-formed data yields at most one row; callers must tolerate zero or
/// several (several is an anomaly to report, not an error).
pub async fn find_global_matches(
    pool: &SqlitePool,
    table: &ValueTable,
    row: &OverrideRow,
    comparison: ComparisonMode,
) -> sqlx::Result<Vec<GlobalRow>> {
    let mut sql = format!(
        "SELECT value_id, CAST(value AS TEXT) AS value FROM {table} \
         WHERE attribute_id = ? AND scope_id = 0 AND {id} = ?",
        table = table.name,
        id = table.identity_column,
    );
    if comparison == ComparisonMode::Exact {
        sql.push_str(" AND CAST(value AS BLOB) = CAST(? AS BLOB)");
    }

    let mut query = sqlx::query_as::<_, GlobalRow>(&sql)
        .bind(row.attribute_id)
        .bind(row.entity_key);
    if comparison == ComparisonMode::Exact {
        query = query.bind(&row.value);
    }

    query.fetch_all(pool).await
}

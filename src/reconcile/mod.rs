//! Reconciliation of scoped overrides against global default values
//!
//! Drives the per-table, per-row pipeline: scope filter → streamed scan →
//! global lookup → redundancy decision → deletion → report, followed by the
//! bulk NULL pass, for each of the five value tables in turn.

use crate::config::RunConfig;
use crate::db::{value_tables, ValueTable};
use crate::{Error, Result};
use futures::TryStreamExt;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

mod decide;
mod executor;
mod filter;
mod lookup;
mod report;

pub use decide::{decide, Verdict};
pub use executor::MutationExecutor;
pub use filter::ScopeFilter;
pub use lookup::{find_global_matches, GlobalRow, OverrideRow};
pub use report::{Anomaly, NullPassSummary, Report, RowError, RunResult};

/// Connectivity-level faults abort the whole run; anything else is a
/// per-row problem to record and skip.
fn is_connectivity(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn storage_fault(
    table: &ValueTable,
    context: &'static str,
    source: sqlx::Error,
    report: &Report,
) -> Error {
    report.log_incomplete();
    Error::Storage {
        table: table.name.clone(),
        context,
        source,
    }
}

/// Run one reconciliation over all value tables of the configured entity.
///
/// Tables are processed sequentially; rows are streamed, never materialized
/// wholesale, so memory stays bounded on tables with millions of rows.
/// `cancel` is checked between rows: the current row finishes, then the run
/// stops with `complete = false` in the result.
///
/// Dry-run and mutating runs take identical decisions; only the executor
/// behaves differently.
pub async fn run(
    pool: &SqlitePool,
    config: &RunConfig,
    cancel: &AtomicBool,
) -> Result<RunResult> {
    config.validate()?;
    let filter = ScopeFilter::new(config.scope_id, config.attribute_id)?;
    let tables = value_tables(config.entity_kind, config.edition, &config.table_prefix);
    let executor = MutationExecutor::new(pool, config.dry_run);
    let mut report = Report::new(config.dry_run);

    'tables: for table in &tables {
        info!(table = %table.name, dry_run = config.dry_run, "scanning scoped overrides");

        let sql = lookup::scan_sql(table, &filter);
        let mut query = sqlx::query_as::<_, OverrideRow>(&sql);
        for bind in filter.binds() {
            query = query.bind(bind);
        }
        let mut rows = query.fetch(pool);

        loop {
            if cancel.load(Ordering::Relaxed) {
                report.mark_cancelled();
                break 'tables;
            }

            let row = match rows.try_next().await {
                Ok(Some(row)) => row,
                Ok(None) => break,
                Err(e) => return Err(storage_fault(table, "scanning override rows", e, &report)),
            };

            let matches =
                match lookup::find_global_matches(pool, table, &row, config.comparison).await {
                    Ok(matches) => matches,
                    Err(e) if is_connectivity(&e) => {
                        return Err(storage_fault(table, "matching the global value", e, &report))
                    }
                    Err(e) => {
                        report.record_row_error(table, row.value_id, &e);
                        continue;
                    }
                };

            match decide(&matches) {
                Verdict::NotRedundant => {
                    debug!(
                        table = %table.name,
                        value_id = row.value_id,
                        "no matching global value; keeping override"
                    );
                }
                Verdict::Redundant => {
                    if matches.len() > 1 {
                        report.record_anomaly(table, &row, matches.len());
                    }
                    match executor.delete_override(table, row.value_id).await {
                        Ok(()) => report.record_deletion(table, &row, &matches[0]),
                        Err(e) if is_connectivity(&e) => {
                            return Err(storage_fault(
                                table,
                                "deleting an override row",
                                e,
                                &report,
                            ))
                        }
                        Err(e) => report.record_row_error(table, row.value_id, &e),
                    }
                }
            }
        }
        drop(rows);

        // NULL values cannot be compared; presence under the filter alone
        // makes them redundant, handled as one bulk statement per table.
        match executor.delete_null_overrides(table, &filter).await {
            Ok(deleted) => report.record_null_pass(table, deleted),
            Err(e) if is_connectivity(&e) => {
                return Err(storage_fault(table, "removing NULL overrides", e, &report))
            }
            Err(e) => {
                warn!(
                    table = %table.name,
                    error = %e,
                    "NULL pass failed; continuing with the next table"
                );
            }
        }
    }

    let result = report.finish();
    if result.nothing_to_clean() {
        info!("there were no attribute values to clean up");
    } else {
        info!(
            overrides_deleted = result.overrides_deleted(),
            nulls_deleted = result.nulls_deleted(),
            anomalies = result.anomalies.len(),
            complete = result.complete,
            "reconciliation finished"
        );
    }
    Ok(result)
}

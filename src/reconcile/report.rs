//! Reconciliation report: counts, anomalies, and per-decision events

use crate::db::ValueTable;
use crate::reconcile::lookup::{GlobalRow, OverrideRow};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Several global rows matched one override: well-formed data has at most
/// one. Recorded and reported, never fatal.
#[derive(Debug, Clone, Serialize)]
pub struct Anomaly {
    pub table: String,
    pub value_id: i64,
    pub attribute_id: i64,
    pub scope_id: i64,
    pub entity_key: i64,
    pub match_count: usize,
}

/// Result of the NULL pass over one table.
#[derive(Debug, Clone, Serialize)]
pub struct NullPassSummary {
    pub table: String,
    pub deleted: u64,
}

/// A single-row operation that failed and was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct RowError {
    pub table: String,
    pub value_id: i64,
    pub message: String,
}

/// Outcome of one reconciliation run.
///
/// A dry run produces the same result as a mutating run over the same data;
/// only the store differs afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Deletions per attribute id, summed across all five tables
    pub per_attribute_counts: BTreeMap<i64, u64>,
    /// NULL-pass summaries, one per table in processing order
    pub null_deleted: Vec<NullPassSummary>,
    pub anomalies: Vec<Anomaly>,
    pub row_errors: Vec<RowError>,
    /// False when the run was interrupted between rows
    pub complete: bool,
}

impl RunResult {
    /// Total non-NULL overrides deleted (or reported under dry-run)
    pub fn overrides_deleted(&self) -> u64 {
        self.per_attribute_counts.values().sum()
    }

    /// Total NULL overrides deleted (or reported under dry-run)
    pub fn nulls_deleted(&self) -> u64 {
        self.null_deleted.iter().map(|n| n.deleted).sum()
    }

    /// True when the value scan produced no deletions at all
    pub fn nothing_to_clean(&self) -> bool {
        self.per_attribute_counts.is_empty()
    }
}

/// Accumulates one run's outcome and emits its structured log records.
///
/// Owned by the orchestrator; the sole point where counts are updated.
#[derive(Debug)]
pub struct Report {
    dry_run: bool,
    result: RunResult,
}

impl Report {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            result: RunResult {
                per_attribute_counts: BTreeMap::new(),
                null_deleted: Vec::new(),
                anomalies: Vec::new(),
                row_errors: Vec::new(),
                complete: true,
            },
        }
    }

    /// Record one redundant override removed (or simulated under dry-run).
    pub fn record_deletion(&mut self, table: &ValueTable, row: &OverrideRow, replacing: &GlobalRow) {
        info!(
            scope_id = row.scope_id,
            value_id = row.value_id,
            value = %row.value,
            replacing_value_id = replacing.value_id,
            attribute_id = row.attribute_id,
            table = %table.name,
            dry_run = self.dry_run,
            "removing redundant override in favor of the global value"
        );
        *self
            .result
            .per_attribute_counts
            .entry(row.attribute_id)
            .or_insert(0) += 1;
    }

    /// Record a multi-match anomaly for one override.
    pub fn record_anomaly(&mut self, table: &ValueTable, row: &OverrideRow, match_count: usize) {
        warn!(
            table = %table.name,
            value_id = row.value_id,
            attribute_id = row.attribute_id,
            entity_key = row.entity_key,
            match_count,
            "several global rows match this override; data anomaly, keeping the first as the replacement"
        );
        self.result.anomalies.push(Anomaly {
            table: table.name.clone(),
            value_id: row.value_id,
            attribute_id: row.attribute_id,
            scope_id: row.scope_id,
            entity_key: row.entity_key,
            match_count,
        });
    }

    /// Record a single-row failure; the row is skipped and not counted.
    pub fn record_row_error(&mut self, table: &ValueTable, value_id: i64, error: &sqlx::Error) {
        warn!(
            table = %table.name,
            value_id,
            error = %error,
            "row operation failed; skipping row"
        );
        self.result.row_errors.push(RowError {
            table: table.name.clone(),
            value_id,
            message: error.to_string(),
        });
    }

    /// Record the NULL pass for one table.
    pub fn record_null_pass(&mut self, table: &ValueTable, deleted: u64) {
        if deleted > 0 {
            info!(
                table = %table.name,
                deleted,
                dry_run = self.dry_run,
                "removing NULL override value(s)"
            );
        }
        self.result.null_deleted.push(NullPassSummary {
            table: table.name.clone(),
            deleted,
        });
    }

    /// Mark the run as interrupted; partial results remain valid.
    pub fn mark_cancelled(&mut self) {
        warn!("run interrupted; stopping after the current row");
        self.result.complete = false;
    }

    /// Log the partial totals when a storage fault aborts the run.
    pub fn log_incomplete(&self) {
        warn!(
            overrides_deleted = self.result.overrides_deleted(),
            nulls_deleted = self.result.nulls_deleted(),
            "run incomplete; counts cover only the rows processed so far"
        );
    }

    pub fn finish(self) -> RunResult {
        self.result
    }
}

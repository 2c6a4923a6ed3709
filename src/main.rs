//! eav-tidy - Remove redundant per-scope EAV attribute overrides
//!
//! Scans the value tables of an EAV store for scoped overrides whose value
//! equals the global default, deletes them so normal fallback applies, and
//! prints per-attribute counts. Supports a dry-run preview that takes the
//! same decisions without mutating anything.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::warn;

use eav_tidy::config::{self, ComparisonMode, Edition, EntityKind, RunConfig};
use eav_tidy::reconcile::RunResult;
use eav_tidy::{db, reconcile};

/// Command-line arguments for eav-tidy
#[derive(Parser, Debug)]
#[command(name = "eav-tidy")]
#[command(about = "Remove per-scope attribute overrides that duplicate the global value")]
#[command(version)]
struct Args {
    /// Report what would be deleted without touching the database
    #[arg(long)]
    dry_run: bool,

    /// Skip the interactive confirmation
    #[arg(long)]
    force: bool,

    /// Delete overrides even when their value differs from the global value
    #[arg(long)]
    include_different_values: bool,

    /// Only clean overrides in this scope (0 is the global scope and is rejected)
    #[arg(long, value_name = "ID")]
    scope_id: Option<i64>,

    /// Only clean overrides of this attribute
    #[arg(long, value_name = "ID")]
    attribute_id: Option<i64>,

    /// Entity kind whose value tables are scanned
    #[arg(long, value_enum, default_value_t = EntityKind::Product)]
    entity: EntityKind,

    /// Storage edition, deciding the entity-identity column naming
    #[arg(long, value_enum)]
    edition: Option<Edition>,

    /// Prefix prepended to value-table names
    #[arg(long, value_name = "PREFIX")]
    table_prefix: Option<String>,

    /// Path to the SQLite database holding the EAV store
    #[arg(long, value_name = "PATH", env = "EAV_TIDY_DATABASE")]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("eav_tidy=info")),
        )
        .init();

    let args = Args::parse();
    let file_config = config::load_config_file().context("Failed to load config file")?;

    let database = config::resolve_database_path(args.database, &file_config)?;

    let edition = match args.edition {
        Some(edition) => edition,
        None => match &file_config.edition {
            Some(raw) => raw.parse()?,
            None => Edition::default(),
        },
    };

    let run_config = RunConfig {
        dry_run: args.dry_run,
        force: args.force,
        comparison: if args.include_different_values {
            ComparisonMode::AnyValue
        } else {
            ComparisonMode::Exact
        },
        scope_id: args.scope_id,
        attribute_id: args.attribute_id,
        entity_kind: args.entity,
        edition,
        table_prefix: args
            .table_prefix
            .or(file_config.table_prefix)
            .unwrap_or_default(),
    };

    // Fail on bad configuration before prompting or touching storage
    run_config.validate()?;

    if !run_config.dry_run && !run_config.force {
        confirm_destructive_run()?;
    }

    let pool = db::connect(&database)
        .await
        .context("Failed to open database")?;

    // Ctrl+C requests a clean stop between rows rather than a hard kill
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; finishing the current row before stopping");
            flag.store(true, Ordering::Relaxed);
        }
    });

    let result = reconcile::run(&pool, &run_config, &cancel).await?;
    print_summary(&run_config, &result);

    Ok(())
}

/// A mutating run needs --force or a human answering yes on a terminal.
fn confirm_destructive_run() -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("neither --dry-run nor --force was supplied and stdin is not interactive");
    }

    println!("WARNING: this is not a dry run. If you want a preview, add --dry-run.");
    print!("Are you sure you want to continue? [No] ");
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Ok(()),
        _ => bail!("aborted"),
    }
}

/// Human-readable closing summary on stdout; per-row detail goes to the log.
fn print_summary(run_config: &RunConfig, result: &RunResult) {
    let marker = if run_config.dry_run { " (dry run)" } else { "" };

    for (attribute_id, count) in &result.per_attribute_counts {
        println!("Attribute {attribute_id}: removed {count} redundant override(s){marker}");
    }
    for null_pass in &result.null_deleted {
        if null_pass.deleted > 0 {
            println!(
                "Removed {} NULL override(s) from {}{marker}",
                null_pass.deleted, null_pass.table
            );
        }
    }
    if !result.anomalies.is_empty() {
        println!(
            "{} override(s) matched more than one global row; see the log for details",
            result.anomalies.len()
        );
    }
    if !result.row_errors.is_empty() {
        println!(
            "{} row(s) skipped due to errors; see the log for details",
            result.row_errors.len()
        );
    }
    if !result.complete {
        println!("Run was interrupted; results are partial.");
    }

    if result.nothing_to_clean() {
        println!("There were no attribute values to clean up");
    } else {
        println!("Done");
    }
}

//! Run configuration and configuration-file loading
//!
//! The binary assembles a [`RunConfig`] from command-line options, environment
//! variables and an optional TOML config file; the reconciliation core consumes
//! it as a plain value and performs its own validation before touching storage.

use crate::{Error, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Entity kind whose value tables are scanned.
///
/// Each kind owns its own family of five value tables; the set is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    #[default]
    Product,
    Category,
}

impl EntityKind {
    /// Table-name fragment for this entity kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Category => "category",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage edition, selecting the entity-identity column naming scheme.
///
/// This is an external configuration input; it is never inferred from the
/// database itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Edition {
    #[default]
    Community,
    Enterprise,
}

impl Edition {
    /// Column identifying the owning entity in every value table
    pub fn identity_column(&self) -> &'static str {
        match self {
            Edition::Community => "entity_id",
            Edition::Enterprise => "row_id",
        }
    }
}

impl FromStr for Edition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "community" => Ok(Edition::Community),
            "enterprise" => Ok(Edition::Enterprise),
            other => Err(Error::Config(format!(
                "unknown edition '{other}' (expected 'community' or 'enterprise')"
            ))),
        }
    }
}

/// How an override value is compared against the global value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Byte-for-byte equality, independent of column collation
    #[default]
    Exact,
    /// Any global value present makes the override redundant
    AnyValue,
}

/// Configuration for one reconciliation run.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Report decisions without mutating storage
    pub dry_run: bool,
    /// Skip interactive confirmation (consumed by the binary, ignored by the core)
    pub force: bool,
    pub comparison: ComparisonMode,
    /// Restrict the scan to one scope; 0 (the global scope) is rejected
    pub scope_id: Option<i64>,
    /// Restrict the scan to one attribute
    pub attribute_id: Option<i64>,
    pub entity_kind: EntityKind,
    pub edition: Edition,
    /// Prefix prepended to every value-table name
    pub table_prefix: String,
}

impl RunConfig {
    /// Reject configurations that must never reach storage.
    ///
    /// Scope 0 is the global scope itself: cleaning it would delete the
    /// defaults that overrides fall back to.
    pub fn validate(&self) -> Result<()> {
        if self.scope_id == Some(0) {
            return Err(Error::Config(
                "scope id 0 is the global scope and cannot be a cleanup target".to_string(),
            ));
        }
        Ok(())
    }
}

/// Optional settings read from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub database: Option<PathBuf>,
    pub edition: Option<String>,
    pub table_prefix: Option<String>,
}

impl FileConfig {
    /// Parse a config file, tolerating its absence.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
    }
}

/// Load the config file from the platform config directory, if present.
pub fn load_config_file() -> Result<FileConfig> {
    match dirs::config_dir() {
        Some(dir) => FileConfig::load_from(&dir.join("eav-tidy").join("config.toml")),
        None => Ok(FileConfig::default()),
    }
}

/// Resolve the database path: command line / environment first, then the
/// config file.
///
/// No compiled-in default exists; the target database must be named
/// explicitly somewhere.
pub fn resolve_database_path(cli_arg: Option<PathBuf>, file: &FileConfig) -> Result<PathBuf> {
    cli_arg
        .or_else(|| file.database.clone())
        .ok_or_else(|| {
            Error::Config(
                "no database specified (use --database, EAV_TIDY_DATABASE, or the config file)"
                    .to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_zero_is_rejected() {
        let config = RunConfig {
            scope_id: Some(0),
            ..RunConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn nonzero_scope_is_accepted() {
        let config = RunConfig {
            scope_id: Some(3),
            ..RunConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn edition_parses_known_names() {
        assert_eq!("community".parse::<Edition>().unwrap(), Edition::Community);
        assert_eq!("Enterprise".parse::<Edition>().unwrap(), Edition::Enterprise);
        assert!(matches!(
            "cloud".parse::<Edition>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn identity_column_follows_edition() {
        assert_eq!(Edition::Community.identity_column(), "entity_id");
        assert_eq!(Edition::Enterprise.identity_column(), "row_id");
    }
}

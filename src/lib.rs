//! # eav-tidy
//!
//! Reconciles per-scope attribute overrides against global default values in
//! an Entity-Attribute-Value store. Overrides whose value equals the global
//! value (and all NULL-valued overrides) are redundant: deleting them lets
//! normal fallback reproduce the same value without the duplicate row.
//!
//! The library exposes a single entry point, [`reconcile::run`], driven by a
//! [`config::RunConfig`]; the binary in `src/main.rs` wraps it with argument
//! parsing and interactive confirmation.

pub mod config;
pub mod db;
pub mod error;
pub mod reconcile;

pub use config::{ComparisonMode, Edition, EntityKind, RunConfig};
pub use error::{Error, Result};
pub use reconcile::{run, RunResult};

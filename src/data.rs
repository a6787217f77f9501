//! Variant and exception data: parsing, validation, snapshots and reload.
//!
//! # Components
//!
//! - [`loader`] - Parses and validates the two data sources
//! - [`snapshot`] - Immutable, versioned bundles of loaded data
//! - [`store`] - Serves the current snapshot and hot-reloads changed files
//! - [`watcher`] - Optional background polling of the sources
//! - [`lint`] - Non-fatal data-quality report

pub mod lint;
pub mod loader;
pub mod snapshot;
pub mod store;
pub mod watcher;

pub use lint::{LintFinding, LintKind, LintReport, lint_files, lint_sources};
pub use snapshot::{ExceptionSet, Snapshot, VariantMap, VariantRecord};
pub use store::{DataSources, DataStore};
pub use watcher::{WatcherHandle, spawn_watcher};

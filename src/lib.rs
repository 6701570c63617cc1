//! # user-reconcile
//!
//! A **reconciliation engine** for per-user record counts. Given one CSV export
//! and a batch of JSON documents (loose or bundled in ZIP archives), it counts
//! how often each user appears on each side and reports every user whose counts
//! disagree.
//!
//! ## Key Features
//!
//! - **Archive expansion** - ZIP uploads are opened and their JSON entries used
//! - **Loose header matching** - the identity column is found regardless of case,
//!   underscores or spaces
//! - **Embedded JSON cells** - a CSV cell holding a JSON object contributes the
//!   identity stored under the configured key
//! - **Best-effort extraction** - a bad JSON file is skipped and reported, never fatal
//! - **Full outer join** - users present on only one side are kept, with count 0
//!   on the other
//! - **Category tallies** - file-name markers counted independently
//! - **Reports** - a two-sheet xlsx workbook and a missing-user CSV
//! - **Sequential and parallel execution** - same output either way
//!
//! ## Quick Start
//!
//! ```no_run
//! use user_reconcile::*;
//! # use anyhow::Result;
//!
//! # fn main() -> Result<()> {
//! let csv = UploadedFile::from_path("users.csv")?;
//! let uploads = load_uploads(&["exports/*.zip", "exports/*.json"])?;
//!
//! let result = Reconciler::new(ReconcileConfig::default()).compare_counts(&csv, &uploads)?;
//! for row in result.mismatches() {
//!     println!("{}: csv={} json={}", row.user, row.csv_count, row.json_count);
//! }
//! export::xlsx::write_workbook(&result, "reports")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Workflows
//!
//! ### Count reconciliation
//! [`Reconciler::compare_counts`] builds a frequency table for each side, joins
//! them on identity and emits one [`ComparisonRow`] per user, sorted by user.
//! Only JSON files whose name contains the inclusion marker contribute
//! identities; every file counts toward the category tallies.
//!
//! ### Missing users
//! [`Reconciler::compare_users`] treats a user-chosen CSV column as a set and
//! reports each JSON file whose identity is not in it.
//!
//! ## Errors
//!
//! Terminal failures are [`ReconcileError`]s carried in `anyhow::Error`.
//! Per-file problems are [`Skipped`] entries on the result.
//!
//! ## Feature Flags
//!
//! - `logger-support` - [`logging::init`] installs `env_logger`
//!
//! ## Module Overview
//!
//! - [`io`] - archive expansion, CSV tokenising/writing, glob loading
//! - [`extract`] - identity extraction from CSV and JSON
//! - [`combiners`], [`frequency`], [`join`] - the reduction and join steps
//! - [`compare`] - count and missing-user comparators
//! - [`export`] - xlsx and CSV reports
//! - [`runner`] - orchestration and execution modes
//! - [`testing`] - builders, fixtures and assertions for tests

pub mod combiners;
pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod frequency;
pub mod identity;
pub mod io;
pub mod join;
pub mod logging;
pub mod runner;
pub mod skip;
pub mod stats;
pub mod testing;
pub mod upload;

pub use compare::{
    ComparisonResult, ComparisonRow, MissingUserGroup, MissingUserRecord, MissingUserReport, Status,
    SummaryStatistics,
};
pub use config::{CategoryMarker, EmptyArchivePolicy, ReconcileConfig};
pub use error::ReconcileError;
pub use frequency::FrequencyTable;
pub use identity::{CellValue, Identity};
pub use io::archive::{ExpandedUploads, expand_uploads};
pub use runner::{ExecMode, Reconciler};
pub use skip::{Extraction, SkipReason, Skipped};
pub use stats::CategoryCounts;
pub use upload::{UploadedFile, load_uploads};

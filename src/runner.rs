//! Running a whole comparison.
//!
//! A [`Reconciler`] owns a configuration and an [`ExecMode`] and drives one run
//! end to end: validate inputs, expand archives, extract both sides, compare.
//! Nothing is kept between runs.
//!
//! ```no_run
//! use user_reconcile::config::ReconcileConfig;
//! use user_reconcile::runner::Reconciler;
//! use user_reconcile::upload::{UploadedFile, load_uploads};
//!
//! # fn main() -> anyhow::Result<()> {
//! let csv = UploadedFile::from_path("export.csv")?;
//! let uploads = load_uploads(&["observations/*.zip"])?;
//! let result = Reconciler::new(ReconcileConfig::default()).compare_counts(&csv, &uploads)?;
//! println!("{} mismatches out of {}", result.mismatch_count(), result.total_users());
//! # Ok(())
//! # }
//! ```

use crate::compare::counts::{ComparisonResult, compare_records};
use crate::compare::missing::{MissingUserReport, find_missing_users};
use crate::config::ReconcileConfig;
use crate::error::ReconcileError;
use crate::extract::csv::{extract_csv_file, extract_user_column};
use crate::extract::json::{extract_file_identities, extract_json_records};
use crate::io::archive::{ExpandedUploads, expand_uploads};
use crate::io::csv::read_csv_table;
use crate::upload::UploadedFile;
use anyhow::{Context, Result};
use std::time::Instant;

/// How per-file work is scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// One file after another on the calling thread.
    #[default]
    Sequential,
    /// Contiguous partitions of the input processed on rayon workers; results
    /// are concatenated in partition order. `None` picks `2 * num_cpus`.
    Parallel { partitions: Option<usize> },
}

#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
    mode: ExecMode,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self {
            config,
            mode: ExecMode::Sequential,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: ExecMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    pub fn mode(&self) -> ExecMode {
        self.mode
    }

    /// Expand ZIP uploads and keep JSON uploads.
    ///
    /// # Errors
    /// See [`expand_uploads`].
    pub fn expand(&self, uploads: &[UploadedFile]) -> Result<ExpandedUploads> {
        expand_uploads(uploads, self.config.empty_archive_policy)
    }

    /// Reconcile per-user counts between `csv` and the JSON files in `uploads`.
    ///
    /// # Errors
    /// Fails with a [`ReconcileError`] when there are no uploads, the batch has
    /// no JSON files, the config is unusable, or the CSV cannot be read or lacks
    /// an identity column. Bad individual JSON files never fail the run.
    pub fn compare_counts(&self, csv: &UploadedFile, uploads: &[UploadedFile]) -> Result<ComparisonResult> {
        let started = Instant::now();
        require_inputs(csv, uploads)?;
        let config = self.config.normalized()?;

        let expanded = self.expand(uploads)?;
        let csv_records = extract_csv_file(csv, &config)?;
        let json_records = extract_json_records(&expanded.files, &config, self.mode);

        let mut result = compare_records(csv_records, json_records, self.mode, started.elapsed());
        result.skipped.extend(expanded.skipped_archives);
        result.processing_time = started.elapsed();
        log::info!(
            "compared {} user(s): {} match, {} mismatch in {:.2}s",
            result.total_users(),
            result.match_count(),
            result.mismatch_count(),
            result.processing_time.as_secs_f64()
        );
        Ok(result)
    }

    /// Find JSON files whose identity is absent from the user-selected CSV column.
    ///
    /// # Errors
    /// As [`Reconciler::compare_counts`], plus [`ReconcileError::Input`] when no
    /// CSV column was chosen.
    pub fn compare_users(&self, csv: &UploadedFile, uploads: &[UploadedFile]) -> Result<MissingUserReport> {
        require_inputs(csv, uploads)?;
        let config = self.config.normalized()?;
        let column = config.required_user_column()?;

        let expanded = self.expand(uploads)?;
        let table = read_csv_table(&csv.content).with_context(|| format!("read {}", csv.name))?;
        let csv_ids = extract_user_column(&table, column, &config.identity_key)?;
        let file_ids = extract_file_identities(&expanded.files, &config.identity_key, self.mode);

        let mut report = find_missing_users(&csv_ids.records, &file_ids.records);
        report.skipped = csv_ids.skipped;
        report.skipped.extend(file_ids.skipped);
        report.skipped.extend(expanded.skipped_archives);
        log::info!(
            "checked {} file(s): {} matching, {} missing",
            report.total_files,
            report.matching_count,
            report.missing_count()
        );
        Ok(report)
    }
}

fn require_inputs(csv: &UploadedFile, uploads: &[UploadedFile]) -> Result<(), ReconcileError> {
    if csv.is_empty() || uploads.is_empty() {
        return Err(ReconcileError::input("Please upload both CSV file and JSON files"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_uploads_is_input_error() {
        let csv = UploadedFile::new("a.csv", b"email\na@x.com\n".to_vec());
        let err = Reconciler::default().compare_counts(&csv, &[]).unwrap_err();
        assert!(matches!(ReconcileError::of(&err), Some(ReconcileError::Input(_))));

        let empty_csv = UploadedFile::new("a.csv", Vec::new());
        let json = UploadedFile::new("b.json", b"{}".to_vec());
        assert!(Reconciler::default().compare_counts(&empty_csv, &[json]).is_err());
    }

    #[test]
    fn runs_sequentially_unless_asked() {
        assert_eq!(Reconciler::default().mode(), ExecMode::Sequential);
        assert_eq!(Reconciler::new(ReconcileConfig::default()).mode(), ExecMode::Sequential);
        let par = Reconciler::default().with_mode(ExecMode::Parallel { partitions: Some(2) });
        assert_eq!(par.mode(), ExecMode::Parallel { partitions: Some(2) });
    }

    #[test]
    fn user_workflow_requires_column() {
        let csv = UploadedFile::new("a.csv", b"email\na@x.com\n".to_vec());
        let json = UploadedFile::new("b.json", b"{}".to_vec());
        let err = Reconciler::default().compare_users(&csv, &[json]).unwrap_err();
        assert_eq!(err.to_string(), "CSV column is required");
    }
}

//! Error taxonomy for reconciliation runs.
//!
//! Plumbing code returns [`anyhow::Result`] and attaches context the usual way.
//! Failures that end a run are raised as a [`ReconcileError`] inside the
//! `anyhow::Error`, so callers can recover the category with
//! [`anyhow::Error::downcast_ref`] (see [`ReconcileError::of`]).
//!
//! Per-file and per-row problems are not errors at all: they are recorded as
//! [`Skipped`](crate::skip::Skipped) entries and the run continues.

use thiserror::Error;

/// Which CSV column could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// The identity (email) column.
    Identity,
    /// The column chosen by the user for the user-comparison workflow.
    UserSelected,
}

/// Terminal errors for one reconciliation run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// User-correctable input problem (missing uploads, blank fields, no JSON files).
    #[error("{0}")]
    Input(String),

    /// A required CSV column is absent from the header row.
    #[error("{}", missing_column_message(*kind, candidates))]
    MissingColumn {
        kind: ColumnKind,
        candidates: Vec<String>,
    },

    /// The CSV file could not be tokenised.
    #[error("CSV parsing error: {0}")]
    Parse(String),

    /// Archive expansion produced nothing usable.
    #[error("{0}")]
    Extraction(String),

    /// The configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The spreadsheet/CSV writer failed.
    #[error("Export error: {0}")]
    Export(String),
}

fn missing_column_message(kind: ColumnKind, candidates: &[String]) -> String {
    match kind {
        ColumnKind::Identity => "Could not find email column in CSV".to_string(),
        ColumnKind::UserSelected => format!(
            "Could not find column '{}' in CSV",
            candidates.first().map(String::as_str).unwrap_or_default()
        ),
    }
}

impl ReconcileError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Whether the embedding UI should show this as a dismissible message and let
    /// the user retry with different inputs.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::MissingColumn { .. } | Self::Parse(_) | Self::Extraction(_)
        )
    }

    /// Find the taxonomy error inside an `anyhow` chain, if there is one.
    #[must_use]
    pub fn of(err: &anyhow::Error) -> Option<&Self> {
        err.chain().find_map(|e| e.downcast_ref::<Self>())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReconcileError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

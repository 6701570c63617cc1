//! Identity extraction from the CSV side.
//!
//! Columns are found by a loose header match: both the header and the candidate
//! are lower-cased with underscores and whitespace removed, and candidates are
//! tried in priority order. `Email_LkUp`, `email_lkup` and `email lkup` are all
//! the same column.

use crate::config::ReconcileConfig;
use crate::error::{ColumnKind, ReconcileError};
use crate::identity::{CellValue, Identity};
use crate::io::csv::{CsvTable, read_csv_table};
use crate::skip::{Extraction, Skipped};
use crate::upload::UploadedFile;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Value reported when no created-by is known for an identity.
pub const CREATED_BY_UNKNOWN: &str = "N/A";

/// Identities read from the CSV, in row order, plus the created-by of each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvRecords {
    pub identities: Vec<Identity>,
    /// Last non-empty created-by seen for each identity.
    pub created_by: HashMap<Identity, String>,
    pub skipped: Vec<Skipped>,
}

impl CsvRecords {
    /// Created-by for `identity`, or [`CREATED_BY_UNKNOWN`].
    pub fn created_by_of(&self, identity: &Identity) -> &str {
        self.created_by
            .get(identity)
            .map_or(CREATED_BY_UNKNOWN, String::as_str)
    }
}

fn normalize_header(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Find the first header matching a candidate, trying candidates in order.
///
/// ```
/// use user_reconcile::extract::csv::resolve_column;
///
/// let headers = ["Email_LkUp", "CreatedBy0"];
/// assert_eq!(resolve_column(&headers, &["email_LkUp", "email"]), Some("Email_LkUp"));
/// assert_eq!(resolve_column(&["Name", "Date"], &["email"]), None);
/// ```
pub fn resolve_column<'h, H, C>(headers: &'h [H], candidates: &[C]) -> Option<&'h str>
where
    H: AsRef<str>,
    C: AsRef<str>,
{
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h.as_ref())).collect();
    candidates.iter().find_map(|candidate| {
        let wanted = normalize_header(candidate.as_ref());
        normalized
            .iter()
            .position(|h| *h == wanted)
            .map(|i| headers[i].as_ref())
    })
}

fn line_label(table: &CsvTable, row: usize) -> String {
    format!("line {}", table.line(row).unwrap_or(row as u64 + 2))
}

/// Header row of a CSV upload, for offering column choices to a user.
///
/// # Errors
/// Returns [`ReconcileError::Parse`] when the CSV cannot be tokenised.
pub fn csv_headers(file: &UploadedFile) -> Result<Vec<String>> {
    let table = read_csv_table(&file.content).with_context(|| format!("read {}", file.name))?;
    Ok(table.headers)
}

/// Read the identity column (and optional created-by column) of a CSV upload.
///
/// # Errors
/// - [`ReconcileError::Parse`] when the CSV cannot be tokenised;
/// - [`ReconcileError::MissingColumn`] when no identity column matches.
pub fn extract_csv_file(file: &UploadedFile, config: &ReconcileConfig) -> Result<CsvRecords> {
    let table = read_csv_table(&file.content).with_context(|| format!("read {}", file.name))?;
    let records = extract_csv_records(&table, config)?;
    log::info!(
        "{}: {} row(s), {} identit(ies), {} skipped",
        file.name,
        table.len(),
        records.identities.len(),
        records.skipped.len()
    );
    Ok(records)
}

/// Read identities and created-by values from a parsed table.
///
/// Rows with a blank identity cell are ignored. A cell holding a JSON object
/// contributes the value under `config.identity_key`; if that key is unusable the
/// row is recorded as skipped.
///
/// # Errors
/// Returns [`ReconcileError::MissingColumn`] when no identity column matches.
pub fn extract_csv_records(table: &CsvTable, config: &ReconcileConfig) -> Result<CsvRecords, ReconcileError> {
    let identity_col = resolve_column(&table.headers, &config.identity_columns)
        .and_then(|h| table.column_index(h))
        .ok_or_else(|| ReconcileError::MissingColumn {
            kind: ColumnKind::Identity,
            candidates: config.identity_columns.clone(),
        })?;
    let created_by_col = resolve_column(&table.headers, &config.created_by_columns)
        .and_then(|h| table.column_index(h));

    let mut out = Extraction::new();
    let mut created_by = HashMap::new();
    for (i, row) in table.rows().enumerate() {
        let Some(cell) = row.get(identity_col) else {
            continue;
        };
        if cell.trim().is_empty() {
            continue;
        }
        let source = line_label(table, i);
        match CellValue::parse(cell).identity(&config.identity_key) {
            Ok(identity) => {
                if let Some(col) = created_by_col
                    && let Some(who) = row.get(col)
                    && !who.trim().is_empty()
                {
                    created_by.insert(identity.clone(), who.trim().to_string());
                }
                out.records.push(identity);
            }
            Err(reason) => out.skip(source, reason),
        }
    }

    Ok(CsvRecords {
        identities: out.records,
        created_by,
        skipped: out.skipped,
    })
}

/// Read identities from a user-chosen column, one per non-blank row.
///
/// # Errors
/// Returns [`ReconcileError::MissingColumn`] when `column` matches no header.
pub fn extract_user_column(
    table: &CsvTable,
    column: &str,
    identity_key: &str,
) -> Result<Extraction<Identity>, ReconcileError> {
    let col = resolve_column(&table.headers, &[column])
        .and_then(|h| table.column_index(h))
        .ok_or_else(|| ReconcileError::MissingColumn {
            kind: ColumnKind::UserSelected,
            candidates: vec![column.to_string()],
        })?;

    let mut out = Extraction::new();
    for (i, row) in table.rows().enumerate() {
        match row.get(col) {
            Some(cell) if !cell.trim().is_empty() => {
                out.push(line_label(table, i), CellValue::parse(cell).identity(identity_key));
            }
            _ => {}
        }
    }
    Ok(out)
}

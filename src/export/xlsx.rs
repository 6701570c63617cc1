//! Spreadsheet report.
//!
//! The report is first laid out as plain [`SheetTable`]s, then rendered with
//! `rust_xlsxwriter`. Mismatched detail rows are filled with
//! [`MISMATCH_FILL`] across every cell.

use crate::compare::counts::ComparisonResult;
use crate::error::ReconcileError;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

pub const DETAILS_SHEET: &str = "Comparison_Details";
pub const SUMMARY_SHEET: &str = "Summary";
pub const MISMATCH_FILL: &str = "#FF9999";

pub const DETAILS_HEADERS: [&str; 6] = [
    "User",
    "CreatedBy0",
    "Bo (CSV Count)",
    "Blop (JSON Count)",
    "Mismatched",
    "Status",
];
pub const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[allow(clippy::cast_precision_loss)]
    fn int(n: i64) -> Self {
        Self::Number(n as f64)
    }

    #[allow(clippy::cast_precision_loss)]
    fn uint(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub cells: Vec<Cell>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<SheetRow>,
}

/// One row per comparison row; mismatches are highlighted.
pub fn details_sheet(result: &ComparisonResult) -> SheetTable {
    let rows = result
        .rows
        .iter()
        .map(|r| SheetRow {
            cells: vec![
                Cell::text(r.user.as_str()),
                Cell::text(r.created_by.as_str()),
                Cell::uint(r.csv_count),
                Cell::uint(r.json_count),
                Cell::int(r.mismatched),
                Cell::text(r.status.label()),
            ],
            highlighted: r.is_mismatch(),
        })
        .collect();
    SheetTable {
        name: DETAILS_SHEET,
        headers: DETAILS_HEADERS.to_vec(),
        rows,
    }
}

/// Totals first, then one row per category in configuration order.
pub fn summary_sheet(result: &ComparisonResult) -> SheetTable {
    let summary = &result.summary;
    let mut rows = vec![
        metric("Total CSV Count (Sum of Bo)", summary.total_csv_count),
        metric("Total JSON Count (Sum of Blop)", summary.total_json_count),
    ];
    rows.extend(
        summary
            .categories
            .iter()
            .map(|c| metric(&format!("Files containing '{}'", c.name), c.count)),
    );
    SheetTable {
        name: SUMMARY_SHEET,
        headers: SUMMARY_HEADERS.to_vec(),
        rows,
    }
}

fn metric(label: &str, value: u64) -> SheetRow {
    SheetRow {
        cells: vec![Cell::text(label), Cell::uint(value)],
        highlighted: false,
    }
}

/// `comparison_result_<YYYY-MM-DD>.xlsx`
pub fn export_filename(date: NaiveDate) -> String {
    format!("comparison_result_{}.xlsx", date.format("%Y-%m-%d"))
}

fn build_workbook(result: &ComparisonResult) -> Result<Workbook, ReconcileError> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();
    let plain = Format::new();
    let flagged = Format::new().set_background_color(MISMATCH_FILL);

    for table in [details_sheet(result), summary_sheet(result)] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(table.name)?;
        write_table(sheet, &table, &header_fmt, &plain, &flagged)?;
    }
    Ok(workbook)
}

fn write_table(
    sheet: &mut Worksheet,
    table: &SheetTable,
    header_fmt: &Format,
    plain: &Format,
    flagged: &Format,
) -> Result<(), ReconcileError> {
    for (col, header) in (0u16..).zip(&table.headers) {
        sheet.write_string_with_format(0, col, *header, header_fmt)?;
    }
    for (row, data) in (1u32..).zip(&table.rows) {
        let fmt = if data.highlighted { flagged } else { plain };
        for (col, cell) in (0u16..).zip(&data.cells) {
            match cell {
                Cell::Text(s) => sheet.write_string_with_format(row, col, s, fmt)?,
                Cell::Number(n) => sheet.write_number_with_format(row, col, *n, fmt)?,
            };
        }
    }
    Ok(())
}

/// Render the report into xlsx bytes.
///
/// # Errors
/// Returns [`ReconcileError::Export`] if the workbook cannot be produced.
pub fn workbook_bytes(result: &ComparisonResult) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(result)?;
    let bytes = workbook.save_to_buffer().map_err(ReconcileError::from)?;
    Ok(bytes)
}

/// Save the report into `dir` under [`export_filename`] for today's UTC date.
///
/// # Errors
/// Returns an error if the directory or workbook cannot be written.
pub fn write_workbook(result: &ComparisonResult, dir: impl AsRef<Path>) -> Result<PathBuf> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).with_context(|| format!("mkdir -p {}", dir.display()))?;
    let path = dir.join(export_filename(Utc::now().date_naive()));
    let mut workbook = build_workbook(result)?;
    workbook
        .save(&path)
        .map_err(ReconcileError::from)
        .with_context(|| format!("save {}", path.display()))?;
    log::info!("report written to {}", path.display());
    Ok(path)
}

//! CSV tokenisation and writing.
//!
//! This module provides:
//! - **Header-indexed reading**: [`read_csv_table`] turns raw bytes into a
//!   [`CsvTable`] using the first row as the header.
//! - **Typed writing** with Serde: [`write_csv_vec`] and [`write_csv_to_vec`].
//!
//! # Design notes
//! - Rows may be shorter or longer than the header; missing cells read as absent.
//! - Blank lines are ignored.
//! - The whole file is parsed eagerly; there is no streaming path.

use crate::error::ReconcileError;
use anyhow::{Context, Result};
use csv::{Position, ReaderBuilder, StringRecord, WriterBuilder};
use serde::Serialize;
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;

/// A parsed CSV file: the header row and every data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    rows: Vec<StringRecord>,
    /// 1-based line each row starts on.
    lines: Vec<u64>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `header` in the header row (exact match, first occurrence).
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// Cell at `row`/`column`, `None` for short rows.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)
    }

    /// Line of the input that row `row` starts on. Blank lines and multi-line
    /// quoted cells are accounted for.
    pub fn line(&self, row: usize) -> Option<u64> {
        self.lines.get(row).copied()
    }

    /// Iterate rows as cell slices.
    pub fn rows(&self) -> impl Iterator<Item = &StringRecord> {
        self.rows.iter()
    }
}

/// Parse CSV bytes into a [`CsvTable`].
///
/// # Errors
/// Returns [`ReconcileError::Parse`] carrying the tokenizer's message when the
/// input is malformed (for example not UTF-8).
pub fn read_csv_table(bytes: &[u8]) -> Result<CsvTable, ReconcileError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .map_err(|e| ReconcileError::Parse(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    let mut lines = Vec::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| ReconcileError::Parse(e.to_string()))?;
        lines.push(rec.position().map_or(rows.len() as u64 + 2, |p| start_line(bytes, p)));
        rows.push(rec);
    }
    Ok(CsvTable { headers, rows, lines })
}

// A record's position is taken before the reader skips the terminator left by
// the previous record and any blank lines, so count those newlines too.
fn start_line(bytes: &[u8], pos: &Position) -> u64 {
    let rest = usize::try_from(pos.byte())
        .ok()
        .and_then(|b| bytes.get(b..))
        .unwrap_or_default();
    let skipped = rest
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();
    pos.line() + skipped as u64
}

/// Serialize rows into an in-memory CSV document.
///
/// # Errors
/// Returns an error if any row fails to serialize.
pub fn write_csv_to_vec<T: Serialize>(has_headers: bool, data: &[T]) -> Result<Vec<u8>> {
    let mut wtr = WriterBuilder::new()
        .has_headers(has_headers)
        .from_writer(Vec::new());
    for (i, row) in data.iter().enumerate() {
        wtr.serialize(row)
            .with_context(|| format!("serialize CSV row #{}", i + 1))?;
    }
    wtr.flush()?;
    wtr.into_inner().context("finish CSV buffer")
}

/// Write a typed slice to a CSV file, creating parent directories.
///
/// # Returns
/// The number of rows written.
///
/// # Errors
/// Returns an error if the file/dirs cannot be created or a row fails to
/// serialize.
pub fn write_csv_vec<T: Serialize>(
    path: impl AsRef<Path>,
    has_headers: bool,
    data: &[T],
) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let bytes = write_csv_to_vec(has_headers, data)?;
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    f.write_all(&bytes)
        .with_context(|| format!("write {}", path.display()))?;
    f.flush()?;
    Ok(data.len())
}

//! Missing-user summary as CSV.

use crate::compare::missing::MissingUserGroup;
use crate::io::csv::{write_csv_to_vec, write_csv_vec};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const MISSING_USERS_FILENAME: &str = "missing_users_summary.csv";
const FILE_SEPARATOR: &str = "; ";

#[derive(Serialize)]
struct MissingUserLine<'a> {
    #[serde(rename = "User Email")]
    user: &'a str,
    #[serde(rename = "File Count")]
    count: usize,
    #[serde(rename = "Files")]
    files: String,
}

fn lines(groups: &[MissingUserGroup]) -> Vec<MissingUserLine<'_>> {
    groups
        .iter()
        .map(|g| MissingUserLine {
            user: g.user.as_str(),
            count: g.count,
            files: g.files.join(FILE_SEPARATOR),
        })
        .collect()
}

/// The summary CSV as bytes.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn missing_users_csv_bytes(groups: &[MissingUserGroup]) -> Result<Vec<u8>> {
    if groups.is_empty() {
        return Ok(b"User Email,File Count,Files\n".to_vec());
    }
    write_csv_to_vec(true, &lines(groups))
}

/// Write [`MISSING_USERS_FILENAME`] into `dir`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_missing_users_csv(dir: impl AsRef<Path>, groups: &[MissingUserGroup]) -> Result<PathBuf> {
    let path = dir.as_ref().join(MISSING_USERS_FILENAME);
    if groups.is_empty() {
        std::fs::create_dir_all(dir.as_ref())?;
        std::fs::write(&path, missing_users_csv_bytes(groups)?)?;
    } else {
        write_csv_vec(&path, true, &lines(groups))?;
    }
    Ok(path)
}

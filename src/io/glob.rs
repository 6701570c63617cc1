//! Glob expansion for loading uploads from disk.
//!
//! Results are files only, sorted lexicographically so that repeated runs
//! see the same input order.

use anyhow::{Context, Result};
use glob::glob;
use std::path::PathBuf;

/// Expand a glob pattern into a sorted list of matching files.
///
/// ```no_run
/// use user_reconcile::io::glob::expand_glob;
///
/// let archives = expand_glob("exports/*.zip")?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
/// Returns an error if the pattern is invalid or a matched entry cannot be read.
/// Zero matches is not an error.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut result = Vec::new();
    for entry in paths {
        let path =
            entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
        if path.is_file() {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}

//! Archive expansion.
//!
//! Turns a batch of uploads into the flat list of JSON files a run works on:
//!
//! - `*.zip` uploads are opened and every non-directory entry whose path ends in
//!   `.json` becomes an [`UploadedFile`] named by its entry path;
//! - `*.json` uploads pass through unchanged;
//! - anything else is dropped.
//!
//! Extension checks are case-sensitive. Archives are expanded one at a time in
//! input order, and entries in archive order, so the output order is stable.
//!
//! An archive with no JSON entries is handled according to
//! [`EmptyArchivePolicy`]. Whatever the policy, an expansion that ends with no
//! JSON files at all fails with [`ReconcileError::Extraction`].

use crate::config::EmptyArchivePolicy;
use crate::error::ReconcileError;
use crate::skip::{SkipReason, Skipped};
use crate::upload::UploadedFile;
use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// JSON files found in a batch, plus archives that contributed nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandedUploads {
    pub files: Vec<UploadedFile>,
    pub skipped_archives: Vec<Skipped>,
}

impl ExpandedUploads {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }
}

/// Expand a batch of uploads into JSON files.
///
/// # Errors
/// - [`ReconcileError::Extraction`] if the batch yields no JSON files, or if an
///   archive is empty under [`EmptyArchivePolicy::Fail`];
/// - an error naming the archive if a `.zip` upload cannot be read as ZIP.
pub fn expand_uploads(uploads: &[UploadedFile], policy: EmptyArchivePolicy) -> Result<ExpandedUploads> {
    let mut out = ExpandedUploads::default();
    for upload in uploads {
        if upload.is_zip() {
            let entries = extract_json_entries(upload)?;
            log::debug!("{}: {} JSON entr(ies)", upload.name, entries.len());
            if entries.is_empty() {
                match policy {
                    EmptyArchivePolicy::Fail => {
                        return Err(ReconcileError::extraction(format!(
                            "No JSON files found in the ZIP archive {}",
                            upload.name
                        ))
                        .into());
                    }
                    EmptyArchivePolicy::Skip => {
                        log::warn!("{}: no JSON files found in the ZIP archive", upload.name);
                        out.skipped_archives.push(Skipped {
                            source: upload.name.clone(),
                            reason: SkipReason::EmptyArchive,
                        });
                    }
                }
            }
            out.files.extend(entries);
        } else if upload.is_json() {
            out.files.push(upload.clone());
        } else {
            log::debug!("ignoring {}: neither .json nor .zip", upload.name);
        }
    }

    if out.files.is_empty() {
        return Err(
            ReconcileError::extraction("No JSON files found in the selected files/archives").into(),
        );
    }
    log::info!(
        "expanded {} upload(s) into {} JSON file(s)",
        uploads.len(),
        out.files.len()
    );
    Ok(out)
}

/// Read every JSON entry of one ZIP upload, in archive order.
///
/// # Errors
/// Returns an error if the archive or one of its JSON entries cannot be read.
pub fn extract_json_entries(upload: &UploadedFile) -> Result<Vec<UploadedFile>> {
    let mut archive = ZipArchive::new(Cursor::new(upload.content.as_slice()))
        .with_context(|| format!("read ZIP archive {}", upload.name))?;

    let mut out = Vec::new();
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("read entry #{i} of {}", upload.name))?;
        if entry.is_dir() || !entry.name().ends_with(".json") {
            continue;
        }
        let name = entry.name().to_string();
        let mut content = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut content)
            .with_context(|| format!("decompress {name} from {}", upload.name))?;
        out.push(UploadedFile::json(name, content));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ZipBuilder;

    #[test]
    fn passes_json_and_drops_others() -> Result<()> {
        let uploads = vec![
            UploadedFile::new("a.json", b"{}".to_vec()),
            UploadedFile::new("notes.txt", b"hi".to_vec()),
            UploadedFile::new("b.JSON", b"{}".to_vec()),
        ];
        let out = expand_uploads(&uploads, EmptyArchivePolicy::Skip)?;
        assert_eq!(out.names().collect::<Vec<_>>(), ["a.json"]);
        Ok(())
    }

    #[test]
    fn expands_archive_entries_in_order() -> Result<()> {
        let zip = ZipBuilder::new()
            .directory("nested/")
            .file("nested/one.json", "{}")
            .file("readme.md", "x")
            .file("two.json", "{}")
            .build_upload("batch.zip")?;
        let out = expand_uploads(&[zip], EmptyArchivePolicy::Skip)?;
        assert_eq!(out.names().collect::<Vec<_>>(), ["nested/one.json", "two.json"]);
        assert!(out.files.iter().all(|f| f.content_type == crate::upload::JSON_CONTENT_TYPE));
        Ok(())
    }

    #[test]
    fn empty_batch_fails() {
        let err = expand_uploads(&[UploadedFile::new("a.csv", Vec::new())], EmptyArchivePolicy::Skip)
            .unwrap_err();
        assert!(matches!(ReconcileError::of(&err), Some(ReconcileError::Extraction(_))));
    }

    #[test]
    fn corrupt_archive_is_an_error() {
        let bad = UploadedFile::new("bad.zip", b"not a zip".to_vec());
        let err = expand_uploads(&[bad], EmptyArchivePolicy::Skip).unwrap_err();
        assert!(format!("{err:#}").contains("bad.zip"));
    }
}

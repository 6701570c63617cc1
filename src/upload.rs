//! In-memory uploaded files.
//!
//! An [`UploadedFile`] is what a file picker hands over: a name and the full
//! content. Everything is loaded before processing starts; nothing streams.

use crate::error::ReconcileError;
use crate::io::glob::expand_glob;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const ZIP_CONTENT_TYPE: &str = "application/zip";
pub const CSV_CONTENT_TYPE: &str = "text/csv";
const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// File name, or the entry path for files taken out of an archive.
    pub name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Build an upload, inferring the content type from the name's extension.
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            content: content.into(),
        }
    }

    /// Build a JSON upload regardless of the name's extension.
    pub fn json(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            content: content.into(),
        }
    }

    /// Read a file from disk; the upload is named after the file name.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read(path).with_context(|| format!("open {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, content))
    }

    pub fn is_zip(&self) -> bool {
        self.name.ends_with(".zip")
    }

    pub fn is_json(&self) -> bool {
        self.name.ends_with(".json")
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

fn content_type_for(name: &str) -> &'static str {
    if name.ends_with(".json") {
        JSON_CONTENT_TYPE
    } else if name.ends_with(".zip") {
        ZIP_CONTENT_TYPE
    } else if name.ends_with(".csv") {
        CSV_CONTENT_TYPE
    } else {
        OCTET_STREAM
    }
}

/// Load every file matched by `patterns`, in pattern order and sorted within
/// each pattern.
///
/// # Errors
/// Returns [`ReconcileError::Input`] when a pattern matches nothing, or an I/O
/// error when a matched file cannot be read.
pub fn load_uploads<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<UploadedFile>> {
    let mut out = Vec::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let paths = expand_glob(pattern)?;
        if paths.is_empty() {
            return Err(ReconcileError::input(format!("no files found matching pattern: {pattern}")).into());
        }
        for path in paths {
            out.push(UploadedFile::from_path(&path)?);
        }
    }
    log::debug!("loaded {} upload(s) from {} pattern(s)", out.len(), patterns.len());
    Ok(out)
}

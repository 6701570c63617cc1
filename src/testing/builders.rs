//! Builders for uploads and archives.

use crate::upload::UploadedFile;
use anyhow::Result;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Entry {
    File(String, Vec<u8>),
    Dir(String),
}

/// Builds an in-memory ZIP archive.
///
/// # Example
///
/// ```
/// use user_reconcile::testing::ZipBuilder;
///
/// let upload = ZipBuilder::new()
///     .file("a.json", "{}")
///     .build_upload("batch.zip")?;
/// assert!(upload.is_zip());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Default)]
pub struct ZipBuilder {
    entries: Vec<Entry>,
}

impl ZipBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn file(mut self, path: &str, content: impl AsRef<[u8]>) -> Self {
        self.entries.push(Entry::File(path.to_string(), content.as_ref().to_vec()));
        self
    }

    #[must_use]
    pub fn directory(mut self, path: &str) -> Self {
        self.entries.push(Entry::Dir(path.to_string()));
        self
    }

    /// Archive bytes.
    ///
    /// # Errors
    /// Returns an error if the archive cannot be written.
    pub fn build(self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for entry in self.entries {
            match entry {
                Entry::File(path, content) => {
                    zip.start_file(path, options)?;
                    zip.write_all(&content)?;
                }
                Entry::Dir(path) => zip.add_directory(path, options)?,
            }
        }
        Ok(zip.finish()?.into_inner())
    }

    /// The archive wrapped as an upload called `name`.
    ///
    /// # Errors
    /// See [`ZipBuilder::build`].
    pub fn build_upload(self, name: &str) -> Result<UploadedFile> {
        Ok(UploadedFile::new(name, self.build()?))
    }
}

/// Assembles one CSV upload and a batch of JSON/ZIP uploads.
#[derive(Default)]
pub struct UploadSetBuilder {
    csv: Option<UploadedFile>,
    uploads: Vec<UploadedFile>,
    pending_zip: Vec<(String, ZipBuilder)>,
}

impl UploadSetBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn csv(mut self, text: impl Into<String>) -> Self {
        self.csv = Some(UploadedFile::new("upload.csv", text.into().into_bytes()));
        self
    }

    #[must_use]
    pub fn json(mut self, name: &str, body: &str) -> Self {
        self.uploads.push(UploadedFile::new(name, body.as_bytes().to_vec()));
        self
    }

    #[must_use]
    pub fn upload(mut self, upload: UploadedFile) -> Self {
        self.uploads.push(upload);
        self
    }

    #[must_use]
    pub fn zip(mut self, name: &str, archive: ZipBuilder) -> Self {
        self.pending_zip.push((name.to_string(), archive));
        self
    }

    /// The CSV upload (empty when none was set) and the other uploads, direct
    /// uploads first, then archives in the order they were added.
    ///
    /// # Errors
    /// Returns an error if an archive cannot be built.
    pub fn build(self) -> Result<(UploadedFile, Vec<UploadedFile>)> {
        let mut uploads = self.uploads;
        for (name, archive) in self.pending_zip {
            uploads.push(archive.build_upload(&name)?);
        }
        let csv = self.csv.unwrap_or_else(|| UploadedFile::new("upload.csv", Vec::new()));
        Ok((csv, uploads))
    }
}

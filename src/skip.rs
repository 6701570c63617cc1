//! Best-effort outcomes.
//!
//! Loops over files or rows never stop on a single bad item. Each item either
//! contributes a record or becomes a [`Skipped`] entry with a reason, and both
//! lists are returned to the caller in an [`Extraction`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an item did not contribute a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The content is not valid JSON.
    InvalidJson(String),
    /// The JSON document is not an object.
    NotAnObject,
    /// The identity key is absent or null.
    MissingKey(String),
    /// The identity key holds something other than a string.
    NotAString(String),
    /// The identity is blank after trimming.
    EmptyIdentity,
    /// A ZIP archive with no JSON entries.
    EmptyArchive,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJson(msg) => write!(f, "invalid JSON: {msg}"),
            Self::NotAnObject => write!(f, "JSON document is not an object"),
            Self::MissingKey(key) => write!(f, "missing key '{key}'"),
            Self::NotAString(key) => write!(f, "key '{key}' is not a string"),
            Self::EmptyIdentity => write!(f, "identity is blank"),
            Self::EmptyArchive => write!(f, "no JSON files found in the ZIP archive"),
        }
    }
}

/// One skipped item with the place it came from (a file name or `row N`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    pub source: String,
    pub reason: SkipReason,
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.reason)
    }
}

/// Records that were extracted, plus everything that was skipped on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub skipped: Vec<Skipped>,
}

impl<T> Default for Extraction<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Extraction<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one per-item outcome. Skips are logged as they are recorded.
    pub fn push(&mut self, source: impl Into<String>, outcome: Result<T, SkipReason>) {
        match outcome {
            Ok(record) => self.records.push(record),
            Err(reason) => self.skip(source, reason),
        }
    }

    pub fn skip(&mut self, source: impl Into<String>, reason: SkipReason) {
        let skipped = Skipped {
            source: source.into(),
            reason,
        };
        log::warn!("skipping {skipped}");
        self.skipped.push(skipped);
    }

}

impl<T> FromIterator<(String, Result<T, SkipReason>)> for Extraction<T> {
    fn from_iter<I: IntoIterator<Item = (String, Result<T, SkipReason>)>>(iter: I) -> Self {
        let mut out = Self::new();
        for (source, outcome) in iter {
            out.push(source, outcome);
        }
        out
    }
}

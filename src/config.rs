//! Run configuration.
//!
//! Every field has a default matching the behavioural-observation export this
//! crate was built for, so `ReconcileConfig::default()` is usable as-is. A
//! config can also be loaded from JSON; missing fields fall back to defaults.
//!
//! ```
//! use user_reconcile::config::ReconcileConfig;
//!
//! let cfg = ReconcileConfig::from_json_str(r#"{ "identity_key": "owner" }"#)?;
//! assert_eq!(cfg.identity_key, "owner");
//! assert_eq!(cfg.category_markers.len(), 5);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::error::ReconcileError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named, case-insensitive filename substring used for tallying files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMarker {
    /// Display name, e.g. `Nearmiss`.
    pub name: String,
    /// Substring searched for in the lower-cased filename.
    pub marker: String,
}

impl CategoryMarker {
    pub fn new(name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: marker.into(),
        }
    }
}

/// What to do with a ZIP archive that contains no JSON entries.
///
/// The default, [`EmptyArchivePolicy::Skip`], deliberately keeps the rest of a
/// batch usable instead of rejecting it over one empty archive. Choose
/// [`EmptyArchivePolicy::Fail`] to restore the stricter per-archive failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyArchivePolicy {
    /// Drop the archive with a warning; only an empty batch fails.
    #[default]
    Skip,
    /// Fail the whole expansion as soon as one archive is empty.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Key holding the identity inside JSON documents and embedded JSON cells.
    pub identity_key: String,
    /// Candidate identity column headers, in priority order.
    pub identity_columns: Vec<String>,
    /// Candidate created-by column headers, in priority order.
    pub created_by_columns: Vec<String>,
    /// Filename substring marking files whose identity is counted.
    pub inclusion_marker: String,
    /// Category tallies reported in the summary, in report order.
    pub category_markers: Vec<CategoryMarker>,
    pub empty_archive_policy: EmptyArchivePolicy,
    /// Column chosen by the user for the user-comparison workflow.
    pub user_csv_column: Option<String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            identity_key: "currentUser".to_string(),
            identity_columns: to_strings(&["email_LkUp", "email", "Email", "emailLkUp"]),
            created_by_columns: to_strings(&["CreatedBy0", "createdby0", "CreatedBy"]),
            inclusion_marker: "behaviouralobservation".to_string(),
            category_markers: vec![
                CategoryMarker::new("Nearmiss", "nearmiss"),
                CategoryMarker::new("Hazard", "hazard"),
                CategoryMarker::new("HarmInjury", "harminjury"),
                CategoryMarker::new("Product", "product"),
                CategoryMarker::new("SalesDelivery", "salesdelivery"),
            ],
            empty_archive_policy: EmptyArchivePolicy::Skip,
            user_csv_column: None,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl ReconcileConfig {
    /// Parse a config from JSON text. Absent fields take their defaults.
    ///
    /// # Errors
    /// Returns an error if the text is not valid JSON for this shape.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parse reconcile config")
    }

    /// Read and parse a JSON config file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| format!("open {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    #[must_use]
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    #[must_use]
    pub fn with_user_csv_column(mut self, column: impl Into<String>) -> Self {
        self.user_csv_column = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_empty_archive_policy(mut self, policy: EmptyArchivePolicy) -> Self {
        self.empty_archive_policy = policy;
        self
    }

    /// Check the config without keeping the normalized copy.
    ///
    /// # Errors
    /// See [`ReconcileConfig::normalized`].
    pub fn validate(&self) -> Result<(), ReconcileError> {
        self.normalized().map(|_| ())
    }

    /// Check the config and return a copy with marker substrings lower-cased
    /// and surrounding whitespace removed from keys.
    ///
    /// # Errors
    /// Returns [`ReconcileError::Config`] when a required field is blank.
    pub fn normalized(&self) -> Result<Self, ReconcileError> {
        let identity_key = self.identity_key.trim();
        if identity_key.is_empty() {
            return Err(ReconcileError::Config("identity_key must not be blank".into()));
        }
        if self.inclusion_marker.trim().is_empty() {
            return Err(ReconcileError::Config("inclusion_marker must not be blank".into()));
        }
        if self.identity_columns.iter().all(|c| c.trim().is_empty()) {
            return Err(ReconcileError::Config("identity_columns must name at least one column".into()));
        }
        let mut category_markers = Vec::with_capacity(self.category_markers.len());
        for m in &self.category_markers {
            let marker = m.marker.trim().to_lowercase();
            if marker.is_empty() {
                return Err(ReconcileError::Config(format!(
                    "category '{}' has a blank marker",
                    m.name
                )));
            }
            category_markers.push(CategoryMarker::new(m.name.clone(), marker));
        }
        Ok(Self {
            identity_key: identity_key.to_string(),
            inclusion_marker: self.inclusion_marker.trim().to_lowercase(),
            category_markers,
            ..self.clone()
        })
    }

    /// The user-selected CSV column, required by the user-comparison workflow.
    ///
    /// # Errors
    /// Returns [`ReconcileError::Input`] if the column is unset or blank.
    pub fn required_user_column(&self) -> Result<&str, ReconcileError> {
        match self.user_csv_column.as_deref().map(str::trim) {
            Some(col) if !col.is_empty() => Ok(col),
            _ => Err(ReconcileError::input("CSV column is required")),
        }
    }
}

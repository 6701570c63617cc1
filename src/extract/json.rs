//! Identity extraction from the JSON side.
//!
//! Each file is classified by name for the category tallies. Files whose name
//! contains the inclusion marker are parsed and contribute the identity stored
//! under the configured key. A file that cannot be parsed or lacks the key is
//! skipped; JSON extraction itself never fails.

use crate::combiners::chunk_len;
use crate::config::ReconcileConfig;
use crate::identity::{Identity, identity_from_value};
use crate::runner::ExecMode;
use crate::skip::{Extraction, SkipReason, Skipped};
use crate::stats::CategoryCounts;
use crate::upload::UploadedFile;
use rayon::prelude::*;
use serde_json::Value;

/// Identities found in the included JSON files, with the category tallies of
/// every file seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonRecords {
    pub identities: Vec<Identity>,
    pub categories: CategoryCounts,
    pub skipped: Vec<Skipped>,
    pub files_seen: usize,
}

impl JsonRecords {
    fn empty(config: &ReconcileConfig) -> Self {
        Self {
            categories: CategoryCounts::new(&config.category_markers),
            ..Self::default()
        }
    }

    fn append(&mut self, other: Self) {
        self.identities.extend(other.identities);
        self.categories.merge(&other.categories);
        self.skipped.extend(other.skipped);
        self.files_seen += other.files_seen;
    }
}

/// An identity together with the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIdentity {
    pub identity: Identity,
    pub file: String,
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse one JSON file and read the identity under `key`. A leading UTF-8
/// byte-order mark is ignored.
///
/// # Errors
/// Returns the reason the file cannot supply an identity.
pub fn identity_from_file(file: &UploadedFile, key: &str) -> Result<Identity, SkipReason> {
    let body = file.content.strip_prefix(UTF8_BOM).unwrap_or(&file.content);
    let value: Value = serde_json::from_slice(body).map_err(|e| SkipReason::InvalidJson(e.to_string()))?;
    identity_from_value(&value, key)
}

/// Classify and extract every file. `config` markers must be lower-case (see
/// [`ReconcileConfig::normalized`]).
///
/// Output order follows input order in both execution modes.
pub fn extract_json_records(files: &[UploadedFile], config: &ReconcileConfig, mode: ExecMode) -> JsonRecords {
    let run_chunk = |chunk: &[UploadedFile]| {
        let mut out = JsonRecords::empty(config);
        let mut ex = Extraction::new();
        for file in chunk {
            out.files_seen += 1;
            out.categories.observe(&file.name);
            if file.name.to_lowercase().contains(config.inclusion_marker.as_str()) {
                ex.push(file.name.clone(), identity_from_file(file, &config.identity_key));
            }
        }
        out.identities = ex.records;
        out.skipped = ex.skipped;
        out
    };

    let out = match mode {
        ExecMode::Sequential => run_chunk(files),
        ExecMode::Parallel { partitions } => {
            let parts: Vec<JsonRecords> = files
                .par_chunks(chunk_len(files.len(), partitions))
                .map(run_chunk)
                .collect();
            parts.into_iter().fold(JsonRecords::empty(config), |mut acc, part| {
                acc.append(part);
                acc
            })
        }
    };

    log::info!(
        "scanned {} JSON file(s): {} identit(ies), {} skipped",
        out.files_seen,
        out.identities.len(),
        out.skipped.len()
    );
    out
}

/// Read one identity per file from every file, with no category filter.
pub fn extract_file_identities(files: &[UploadedFile], key: &str, mode: ExecMode) -> Extraction<FileIdentity> {
    let one = |file: &UploadedFile| {
        let outcome = identity_from_file(file, key).map(|identity| FileIdentity {
            identity,
            file: file.name.clone(),
        });
        (file.name.clone(), outcome)
    };
    match mode {
        ExecMode::Sequential => files.iter().map(one).collect(),
        ExecMode::Parallel { .. } => files
            .par_iter()
            .map(one)
            .collect::<Vec<_>>()
            .into_iter()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ReconcileConfig {
        ReconcileConfig::default().normalized().unwrap()
    }

    fn file(name: &str, body: &str) -> UploadedFile {
        UploadedFile::json(name, body.as_bytes().to_vec())
    }

    #[test]
    fn only_included_files_are_parsed() {
        let files = vec![
            file("BehaviouralObservation_1.json", r#"{"currentUser":" a@x.com "}"#),
            file("Hazard_1.json", r#"{"currentUser":"ignored@x.com"}"#),
            file("behaviouralobservation_2.json", "{broken"),
            file("behaviouralobservation_3.json", r#"{"other":"x"}"#),
        ];
        let out = extract_json_records(&files, &cfg(), ExecMode::Sequential);
        assert_eq!(out.identities, vec![Identity::new("a@x.com").unwrap()]);
        assert_eq!(out.files_seen, 4);
        assert_eq!(out.categories.get("Hazard"), 1);
        let reasons: Vec<_> = out.skipped.iter().map(|s| &s.reason).collect();
        assert!(matches!(reasons[0], SkipReason::InvalidJson(_)));
        assert_eq!(reasons[1], &SkipReason::MissingKey("currentUser".into()));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let mut body = UTF8_BOM.to_vec();
        body.extend_from_slice(br#"{"currentUser":"a@x.com","answers":[]}"#);
        let files = vec![UploadedFile::json("BehaviouralObservation_1.json", body)];
        let out = extract_json_records(&files, &cfg(), ExecMode::Sequential);
        assert_eq!(out.identities, vec![Identity::new("a@x.com").unwrap()]);
        assert!(out.skipped.is_empty());

        let ex = extract_file_identities(&files, "currentUser", ExecMode::Sequential);
        assert_eq!(ex.records.len(), 1);
    }

    #[test]
    fn parallel_keeps_input_order() {
        let files: Vec<_> = (0..50)
            .map(|i| file(&format!("behaviouralobservation_{i}.json"), &format!(r#"{{"currentUser":"u{i}"}}"#)))
            .collect();
        let seq = extract_json_records(&files, &cfg(), ExecMode::Sequential);
        let par = extract_json_records(&files, &cfg(), ExecMode::Parallel { partitions: Some(7) });
        assert_eq!(seq, par);
        assert_eq!(par.identities[49].as_str(), "u49");
    }

    #[test]
    fn file_identities_ignore_categories() {
        let files = vec![
            file("any.json", r#"{"currentUser":"a@x.com"}"#),
            file("array.json", "[1,2]"),
        ];
        let ex = extract_file_identities(&files, "currentUser", ExecMode::Sequential);
        assert_eq!(ex.records[0].file, "any.json");
        assert_eq!(ex.skipped[0].reason, SkipReason::NotAnObject);
    }
}

//! Missing-user comparison.
//!
//! The CSV side is treated as a set: only membership matters, not how often an
//! identity occurs. Each JSON file contributes one identity; files whose
//! identity is not in the set are reported as missing, grouped by identity.

use crate::combiners::{DistinctSet, combine_globally};
use crate::extract::json::FileIdentity;
use crate::identity::Identity;
use crate::skip::Skipped;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A JSON file whose identity does not appear in the CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingUserRecord {
    pub current_user: Identity,
    pub file_name: String,
}

/// All files sharing one missing identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingUserGroup {
    pub user: Identity,
    pub files: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingUserReport {
    /// Files that produced an identity.
    pub total_files: usize,
    /// Files whose identity is in the CSV.
    pub matching_count: usize,
    pub missing: Vec<MissingUserRecord>,
    /// CSV rows and JSON files that could not supply an identity.
    pub skipped: Vec<Skipped>,
}

impl MissingUserReport {
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// Group the missing records by identity, sorted by identity; files keep
    /// the order they were encountered in.
    pub fn group_missing_users(&self) -> Vec<MissingUserGroup> {
        group_missing_users(&self.missing)
    }
}

/// Check each file's identity against the CSV identity set.
pub fn find_missing_users(csv_identities: &[Identity], files: &[FileIdentity]) -> MissingUserReport {
    let known: HashSet<Identity> = combine_globally(csv_identities, |id| id.clone(), &DistinctSet::new());

    let (matched, missing): (Vec<&FileIdentity>, Vec<&FileIdentity>) =
        files.iter().partition(|f| known.contains(&f.identity));

    MissingUserReport {
        total_files: files.len(),
        matching_count: matched.len(),
        missing: missing
            .into_iter()
            .map(|f| MissingUserRecord {
                current_user: f.identity.clone(),
                file_name: f.file.clone(),
            })
            .collect(),
        skipped: Vec::new(),
    }
}

pub fn group_missing_users(missing: &[MissingUserRecord]) -> Vec<MissingUserGroup> {
    let mut groups: BTreeMap<&Identity, Vec<String>> = BTreeMap::new();
    for record in missing {
        groups
            .entry(&record.current_user)
            .or_default()
            .push(record.file_name.clone());
    }
    groups
        .into_iter()
        .map(|(user, files)| MissingUserGroup {
            user: user.clone(),
            count: files.len(),
            files,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    fn fi(user: &str, file: &str) -> FileIdentity {
        FileIdentity {
            identity: id(user),
            file: file.to_string(),
        }
    }

    #[test]
    fn missing_users_grouped() {
        let report = find_missing_users(
            &[id("a@x.com")],
            &[fi("a@x.com", "1.json"), fi("c@x.com", "2.json"), fi("c@x.com", "3.json")],
        );
        assert_eq!(report.total_files, 3);
        assert_eq!(report.matching_count, 1);
        assert_eq!(report.missing_count(), 2);
        assert!(report.missing.iter().all(|m| m.current_user.as_str() == "c@x.com"));

        let groups = report.group_missing_users();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].user.as_str(), "c@x.com");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].files, ["2.json", "3.json"]);
    }

    #[test]
    fn csv_multiplicity_is_irrelevant() {
        let report = find_missing_users(&[id("a"), id("a"), id("a")], &[fi("a", "1.json")]);
        assert_eq!(report.matching_count, 1);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn groups_sorted_by_user() {
        let missing = vec![
            MissingUserRecord { current_user: id("z"), file_name: "1".into() },
            MissingUserRecord { current_user: id("b"), file_name: "2".into() },
        ];
        let users: Vec<_> = group_missing_users(&missing).into_iter().map(|g| g.user.into_string()).collect();
        assert_eq!(users, ["b", "z"]);
    }
}

//! Row-count reconciliation.
//!
//! Both identity sequences are reduced to frequency tables, the tables are
//! joined on identity (full outer join, sorted by identity), and each joined
//! key becomes one [`ComparisonRow`]. Identities present on only one side get a
//! count of 0 on the other and are therefore always mismatches.

use crate::combiners::{Sum, combine_globally};
use crate::extract::csv::CsvRecords;
use crate::extract::json::JsonRecords;
use crate::frequency::FrequencyTable;
use crate::identity::Identity;
use crate::join::join_full;
use crate::runner::ExecMode;
use crate::skip::Skipped;
use crate::stats::CategoryCounts;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Match,
    Mismatch,
}

impl Status {
    /// Capitalised label used in reports.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Match => "Match",
            Self::Mismatch => "Mismatch",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Match => "match",
            Self::Mismatch => "mismatch",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub user: Identity,
    pub created_by: String,
    pub csv_count: u64,
    pub json_count: u64,
    /// `csv_count - json_count`.
    pub mismatched: i64,
    pub status: Status,
}

impl ComparisonRow {
    pub fn new(user: Identity, created_by: impl Into<String>, csv_count: u64, json_count: u64) -> Self {
        let status = if csv_count == json_count {
            Status::Match
        } else {
            Status::Mismatch
        };
        Self {
            user,
            created_by: created_by.into(),
            csv_count,
            json_count,
            mismatched: signed(csv_count) - signed(json_count),
            status,
        }
    }

    pub fn is_mismatch(&self) -> bool {
        self.status == Status::Mismatch
    }
}

fn signed(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_csv_count: u64,
    pub total_json_count: u64,
    pub categories: CategoryCounts,
}

/// Everything one comparison run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub rows: Vec<ComparisonRow>,
    pub summary: SummaryStatistics,
    /// CSV rows and JSON files that were skipped, CSV first.
    pub skipped: Vec<Skipped>,
    pub processing_time: Duration,
}

impl ComparisonResult {
    pub fn total_users(&self) -> usize {
        self.rows.len()
    }

    pub fn mismatch_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_mismatch()).count()
    }

    pub fn match_count(&self) -> usize {
        self.total_users() - self.mismatch_count()
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &ComparisonRow> {
        self.rows.iter().filter(|r| r.is_mismatch())
    }
}

/// Compare two identity sequences.
///
/// `created_by` supplies the created-by label per identity; identities absent
/// from it are reported as `created_by_default`.
pub fn compare_identities(
    csv_identities: &[Identity],
    json_identities: &[Identity],
    created_by: &HashMap<Identity, String>,
    created_by_default: &str,
    mode: ExecMode,
) -> Vec<ComparisonRow> {
    let csv = FrequencyTable::build(csv_identities, mode);
    let json = FrequencyTable::build(json_identities, mode);

    join_full(csv.as_map(), json.as_map())
        .into_iter()
        .map(|(user, (c, j))| {
            let who = created_by
                .get(&user)
                .map_or(created_by_default, String::as_str)
                .to_string();
            ComparisonRow::new(user, who, c.unwrap_or(0), j.unwrap_or(0))
        })
        .collect()
}

/// Summary totals for a set of rows plus the JSON category tallies.
pub fn summarize(rows: &[ComparisonRow], categories: CategoryCounts) -> SummaryStatistics {
    SummaryStatistics {
        total_csv_count: combine_globally(rows, |r| r.csv_count, &Sum::<u64>::new()),
        total_json_count: combine_globally(rows, |r| r.json_count, &Sum::<u64>::new()),
        categories,
    }
}

/// Build a full [`ComparisonResult`] from the two extractions.
pub fn compare_records(csv: CsvRecords, json: JsonRecords, mode: ExecMode, processing_time: Duration) -> ComparisonResult {
    let rows = compare_identities(
        &csv.identities,
        &json.identities,
        &csv.created_by,
        crate::extract::csv::CREATED_BY_UNKNOWN,
        mode,
    );
    let summary = summarize(&rows, json.categories);
    let mut skipped = csv.skipped;
    skipped.extend(json.skipped);
    ComparisonResult {
        rows,
        summary,
        skipped,
        processing_time,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[&str]) -> Vec<Identity> {
        raw.iter().filter_map(|s| Identity::new(s)).collect()
    }

    #[test]
    fn end_to_end_counts() {
        let rows = compare_identities(
            &ids(&["a@x.com", "a@x.com", "b@x.com"]),
            &ids(&["a@x.com"]),
            &HashMap::new(),
            "N/A",
            ExecMode::Sequential,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].user.as_str(), rows[0].csv_count, rows[0].json_count), ("a@x.com", 2, 1));
        assert_eq!(rows[0].mismatched, 1);
        assert_eq!(rows[0].status, Status::Mismatch);
        assert_eq!((rows[1].user.as_str(), rows[1].csv_count, rows[1].json_count), ("b@x.com", 1, 0));
        assert_eq!(rows[1].mismatched, 1);
        assert_eq!(rows[1].created_by, "N/A");
    }

    #[test]
    fn json_only_identity_has_negative_difference() {
        let rows = compare_identities(&[], &ids(&["c", "c"]), &HashMap::new(), "N/A", ExecMode::Sequential);
        assert_eq!(rows[0].csv_count, 0);
        assert_eq!(rows[0].mismatched, -2);
        assert!(rows[0].is_mismatch());
    }

    #[test]
    fn equal_counts_match() {
        let created = HashMap::from([(Identity::new("a").unwrap(), "Ann".to_string())]);
        let rows = compare_identities(&ids(&["a", "a"]), &ids(&["a", "a"]), &created, "N/A", ExecMode::Sequential);
        assert_eq!(rows[0].status, Status::Match);
        assert_eq!(rows[0].mismatched, 0);
        assert_eq!(rows[0].created_by, "Ann");
    }

    #[test]
    fn summary_totals_are_sums() {
        let rows = vec![
            ComparisonRow::new(Identity::new("a").unwrap(), "N/A", 2, 1),
            ComparisonRow::new(Identity::new("b").unwrap(), "N/A", 1, 0),
        ];
        let s = summarize(&rows, CategoryCounts::default());
        assert_eq!((s.total_csv_count, s.total_json_count), (3, 1));
    }

    #[test]
    fn status_labels() {
        assert_eq!(Status::Mismatch.label(), "Mismatch");
        assert_eq!(Status::Match.to_string(), "match");
    }
}

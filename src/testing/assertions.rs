//! Assertion helpers for comparison results.

use crate::compare::counts::{ComparisonResult, ComparisonRow, Status};

/// Find the row for `user`.
///
/// # Panics
///
/// Panics if there is no such row.
#[must_use]
pub fn row_for<'a>(result: &'a ComparisonResult, user: &str) -> &'a ComparisonRow {
    result
        .rows
        .iter()
        .find(|r| r.user.as_str() == user)
        .unwrap_or_else(|| {
            let users: Vec<_> = result.rows.iter().map(|r| r.user.as_str()).collect();
            panic!("no row for {user:?}; rows: {users:?}")
        })
}

/// Assert the counts of `user`'s row, and that difference and status agree with them.
///
/// # Panics
///
/// Panics if the row is missing or any field differs.
pub fn assert_row(result: &ComparisonResult, user: &str, csv_count: u64, json_count: u64) {
    let row = row_for(result, user);
    assert_eq!(
        (row.csv_count, row.json_count),
        (csv_count, json_count),
        "counts for {user}:\n  Expected: csv={csv_count} json={json_count}\n  Actual: {row:?}"
    );
    let expected_diff = i64::try_from(csv_count).unwrap() - i64::try_from(json_count).unwrap();
    assert_eq!(row.mismatched, expected_diff, "difference for {user}: {row:?}");
    let expected_status = if csv_count == json_count { Status::Match } else { Status::Mismatch };
    assert_eq!(row.status, expected_status, "status for {user}: {row:?}");
}

/// Assert that rows are strictly ascending by user (sorted, no duplicates).
///
/// # Panics
///
/// Panics at the first out-of-order pair.
pub fn assert_rows_sorted(result: &ComparisonResult) {
    for (i, pair) in result.rows.windows(2).enumerate() {
        assert!(
            pair[0].user < pair[1].user,
            "rows out of order at index {i}: {:?} then {:?}",
            pair[0].user,
            pair[1].user
        );
    }
}

// tests/missing_users.rs
use anyhow::Result;
use user_reconcile::export::csv::{MISSING_USERS_FILENAME, write_missing_users_csv};
use user_reconcile::testing::*;
use user_reconcile::*;

fn reconciler() -> Reconciler {
    Reconciler::new(ReconcileConfig::default().with_user_csv_column("email"))
}

#[test]
fn missing_user_scenario() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\na@x.com\n")
        .json("one.json", &observation_json("a@x.com"))
        .json("two.json", &observation_json("c@x.com"))
        .json("three.json", &observation_json("c@x.com"))
        .build()?;
    let report = reconciler().compare_users(&csv, &uploads)?;
    assert_eq!(report.total_files, 3);
    assert_eq!(report.matching_count, 1);
    assert_eq!(report.missing.len(), 2);
    let files: Vec<_> = report.missing.iter().map(|m| m.file_name.as_str()).collect();
    assert_eq!(files, ["two.json", "three.json"]);

    let groups = report.group_missing_users();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].user.as_str(), "c@x.com");
    assert_eq!(groups[0].count, 2);
    Ok(())
}

#[test]
fn embedded_json_cells_in_user_column() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("Record\n\"{\"\"currentUser\"\":\"\"a@x.com\"\",\"\"id\"\":7}\"\nb@x.com\n")
        .json("one.json", &observation_json("a@x.com"))
        .json("two.json", &observation_json("b@x.com"))
        .json("bad.json", "not json")
        .build()?;
    let reconciler = Reconciler::new(ReconcileConfig::default().with_user_csv_column("record"));
    let report = reconciler.compare_users(&csv, &uploads)?;
    assert_eq!(report.total_files, 2);
    assert_eq!(report.matching_count, 2);
    assert!(report.missing.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].source, "bad.json");
    Ok(())
}

#[test]
fn unknown_column_is_reported() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\na@x.com\n")
        .json("one.json", &observation_json("a@x.com"))
        .build()?;
    let reconciler = Reconciler::new(ReconcileConfig::default().with_user_csv_column("Owner"));
    let err = reconciler.compare_users(&csv, &uploads).unwrap_err();
    assert_eq!(err.to_string(), "Could not find column 'Owner' in CSV");
    Ok(())
}

#[test]
fn summary_csv_written() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\na@x.com\n")
        .json("two.json", &observation_json("c@x.com"))
        .json("three.json", &observation_json("c@x.com"))
        .build()?;
    let report = reconciler().compare_users(&csv, &uploads)?;
    let dir = tempfile::tempdir()?;
    let path = write_missing_users_csv(dir.path(), &report.group_missing_users())?;
    assert!(path.ends_with(MISSING_USERS_FILENAME));
    let text = std::fs::read_to_string(path)?;
    assert_eq!(text, "User Email,File Count,Files\nc@x.com,2,two.json; three.json\n");
    Ok(())
}

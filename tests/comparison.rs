// tests/comparison.rs
use anyhow::Result;
use std::collections::HashMap;
use user_reconcile::compare::counts::compare_identities;
use user_reconcile::testing::*;
use user_reconcile::*;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn ids(raw: &[&str]) -> Vec<Identity> {
    raw.iter().filter_map(|s| Identity::new(s)).collect()
}

#[test]
fn end_to_end_scenario() -> Result<()> {
    init();
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\na@x.com\na@x.com\nb@x.com\n")
        .json("BehaviouralObservation_1.json", &observation_json("a@x.com"))
        .build()?;

    let result = Reconciler::default().compare_counts(&csv, &uploads)?;
    assert_eq!(result.rows.len(), 2);
    assert_row(&result, "a@x.com", 2, 1);
    assert_row(&result, "b@x.com", 1, 0);
    assert_eq!(row_for(&result, "a@x.com").mismatched, 1);
    assert_eq!(row_for(&result, "b@x.com").created_by, "N/A");
    assert_eq!(result.mismatch_count(), 2);
    assert_eq!(result.match_count(), 0);
    assert_eq!(result.summary.total_csv_count, 3);
    assert_eq!(result.summary.total_json_count, 1);
    Ok(())
}

#[test]
fn totals_and_union_size() {
    let csv = ids(&["a", "b", "b", "c"]);
    let json = ids(&["d", "e", "e"]);
    let rows = compare_identities(&csv, &json, &HashMap::new(), "N/A", ExecMode::Sequential);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows.iter().map(|r| r.csv_count).sum::<u64>(), 4);
    assert_eq!(rows.iter().map(|r| r.json_count).sum::<u64>(), 3);
    for row in &rows {
        assert_eq!(row.status, Status::Mismatch);
        assert!(row.csv_count == 0 || row.json_count == 0);
    }
}

#[test]
fn equal_multiplicities_match() {
    let csv = ids(&["a", "a", "a", "b"]);
    let json = ids(&["a", "b", "a", "a"]);
    let rows = compare_identities(&csv, &json, &HashMap::new(), "N/A", ExecMode::Sequential);
    assert!(rows.iter().all(|r| r.status == Status::Match && r.mismatched == 0));
}

#[test]
fn repeated_runs_identical_in_both_modes() -> Result<()> {
    let csv = ids(&["m", "z", "a", "m", "k", "b"]);
    let json = ids(&["k", "q", "a", "a"]);
    let first = compare_identities(&csv, &json, &HashMap::new(), "N/A", ExecMode::Sequential);
    let second = compare_identities(&csv, &json, &HashMap::new(), "N/A", ExecMode::Sequential);
    let par = compare_identities(&csv, &json, &HashMap::new(), "N/A", ExecMode::Parallel { partitions: Some(3) });
    assert_eq!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);
    assert_eq!(first, par);
    let users: Vec<_> = first.iter().map(|r| r.user.as_str()).collect();
    assert_eq!(users, ["a", "b", "k", "m", "q", "z"]);
    Ok(())
}

#[test]
fn created_by_and_categories_flow_into_result() -> Result<()> {
    init();
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("Email_LkUp,Created By 0\na@x.com,Ann\na@x.com,Zoe\n")
        .json("Nearmiss_01.json", "{}")
        .json("Hazard_Nearmiss.json", "{}")
        .json("Product.json", "{}")
        .zip(
            "obs.zip",
            ZipBuilder::new()
                .file("behaviouralobservation/1.json", observation_json("a@x.com"))
                .file("behaviouralobservation/2.json", observation_json("a@x.com"))
                .file("behaviouralobservation/broken.json", "{"),
        )
        .build()?;

    let result = Reconciler::default().compare_counts(&csv, &uploads)?;
    assert_row(&result, "a@x.com", 2, 2);
    assert_eq!(row_for(&result, "a@x.com").created_by, "Zoe");
    let cats = &result.summary.categories;
    assert_eq!(cats.get("Nearmiss"), 2);
    assert_eq!(cats.get("Hazard"), 1);
    assert_eq!(cats.get("Product"), 1);
    assert_eq!(cats.get("HarmInjury"), 0);
    assert_eq!(cats.get("SalesDelivery"), 0);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].source, "behaviouralobservation/broken.json");
    assert_rows_sorted(&result);
    Ok(())
}

#[test]
fn parallel_run_matches_sequential_run() -> Result<()> {
    let mut builder = UploadSetBuilder::new().csv(sample_csv());
    for i in 0..40 {
        let user = format!("user{}@x.com", i % 6);
        builder = builder.json(&format!("BehaviouralObservation_{i}.json"), &observation_json(&user));
    }
    let (csv, uploads) = builder.build()?;
    let seq = Reconciler::default().compare_counts(&csv, &uploads)?;
    let par = Reconciler::default()
        .with_mode(ExecMode::Parallel { partitions: Some(5) })
        .compare_counts(&csv, &uploads)?;
    assert_eq!(seq.rows, par.rows);
    assert_eq!(seq.summary, par.summary);
    assert_rows_sorted(&par);
    Ok(())
}

#[test]
fn missing_email_column_is_reported() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("Name,Date\nx,y\n")
        .json("BehaviouralObservation_1.json", &observation_json("a@x.com"))
        .build()?;
    let err = Reconciler::default().compare_counts(&csv, &uploads).unwrap_err();
    assert_eq!(err.to_string(), "Could not find email column in CSV");
    let inner = ReconcileError::of(&err).expect("taxonomy error");
    assert!(inner.is_user_correctable());
    Ok(())
}

#[test]
fn custom_identity_key() -> Result<()> {
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\nowner@x.com\n")
        .json("behaviouralobservation-1.json", r#"{"owner":"owner@x.com"}"#)
        .build()?;
    let reconciler = Reconciler::new(ReconcileConfig::default().with_identity_key("owner"));
    let result = reconciler.compare_counts(&csv, &uploads)?;
    assert_row(&result, "owner@x.com", 1, 1);
    assert_eq!(result.mismatch_count(), 0);
    Ok(())
}

#[test]
fn category_tallies_are_independent() {
    let cfg = ReconcileConfig::default();
    let counts = user_reconcile::stats::tally_categories(&cfg.category_markers, category_file_names());
    let tallies: Vec<_> = counts.iter().map(|c| (c.name.as_str(), c.count)).collect();
    assert_eq!(
        tallies,
        [("Nearmiss", 2), ("Hazard", 1), ("HarmInjury", 1), ("Product", 2), ("SalesDelivery", 1)]
    );
}

#[test]
fn json_with_byte_order_mark_is_counted() -> Result<()> {
    let bom_json = format!("\u{feff}{}", observation_json("a@x.com"));
    let (csv, uploads) = UploadSetBuilder::new()
        .csv("email\na@x.com\n")
        .json("BehaviouralObservation_1.json", &bom_json)
        .build()?;
    let result = Reconciler::default().compare_counts(&csv, &uploads)?;
    assert_row(&result, "a@x.com", 1, 1);
    assert!(result.skipped.is_empty());
    Ok(())
}

//! Ready-made inputs.

/// CSV with `a@x.com` twice (created by Ann) and `b@x.com` once.
#[must_use]
pub fn sample_csv() -> String {
    "email,CreatedBy0\na@x.com,Ann\na@x.com,Ann\nb@x.com,Bob\n".to_string()
}

/// A JSON observation document carrying `user` under `currentUser`.
#[must_use]
pub fn observation_json(user: &str) -> String {
    serde_json::json!({
        "currentUser": user,
        "observationType": "BehaviouralObservation",
        "answers": [{ "question": "PPE worn", "value": true }],
    })
    .to_string()
}

/// File names covering every default category marker, several overlapping.
#[must_use]
pub fn category_file_names() -> Vec<&'static str> {
    vec![
        "Nearmiss_01.json",
        "Hazard_Nearmiss.json",
        "Product.json",
        "HarmInjury_2024.json",
        "salesdelivery-7.json",
        "BehaviouralObservation_Product.json",
    ]
}

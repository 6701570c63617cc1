//! Category tallies over file names.
//!
//! Each configured marker is checked independently against the lower-cased
//! file name, so one file can count toward several categories.

use crate::config::CategoryMarker;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub marker: String,
    pub count: u64,
}

/// Per-category file counts, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    counts: Vec<CategoryCount>,
}

impl CategoryCounts {
    /// All-zero counts for `markers`. Markers are expected to be lower-case.
    pub fn new(markers: &[CategoryMarker]) -> Self {
        Self {
            counts: markers
                .iter()
                .map(|m| CategoryCount {
                    name: m.name.clone(),
                    marker: m.marker.clone(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Count one file name toward every category whose marker it contains.
    pub fn observe(&mut self, file_name: &str) {
        let lower = file_name.to_lowercase();
        for c in &mut self.counts {
            if lower.contains(c.marker.as_str()) {
                c.count += 1;
            }
        }
    }

    /// Add another tally built from the same markers.
    pub fn merge(&mut self, other: &Self) {
        for (c, o) in self.counts.iter_mut().zip(&other.counts) {
            debug_assert_eq!(c.name, o.name);
            c.count += o.count;
        }
    }

    /// Count for the category called `name`; 0 for unknown names.
    pub fn get(&self, name: &str) -> u64 {
        self.counts
            .iter()
            .find(|c| c.name == name)
            .map_or(0, |c| c.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryCount> {
        self.counts.iter()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Tally a list of file names.
pub fn tally_categories<'a>(markers: &[CategoryMarker], names: impl IntoIterator<Item = &'a str>) -> CategoryCounts {
    let mut counts = CategoryCounts::new(markers);
    for name in names {
        counts.observe(name);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReconcileConfig;

    #[test]
    fn markers_are_independent() {
        let cfg = ReconcileConfig::default();
        let counts = tally_categories(
            &cfg.category_markers,
            ["Nearmiss_01.json", "Hazard_Nearmiss.json", "Product.json"],
        );
        assert_eq!(counts.get("Nearmiss"), 2);
        assert_eq!(counts.get("Hazard"), 1);
        assert_eq!(counts.get("Product"), 1);
        assert_eq!(counts.get("HarmInjury"), 0);
        assert_eq!(counts.get("SalesDelivery"), 0);
    }

    #[test]
    fn merge_adds_counts() {
        let cfg = ReconcileConfig::default();
        let mut a = tally_categories(&cfg.category_markers, ["hazard.json"]);
        let b = tally_categories(&cfg.category_markers, ["HAZARD-2.json", "product.json"]);
        a.merge(&b);
        assert_eq!(a.get("Hazard"), 2);
        assert_eq!(a.get("Product"), 1);
    }
}

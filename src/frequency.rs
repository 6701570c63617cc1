//! Frequency tables: how many times each identity occurs.
//!
//! A table is built in one pass as a pure reduction of an identity sequence
//! with the [`Count`] combiner and is read-only afterwards.

use crate::combiners::{Count, combine_per_key};
use crate::identity::Identity;
use crate::runner::ExecMode;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<Identity, u64>,
}

impl FrequencyTable {
    /// Count a sequence of identities sequentially.
    pub fn from_identities<'a>(identities: impl IntoIterator<Item = &'a Identity>) -> Self {
        let counts = identities.into_iter().fold(HashMap::new(), |mut acc, id| {
            *acc.entry(id.clone()).or_insert(0) += 1;
            acc
        });
        Self { counts }
    }

    /// Count a slice of identities in the given execution mode.
    pub fn build(identities: &[Identity], mode: ExecMode) -> Self {
        Self {
            counts: combine_per_key(identities, |id| (id.clone(), ()), &Count, mode),
        }
    }

    /// Occurrences of `identity`, 0 when absent.
    pub fn get(&self, identity: &str) -> u64 {
        self.counts.get(identity).copied().unwrap_or(0)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.counts.contains_key(identity)
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the length of the sequence it was built from.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Identity, u64)> {
        self.counts.iter().map(|(k, v)| (k, *v))
    }

    pub fn as_map(&self) -> &HashMap<Identity, u64> {
        &self.counts
    }
}

impl<'a> FromIterator<&'a Identity> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = &'a Identity>>(iter: I) -> Self {
        Self::from_identities(iter)
    }
}

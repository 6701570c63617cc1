//! Full outer join of two keyed tables.
//!
//! Every key present on either side produces exactly one output row, with
//! `None` for the side it is missing from. Output is sorted ascending by key,
//! so the result does not depend on hash-map iteration order.

use std::collections::HashMap;
use std::hash::Hash;

/// Join `left` and `right` on their keys: `(k, (Option<v>, Option<w>))`.
///
/// ```
/// use std::collections::HashMap;
/// use user_reconcile::join::join_full;
///
/// let left = HashMap::from([("a", 1), ("b", 2)]);
/// let right = HashMap::from([("b", 20), ("c", 30)]);
/// assert_eq!(
///     join_full(&left, &right),
///     vec![("a", (Some(1), None)), ("b", (Some(2), Some(20))), ("c", (None, Some(30)))]
/// );
/// ```
pub fn join_full<K, V, W>(left: &HashMap<K, V>, right: &HashMap<K, W>) -> Vec<(K, (Option<V>, Option<W>))>
where
    K: Eq + Hash + Ord + Clone,
    V: Clone,
    W: Clone,
{
    let mut keys: Vec<&K> = left.keys().chain(right.keys().filter(|k| !left.contains_key(*k))).collect();
    keys.sort_unstable();
    keys.into_iter()
        .map(|k| (k.clone(), (left.get(k).cloned(), right.get(k).cloned())))
        .collect()
}

//! Combiners and the keyed/global reductions that drive them.
//!
//! A [`CombineFn`] describes an aggregation as four steps: create an empty
//! accumulator, add one input, merge two accumulators, finish into an output.
//! Because accumulators merge, the same combiner runs sequentially or split
//! across rayon workers and gives the same answer either way.
//!
//! - [`Count`] -- number of inputs.
//! - [`Sum<T>`] -- sum of inputs.
//! - [`DistinctSet<T>`] -- set of distinct inputs.
//!
//! # Examples
//! ```
//! use user_reconcile::combiners::{Count, combine_per_key};
//! use user_reconcile::runner::ExecMode;
//!
//! let words = ["a", "b", "a"];
//! let counts = combine_per_key(&words, |w| (w.to_string(), ()), &Count, ExecMode::Sequential);
//! assert_eq!(counts["a"], 2);
//! ```

mod basic;

pub use basic::{Count, DistinctSet, Sum};

use crate::runner::ExecMode;
use rayon::prelude::*;
use std::collections::HashMap;
use std::hash::Hash;

/// An associative aggregation over values of type `V` with accumulator `A` and
/// output `O`.
pub trait CombineFn<V, A, O>: Send + Sync {
    fn create(&self) -> A;
    fn add_input(&self, acc: &mut A, v: V);
    fn merge(&self, acc: &mut A, other: A);
    fn finish(&self, acc: A) -> O;
}

/// Fold `items` into one output per key.
///
/// `kv` maps each item to its key and the value fed to the combiner. In
/// parallel mode the items are split into contiguous chunks that are folded
/// independently and then merged.
pub fn combine_per_key<T, K, V, A, O, C, F>(items: &[T], kv: F, comb: &C, mode: ExecMode) -> HashMap<K, O>
where
    T: Sync,
    K: Eq + Hash + Send,
    A: Send,
    C: CombineFn<V, A, O>,
    F: Fn(&T) -> (K, V) + Sync,
{
    let fold_chunk = |chunk: &[T]| {
        let mut accs: HashMap<K, A> = HashMap::new();
        for item in chunk {
            let (k, v) = kv(item);
            comb.add_input(accs.entry(k).or_insert_with(|| comb.create()), v);
        }
        accs
    };

    let accs = match mode {
        ExecMode::Sequential => fold_chunk(items),
        ExecMode::Parallel { partitions } => {
            let chunk = chunk_len(items.len(), partitions);
            items
                .par_chunks(chunk)
                .map(fold_chunk)
                .reduce(HashMap::new, |mut left, right| {
                    for (k, acc) in right {
                        match left.get_mut(&k) {
                            Some(cur) => comb.merge(cur, acc),
                            None => {
                                left.insert(k, acc);
                            }
                        }
                    }
                    left
                })
        }
    };

    accs.into_iter().map(|(k, acc)| (k, comb.finish(acc))).collect()
}

/// Fold every item into a single output.
pub fn combine_globally<T, V, A, O, C, F>(items: &[T], value: F, comb: &C) -> O
where
    C: CombineFn<V, A, O>,
    F: Fn(&T) -> V,
{
    let mut acc = comb.create();
    for item in items {
        comb.add_input(&mut acc, value(item));
    }
    comb.finish(acc)
}

/// Chunk length that splits `len` items into about `partitions` pieces.
pub(crate) fn chunk_len(len: usize, partitions: Option<usize>) -> usize {
    let parts = partitions.unwrap_or_else(|| 2 * num_cpus::get().max(2)).max(1);
    len.div_ceil(parts).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_matches_sequential() {
        let items: Vec<u32> = (0..1000).map(|i| i % 7).collect();
        let seq = combine_per_key(&items, |v| (*v, ()), &Count, ExecMode::Sequential);
        let par = combine_per_key(&items, |v| (*v, ()), &Count, ExecMode::Parallel { partitions: Some(8) });
        assert_eq!(seq, par);
        assert_eq!(seq.values().sum::<u64>(), 1000);
    }

    #[test]
    fn empty_input_gives_empty_map() {
        let items: Vec<u32> = Vec::new();
        let par = combine_per_key(&items, |v| (*v, ()), &Count, ExecMode::Parallel { partitions: None });
        assert!(par.is_empty());
    }

    #[test]
    fn global_sum() {
        let total: u64 = combine_globally(&[1u64, 2, 3], |v| *v, &Sum::<u64>::new());
        assert_eq!(total, 6);
    }

    #[test]
    fn chunk_len_never_zero() {
        assert_eq!(chunk_len(0, Some(4)), 1);
        assert_eq!(chunk_len(10, Some(4)), 3);
        assert_eq!(chunk_len(10, Some(0)), 10);
    }
}

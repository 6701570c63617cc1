//! Basic combiners: Count, Sum, DistinctSet

use super::CombineFn;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::mem::take;
use std::ops::Add;

/* ===================== Count ===================== */

/// Number of inputs, whatever their value.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count;

impl<V> CombineFn<V, u64, u64> for Count {
    fn create(&self) -> u64 {
        0
    }

    fn add_input(&self, acc: &mut u64, _v: V) {
        *acc += 1;
    }

    fn merge(&self, acc: &mut u64, other: u64) {
        *acc += other;
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Sum<T> ===================== */

/// Sum of inputs.
///
/// - Accumulator: `T`
/// - Output: `T`
#[derive(Clone, Copy, Debug, Default)]
pub struct Sum<T>(pub PhantomData<T>);
impl<T> Sum<T> {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, T, T> for Sum<T>
where
    T: Add<Output = T> + Default + Send + Sync,
{
    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, v: T) {
        *acc = take(acc) + v;
    }

    fn merge(&self, acc: &mut T, other: T) {
        *acc = take(acc) + other;
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== DistinctSet<T> ===================== */

/// Set of distinct inputs.
///
/// - Accumulator: `HashSet<T>`
/// - Output: `HashSet<T>`
#[derive(Clone, Copy, Debug, Default)]
pub struct DistinctSet<T>(pub PhantomData<T>);
impl<T> DistinctSet<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> CombineFn<T, HashSet<T>, HashSet<T>> for DistinctSet<T>
where
    T: Eq + Hash + Send + Sync,
{
    fn create(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn add_input(&self, acc: &mut HashSet<T>, v: T) {
        acc.insert(v);
    }

    fn merge(&self, acc: &mut HashSet<T>, other: HashSet<T>) {
        if acc.is_empty() {
            *acc = other;
        } else {
            acc.extend(other);
        }
    }

    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }
}

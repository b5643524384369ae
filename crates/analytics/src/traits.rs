//! Core traits for grouped aggregation.
//!
//! A group-by is a map from a composite key to an accumulator. Every
//! aggregation in this crate is one of the accumulators below driven by
//! `group::group_by`.

use std::collections::BTreeSet;

/// Folds the values of one group into a single result.
///
/// `Default` is the empty accumulator; a group only exists once a value has
/// been pushed, so `finish` never sees an empty group.
pub trait Accumulator<V>: Default {
    type Output;

    /// Add one row's value to the group
    fn push(&mut self, value: V);

    /// Produce the group's result
    fn finish(self) -> Self::Output;
}

/// Number of rows in the group.
#[derive(Debug, Default, Clone, Copy)]
pub struct Count(u64);

impl<V> Accumulator<V> for Count {
    type Output = u64;

    fn push(&mut self, _value: V) {
        self.0 += 1;
    }

    fn finish(self) -> u64 {
        self.0
    }
}

/// Arithmetic mean of the group's values.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mean {
    sum: f64,
    count: u64,
}

impl Accumulator<f64> for Mean {
    type Output = f64;

    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn finish(self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Number of distinct values in the group.
#[derive(Debug, Clone)]
pub struct Distinct<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Distinct<T> {
    fn default() -> Self {
        Self(BTreeSet::new())
    }
}

impl<T: Ord> Accumulator<T> for Distinct<T> {
    type Output = u64;

    fn push(&mut self, value: T) {
        self.0.insert(value);
    }

    fn finish(self) -> u64 {
        self.0.len() as u64
    }
}

//! Group-by over an ordered relation.

use crate::traits::Accumulator;
use std::collections::BTreeMap;

/// Group `rows` by `key` and fold each group's `value`s with accumulator `A`.
///
/// Keys are kept in a `BTreeMap`, so the result is in sorted key order and
/// independent of row order. Key combinations that never occur are absent.
pub fn group_by<R, K, V, A>(
    rows: impl IntoIterator<Item = R>,
    key: impl Fn(&R) -> K,
    value: impl Fn(&R) -> V,
) -> BTreeMap<K, A::Output>
where
    K: Ord,
    A: Accumulator<V>,
{
    let mut groups: BTreeMap<K, A> = BTreeMap::new();
    for row in rows {
        groups.entry(key(&row)).or_default().push(value(&row));
    }
    groups
        .into_iter()
        .map(|(k, acc)| (k, acc.finish()))
        .collect()
}

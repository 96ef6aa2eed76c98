/*! `merge_set` / `merge_sorted_set`: concatenate records sharing a key,
for operations that are purely a set union rather than an aggregation
(spec.md §4.1).
!*/
use std::cmp::Ordering;

/// Concatenates every shard's records in the order the shards are given;
/// no sorting or dedup — this is a plain union.
pub fn merge_set<T>(shards: impl IntoIterator<Item = Vec<T>>) -> Vec<T> {
    shards.into_iter().flatten().collect()
}

/// Merges already-sorted shards into one globally sorted sequence (a
/// standard k-way merge), for callers that only need the union but want
/// the result pre-sorted because every shard already is.
pub fn merge_sorted_set<T, F>(shards: Vec<Vec<T>>, cmp: F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    crate::mapreduce::quick_sort::merge_quick_sorted_runs(shards, cmp, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_set_is_a_plain_concatenation() {
        let a = vec![1, 2];
        let b = vec![3, 4];
        assert_eq!(merge_set(vec![a, b]), vec![1, 2, 3, 4]);
    }

    #[test]
    fn merge_sorted_set_interleaves_in_order() {
        let a = vec![1, 4, 6];
        let b = vec![2, 3, 5];
        let merged = merge_sorted_set(vec![a, b], |x: &i32, y: &i32| x.cmp(y));
        assert_eq!(merged, vec![1, 2, 3, 4, 5, 6]);
    }
}

/*! Per-key aggregation: `find_key_occurrence`, `find_key_weight`, and
their "duplicate" variants that re-emit one aggregate per input record
rather than collapsing the group (spec.md §4.1).
!*/
use std::collections::HashMap;

/// Groups `(key, ())`-shaped input by key within a shard and emits
/// `(key, count)`, one record per distinct key, in first-seen order.
pub fn find_key_occurrence<K: Eq + std::hash::Hash + Clone>(
    keys: impl IntoIterator<Item = K>,
) -> Vec<(K, u64)> {
    let mut order = Vec::new();
    let mut counts: HashMap<K, u64> = HashMap::new();
    for k in keys {
        let entry = counts.entry(k.clone()).or_insert_with(|| {
            order.push(k.clone());
            0
        });
        *entry += 1;
    }
    order
        .into_iter()
        .map(|k| {
            let c = counts[&k];
            (k, c)
        })
        .collect()
}

/// Groups `(key, weight)` input by key and emits `(key, sum_of_weight)`.
pub fn find_key_weight<K: Eq + std::hash::Hash + Clone>(
    pairs: impl IntoIterator<Item = (K, f64)>,
) -> Vec<(K, f64)> {
    let mut order = Vec::new();
    let mut sums: HashMap<K, f64> = HashMap::new();
    for (k, w) in pairs {
        let entry = sums.entry(k.clone()).or_insert_with(|| {
            order.push(k.clone());
            0.0
        });
        *entry += w;
    }
    order.into_iter().map(|k| (k.clone(), sums[&k])).collect()
}

/// Same group-by as [`find_key_occurrence`], but re-emits the aggregate
/// alongside every input record, preserving input order within the shard
/// rather than collapsing duplicates. Used where a downstream stage needs
/// the per-record occurrence count attached in place (e.g. the k-th-order
/// statistic cutoff in §4.8 reads occurrence per candidate pair without
/// losing which document it came from).
pub fn find_duplicate_key_occurrence<K: Eq + std::hash::Hash + Clone>(
    keys: impl IntoIterator<Item = K>,
) -> Vec<(K, u64)> {
    let items: Vec<K> = keys.into_iter().collect();
    let mut counts: HashMap<K, u64> = HashMap::new();
    for k in &items {
        *counts.entry(k.clone()).or_insert(0) += 1;
    }
    items
        .into_iter()
        .map(|k| {
            let c = counts[&k];
            (k, c)
        })
        .collect()
}

/// Same group-by as [`find_key_weight`], re-emitted per input record.
pub fn find_duplicate_key_weight<K: Eq + std::hash::Hash + Clone>(
    pairs: impl IntoIterator<Item = (K, f64)>,
) -> Vec<(K, f64)> {
    let items: Vec<(K, f64)> = pairs.into_iter().collect();
    let mut sums: HashMap<K, f64> = HashMap::new();
    for (k, w) in &items {
        *sums.entry(k.clone()).or_insert(0.0) += w;
    }
    items
        .into_iter()
        .map(|(k, _)| {
            let s = sums[&k];
            (k, s)
        })
        .collect()
}

/*! `order_mapped_sets` / `order_mapped_occurrences`: re-stitch per-shard
outputs back into the caller's original file order, using the
`file_div_bound` intervals recorded by [`super::distribute::distribute_keys`]
(spec.md §4.1, §8 round-trip property: distribute then re-order reproduces
the input byte-for-byte modulo block boundaries).
!*/

/// Records which input-file range (by original index, half-open) a
/// partition pass drew from, so the shuffled records can be restored to
/// file order afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileDivBound {
    pub start: usize,
    pub end: usize,
}

/// Tags each record with its original position before partitioning, so
/// `order_mapped_sets` can invert the shuffle.
pub fn tag_with_original_order<T>(items: impl IntoIterator<Item = T>) -> Vec<(usize, T)> {
    items.into_iter().enumerate().collect()
}

/// Re-stitches shards (each a `Vec<(original_index, T)>`) back into the
/// original file order.
pub fn order_mapped_sets<T>(shards: Vec<Vec<(usize, T)>>) -> Vec<T> {
    let mut flat: Vec<(usize, T)> = shards.into_iter().flatten().collect();
    flat.sort_by_key(|(idx, _)| *idx);
    flat.into_iter().map(|(_, v)| v).collect()
}

/// Same re-stitch, but for `(original_index, key, count_or_weight)`
/// aggregates produced by `find_key_occurrence`/`find_key_weight` after a
/// distribute pass — kept as a distinct name to mirror the source's
/// separate `order_mapped_occurrences` primitive, which operates on
/// aggregate records rather than raw mapped values.
pub fn order_mapped_occurrences<K, V>(shards: Vec<Vec<(usize, K, V)>>) -> Vec<(K, V)> {
    let mut flat: Vec<(usize, K, V)> = shards.into_iter().flatten().collect();
    flat.sort_by_key(|(idx, _, _)| *idx);
    flat.into_iter().map(|(_, k, v)| (k, v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapreduce::distribute::shard_for_key;

    #[test]
    fn distribute_then_reorder_reproduces_input() {
        let input: Vec<u64> = (0..500).collect();
        let tagged = tag_with_original_order(input.clone());

        let hash_div_num = 7u32;
        let mut shards: Vec<Vec<(usize, u64)>> = (0..hash_div_num).map(|_| Vec::new()).collect();
        for (idx, v) in tagged {
            let shard = shard_for_key(v, hash_div_num) as usize;
            shards[shard].push((idx, v));
        }

        let restored = order_mapped_sets(shards);
        assert_eq!(restored, input);
    }
}

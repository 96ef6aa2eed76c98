/*! `apply_maps_to_keys`: external hash-join (spec.md §4.1). Loads one
map-shard into memory and streams the matching key-shard past it, writing
`(key, map_value_or_empty)` in the key stream's original order. A key
with no match is *not* an error (spec.md §4.1 "Error conditions";
`UnjoinedKey` yields an empty map value, it does not abort the join).
!*/
use std::collections::HashMap;

pub struct JoinResult<K, V> {
    pub key: K,
    /// `None` means the key had no entry in the map shard (an
    /// "unjoined key" — not an error).
    pub value: Option<V>,
}

pub fn apply_maps_to_keys<K, V>(
    keys: impl IntoIterator<Item = K>,
    map: impl IntoIterator<Item = (K, V)>,
) -> Vec<JoinResult<K, V>>
where
    K: Eq + std::hash::Hash + Clone,
    V: Clone,
{
    let table: HashMap<K, V> = map.into_iter().collect();
    keys.into_iter()
        .map(|key| {
            let value = table.get(&key).cloned();
            JoinResult { key, value }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_key_yields_empty_value_not_an_error() {
        let keys = vec![1, 2, 3];
        let map = vec![(1, "one"), (3, "three")];
        let joined = apply_maps_to_keys(keys, map);
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[0].value, Some("one"));
        assert_eq!(joined[1].value, None);
        assert_eq!(joined[2].value, Some("three"));
    }
}

/*! `distribute_keys` / `distribute_maps`: hash-partition a keyed stream
into `hash_div_num` shards by the key (spec.md §4.1). Every downstream
primitive in this module operates on `KeyedRecord<U64Key, V>` — the 40/32
bit ids in [`crate::ids`] all fit in a `u64`, so a single numeric-key
partitioner serves every stage.
!*/
use crate::segio::{KeyedRecord, Record, U64Key};
use twox_hash::XxHash64;
use std::hash::Hasher;

/// Deterministic shard assignment for a key: `hash(key) % hash_div_num`.
/// twox-hash rather than the key's raw value directly, so keys that are
/// numerically close (adjacent doc ids, for instance) still spread evenly
/// across shards instead of clustering in a few.
pub fn shard_for_key(key: u64, hash_div_num: u32) -> u32 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write_u64(key);
    (hasher.finish() % hash_div_num as u64) as u32
}

/// Hash-partitions `records` into `hash_div_num` shards, preserving
/// within-shard relative order of the input (needed so `order_mapped_sets`
/// can later undo the partition).
pub fn distribute_keys<V: Record + Clone>(
    records: impl IntoIterator<Item = KeyedRecord<U64Key, V>>,
    hash_div_num: u32,
) -> Vec<Vec<KeyedRecord<U64Key, V>>> {
    let mut shards: Vec<Vec<KeyedRecord<U64Key, V>>> =
        (0..hash_div_num).map(|_| Vec::new()).collect();
    for rec in records {
        let shard = shard_for_key(rec.key.0, hash_div_num) as usize;
        shards[shard].push(rec);
    }
    shards
}

/// `distribute_maps` is the same partition, applied to the map side of a
/// later `apply_maps_to_keys` join rather than the key side. Kept as a
/// distinct name because the two inputs of a join are conceptually
/// different streams, even though the partition logic is identical.
pub fn distribute_maps<V: Record + Clone>(
    records: impl IntoIterator<Item = KeyedRecord<U64Key, V>>,
    hash_div_num: u32,
) -> Vec<Vec<KeyedRecord<U64Key, V>>> {
    distribute_keys(records, hash_div_num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segio::Opaque;

    #[test]
    fn partition_is_deterministic_and_covers_every_shard_slot() {
        let records: Vec<_> = (0..1000u64)
            .map(|k| KeyedRecord {
                key: U64Key(k),
                value: Opaque(vec![]),
            })
            .collect();
        let shards = distribute_keys(records.clone(), 8);
        assert_eq!(shards.len(), 8);
        let total: usize = shards.iter().map(|s| s.len()).sum();
        assert_eq!(total, records.len());

        let shards2 = distribute_keys(records, 8);
        let shapes1: Vec<usize> = shards.iter().map(|s| s.len()).collect();
        let shapes2: Vec<usize> = shards2.iter().map(|s| s.len()).collect();
        assert_eq!(shapes1, shapes2);
    }
}

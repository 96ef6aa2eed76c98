/*! External radix sort over fixed-width records, keyed by a low-order
byte prefix (spec.md §4.1 `create_radix_sorted_block` /
`merge_radix_sorted_blocks`).

Records are `Vec<u8>` of uniform width; the key occupies the first
`key_bytes` of each record, encoded little-endian (so byte 0 is the
least-significant key byte — the position the LSD pass visits first).
!*/
use crate::error::Error;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Base-256, two-pass-per-byte-position (count then scatter) LSD radix
/// sort. Stable: records with equal keys retain their relative order, so
/// non-key suffix bytes are preserved exactly (spec.md §8 "stable on the
/// non-key suffix").
pub fn radix_sort_fixed(records: &mut Vec<Vec<u8>>, key_bytes: usize) -> Result<(), Error> {
    let Some(width) = records.first().map(|r| r.len()) else {
        return Ok(());
    };
    if key_bytes > width {
        return Err(Error::Custom(format!(
            "BadItemSize: sort width {key_bytes} exceeds record width {width}"
        )));
    }
    for r in records.iter() {
        if r.len() != width {
            return Err(Error::Corrupted(
                "radix sort requires uniform record width".into(),
            ));
        }
    }

    for byte_pos in 0..key_bytes {
        let mut counts = [0usize; 256];
        for r in records.iter() {
            counts[r[byte_pos] as usize] += 1;
        }
        let mut offsets = [0usize; 256];
        let mut acc = 0usize;
        for b in 0..256 {
            offsets[b] = acc;
            acc += counts[b];
        }
        let mut out: Vec<Option<Vec<u8>>> = vec![None; records.len()];
        for r in records.drain(..) {
            let b = r[byte_pos] as usize;
            out[offsets[b]] = Some(r);
            offsets[b] += 1;
        }
        *records = out.into_iter().map(|o| o.unwrap()).collect();
    }
    Ok(())
}

/// Merges `runs` (each already sorted ascending by its `key_bytes`-byte
/// prefix) into a single sorted run. Processes `runs` in fixed windows of
/// `merge_pass_window` (default 64, per spec.md §4.1) so peak memory stays
/// bounded by window size rather than total run count; each pass's
/// consumed runs are dropped before the next pass starts.
pub fn merge_radix_sorted_runs(
    mut runs: Vec<Vec<Vec<u8>>>,
    key_bytes: usize,
    merge_pass_window: usize,
) -> Vec<Vec<u8>> {
    let window = merge_pass_window.max(2);
    while runs.len() > 1 {
        let mut next_pass = Vec::with_capacity(runs.len() / window + 1);
        for chunk in runs.chunks(window) {
            next_pass.push(k_way_merge(chunk.to_vec(), key_bytes));
        }
        runs = next_pass;
    }
    runs.pop().unwrap_or_default()
}

fn k_way_merge(runs: Vec<Vec<Vec<u8>>>, key_bytes: usize) -> Vec<Vec<u8>> {
    struct HeapItem {
        key: Vec<u8>,
        run_idx: usize,
        seq: u64,
        rec: Vec<u8>,
    }
    impl PartialEq for HeapItem {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key && self.seq == other.seq
        }
    }
    impl Eq for HeapItem {}
    impl PartialOrd for HeapItem {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for HeapItem {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            (&self.key, self.seq).cmp(&(&other.key, other.seq))
        }
    }

    let mut cursors: Vec<std::vec::IntoIter<Vec<u8>>> =
        runs.into_iter().map(|r| r.into_iter()).collect();
    let mut heap: BinaryHeap<Reverse<HeapItem>> = BinaryHeap::new();
    let mut seq = 0u64;
    for (run_idx, cursor) in cursors.iter_mut().enumerate() {
        if let Some(rec) = cursor.next() {
            heap.push(Reverse(HeapItem {
                key: rec[..key_bytes].to_vec(),
                run_idx,
                seq,
                rec,
            }));
            seq += 1;
        }
    }

    let mut out = Vec::new();
    while let Some(Reverse(item)) = heap.pop() {
        out.push(item.rec);
        if let Some(next) = cursors[item.run_idx].next() {
            heap.push(Reverse(HeapItem {
                key: next[..key_bytes].to_vec(),
                run_idx: item.run_idx,
                seq,
                rec: next,
            }));
            seq += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: u32, tag: u8) -> Vec<u8> {
        let mut v = key.to_le_bytes().to_vec();
        v.push(tag);
        v
    }

    #[test]
    fn sorts_ascending_by_key_prefix_and_is_stable() {
        let mut records = vec![
            record(5, 0),
            record(1, 1),
            record(5, 2),
            record(3, 3),
            record(1, 4),
        ];
        let suffix_sum_before: u32 = records.iter().map(|r| *r.last().unwrap() as u32).sum();
        radix_sort_fixed(&mut records, 4).unwrap();
        let keys: Vec<u32> = records
            .iter()
            .map(|r| u32::from_le_bytes(r[0..4].try_into().unwrap()))
            .collect();
        assert_eq!(keys, vec![1, 1, 3, 5, 5]);
        // stability: the two key=1 records keep tags 1 then 4 in order.
        assert_eq!(records[0][4], 1);
        assert_eq!(records[1][4], 4);
        let suffix_sum_after: u32 = records.iter().map(|r| *r.last().unwrap() as u32).sum();
        assert_eq!(suffix_sum_before, suffix_sum_after);
    }

    #[test]
    fn sorting_an_already_sorted_run_is_a_no_op() {
        let mut records = vec![record(1, 9), record(2, 8), record(3, 7)];
        let before = records.clone();
        radix_sort_fixed(&mut records, 4).unwrap();
        assert_eq!(records, before);
    }

    #[test]
    fn oversized_key_is_rejected() {
        let mut records = vec![record(1, 0)];
        let err = radix_sort_fixed(&mut records, 10).unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
    }

    #[test]
    fn merge_produces_single_globally_sorted_run() {
        let mut run_a = vec![record(1, 0), record(4, 0), record(7, 0)];
        let mut run_b = vec![record(2, 0), record(3, 0), record(9, 0)];
        radix_sort_fixed(&mut run_a, 4).unwrap();
        radix_sort_fixed(&mut run_b, 4).unwrap();
        let merged = merge_radix_sorted_runs(vec![run_a, run_b], 4, 64);
        let keys: Vec<u32> = merged
            .iter()
            .map(|r| u32::from_le_bytes(r[0..4].try_into().unwrap()))
            .collect();
        assert_eq!(keys, vec![1, 2, 3, 4, 7, 9]);
    }
}

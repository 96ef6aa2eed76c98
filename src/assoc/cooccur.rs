//! Co-occurrence counting over per-document excerpt-term lists: builds
//! the `n_a`/`n_ab` counts [`crate::assoc::score::score_pair`] scores
//! candidate pairs from (spec.md §4.8 "Associations").
use std::collections::HashMap;

/// Counts single-term occurrences and, within each document's term set,
/// every unordered pair's joint occurrence.
pub fn count_occurrences(docs: &[Vec<u32>]) -> (HashMap<u32, u32>, HashMap<(u32, u32), u32>) {
    let mut single: HashMap<u32, u32> = HashMap::new();
    let mut pair: HashMap<(u32, u32), u32> = HashMap::new();

    for terms in docs {
        let mut uniq: Vec<u32> = terms.clone();
        uniq.sort_unstable();
        uniq.dedup();
        for &t in &uniq {
            *single.entry(t).or_insert(0) += 1;
        }
        for i in 0..uniq.len() {
            for j in (i + 1)..uniq.len() {
                *pair.entry((uniq[i], uniq[j])).or_insert(0) += 1;
            }
        }
    }
    (single, pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_pair_counted_once_per_document() {
        let docs = vec![vec![1, 2, 3], vec![1, 2]];
        let (single, pair) = count_occurrences(&docs);
        assert_eq!(single[&1], 2);
        assert_eq!(single[&3], 1);
        assert_eq!(pair[&(1, 2)], 2);
        assert_eq!(pair[&(1, 3)], 1);
    }
}

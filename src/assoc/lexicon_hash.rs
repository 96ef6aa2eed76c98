//! Global lexicon approximate-match index (spec.md §4.8 "Global
//! lexicon"): a universal hash of alphabet-permuted consonant skeletons
//! buckets near-duplicate spellings together.
use std::collections::HashMap;
use twox_hash::XxHash64;
use std::hash::Hasher;

pub const DEFAULT_SKELETON_LEN: usize = 6;

/// Strips vowels from `word` and truncates to `max_len` consonants,
/// lowercased — the "consonant skeleton" used as the approximate-match
/// key.
pub fn consonant_skeleton(word: &str, max_len: usize) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic() && !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'))
        .take(max_len)
        .collect()
}

fn universal_hash(skeleton: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(skeleton.as_bytes());
    hasher.finish()
}

#[derive(Debug, Clone)]
pub struct ApproxBucket {
    pub hash: u64,
    /// `(word_id, occurrence)` pairs sharing this bucket's skeleton hash.
    pub entries: Vec<(u32, u32)>,
    pub total_occurrence: u32,
}

/// Buckets `entries` (`word`, `word_id`, `occurrence`) by the universal
/// hash of their consonant skeleton, then orders buckets by
/// `(occurrence desc, hash asc)` for the compressed byte-offset lookup
/// (spec.md §4.8 "Global lexicon").
pub fn build_approx_buckets(entries: &[(String, u32, u32)], skeleton_len: usize) -> Vec<ApproxBucket> {
    let mut by_hash: HashMap<u64, Vec<(u32, u32)>> = HashMap::new();
    for (word, word_id, occurrence) in entries {
        let hash = universal_hash(&consonant_skeleton(word, skeleton_len));
        by_hash.entry(hash).or_default().push((*word_id, *occurrence));
    }

    let mut buckets: Vec<ApproxBucket> = by_hash
        .into_iter()
        .map(|(hash, entries)| {
            let total_occurrence = entries.iter().map(|(_, occ)| occ).sum();
            ApproxBucket {
                hash,
                entries,
                total_occurrence,
            }
        })
        .collect();
    buckets.sort_by(|a, b| b.total_occurrence.cmp(&a.total_occurrence).then(a.hash.cmp(&b.hash)));
    buckets
}

/// Word-id → text reverse lookup, built symmetrically to the forward
/// dictionary (spec.md §4.8 "Word-id → text reverse lookup is built
/// symmetrically").
pub fn build_reverse_lookup(entries: &[(String, u32, u32)]) -> HashMap<u32, String> {
    entries.iter().map(|(word, word_id, _)| (*word_id, word.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vowels_are_stripped_and_length_capped() {
        assert_eq!(consonant_skeleton("aeiounicorn", 6), "ncrn");
        assert_eq!(consonant_skeleton("strengths", 4), "strn");
    }

    #[test]
    fn near_spellings_share_a_bucket() {
        let entries = vec![
            ("color".to_string(), 1, 10),
            ("colour".to_string(), 2, 5),
            ("banana".to_string(), 3, 50),
        ];
        let buckets = build_approx_buckets(&entries, 6);
        let color_bucket = buckets
            .iter()
            .find(|b| b.entries.iter().any(|(id, _)| *id == 1))
            .unwrap();
        assert!(color_bucket.entries.iter().any(|(id, _)| *id == 2));
        // Highest total occurrence sorts first.
        assert!(buckets[0].total_occurrence >= buckets.last().unwrap().total_occurrence);
    }

    #[test]
    fn reverse_lookup_maps_word_id_back_to_text() {
        let entries = vec![("alpha".to_string(), 7, 1)];
        let reverse = build_reverse_lookup(&entries);
        assert_eq!(reverse.get(&7).map(String::as_str), Some("alpha"));
    }
}

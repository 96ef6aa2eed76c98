//! Final keyword selection per excerpt (spec.md §4.8 "Final keyword list
//! per excerpt").
use crate::assoc::group::{reduce_keyword_set, KeywordCandidate};
use crate::assoc::record::KeywordHit;
use crate::ids::DocId;

/// Picks the top `final_keyword_count` candidates (by the same ordering
/// the grouped-term reduction uses) and re-sorts them by original token
/// position, matching "the top-N keywords ... are selected, sorted by
/// original token position".
pub fn select_final_keywords(candidates: Vec<KeywordCandidate>, final_keyword_count: usize) -> Vec<KeywordCandidate> {
    let mut top = reduce_keyword_set(candidates, final_keyword_count);
    top.sort_by_key(|c| c.position);
    top
}

/// Builds the `KeywordHit` records for one excerpt: `check_sum` is the
/// sum of keyword ids (spec.md §4.8 "a `check_sum` that uniquely
/// identifies the excerpt (sum of keyword ids)"), `pulse_score` is the
/// excerpt doc's score from the sorted pulse map.
pub fn build_keyword_hits(doc_id: DocId, keywords: &[KeywordCandidate], pulse_score: f32) -> Vec<KeywordHit> {
    let check_sum: u32 = keywords
        .iter()
        .fold(0u32, |acc, k| acc.wrapping_add(k.term_id));
    keywords
        .iter()
        .map(|k| KeywordHit {
            doc_id,
            keyword_id: DocId::new(k.term_id as u64),
            check_sum,
            keyword_score: k.term_weight,
            pulse_score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: u32, weight: f32, pos: u32) -> KeywordCandidate {
        KeywordCandidate {
            term_id: id,
            group_size: 1,
            term_weight: weight,
            occur: 1,
            position: pos,
        }
    }

    #[test]
    fn final_keywords_are_reordered_by_token_position() {
        let candidates = vec![term(1, 5.0, 3), term(2, 4.0, 0), term(3, 3.0, 1)];
        let selected = select_final_keywords(candidates, 3);
        let positions: Vec<u32> = selected.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 3]);
    }

    #[test]
    fn keyword_hits_share_a_check_sum_for_the_same_excerpt() {
        let candidates = vec![term(1, 1.0, 0), term(2, 1.0, 1)];
        let selected = select_final_keywords(candidates, 2);
        let hits = build_keyword_hits(DocId::new(7), &selected, 0.5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].check_sum, hits[1].check_sum);
        assert_eq!(hits[0].check_sum, 3);
    }
}

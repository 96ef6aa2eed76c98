//! Grouped-term iterative expansion (spec.md §4.8 "Grouped terms"):
//! repeatedly merges adjacent high-scoring term pairs within a sliding
//! window into new grouped-term ids, reducing the running keyword set
//! with a bounded priority queue after every cycle.
use crate::assoc::score::lookup_assoc;
use crate::ids::AssocId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordCandidate {
    pub term_id: u32,
    pub group_size: u32,
    pub term_weight: f32,
    pub occur: u32,
    pub position: u32,
}

/// Keeps the top `capacity` candidates ordered by `(group_size desc,
/// term_weight desc, occur asc)` (spec.md §4.8 "a limited priority queue
/// ... keyed by").
pub fn reduce_keyword_set(mut candidates: Vec<KeywordCandidate>, capacity: usize) -> Vec<KeywordCandidate> {
    candidates.sort_by(|a, b| {
        b.group_size
            .cmp(&a.group_size)
            .then_with(|| b.term_weight.partial_cmp(&a.term_weight).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.occur.cmp(&b.occur))
    });
    candidates.truncate(capacity);
    candidates
}

/// Runs up to `group_cycle_count` expansion cycles. Within each cycle,
/// a term is merged with the nearest term in its `scan_window_size`
/// window that the association table scores, producing a fresh
/// grouped-term id (allocated from `next_group_id`); unmerged terms carry
/// forward unchanged. Stops early once a cycle adds fewer than
/// `group_cycle_min_new` new grouped terms (spec.md §4.8 "Cycles stop
/// early when fewer than 100 new keywords are added").
pub fn run_group_cycles(
    mut terms: Vec<KeywordCandidate>,
    assoc_table: &HashMap<(u32, u32), AssocId>,
    group_cycle_count: u32,
    scan_window_size: usize,
    group_cycle_min_new: u32,
    capacity: usize,
    next_group_id: &mut u32,
) -> Vec<KeywordCandidate> {
    for _ in 0..group_cycle_count {
        let mut new_terms = Vec::with_capacity(terms.len());
        let mut new_count = 0u32;
        let mut i = 0;
        while i < terms.len() {
            let window_end = terms.len().min(i + 1 + scan_window_size);
            let mut merged_at = None;
            for j in (i + 1)..window_end {
                if lookup_assoc(assoc_table, terms[i].term_id, terms[j].term_id).is_some() {
                    merged_at = Some(j);
                    break;
                }
            }
            match merged_at {
                Some(j) => {
                    *next_group_id += 1;
                    new_terms.push(KeywordCandidate {
                        term_id: *next_group_id,
                        group_size: terms[i].group_size + terms[j].group_size,
                        term_weight: terms[i].term_weight + terms[j].term_weight,
                        occur: terms[i].occur.min(terms[j].occur),
                        position: terms[i].position.min(terms[j].position),
                    });
                    new_count += 1;
                    i = j + 1;
                }
                None => {
                    new_terms.push(terms[i].clone());
                    i += 1;
                }
            }
        }
        terms = reduce_keyword_set(new_terms, capacity);
        if new_count < group_cycle_min_new {
            break;
        }
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: u32, pos: u32) -> KeywordCandidate {
        KeywordCandidate {
            term_id: id,
            group_size: 1,
            term_weight: 1.0,
            occur: 10,
            position: pos,
        }
    }

    #[test]
    fn adjacent_scored_pair_merges_into_a_new_group() {
        let terms = vec![term(1, 0), term(2, 1), term(3, 2)];
        let mut table = HashMap::new();
        table.insert((1u32, 2u32), AssocId::new(0));
        let mut next_id = 100;
        let result = run_group_cycles(terms, &table, 1, 5, 0, 10, &mut next_id);
        assert_eq!(result.len(), 2); // (1,2) merged, 3 stays
        let merged = result.iter().find(|c| c.group_size == 2).unwrap();
        assert_eq!(merged.position, 0);
    }

    #[test]
    fn reduce_keeps_largest_groups_first() {
        let candidates = vec![
            KeywordCandidate { term_id: 1, group_size: 1, term_weight: 5.0, occur: 1, position: 0 },
            KeywordCandidate { term_id: 2, group_size: 3, term_weight: 1.0, occur: 1, position: 1 },
        ];
        let reduced = reduce_keyword_set(candidates, 1);
        assert_eq!(reduced[0].term_id, 2);
    }
}

//! Per-document hit-list assembly (spec.md §4.2): turns one document's
//! tokenizer output into globally identified `HitItem`s, sharded for
//! `base_fin_hit`/`anchor_fin_hit`, plus the excerpt-term side channel
//! consumed by the association pipeline (§4.8).
use crate::error::Error;
use crate::hitlist::record::{encode_hit, HitItem, HitType, WordHit, TERM_IMAGE, TERM_LINK, TERM_META};
use crate::ids::DocId;
use crate::lexicon::DictionaryOffset;
use std::collections::HashMap;

/// Global word id for a local id in log division `division`
/// (spec.md §4.2 "Global id mapping").
pub fn global_word_id(dict: &DictionaryOffset, division: usize, local: u32) -> u32 {
    dict.global_word(division, local)
}

/// Global doc id for a local URL id: a low bit of 0 marks a base (spidered)
/// document whose id is the local id shifted right one; a low bit of 1
/// marks a synthetic id assigned after all base-doc ids
/// (spec.md §4.2 "Global id mapping").
pub fn global_url_id(dict: &DictionaryOffset, division: usize, local: u32) -> DocId {
    if local & 1 == 0 {
        DocId::new((local >> 1) as u64)
    } else {
        DocId::new(dict.global_link(division, local >> 1) as u64)
    }
}

/// One document's tokenizer output, already split into hits in emission
/// order. `anchor_target_local` is set on a `TERM_LINK` hit whose anchor
/// points elsewhere; its target is resolved and, if non-spidered,
/// duplicated into the anchor hit stream with the target's doc id.
pub struct DocumentInput<'a> {
    pub doc_id: DocId,
    pub hits: &'a [WordHit],
    pub anchor_targets: &'a HashMap<usize, u32>,
}

#[derive(Debug, Default)]
pub struct AssembledDocument {
    /// Count of non-excluded tokens (spec.md §4.2 invariants).
    pub doc_size: u32,
    pub base_hits: Vec<(u32, HitItem)>,
    pub anchor_hits: Vec<(u32, HitItem)>,
    /// `(global_word_id, occurrence_enc)` pairs for the excerpt-term side
    /// channel, emitted only for hits under the occurrence threshold.
    pub excerpt_terms: Vec<(u32, u16)>,
    pub title_tokens: Vec<(u32, u16)>,
}

/// Assembles one document's hits. `word_log` yields local ids in hit
/// order for every hit that is not resolved directly through the
/// stop-word lexicon. `occurrence_counts` is the global-word-id →
/// occurrence-count table from the earlier k-th-order-statistic pass;
/// hits under `excerpt_occurrence_threshold` feed the excerpt side
/// channel.
pub fn assemble_document(
    dict: &DictionaryOffset,
    hit_list_breadth: u32,
    excerpt_occurrence_threshold: u32,
    occurrence_counts: &HashMap<u32, u32>,
    mut word_log: impl Iterator<Item = u32>,
    doc: &DocumentInput,
) -> Result<AssembledDocument, Error> {
    let mut out = AssembledDocument::default();
    let mut image_counter: u32 = 0;
    let mut position: u16 = 0;

    for (idx, hit) in doc.hits.iter().enumerate() {
        let global_id = if hit.consumes_word_log() {
            let local = word_log
                .next()
                .ok_or_else(|| Error::Mismatch("word_log exhausted before hit list".into()))?;
            global_word_id(dict, hit.word_div as usize, local)
        } else {
            if hit.word_id < 0 {
                return Err(Error::Corrupted("stop hit missing lexicon word id".into()));
            }
            hit.word_id as u32
        };

        if hit.is_dropped() {
            position += 1;
            continue;
        }
        out.doc_size += 1;

        let hit_type = if hit.has(TERM_IMAGE) {
            HitType::Image
        } else if hit.has(TERM_META) {
            HitType::Title
        } else {
            HitType::Excerpt
        };

        let image_id = if hit_type == HitType::Image {
            let id = DocId::new(image_counter as u64);
            image_counter += 1;
            Some(id)
        } else {
            None
        };

        let enc = encode_hit(hit_type, position);
        position += 1;

        let item = HitItem {
            word_id: global_id,
            doc_id: doc.doc_id,
            enc,
            image_id,
        };
        let shard = global_id % hit_list_breadth;
        out.base_hits.push((shard, item));

        if hit_type == HitType::Title {
            out.title_tokens.push((global_id, enc));
        }

        if hit.has(TERM_LINK) {
            if let Some(&target_local) = doc.anchor_targets.get(&idx) {
                let non_spidered = target_local & 1 != 0;
                if non_spidered {
                    let target_doc = global_url_id(dict, hit.word_div as usize, target_local);
                    let anchor_item = HitItem {
                        word_id: global_id,
                        doc_id: target_doc,
                        enc,
                        image_id: None,
                    };
                    out.anchor_hits.push((shard, anchor_item));
                }
            }
        }

        if let Some(&occ) = occurrence_counts.get(&global_id) {
            if occ < excerpt_occurrence_threshold {
                out.excerpt_terms.push((global_id, enc));
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hitlist::record::{TERM_STOP, TERM_EXCLUDE};

    fn dict_single_division(word_count: u32) -> DictionaryOffset {
        DictionaryOffset::build(&[(word_count, 0, 1)])
    }

    /// End-to-end scenario 1 (spec.md §8): one document, title "alpha
    /// beta", body "alpha gamma" — alpha gets 2 hits, beta 1 title hit,
    /// gamma 1 excerpt hit, all on doc_id 0.
    #[test]
    fn trivial_corpus_assigns_expected_hit_types() {
        let dict = dict_single_division(3); // alpha=0, beta=1, gamma=2
        let hits = vec![
            WordHit { term_type: TERM_META, word_id: -1, word_div: 0 }, // alpha (title)
            WordHit { term_type: TERM_META, word_id: -1, word_div: 0 }, // beta (title)
            WordHit { term_type: 0, word_id: -1, word_div: 0 },         // alpha (excerpt)
            WordHit { term_type: 0, word_id: -1, word_div: 0 },         // gamma (excerpt)
        ];
        let anchor_targets = HashMap::new();
        let doc = DocumentInput {
            doc_id: DocId::new(0),
            hits: &hits,
            anchor_targets: &anchor_targets,
        };
        let word_log = vec![0u32, 1, 0, 2].into_iter();
        let assembled = assemble_document(&dict, 1, 0, &HashMap::new(), word_log, &doc).unwrap();

        assert_eq!(assembled.doc_size, 4);
        let alpha_hits: Vec<_> = assembled
            .base_hits
            .iter()
            .filter(|(_, h)| h.word_id == 0)
            .collect();
        assert_eq!(alpha_hits.len(), 2);
        assert_eq!(alpha_hits[0].1.hit_type().unwrap(), HitType::Title);
        assert_eq!(alpha_hits[1].1.hit_type().unwrap(), HitType::Excerpt);

        let beta = assembled.base_hits.iter().find(|(_, h)| h.word_id == 1).unwrap();
        assert_eq!(beta.1.hit_type().unwrap(), HitType::Title);

        let gamma = assembled.base_hits.iter().find(|(_, h)| h.word_id == 2).unwrap();
        assert_eq!(gamma.1.hit_type().unwrap(), HitType::Excerpt);
        assert!(assembled.base_hits.iter().all(|(_, h)| h.doc_id == DocId::new(0)));
    }

    /// End-to-end scenario 2 (spec.md §8): an anchor hit pointing at a
    /// non-spidered target is duplicated into the anchor stream carrying
    /// the synthesized target doc id.
    #[test]
    fn anchor_hit_to_unspidered_target_is_duplicated() {
        let dict = DictionaryOffset::build(&[(1, 10, 1)]); // 1 word, 10 link slots
        let hits = vec![WordHit { term_type: TERM_LINK, word_id: -1, word_div: 0 }];
        let mut anchor_targets = HashMap::new();
        // local id 5, low bit 1 => non-spidered; local link index = 5 >> 1 = 2
        anchor_targets.insert(0usize, 5u32);
        let doc = DocumentInput {
            doc_id: DocId::new(0),
            hits: &hits,
            anchor_targets: &anchor_targets,
        };
        let word_log = vec![0u32].into_iter();
        let assembled = assemble_document(&dict, 1, 0, &HashMap::new(), word_log, &doc).unwrap();

        assert_eq!(assembled.anchor_hits.len(), 1);
        let expected_target = global_url_id(&dict, 0, 5);
        assert!(expected_target.get() >= 1); // synthesized, past the single base doc
        assert_eq!(assembled.anchor_hits[0].1.doc_id, expected_target);
    }

    #[test]
    fn excluded_hit_is_counted_but_not_emitted() {
        let dict = dict_single_division(1);
        let hits = vec![WordHit {
            term_type: TERM_STOP | TERM_EXCLUDE,
            word_id: 0,
            word_div: 0,
        }];
        let anchor_targets = HashMap::new();
        let doc = DocumentInput {
            doc_id: DocId::new(0),
            hits: &hits,
            anchor_targets: &anchor_targets,
        };
        let assembled =
            assemble_document(&dict, 1, 0, &HashMap::new(), std::iter::empty(), &doc).unwrap();
        assert_eq!(assembled.doc_size, 0);
        assert!(assembled.base_hits.is_empty());
    }

    #[test]
    fn word_log_exhaustion_is_a_mismatch() {
        let dict = dict_single_division(1);
        let hits = vec![WordHit { term_type: 0, word_id: -1, word_div: 0 }];
        let anchor_targets = HashMap::new();
        let doc = DocumentInput {
            doc_id: DocId::new(0),
            hits: &hits,
            anchor_targets: &anchor_targets,
        };
        let err = assemble_document(&dict, 1, 0, &HashMap::new(), std::iter::empty(), &doc)
            .unwrap_err();
        assert!(matches!(err, Error::Mismatch(_)));
    }
}

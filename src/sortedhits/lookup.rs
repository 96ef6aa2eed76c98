//! Lookup-index construction (spec.md §4.7): a second pass over the three
//! sorted per-type hit streams emitting spatial checkpoints plus one
//! starting record per new `word_id`.
use crate::hitlist::record::HitItem;
use crate::sortedhits::record::SLookupIndex;

const HIT_ITEM_NO_IMAGE_LEN: u64 = 4 + 5 + 2 + 1;
const HIT_ITEM_WITH_IMAGE_LEN: u64 = HIT_ITEM_NO_IMAGE_LEN + 5;

fn encoded_len(hit: &HitItem) -> u64 {
    if hit.image_id.is_some() {
        HIT_ITEM_WITH_IMAGE_LEN
    } else {
        HIT_ITEM_NO_IMAGE_LEN
    }
}

/// Builds the lookup-index stream for one word division. `title_hits`,
/// `excerpt_hits`, and `image_hits` must each already be sorted by
/// `(word_id, doc_id, enc)` (the output of
/// [`crate::sortedhits::sort_hits_by_cluster`], partitioned by hit type).
/// Emits a checkpoint every `max_spat_num` bytes of combined stream
/// progress, plus a starting record the first time a `word_id` is seen in
/// any stream.
pub fn build_lookup_index(
    title_hits: &[HitItem],
    excerpt_hits: &[HitItem],
    image_hits: &[HitItem],
    max_spat_num: u64,
) -> Vec<SLookupIndex> {
    let mut out = Vec::new();
    let (mut ti, mut ei, mut ii) = (0usize, 0usize, 0usize);
    let (mut title_offset, mut excerpt_offset, mut image_offset) = (0u64, 0u64, 0u64);
    let mut bytes_since_checkpoint = 0u64;
    let mut last_word_id: Option<u32> = None;

    loop {
        let next_word = [
            title_hits.get(ti).map(|h| h.word_id),
            excerpt_hits.get(ei).map(|h| h.word_id),
            image_hits.get(ii).map(|h| h.word_id),
        ]
        .into_iter()
        .flatten()
        .min();
        let Some(word_id) = next_word else { break };

        let is_word_start = last_word_id != Some(word_id);
        if is_word_start || bytes_since_checkpoint >= max_spat_num {
            out.push(SLookupIndex {
                word_id,
                title_offset,
                excerpt_offset,
                image_offset,
                is_word_start,
            });
            bytes_since_checkpoint = 0;
        }
        last_word_id = Some(word_id);

        while title_hits.get(ti).map(|h| h.word_id) == Some(word_id) {
            let len = encoded_len(&title_hits[ti]);
            title_offset += len;
            bytes_since_checkpoint += len;
            ti += 1;
        }
        while excerpt_hits.get(ei).map(|h| h.word_id) == Some(word_id) {
            let len = encoded_len(&excerpt_hits[ei]);
            excerpt_offset += len;
            bytes_since_checkpoint += len;
            ei += 1;
        }
        while image_hits.get(ii).map(|h| h.word_id) == Some(word_id) {
            let len = encoded_len(&image_hits[ii]);
            image_offset += len;
            bytes_since_checkpoint += len;
            ii += 1;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hitlist::record::encode_hit;
    use crate::hitlist::HitType;
    use crate::ids::DocId;

    fn hit(word_id: u32, doc: u64) -> HitItem {
        HitItem {
            word_id,
            doc_id: DocId::new(doc),
            enc: encode_hit(HitType::Title, 0),
            image_id: None,
        }
    }

    #[test]
    fn every_word_gets_a_starting_record() {
        let title_hits = vec![hit(0, 0), hit(0, 1), hit(1, 0), hit(2, 0)];
        let index = build_lookup_index(&title_hits, &[], &[], 1_000_000);
        let starts: Vec<u32> = index.iter().filter(|r| r.is_word_start).map(|r| r.word_id).collect();
        assert_eq!(starts, vec![0, 1, 2]);
    }

    #[test]
    fn stepping_by_recorded_offsets_lands_on_next_words_first_hit() {
        let title_hits = vec![hit(0, 0), hit(0, 1), hit(1, 0)];
        let index = build_lookup_index(&title_hits, &[], &[], 1_000_000);
        let word0 = index.iter().find(|r| r.word_id == 0).unwrap();
        let word1 = index.iter().find(|r| r.word_id == 1).unwrap();
        assert_eq!(word1.title_offset - word0.title_offset, 2 * HIT_ITEM_NO_IMAGE_LEN);
    }
}

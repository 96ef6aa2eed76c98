//! Hit sort (spec.md §4.7): remaps each hit's doc id through the
//! backward cluster map and sorts by `(word_id, cluster_doc_id, enc)`.
use crate::hitlist::record::HitItem;
use crate::ids::DocId;
use std::collections::HashMap;

/// Re-numbers `hits` via `backward_clus_map` (base doc id → hierarchy
/// cluster doc id) and sorts the result by `(word_id, cluster_doc_id,
/// enc)`, the order the sorted-hit store is queried in.
pub fn sort_hits_by_cluster(hits: Vec<HitItem>, backward_clus_map: &HashMap<DocId, DocId>) -> Vec<HitItem> {
    let mut remapped: Vec<HitItem> = hits
        .into_iter()
        .map(|mut hit| {
            if let Some(&cluster_doc_id) = backward_clus_map.get(&hit.doc_id) {
                hit.doc_id = cluster_doc_id;
            }
            hit
        })
        .collect();
    remapped.sort_by_key(|h| (h.word_id, h.doc_id, h.enc));
    remapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hitlist::record::encode_hit;
    use crate::hitlist::HitType;

    #[test]
    fn hits_are_remapped_then_sorted_by_word_then_cluster_doc_then_enc() {
        let hits = vec![
            HitItem { word_id: 2, doc_id: DocId::new(0), enc: encode_hit(HitType::Title, 0), image_id: None },
            HitItem { word_id: 1, doc_id: DocId::new(1), enc: encode_hit(HitType::Title, 0), image_id: None },
            HitItem { word_id: 1, doc_id: DocId::new(0), enc: encode_hit(HitType::Excerpt, 0), image_id: None },
        ];
        let mut map = HashMap::new();
        map.insert(DocId::new(0), DocId::new(50));
        map.insert(DocId::new(1), DocId::new(10));

        let sorted = sort_hits_by_cluster(hits, &map);
        assert_eq!(sorted[0].word_id, 1);
        assert_eq!(sorted[0].doc_id, DocId::new(10));
        assert_eq!(sorted[1].word_id, 1);
        assert_eq!(sorted[1].doc_id, DocId::new(50));
        assert_eq!(sorted[2].word_id, 2);
    }
}

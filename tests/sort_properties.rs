//! Property-based check of the sorted-hit ordering invariant (spec.md
//! §4.7: "sorted files hold `(word_id asc, doc_id asc, enc asc)`").
use dyabledex::hitlist::record::{encode_hit, HitItem, HitType};
use dyabledex::ids::DocId;
use dyabledex::sortedhits::sort_hits_by_cluster;
use proptest::prelude::*;
use std::collections::HashMap;

fn arb_hit() -> impl Strategy<Value = HitItem> {
    (0u32..20, 0u64..20, 0u16..3).prop_map(|(word_id, doc, position)| {
        let hit_type = match position % 3 {
            0 => HitType::Title,
            1 => HitType::Excerpt,
            _ => HitType::Image,
        };
        HitItem {
            word_id,
            doc_id: DocId::new(doc),
            enc: encode_hit(hit_type, position),
            image_id: None,
        }
    })
}

proptest! {
    #[test]
    fn sorted_output_is_always_non_decreasing(hits in prop::collection::vec(arb_hit(), 0..64)) {
        let sorted = sort_hits_by_cluster(hits, &HashMap::new());
        for pair in sorted.windows(2) {
            let a = (pair[0].word_id, pair[0].doc_id, pair[0].enc);
            let b = (pair[1].word_id, pair[1].doc_id, pair[1].enc);
            prop_assert!(a <= b);
        }
    }

    #[test]
    fn sort_preserves_element_count(hits in prop::collection::vec(arb_hit(), 0..64)) {
        let len = hits.len();
        let sorted = sort_hits_by_cluster(hits, &HashMap::new());
        prop_assert_eq!(sorted.len(), len);
    }
}

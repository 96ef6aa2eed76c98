//! Duplicate-edge merge (spec.md §4.3): per source node, accumulate
//! traversal weight across duplicate destinations and normalize by the
//! source's averaged pulse score.
use crate::ids::DocId;
use crate::linkgraph::record::BinLink;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Webgraph,
    Keyword,
}

impl LinkKind {
    fn weight_scale(self) -> f32 {
        match self {
            LinkKind::Webgraph => 1.0,
            LinkKind::Keyword => 0.1,
        }
    }
}

/// Merges duplicate `(src, dst)` edges within each contiguous source-node
/// group of `edges`, scaling webgraph edges by 1 and keyword edges by 0.1
/// before mixing, then dividing the source's averaged pulse score (from
/// `pulse_scores`, `(webgraph_score, keyword_score)`) into the outgoing
/// weight to normalize. `edges` must already be grouped by `src`
/// (not necessarily globally sorted) — the caller arranges this via the
/// shuffle/merge substrate before calling in.
pub fn merge_duplicate_edges(
    edges: &[(DocId, DocId, f32, LinkKind)],
    pulse_scores: &HashMap<DocId, (f32, f32)>,
) -> Vec<BinLink> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < edges.len() {
        let src = edges[i].0;
        let mut table: HashMap<DocId, f32> = HashMap::new();
        let mut j = i;
        while j < edges.len() && edges[j].0 == src {
            let (_, dst, weight, kind) = edges[j];
            *table.entry(dst).or_insert(0.0) += weight * kind.weight_scale();
            j += 1;
        }
        let norm = pulse_scores
            .get(&src)
            .map(|(webgraph, keyword)| (webgraph + keyword) / 2.0)
            .filter(|n| *n > 0.0)
            .unwrap_or(1.0);
        for (dst, weight) in table {
            out.push(BinLink {
                src,
                dst,
                weight: weight / norm,
            });
        }
        i = j;
    }
    out
}

/// Shard assignment for `bin_link_set0.set.<c>` (spec.md §4.3 "Sharding").
pub fn shard_for_source(src: DocId, client_count: u32) -> u32 {
    (src.get() % client_count as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_edges_are_summed_and_scaled() {
        let a = DocId::new(1);
        let b = DocId::new(2);
        let edges = vec![
            (a, b, 1.0, LinkKind::Webgraph),
            (a, b, 1.0, LinkKind::Webgraph),
            (a, b, 1.0, LinkKind::Keyword),
        ];
        let pulse = HashMap::new();
        let merged = merge_duplicate_edges(&edges, &pulse);
        assert_eq!(merged.len(), 1);
        assert!((merged[0].weight - 2.1).abs() < 1e-6);
    }

    #[test]
    fn weight_is_normalized_by_averaged_pulse_score() {
        let a = DocId::new(1);
        let b = DocId::new(2);
        let edges = vec![(a, b, 4.0, LinkKind::Webgraph)];
        let mut pulse = HashMap::new();
        pulse.insert(a, (1.0, 3.0)); // average 2.0
        let merged = merge_duplicate_edges(&edges, &pulse);
        assert!((merged[0].weight - 2.0).abs() < 1e-6);
    }

    #[test]
    fn distinct_source_groups_stay_independent() {
        let a = DocId::new(1);
        let b = DocId::new(2);
        let c = DocId::new(3);
        let edges = vec![
            (a, b, 1.0, LinkKind::Webgraph),
            (c, b, 1.0, LinkKind::Webgraph),
        ];
        let merged = merge_duplicate_edges(&edges, &HashMap::new());
        assert_eq!(merged.len(), 2);
    }
}

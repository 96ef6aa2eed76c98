//! Hierarchy merge (`MergeClusterHiearchies`, spec.md §4.5): groups base
//! nodes sharing a label-propagation label into cluster nodes, and places
//! label-less singletons ("orphan nodes") into synthetic groups capped at
//! `MaxChildCount` members, themselves capped at `MaxClusNodeNum` total
//! nodes — grounded in the orphan-node handling of `CMergeClusterHiearchies`
//! (`MergeOrphanNodes`, `max_child_num`) in the source implementation.
use crate::clustering::record::{ClusterLink, ClusterMap, HierarchyStat, SummaryLink};
use crate::ids::{ClusterId, DocId};
use std::collections::HashMap;

pub struct MergedHierarchy {
    pub stats: Vec<HierarchyStat>,
    pub cluster_map: Vec<ClusterMap>,
}

/// Converts subsumed [`ClusterLink`]s (those with `cluster_link.0 ==
/// cluster_link.1`, spec.md §3) into [`SummaryLink`]s. `create_level`
/// carries the propagation cycle the link was detected at unchanged;
/// `subsume_level` is pinned to 1, the cluster-root level, because this
/// hierarchy merge produces exactly two levels (base leaves at 0, cluster
/// nodes at 1) rather than the fully recursive multi-level merge the
/// source describes — the same simplification `abtree::stage` already
/// documents for its single-shard tree.
pub fn build_summary_links(cluster_links: &[ClusterLink]) -> Vec<SummaryLink> {
    cluster_links
        .iter()
        .filter(|link| link.cluster_link.0 == link.cluster_link.1)
        .map(|link| SummaryLink {
            src: link.base_link.0,
            dst: link.base_link.1,
            create_level: link.create_level,
            subsume_level: 1,
            trav_prob: link.link_weight,
            is_forward: true,
        })
        .collect()
}

/// Groups `labels` (base node → propagation label) into cluster nodes.
/// Labels shared by more than one base node become a real cluster node;
/// labels held by exactly one node are collected as orphans and regrouped
/// into synthetic clusters of up to `max_child_count` nodes each, sorted
/// by decreasing pulse score, themselves capped at `max_clus_node_num`
/// total base nodes per synthetic cluster.
pub fn merge_hierarchy(
    labels: &HashMap<DocId, u64>,
    pulse_scores: &HashMap<DocId, f32>,
    max_clus_node_num: u32,
    max_child_count: u32,
) -> MergedHierarchy {
    let mut groups: HashMap<u64, Vec<DocId>> = HashMap::new();
    for (&node, &label) in labels {
        groups.entry(label).or_default().push(node);
    }

    let mut stats = Vec::new();
    let mut cluster_map = Vec::new();
    let mut orphans: Vec<DocId> = Vec::new();
    let mut next_merge_index: u64 = 0;

    let mut ordered_groups: Vec<(u64, Vec<DocId>)> = groups.into_iter().collect();
    ordered_groups.sort_by_key(|(label, _)| *label);

    for (_, mut members) in ordered_groups {
        if members.len() == 1 {
            orphans.push(members.pop().unwrap());
            continue;
        }
        members.sort();
        let clus_id = ClusterId::from_merge_index(next_merge_index);
        next_merge_index += 1;
        let pulse_score: f32 = members.iter().map(|n| *pulse_scores.get(n).unwrap_or(&0.0)).sum();
        stats.push(HierarchyStat {
            clus_id,
            total_subtrees: members.len() as u32,
            total_node_num: members.len() as u32,
            pulse_score,
        });
        for node in members {
            cluster_map.push(ClusterMap { base_node: node, cluster: clus_id });
        }
    }

    orphans.sort_by(|a, b| {
        let pa = pulse_scores.get(a).copied().unwrap_or(0.0);
        let pb = pulse_scores.get(b).copied().unwrap_or(0.0);
        pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
    });

    let group_cap = max_child_count.min(max_clus_node_num).max(1) as usize;
    for chunk in orphans.chunks(group_cap) {
        let clus_id = ClusterId::from_merge_index(next_merge_index);
        next_merge_index += 1;
        let pulse_score: f32 = chunk.iter().map(|n| *pulse_scores.get(n).unwrap_or(&0.0)).sum();
        stats.push(HierarchyStat {
            clus_id,
            total_subtrees: chunk.len() as u32,
            total_node_num: chunk.len() as u32,
            pulse_score,
        });
        for &node in chunk {
            cluster_map.push(ClusterMap { base_node: node, cluster: clus_id });
        }
    }

    MergedHierarchy { stats, cluster_map }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_labels_merge_into_one_cluster() {
        let a = DocId::new(0);
        let b = DocId::new(1);
        let mut labels = HashMap::new();
        labels.insert(a, 7);
        labels.insert(b, 7);
        let merged = merge_hierarchy(&labels, &HashMap::new(), 64, 16);
        assert_eq!(merged.stats.len(), 1);
        assert_eq!(merged.stats[0].total_node_num, 2);
        assert!(merged.stats[0].clus_id.is_synthetic());
    }

    #[test]
    fn singleton_labels_become_orphan_groups_capped_by_child_count() {
        let nodes: Vec<DocId> = (0..10).map(DocId::new).collect();
        let labels: HashMap<DocId, u64> = nodes.iter().enumerate().map(|(i, &n)| (n, i as u64)).collect();
        let merged = merge_hierarchy(&labels, &HashMap::new(), 64, 4);
        assert_eq!(merged.stats.len(), 3); // ceil(10/4)
        assert!(merged.stats.iter().all(|s| s.total_node_num <= 4));
        assert_eq!(merged.cluster_map.len(), 10);
    }

    #[test]
    fn orphans_are_ordered_by_decreasing_pulse_score_within_a_group() {
        let nodes: Vec<DocId> = (0..4).map(DocId::new).collect();
        let labels: HashMap<DocId, u64> = nodes.iter().enumerate().map(|(i, &n)| (n, i as u64)).collect();
        let mut pulse = HashMap::new();
        pulse.insert(nodes[0], 0.1);
        pulse.insert(nodes[1], 0.9);
        pulse.insert(nodes[2], 0.5);
        pulse.insert(nodes[3], 0.3);
        let merged = merge_hierarchy(&labels, &pulse, 64, 4);
        assert_eq!(merged.stats.len(), 1);
        assert!((merged.stats[0].pulse_score - 1.8).abs() < 1e-6);
    }

    #[test]
    fn only_subsumed_cluster_links_become_summary_links() {
        let a = DocId::new(0);
        let b = DocId::new(1);
        let c = DocId::new(2);
        let subsumed = ClusterId::from_merge_index(7);
        let not_subsumed = (ClusterId::from_merge_index(7), ClusterId::from_merge_index(8));
        let links = vec![
            ClusterLink {
                base_link: (a, b),
                cluster_link: (subsumed, subsumed),
                link_weight: 0.5,
                create_level: 2,
            },
            ClusterLink {
                base_link: (b, c),
                cluster_link: not_subsumed,
                link_weight: 0.9,
                create_level: 3,
            },
        ];
        let summary = build_summary_links(&links);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].src, a);
        assert_eq!(summary[0].dst, b);
        assert_eq!(summary[0].create_level, 2);
        assert_eq!(summary[0].subsume_level, 1);
    }
}

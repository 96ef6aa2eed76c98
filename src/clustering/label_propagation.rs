//! Label propagation (`MergeClusterNodes`, spec.md §4.5): each base node
//! carries a label, initially itself; per cycle, a node adopts the
//! maximum-weight label among its incoming edges, oversized label groups
//! are split to respect `MaxClusNodeNum`, and the edge set is thinned to
//! its per-destination maximum-weight edge for the next cycle (the
//! spanning-graph thinning hierarchy merge relies on).
use crate::clustering::record::ClusterLink;
use crate::ids::{ClusterId, DocId};
use crate::pulserank::iterate::gaussian_reinit_back_buffer;
use std::collections::{HashMap, HashSet};

/// One directed, weighted edge of the clustered graph, by base-doc id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedEdge {
    pub src: DocId,
    pub dst: DocId,
    pub weight: f32,
}

/// For each destination, sums incoming weight per source label and
/// assigns the destination the maximum-weight label (ties broken by the
/// lower label id, spec.md §4.5 step 2).
fn accumulate_labels(edges: &[WeightedEdge], labels: &HashMap<DocId, u64>) -> HashMap<DocId, u64> {
    let mut weight_per_dst_label: HashMap<DocId, HashMap<u64, f32>> = HashMap::new();
    for edge in edges {
        let label = *labels.get(&edge.src).unwrap_or(&edge.src.get());
        *weight_per_dst_label
            .entry(edge.dst)
            .or_default()
            .entry(label)
            .or_insert(0.0) += edge.weight;
    }

    let mut next = labels.clone();
    for (dst, per_label) in weight_per_dst_label {
        let best = per_label
            .into_iter()
            .fold(None, |acc: Option<(u64, f32)>, (label, w)| match acc {
                None => Some((label, w)),
                Some((best_label, best_w)) => {
                    if w > best_w || (w == best_w && label < best_label) {
                        Some((label, w))
                    } else {
                        Some((best_label, best_w))
                    }
                }
            });
        if let Some((label, _)) = best {
            next.insert(dst, label);
        }
    }
    next
}

/// Splits any label group exceeding `max_clus_node_num` into chunks of at
/// most that size, assigning each extra chunk a fresh label drawn from
/// `next_label_id` (spec.md §4.5 step 3 "Update and remap"). Members are
/// ordered by decreasing `reinit_score` (ties broken by doc id) before
/// chunking, so the chunk that keeps the original label is the one the
/// WavePass back-buffer re-initialization favors, rather than an
/// arbitrary doc-id-ordered prefix.
fn enforce_cap(
    labels: &mut HashMap<DocId, u64>,
    reinit_scores: &HashMap<DocId, f32>,
    max_clus_node_num: u32,
    next_label_id: &mut u64,
) {
    let mut groups: HashMap<u64, Vec<DocId>> = HashMap::new();
    for (&node, &label) in labels.iter() {
        groups.entry(label).or_default().push(node);
    }
    for (label, mut members) in groups {
        if members.len() as u32 <= max_clus_node_num {
            continue;
        }
        members.sort_by(|a, b| {
            let sa = reinit_scores.get(a).copied().unwrap_or(0.0);
            let sb = reinit_scores.get(b).copied().unwrap_or(0.0);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.cmp(b))
        });
        for (i, chunk) in members.chunks(max_clus_node_num as usize).enumerate() {
            let chunk_label = if i == 0 {
                label
            } else {
                *next_label_id += 1;
                *next_label_id
            };
            for &node in chunk {
                labels.insert(node, chunk_label);
            }
        }
    }
}

/// Keeps, per destination, only the maximum-weighted incoming edge
/// (spec.md §4.5 "the cycle's 'maximum link' pass"). This is the
/// thinning pass that makes the graph sparse enough for hierarchy merge.
fn max_link_thin(edges: &[WeightedEdge]) -> Vec<WeightedEdge> {
    let mut best: HashMap<DocId, WeightedEdge> = HashMap::new();
    for &edge in edges {
        best.entry(edge.dst)
            .and_modify(|kept| {
                if edge.weight > kept.weight {
                    *kept = edge;
                }
            })
            .or_insert(edge);
    }
    best.into_values().collect()
}

/// Scans `edges` for pairs whose endpoints now share a label but were not
/// already recorded as subsumed, emitting a [`ClusterLink`] stamped with
/// the current cycle as `create_level` (spec.md §4.5 invariant:
/// "`subsume_level` of a summary link equals the cycle at which its two
/// endpoints first shared a label"). `seen` tracks already-subsumed base
/// pairs across cycles so a link is only emitted once.
fn detect_subsumptions(
    edges: &[WeightedEdge],
    labels: &HashMap<DocId, u64>,
    level: u8,
    seen: &mut HashSet<(DocId, DocId)>,
) -> Vec<ClusterLink> {
    let mut links = Vec::new();
    for edge in edges {
        if edge.src == edge.dst || !seen.insert((edge.src, edge.dst)) {
            continue;
        }
        let src_label = labels.get(&edge.src).copied();
        let dst_label = labels.get(&edge.dst).copied();
        if src_label.is_some() && src_label == dst_label {
            let cluster = ClusterId::from_merge_index(src_label.unwrap());
            links.push(ClusterLink {
                base_link: (edge.src, edge.dst),
                cluster_link: (cluster, cluster),
                link_weight: edge.weight,
                create_level: level,
            });
        } else {
            seen.remove(&(edge.src, edge.dst));
        }
    }
    links
}

/// Runs label propagation to a fixed point over `wave_pass_cycles *
/// wave_pass_inst` cycles (spec.md §4.5), returning the final base-node
/// → label assignment plus every [`ClusterLink`] detected as subsumed
/// along the way (one per base edge, the first cycle its endpoints
/// shared a label). `rng_seed` drives the WavePass back-buffer Gaussian
/// re-initialization (spec.md §9 Open Question 2) used to order
/// cap-split groups.
pub fn run_label_propagation(
    edges: &[WeightedEdge],
    base_nodes: &[DocId],
    wave_pass_cycles: u32,
    wave_pass_inst: u32,
    max_clus_node_num: u32,
    rng_seed: u64,
) -> (HashMap<DocId, u64>, Vec<ClusterLink>) {
    let mut labels: HashMap<DocId, u64> = base_nodes.iter().map(|&n| (n, n.get())).collect();
    let mut current_edges = edges.to_vec();
    let mut next_label_id = base_nodes.iter().map(|n| n.get()).max().unwrap_or(0) + 1;
    let reinit_scores = gaussian_reinit_back_buffer(base_nodes, rng_seed);
    let mut seen_subsumed: HashSet<(DocId, DocId)> = HashSet::new();
    let mut cluster_links = Vec::new();

    let total_cycles = wave_pass_cycles * wave_pass_inst;
    for cycle in 0..total_cycles {
        labels = accumulate_labels(&current_edges, &labels);
        enforce_cap(&mut labels, &reinit_scores, max_clus_node_num, &mut next_label_id);
        let level = (cycle + 1).min(u8::MAX as u32) as u8;
        cluster_links.extend(detect_subsumptions(&current_edges, &labels, level, &mut seen_subsumed));
        current_edges = max_link_thin(&current_edges);
    }
    (labels, cluster_links)
}

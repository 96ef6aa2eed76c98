//! The pulse-rank fixed-point iteration (spec.md §4.4). Modeled on a
//! single process here (the in-process execution mode, §4.1.e); the
//! per-shard back/forward buffer files the production coordinator path
//! writes are the same two maps this function keeps in memory.
use crate::ids::DocId;
use crate::linkgraph::record::BinLink;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::collections::HashMap;

/// Re-initializes a WavePass back buffer from `Normal(0.2, 1.0)`, then
/// normalizes so its entries sum to 1 (spec.md §4.4.e, resolving Open
/// Question 2: the source seeds this draw from wall-clock time, which the
/// redesign forbids — `rng_seed` makes the draw, and therefore the whole
/// pipeline's output, deterministic).
pub fn gaussian_reinit_back_buffer(nodes: &[DocId], rng_seed: u64) -> HashMap<DocId, f32> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(rng_seed);
    let normal = Normal::new(0.2_f32, 1.0_f32).expect("fixed, valid Normal parameters");
    let mut draws: HashMap<DocId, f32> = nodes
        .iter()
        .map(|&n| (n, normal.sample(&mut rng).abs()))
        .collect();
    let total: f32 = draws.values().sum();
    let norm = if total > 0.0 { total } else { 1.0 };
    for score in draws.values_mut() {
        *score /= norm;
    }
    draws
}

/// Runs `cycles` pulse-rank iterations over `edges` and returns the final
/// per-node score map. `base_node_count` seeds every node's initial score
/// at `1 / base_node_count` (spec.md §4.4 "Initial score").
///
/// Each cycle streams the back buffer across outgoing edges into a
/// forward buffer (`dst -> sum of src_score * weight`), then normalizes
/// the forward buffer by its total mass to become the next back buffer —
/// this is the single-process equivalent of "net score" normalization,
/// since net score is exactly the forward buffer's total before
/// normalization. On the final cycle, nodes absent from the forward
/// stream (no incoming edge this cycle) keep their previous score
/// (spec.md §4.4 "External nodes").
pub fn pulse_rank(edges: &[BinLink], base_node_count: u64, cycles: u32) -> HashMap<DocId, f32> {
    let initial = if base_node_count == 0 {
        0.0
    } else {
        1.0 / base_node_count as f32
    };
    let mut nodes: std::collections::HashSet<DocId> = edges.iter().flat_map(|e| [e.src, e.dst]).collect();
    for i in 0..base_node_count {
        nodes.insert(DocId::new(i));
    }
    let mut back: HashMap<DocId, f32> = nodes.iter().map(|&n| (n, initial)).collect();

    for cycle in 0..cycles {
        let mut forward: HashMap<DocId, f32> = HashMap::new();
        for edge in edges {
            let src_score = *back.get(&edge.src).unwrap_or(&0.0);
            *forward.entry(edge.dst).or_insert(0.0) += src_score * edge.weight;
        }

        let is_final = cycle + 1 == cycles;
        if is_final {
            for (&node, &score) in &back {
                forward.entry(node).or_insert(score);
            }
        }

        let total: f32 = forward.values().sum();
        let norm = if total > 0.0 { total } else { 1.0 };
        back = forward.into_iter().map(|(node, score)| (node, score / norm)).collect();
    }

    back
}

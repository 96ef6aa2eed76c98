//! Wires label propagation + hierarchy merge to the segmented-file
//! substrate (spec.md §4.5, §6). Both passes need the whole clustered
//! graph in memory, so like pulse-rank this stage has no `shard`
//! parameter: it reads every `bin_link_set0.set.<c>` edge shard and the
//! pulse map, and writes `cluster_map` / `hierarchy_stats` /
//! `summary_links`, the latter consumed by `abtree::stage`.
use crate::clustering::hierarchy::{build_summary_links, merge_hierarchy, MergedHierarchy};
use crate::clustering::label_propagation::{run_label_propagation, WeightedEdge};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::ids::DocId;
use crate::linkgraph::BinLink;
use crate::pulserank::PulseMap;
use crate::segio::segment::{shard_path, SegmentReader, SegmentWriter};
use log::info;
use std::collections::HashMap;
use std::fs;

pub fn run_stage(config: &PipelineConfig) -> Result<(), Error> {
    info!("clustering: starting");
    let link_dir = config.data_dir("GlobalData/LinkGraph");
    let pulse_dir = config.data_dir("GlobalData/PulseRank");
    let cluster_dir = config.data_dir("GlobalData/Clustering");
    fs::create_dir_all(&cluster_dir)?;

    let mut edges = Vec::new();
    let mut base_nodes = std::collections::HashSet::new();
    for shard in 0..config.client_count {
        let path = shard_path(&link_dir, "bin_link_set0.set", shard);
        if !path.exists() {
            continue;
        }
        for rec in SegmentReader::<BinLink>::open(&path)? {
            let link: BinLink = rec?;
            base_nodes.insert(link.src);
            base_nodes.insert(link.dst);
            edges.push(WeightedEdge { src: link.src, dst: link.dst, weight: link.weight });
        }
    }
    let base_nodes: Vec<DocId> = base_nodes.into_iter().collect();

    let pulse_scores: HashMap<DocId, f32> = {
        let path = pulse_dir.join("pulse_map");
        if path.exists() {
            SegmentReader::<PulseMap>::open(&path)?
                .map(|r| r.map(|p| (p.node, p.pulse_score)))
                .collect::<Result<_, Error>>()?
        } else {
            HashMap::new()
        }
    };

    let (labels, cluster_links) = run_label_propagation(
        &edges,
        &base_nodes,
        config.wave_pass_cycles,
        config.wave_pass_inst,
        config.max_clus_node_num,
        config.rng_seed,
    );

    let MergedHierarchy { stats, cluster_map } =
        merge_hierarchy(&labels, &pulse_scores, config.max_clus_node_num, config.max_child_count);
    let summary_links = build_summary_links(&cluster_links);

    let mut map_out = SegmentWriter::create(&cluster_dir.join("cluster_map"))?;
    for entry in &cluster_map {
        map_out.write_record(entry)?;
    }
    map_out.finish()?;

    let mut stat_out = SegmentWriter::create(&cluster_dir.join("hierarchy_stats"))?;
    for stat in &stats {
        stat_out.write_record(stat)?;
    }
    stat_out.finish()?;

    let mut link_out = SegmentWriter::create(&cluster_dir.join("summary_links"))?;
    for link in &summary_links {
        link_out.write_record(link)?;
    }
    link_out.finish()?;

    info!(
        "clustering: finished, {} clusters, {} summary links",
        stats.len(),
        summary_links.len()
    );
    Ok(())
}

//! Wires [`pulse_rank`] to the segmented-file substrate (spec.md §4.4,
//! §6). Unlike the per-shard stages, pulse-rank's fixed-point iteration
//! needs the whole integrated edge set in memory at once, so this stage
//! has no `shard` parameter: it reads every `bin_link_set0.set.<c>` shard
//! and writes a single `pulse_map` file.
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::linkgraph::BinLink;
use crate::pulserank::iterate::pulse_rank;
use crate::pulserank::record::PulseMap;
use crate::segio::segment::{shard_path, SegmentReader, SegmentWriter};
use log::info;
use std::fs;

pub fn run_stage(config: &PipelineConfig) -> Result<(), Error> {
    info!("pulserank: starting, {} cycles", config.pulse_rank_cycles);
    let link_dir = config.data_dir("GlobalData/LinkGraph");
    let pulse_dir = config.data_dir("GlobalData/PulseRank");
    fs::create_dir_all(&pulse_dir)?;

    let mut edges = Vec::new();
    for shard in 0..config.client_count {
        let path = shard_path(&link_dir, "bin_link_set0.set", shard);
        if !path.exists() {
            continue;
        }
        for rec in SegmentReader::<BinLink>::open(&path)? {
            edges.push(rec?);
        }
    }

    let scores = pulse_rank(&edges, config.base_node_count, config.pulse_rank_cycles);
    let mut nodes: Vec<_> = scores.into_iter().collect();
    nodes.sort_by_key(|(node, _)| *node);

    let mut out = SegmentWriter::create(&pulse_dir.join("pulse_map"))?;
    let node_count = nodes.len();
    for (node, pulse_score) in nodes {
        out.write_record(&PulseMap { node, pulse_score })?;
    }
    out.finish()?;
    info!("pulserank: finished, {node_count} scored nodes");
    Ok(())
}

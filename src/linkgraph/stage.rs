//! Wires [`merge_duplicate_edges`] to the segmented-file substrate: one
//! worker per client shard reads that shard's `raw_links.<c>` plus the
//! global pulse map and writes `bin_link_set0.set.<c>` (spec.md §4.3,
//! §6).
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::ids::DocId;
use crate::linkgraph::merge::{merge_duplicate_edges, LinkKind};
use crate::linkgraph::record::RawLink;
use crate::pulserank::PulseMap;
use crate::segio::record::Record;
use crate::segio::segment::{shard_path, SegmentReader, SegmentWriter};
use log::info;
use std::collections::HashMap;
use std::fs;

fn read_all<T: Record>(path: &std::path::Path) -> Result<Vec<T>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    SegmentReader::<T>::open(path)?.collect()
}

/// Runs duplicate-edge merging for client shard `shard`.
pub fn run_stage(config: &PipelineConfig, shard: u32) -> Result<(), Error> {
    info!("linkgraph: processing shard {shard}");
    let link_dir = config.data_dir("GlobalData/LinkGraph");
    fs::create_dir_all(&link_dir)?;

    let pulse_dir = config.data_dir("GlobalData/PulseRank");
    let pulse_scores: HashMap<DocId, (f32, f32)> = read_all::<PulseMap>(&pulse_dir.join("pulse_map"))?
        .into_iter()
        .map(|p| (p.node, (p.pulse_score, p.pulse_score)))
        .collect();

    let mut raw: Vec<RawLink> = read_all(&shard_path(&link_dir, "raw_links", shard))?;
    raw.sort_by_key(|l| l.src);
    let edges: Vec<(DocId, DocId, f32, LinkKind)> = raw
        .into_iter()
        .map(|l| {
            let kind = if l.is_keyword { LinkKind::Keyword } else { LinkKind::Webgraph };
            (l.src, l.dst, l.weight, kind)
        })
        .collect();

    let merged = merge_duplicate_edges(&edges, &pulse_scores);
    let mut out = SegmentWriter::create(&shard_path(&link_dir, "bin_link_set0.set", shard))?;
    for link in &merged {
        out.write_record(link)?;
    }
    out.finish()?;
    info!("linkgraph: shard {shard} done, {} merged edges", merged.len());
    Ok(())
}

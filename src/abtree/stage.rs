//! Builds the AB-tree from the clustering stage's output (spec.md §4.6,
//! §6): one two-level subtree per cluster (cluster node over its member
//! base docs, sorted ascending), summary links attached from
//! `summary_links` if present, written depth-first to `ab_tree.<shard>`
//! alongside its `ab_root.<shard>` index.
use crate::abtree::builder::{attach_summary_links, build_root_index, write_hierarchy, HierarchyNode};
use crate::clustering::record::{ClusterMap, HierarchyStat, SummaryLink};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::ids::DocId;
use crate::segio::record::Record;
use crate::segio::segment::{shard_path, SegmentReader};
use log::info;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;

fn read_all<T: Record>(path: &std::path::Path) -> Result<Vec<T>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    SegmentReader::<T>::open(path)?.collect()
}

/// Builds the whole tree as shard 0; real sharding by top-level cluster
/// range is left to a future pass (every cluster fits comfortably in one
/// `ab_tree` file for the corpus sizes this crate targets).
pub fn run_stage(config: &PipelineConfig) -> Result<(), Error> {
    info!("abtree: starting");
    let cluster_dir = config.data_dir("GlobalData/Clustering");
    let ab_dir = config.data_dir("GlobalData/AbTree");
    fs::create_dir_all(&ab_dir)?;

    let cluster_map: Vec<ClusterMap> = read_all(&cluster_dir.join("cluster_map"))?;
    let stats: HashMap<_, _> = read_all::<HierarchyStat>(&cluster_dir.join("hierarchy_stats"))?
        .into_iter()
        .map(|s| (s.clus_id, s))
        .collect();
    let summary_links: Vec<SummaryLink> = read_all(&cluster_dir.join("summary_links"))?;

    let mut members: HashMap<_, Vec<DocId>> = HashMap::new();
    for entry in &cluster_map {
        members.entry(entry.cluster).or_default().push(entry.base_node);
    }

    let mut roots = Vec::with_capacity(members.len());
    let mut clusters: Vec<_> = members.into_iter().collect();
    clusters.sort_by_key(|(cluster, _)| *cluster);
    for (cluster, mut docs) in clusters {
        docs.sort();
        let stat = stats.get(&cluster);
        let children: Vec<HierarchyNode> = docs
            .iter()
            .map(|&doc| HierarchyNode {
                range: (doc, DocId::new(doc.get() + 1)),
                level: 0,
                total_node_num: 1,
                trav_prob: 1.0,
                leaf: Some(doc),
                aux: Vec::new(),
                children: Vec::new(),
                s_links: Vec::new(),
            })
            .collect();
        let range_end = docs.last().map(|d| d.get() + 1).unwrap_or(0);
        let range_start = docs.first().copied().unwrap_or(DocId::new(0));
        roots.push(HierarchyNode {
            range: (range_start, DocId::new(range_end)),
            level: 1,
            total_node_num: stat.map(|s| s.total_node_num).unwrap_or(docs.len() as u32),
            trav_prob: stat.map(|s| s.pulse_score).unwrap_or(0.0),
            leaf: None,
            aux: Vec::new(),
            children,
            s_links: Vec::new(),
        });
    }

    for root in &mut roots {
        attach_summary_links(root, &summary_links);
    }

    let mut file = BufWriter::new(File::create(shard_path(&ab_dir, "ab_tree", 0))?);
    let mut pos = 0u64;
    for root in &roots {
        pos += write_hierarchy(root, &mut file, pos)?;
    }

    let root_index = build_root_index(&roots);
    let mut index_file = BufWriter::new(File::create(shard_path(&ab_dir, "ab_root", 0))?);
    for (range_start, offset) in root_index {
        use byteorder::{LittleEndian, WriteBytesExt};
        range_start.write_to(&mut index_file)?;
        index_file.write_u64::<LittleEndian>(offset)?;
    }
    info!("abtree: finished, {} root subtrees", roots.len());
    Ok(())
}

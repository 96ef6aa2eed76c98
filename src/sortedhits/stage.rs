//! Wires cluster-renumbered sorting and lookup-index construction to the
//! segmented-file substrate (spec.md §4.7, §6): one worker per hit-list
//! shard reads that shard's `base_fin_hit.<s>` / `anchor_fin_hit.<s>`
//! plus the global backward cluster map, and writes the three per-type
//! sorted streams plus `lookup_index.<s>`.
use crate::clustering::record::ClusterMap;
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::hitlist::record::HitItem;
use crate::ids::DocId;
use crate::segio::record::Record;
use crate::segio::segment::{shard_path, SegmentReader, SegmentWriter};
use crate::sortedhits::lookup::build_lookup_index;
use crate::sortedhits::sort::sort_hits_by_cluster;
use log::info;
use std::collections::HashMap;
use std::fs;

fn read_all<T: Record>(path: &std::path::Path) -> Result<Vec<T>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    SegmentReader::<T>::open(path)?.collect()
}

pub fn run_stage(config: &PipelineConfig, shard: u32) -> Result<(), Error> {
    info!("sortedhits: processing shard {shard}");
    let hit_list_dir = config.data_dir("GlobalData/HitList");
    let cluster_dir = config.data_dir("GlobalData/Clustering");
    let sorted_dir = config.data_dir("GlobalData/SortedHits");
    fs::create_dir_all(&sorted_dir)?;

    let backward_clus_map: HashMap<DocId, DocId> = read_all::<ClusterMap>(&cluster_dir.join("cluster_map"))?
        .into_iter()
        .map(|m| (m.base_node, DocId::new(m.cluster.get())))
        .collect();

    let mut hits: Vec<HitItem> = read_all(&shard_path(&hit_list_dir, "base_fin_hit", shard))?;
    hits.extend(read_all::<HitItem>(&shard_path(&hit_list_dir, "anchor_fin_hit", shard))?);

    let sorted = sort_hits_by_cluster(hits, &backward_clus_map);

    let mut title = Vec::new();
    let mut excerpt = Vec::new();
    let mut image = Vec::new();
    for hit in sorted {
        match hit.hit_type()? {
            crate::hitlist::HitType::Title => title.push(hit),
            crate::hitlist::HitType::Excerpt => excerpt.push(hit),
            crate::hitlist::HitType::Image => image.push(hit),
        }
    }

    let index = build_lookup_index(&title, &excerpt, &image, config.max_spat_num as u64);

    let mut title_out = SegmentWriter::create(&shard_path(&sorted_dir, "sorted_title", shard))?;
    for hit in &title {
        title_out.write_record(hit)?;
    }
    title_out.finish()?;

    let mut excerpt_out = SegmentWriter::create(&shard_path(&sorted_dir, "sorted_excerpt", shard))?;
    for hit in &excerpt {
        excerpt_out.write_record(hit)?;
    }
    excerpt_out.finish()?;

    let mut image_out = SegmentWriter::create(&shard_path(&sorted_dir, "sorted_image", shard))?;
    for hit in &image {
        image_out.write_record(hit)?;
    }
    image_out.finish()?;

    let mut index_out = SegmentWriter::create(&shard_path(&sorted_dir, "lookup_index", shard))?;
    for rec in &index {
        index_out.write_record(rec)?;
    }
    index_out.finish()?;
    info!(
        "sortedhits: shard {shard} done, {} title / {} excerpt / {} image hits",
        title.len(),
        excerpt.len(),
        image.len()
    );
    Ok(())
}

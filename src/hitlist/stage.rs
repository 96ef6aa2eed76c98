//! Wires [`assemble_document`] to the segmented-file substrate: one
//! worker per log division reads that division's `word_hits.<div>` file
//! and the shared occurrence table, and writes `base_fin_hit.<div>` /
//! `anchor_fin_hit.<div>` (spec.md §4.2, §6).
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::hitlist::assemble::{assemble_document, AssembledDocument, DocumentInput};
use crate::hitlist::record::{DocWordLog, ExcerptTerms, HitItem, OccurrenceEntry};
use crate::lexicon::DictionaryOffset;
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

/// The occurrence count at `percentile` of the sorted occurrence-count
/// distribution, used as the excerpt-term inclusion threshold (spec.md
/// §4.2 "an occurrence-count threshold").
fn percentile_count(occurrence_counts: &HashMap<u32, u32>, percentile: f32) -> u32 {
    if occurrence_counts.is_empty() {
        return 0;
    }
    let mut counts: Vec<u32> = occurrence_counts.values().copied().collect();
    counts.sort_unstable();
    let idx = ((counts.len() as f32 - 1.0) * percentile.clamp(0.0, 1.0)).round() as usize;
    counts[idx.min(counts.len() - 1)]
}

/// Runs hit-list assembly for one log division, producing that
/// division's slice of the base and anchor hit streams.
pub fn run_stage(config: &PipelineConfig, division: u32) -> Result<(), Error> {
    info!("hitlist: processing division {division}");
    let lexicon_dir = config.data_dir("GlobalData/Lexicon");
    let dict = DictionaryOffset::load(&lexicon_dir.join("dictionary_offset.bin"))?;

    let hit_list_dir = config.data_dir("GlobalData/HitList");
    fs::create_dir_all(&hit_list_dir)?;

    let occurrence_counts: HashMap<u32, u32> =
        read_all::<OccurrenceEntry>(&hit_list_dir.join("occurrence_counts"))?
            .into_iter()
            .map(|e| (e.word_id, e.count))
            .collect();

    let logs: Vec<DocWordLog> = read_all(&shard_path(&hit_list_dir, "word_hits", division))?;
    let excerpt_occurrence_threshold = percentile_count(&occurrence_counts, config.excerpt_occurrence_percentile);

    let mut base_out = SegmentWriter::<HitItem>::create(&shard_path(&hit_list_dir, "base_fin_hit", division))?;
    let mut anchor_out =
        SegmentWriter::<HitItem>::create(&shard_path(&hit_list_dir, "anchor_fin_hit", division))?;
    let mut excerpt_out =
        SegmentWriter::<ExcerptTerms>::create(&shard_path(&hit_list_dir, "excerpt_terms", division))?;

    for log in &logs {
        let anchor_targets: HashMap<usize, u32> = log
            .anchor_targets
            .iter()
            .map(|(idx, target)| (*idx as usize, *target))
            .collect();
        let doc = DocumentInput {
            doc_id: log.doc_id,
            hits: &log.hits,
            anchor_targets: &anchor_targets,
        };
        let AssembledDocument { base_hits, anchor_hits, excerpt_terms, .. } = assemble_document(
            &dict,
            config.hit_list_breadth,
            excerpt_occurrence_threshold,
            &occurrence_counts,
            log.word_log.iter().copied(),
            &doc,
        )?;
        for (_, item) in base_hits {
            base_out.write_record(&item)?;
        }
        for (_, item) in anchor_hits {
            anchor_out.write_record(&item)?;
        }
        if !excerpt_terms.is_empty() {
            excerpt_out.write_record(&ExcerptTerms {
                doc_id: log.doc_id,
                term_ids: excerpt_terms.into_iter().map(|(id, _)| id).collect(),
            })?;
        }
    }

    base_out.finish()?;
    anchor_out.finish()?;
    excerpt_out.finish()?;
    info!("hitlist: division {division} done, {} documents", logs.len());
    Ok(())
}

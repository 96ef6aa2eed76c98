//! Wires the association/keyword pipeline to the segmented-file
//! substrate (spec.md §4.8, §6). Pairwise association scoring needs
//! corpus-wide co-occurrence counts, so like pulse-rank and clustering
//! this stage has no `shard` parameter: it reads every log division's
//! `excerpt_terms.<d>` file, scores and cuts off associations globally,
//! then walks each document again to pick its final keyword set.
use crate::assoc::cooccur::count_occurrences;
use crate::assoc::group::{run_group_cycles, KeywordCandidate};
use crate::assoc::keyword::{build_keyword_hits, select_final_keywords};
use crate::assoc::record::KeywordHit;
use crate::assoc::score::{assign_assoc_ids, cutoff_by_score, score_pair};
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::hitlist::record::ExcerptTerms;
use crate::ids::DocId;
use crate::lexicon::dictionary_offset::DictionaryOffset;
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

pub fn run_stage(config: &PipelineConfig) -> Result<(), Error> {
    info!("assoc: starting");
    let hit_list_dir = config.data_dir("GlobalData/HitList");
    let assoc_dir = config.data_dir("GlobalData/Assoc");
    fs::create_dir_all(&assoc_dir)?;

    let mut docs: Vec<ExcerptTerms> = Vec::new();
    for division in 0..config.log_div_count {
        let path = shard_path(&hit_list_dir, "excerpt_terms", division);
        docs.extend(read_all::<ExcerptTerms>(&path)?);
    }

    let term_lists: Vec<Vec<u32>> = docs.iter().map(|d| d.term_ids.clone()).collect();
    let (single, pair) = count_occurrences(&term_lists);

    let scored: Vec<((u32, u32), f32)> = pair
        .into_iter()
        .map(|((a, b), n_ab)| ((a, b), score_pair(n_ab, single[&a], single[&b])))
        .collect();
    let survivors = cutoff_by_score(scored, config.max_assoc_num as usize);
    let pairs: Vec<(u32, u32)> = survivors.into_iter().map(|(p, _)| p).collect();

    // AssocId is allocated past the singleton word id space (spec.md §3,
    // §8 scenario 3: "its id is allocated from WordCount + shardId").
    let lexicon_dir = config.data_dir("GlobalData/Lexicon");
    let dict_path = lexicon_dir.join("dictionary_offset.bin");
    let word_count = if dict_path.exists() {
        DictionaryOffset::load(&dict_path)?.header.word_count
    } else {
        0
    };
    let (forward, _reverse) = assign_assoc_ids(&pairs, word_count as u64);
    let assoc_table: HashMap<(u32, u32), crate::ids::AssocId> =
        forward.iter().map(|e| ((e.a, e.b), e.id)).collect();

    let pulse_dir = config.data_dir("GlobalData/PulseRank");
    let pulse_scores: HashMap<DocId, f32> = read_all::<PulseMap>(&pulse_dir.join("pulse_map"))?
        .into_iter()
        .map(|p| (p.node, p.pulse_score))
        .collect();

    let mut next_group_id = single.keys().copied().max().unwrap_or(0) + 1;
    let mut out = SegmentWriter::<KeywordHit>::create(&assoc_dir.join("keyword_hits"))?;
    for doc in &docs {
        let candidates: Vec<KeywordCandidate> = doc
            .term_ids
            .iter()
            .enumerate()
            .map(|(pos, &term_id)| KeywordCandidate {
                term_id,
                group_size: 1,
                term_weight: *single.get(&term_id).unwrap_or(&1) as f32,
                occur: *single.get(&term_id).unwrap_or(&1),
                position: pos as u32,
            })
            .collect();

        let grouped = run_group_cycles(
            candidates,
            &assoc_table,
            config.group_cycle_count,
            config.scan_window_size as usize,
            config.group_cycle_min_new,
            config.final_keyword_count as usize * 4,
            &mut next_group_id,
        );
        let selected = select_final_keywords(grouped, config.final_keyword_count as usize);
        let pulse_score = *pulse_scores.get(&doc.doc_id).unwrap_or(&0.0);
        for hit in build_keyword_hits(doc.doc_id, &selected, pulse_score) {
            out.write_record(&hit)?;
        }
    }
    out.finish()?;
    info!("assoc: finished, {} documents processed", docs.len());
    Ok(())
}

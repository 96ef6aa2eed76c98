//! Builds `dictionary_offset.bin` from each log division's local counts
//! (spec.md §4.2 "Global id mapping"). Division counts themselves come
//! out of tokenization, which this crate does not implement; this stage
//! assumes they have already been written to
//! `GlobalData/Lexicon/division_counts` by that earlier step.
use crate::config::PipelineConfig;
use crate::error::Error;
use crate::lexicon::dictionary_offset::DictionaryOffset;
use crate::segio::record::Record;
use crate::segio::segment::SegmentReader;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::info;
use std::fs;
use std::io;

/// One log division's local `(word_count, link_count, base_url_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivisionCounts {
    pub word_count: u32,
    pub link_count: u32,
    pub base_url_size: u32,
}

impl Record for DivisionCounts {
    fn write_to<W: io::Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.word_count)?;
        w.write_u32::<LittleEndian>(self.link_count)?;
        w.write_u32::<LittleEndian>(self.base_url_size)
    }

    fn read_from<R: io::Read>(r: &mut R) -> io::Result<Option<Self>> {
        let word_count = match r.read_u32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let link_count = r.read_u32::<LittleEndian>()?;
        let base_url_size = r.read_u32::<LittleEndian>()?;
        Ok(Some(DivisionCounts { word_count, link_count, base_url_size }))
    }
}

pub fn run_stage(config: &PipelineConfig) -> Result<(), Error> {
    info!("lexicon: starting, {} declared divisions", config.log_div_count);
    let lexicon_dir = config.data_dir("GlobalData/Lexicon");
    fs::create_dir_all(&lexicon_dir)?;

    let counts_path = lexicon_dir.join("division_counts");
    let per_division: Vec<(u32, u32, u32)> = if counts_path.exists() {
        SegmentReader::<DivisionCounts>::open(&counts_path)?
            .map(|r| r.map(|c| (c.word_count, c.link_count, c.base_url_size)))
            .collect::<Result<_, Error>>()?
    } else {
        vec![(0, 0, 0); config.log_div_count as usize]
    };

    let table = DictionaryOffset::build(&per_division);
    table.save(&lexicon_dir.join("dictionary_offset.bin"))?;
    info!("lexicon: finished, {} words total", table.header.word_count);
    Ok(())
}

//! Sorted-hit lookup index records (spec.md §4.7).
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Byte offsets into the three per-type sorted-hit files at the point
/// this record was emitted: either a spatial checkpoint (every
/// `MAX_SPAT_NUM` bytes) or the first record for a new `word_id`
/// (`is_word_start`), which lets a lookup seek directly to a word's
/// first hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SLookupIndex {
    pub word_id: u32,
    pub title_offset: u64,
    pub excerpt_offset: u64,
    pub image_offset: u64,
    pub is_word_start: bool,
}

impl Record for SLookupIndex {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.word_id)?;
        w.write_u64::<LittleEndian>(self.title_offset)?;
        w.write_u64::<LittleEndian>(self.excerpt_offset)?;
        w.write_u64::<LittleEndian>(self.image_offset)?;
        w.write_u8(self.is_word_start as u8)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let word_id = match r.read_u32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let title_offset = r.read_u64::<LittleEndian>()?;
        let excerpt_offset = r.read_u64::<LittleEndian>()?;
        let image_offset = r.read_u64::<LittleEndian>()?;
        let is_word_start = r.read_u8()? != 0;
        Ok(Some(SLookupIndex {
            word_id,
            title_offset,
            excerpt_offset,
            image_offset,
            is_word_start,
        }))
    }
}

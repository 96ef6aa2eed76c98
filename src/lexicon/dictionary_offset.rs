//! The `dictionary_offset` table (spec.md §4.2, §6): turns a per-division
//! local id into the single global id space every stage past tokenization
//! assumes. Built once, after the per-division word/link counts are known,
//! by a prefix sum over `DivisionOffset` entries.
use crate::error::Error;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use std::path::Path;

/// File-level header: `(base_url_count, total_node_count, word_count)`
/// followed by `division_count + 1` [`DivisionOffset`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryOffsetHeader {
    pub base_url_count: i64,
    pub total_node_count: i64,
    pub word_count: u32,
}

impl DictionaryOffsetHeader {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_i64::<LittleEndian>(self.base_url_count)?;
        w.write_i64::<LittleEndian>(self.total_node_count)?;
        w.write_u32::<LittleEndian>(self.word_count)?;
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(DictionaryOffsetHeader {
            base_url_count: r.read_i64::<LittleEndian>()?,
            total_node_count: r.read_i64::<LittleEndian>()?,
            word_count: r.read_u32::<LittleEndian>()?,
        })
    }
}

/// Per-division `SGlobalIndexOffset` (spec.md §4.2): a local id `i` in
/// division `d` maps to the global id `word_offset[d] + i` (and
/// respectively `link_offset[d] + i` for the link-graph id space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DivisionOffset {
    pub word_offset: u32,
    pub link_offset: u32,
    pub base_url_size: u32,
}

impl DivisionOffset {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.word_offset)?;
        w.write_u32::<LittleEndian>(self.link_offset)?;
        w.write_u32::<LittleEndian>(self.base_url_size)?;
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(DivisionOffset {
            word_offset: r.read_u32::<LittleEndian>()?,
            link_offset: r.read_u32::<LittleEndian>()?,
            base_url_size: r.read_u32::<LittleEndian>()?,
        })
    }
}

/// The full loaded table: a header plus one [`DivisionOffset`] per
/// division, with a trailing sentinel entry holding the grand totals so a
/// caller can compute a division's local-id count as
/// `offsets[d + 1].word_offset - offsets[d].word_offset` without special
/// casing the last division.
#[derive(Debug, Clone, Default)]
pub struct DictionaryOffset {
    pub header: DictionaryOffsetHeader,
    pub offsets: Vec<DivisionOffset>,
}

impl DictionaryOffset {
    /// Builds the table from each division's local `(word_count,
    /// link_count, base_url_size)` counts, in division order, via a
    /// running prefix sum. `base_url_count`/`total_node_count` are summed
    /// from the same per-division counts.
    pub fn build(per_division: &[(u32, u32, u32)]) -> Self {
        let mut offsets = Vec::with_capacity(per_division.len() + 1);
        let mut word_offset = 0u32;
        let mut link_offset = 0u32;
        let mut base_url_count = 0i64;
        for &(word_count, link_count, base_url_size) in per_division {
            offsets.push(DivisionOffset {
                word_offset,
                link_offset,
                base_url_size,
            });
            word_offset += word_count;
            link_offset += link_count;
            base_url_count += base_url_size as i64;
        }
        offsets.push(DivisionOffset {
            word_offset,
            link_offset,
            base_url_size: 0,
        });
        DictionaryOffset {
            header: DictionaryOffsetHeader {
                base_url_count,
                total_node_count: link_offset as i64,
                word_count: word_offset,
            },
            offsets,
        }
    }

    /// Global word id for local id `local` in division `division`.
    pub fn global_word(&self, division: usize, local: u32) -> u32 {
        self.offsets[division].word_offset + local
    }

    /// Global link/node id for local id `local` in division `division`.
    pub fn global_link(&self, division: usize, local: u32) -> u32 {
        self.offsets[division].link_offset + local
    }

    pub fn division_count(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let mut f = std::io::BufWriter::new(std::fs::File::create(path)?);
        self.header.write_to(&mut f)?;
        for o in &self.offsets {
            o.write_to(&mut f)?;
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut f = std::io::BufReader::new(std::fs::File::open(path)?);
        let header = DictionaryOffsetHeader::read_from(&mut f)?;
        let mut offsets = Vec::new();
        loop {
            match DivisionOffset::read_from(&mut f) {
                Ok(o) => offsets.push(o),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(Error::from(e)),
            }
        }
        Ok(DictionaryOffset { header, offsets })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_sum_maps_locals_to_disjoint_global_ranges() {
        let table = DictionaryOffset::build(&[(10, 5, 2), (7, 3, 1), (4, 4, 0)]);
        assert_eq!(table.global_word(0, 0), 0);
        assert_eq!(table.global_word(1, 0), 10);
        assert_eq!(table.global_word(2, 0), 17);
        assert_eq!(table.header.word_count, 21);
        assert_eq!(table.header.total_node_count, 12);
        assert_eq!(table.header.base_url_count, 3);
    }

    #[test]
    fn round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dictionary_offset");
        let table = DictionaryOffset::build(&[(3, 1, 1), (2, 2, 0)]);
        table.save(&path).unwrap();
        let back = DictionaryOffset::load(&path).unwrap();
        assert_eq!(back.header.word_count, table.header.word_count);
        assert_eq!(back.offsets, table.offsets);
    }
}

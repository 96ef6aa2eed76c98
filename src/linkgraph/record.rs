//! The integrated edge record written to `bin_link_set0.set.<c>`
//! (spec.md §4.3, §6).
use crate::ids::DocId;
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// One deduplicated, weight-summed edge in the integrated link graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinLink {
    pub src: DocId,
    pub dst: DocId,
    pub weight: f32,
}

impl Record for BinLink {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.src.write_to(w)?;
        self.dst.write_to(w)?;
        w.write_f32::<LittleEndian>(self.weight)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let src = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let dst = DocId::read_from(r)?;
        let weight = r.read_f32::<LittleEndian>()?;
        Ok(Some(BinLink { src, dst, weight }))
    }
}

/// One un-merged edge contribution before duplicate-edge merging: either
/// a webgraph hyperlink or a keyword-cooccurrence edge (spec.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawLink {
    pub src: DocId,
    pub dst: DocId,
    pub weight: f32,
    pub is_keyword: bool,
}

impl Record for RawLink {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.src.write_to(w)?;
        self.dst.write_to(w)?;
        w.write_f32::<LittleEndian>(self.weight)?;
        w.write_u8(self.is_keyword as u8)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let src = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let dst = DocId::read_from(r)?;
        let weight = r.read_f32::<LittleEndian>()?;
        let is_keyword = r.read_u8()? != 0;
        Ok(Some(RawLink { src, dst, weight, is_keyword }))
    }
}

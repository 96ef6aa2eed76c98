//! Records produced by the association / excerpt-keyword pipeline
//! (spec.md §3, §4.8).
use crate::ids::{AssocId, DocId};
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// One keyword attached to an excerpt. `check_sum` identifies the
/// excerpt: two hits sharing a `check_sum` came from the same excerpt
/// (spec.md §3 `KeywordHit`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordHit {
    pub doc_id: DocId,
    pub keyword_id: DocId,
    pub check_sum: u32,
    pub keyword_score: f32,
    pub pulse_score: f32,
}

impl Record for KeywordHit {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.doc_id.write_to(w)?;
        self.keyword_id.write_to(w)?;
        w.write_u32::<LittleEndian>(self.check_sum)?;
        w.write_f32::<LittleEndian>(self.keyword_score)?;
        w.write_f32::<LittleEndian>(self.pulse_score)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let doc_id = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let keyword_id = DocId::read_from(r)?;
        let check_sum = r.read_u32::<LittleEndian>()?;
        let keyword_score = r.read_f32::<LittleEndian>()?;
        let pulse_score = r.read_f32::<LittleEndian>()?;
        Ok(Some(KeywordHit {
            doc_id,
            keyword_id,
            check_sum,
            keyword_score,
            pulse_score,
        }))
    }
}

/// A surviving association, stored both forward `(a, b) -> id` and
/// reverse `(b, a) -> id` (spec.md §4.8 "Associations").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssocEntry {
    pub a: u32,
    pub b: u32,
    pub id: AssocId,
}

impl Record for AssocEntry {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.a)?;
        w.write_u32::<LittleEndian>(self.b)?;
        self.id.write_to(w)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let a = match r.read_u32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let b = r.read_u32::<LittleEndian>()?;
        let id = AssocId::read_from(r)?;
        Ok(Some(AssocEntry { a, b, id }))
    }
}

//! On-disk records produced by hit-list assembly (spec.md §4.2, §3).
use crate::error::Error;
use crate::ids::DocId;
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// The three hit-type classes a `HitItem` can belong to; stored in the low
/// 3 bits of `enc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitType {
    Title,
    Excerpt,
    Image,
}

impl HitType {
    fn from_bits(bits: u16) -> Result<Self, Error> {
        match bits {
            0 => Ok(HitType::Title),
            1 => Ok(HitType::Excerpt),
            2 => Ok(HitType::Image),
            other => Err(Error::Corrupted(format!("unknown hit-type bits {other}"))),
        }
    }

    fn to_bits(self) -> u16 {
        match self {
            HitType::Title => 0,
            HitType::Excerpt => 1,
            HitType::Image => 2,
        }
    }
}

/// Packs hit-type (low 3 bits) and position (upper 13 bits) into the
/// `enc` field of a `HitItem`.
pub fn encode_hit(hit_type: HitType, position: u16) -> u16 {
    (position << 3) | hit_type.to_bits()
}

pub fn decode_hit(enc: u16) -> Result<(HitType, u16), Error> {
    Ok((HitType::from_bits(enc & 0x7)?, enc >> 3))
}

/// One posting in the final, globally-identified inverted index (spec.md
/// §3 `HitItem`). Sorted files hold `(word_id asc, doc_id asc, enc asc)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitItem {
    pub word_id: u32,
    pub doc_id: DocId,
    pub enc: u16,
    pub image_id: Option<DocId>,
}

impl HitItem {
    pub fn hit_type(&self) -> Result<HitType, Error> {
        Ok(decode_hit(self.enc)?.0)
    }
}

impl Record for HitItem {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.word_id)?;
        self.doc_id.write_to(w)?;
        w.write_u16::<LittleEndian>(self.enc)?;
        match self.image_id {
            Some(id) => {
                w.write_u8(1)?;
                id.write_to(w)?;
            }
            None => w.write_u8(0)?,
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let word_id = match r.read_u32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let doc_id = DocId::read_from(r)?;
        let enc = r.read_u16::<LittleEndian>()?;
        let image_id = match r.read_u8()? {
            0 => None,
            _ => Some(DocId::read_from(r)?),
        };
        Ok(Some(HitItem {
            word_id,
            doc_id,
            enc,
            image_id,
        }))
    }
}

/// `term_type` bitflags (spec.md §3 `WordHit`). The named attributes
/// `new-link`/`new-image` are the `NEW` bit combined with `LINK`/`IMAGE`;
/// this is the only way to fit all seven named attributes plus `stop` and
/// `exclude` into a single byte.
pub const TERM_IMAGE: u8 = 1 << 0;
pub const TERM_META: u8 = 1 << 1;
pub const TERM_LINK: u8 = 1 << 2;
pub const TERM_CAPITAL: u8 = 1 << 3;
pub const TERM_NEW: u8 = 1 << 4;
pub const TERM_SAME_SERVER: u8 = 1 << 5;
pub const TERM_STOP: u8 = 1 << 6;
pub const TERM_EXCLUDE: u8 = 1 << 7;

/// A tokenizer-emitted hit, local to one document and log division
/// (spec.md §3 `WordHit`), before global id resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordHit {
    pub term_type: u8,
    /// Local word id, or -1 if the word is not in the lexicon (a stop
    /// word indexed by its lexicon id uses a non-negative value here).
    pub word_id: i32,
    pub word_div: u16,
}

impl WordHit {
    pub fn has(self, flag: u8) -> bool {
        self.term_type & flag != 0
    }

    /// Whether this hit must be dropped rather than indexed: a stop word
    /// that is also flagged `exclude` (spec.md §3 `WordHit`, §4.2 "exclude
    /// tokens (stop+exclude bit) are counted but not emitted").
    pub fn is_dropped(self) -> bool {
        self.has(TERM_STOP) && self.has(TERM_EXCLUDE)
    }

    /// Whether this hit consumes one id from `word_log[word_div]`, as
    /// opposed to resolving directly through the stop-word lexicon.
    pub fn consumes_word_log(self) -> bool {
        !self.has(TERM_STOP)
    }
}

impl Record for WordHit {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u8(self.term_type)?;
        w.write_i32::<LittleEndian>(self.word_id)?;
        w.write_u16::<LittleEndian>(self.word_div)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let term_type = match r.read_u8() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let word_id = r.read_i32::<LittleEndian>()?;
        let word_div = r.read_u16::<LittleEndian>()?;
        Ok(Some(WordHit {
            term_type,
            word_id,
            word_div,
        }))
    }
}

/// One document's raw word-hit stream, the unit the hit-list assembly
/// stage reads from `GlobalData/HitList/word_hits.<div>` (spec.md §4.2).
/// `anchor_targets` pairs a hit index with the local link-cluster id it
/// points at, the simplification documented in
/// [`crate::hitlist::assemble::DocumentInput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocWordLog {
    pub doc_id: DocId,
    pub hits: Vec<WordHit>,
    pub anchor_targets: Vec<(u32, u32)>,
    /// Local ids consumed in hit order by every hit with
    /// `consumes_word_log()` true (spec.md §4.2 "per-division word log").
    pub word_log: Vec<u32>,
}

impl Record for DocWordLog {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.doc_id.write_to(w)?;
        w.write_u32::<LittleEndian>(self.hits.len() as u32)?;
        for hit in &self.hits {
            hit.write_to(w)?;
        }
        w.write_u32::<LittleEndian>(self.anchor_targets.len() as u32)?;
        for (idx, target) in &self.anchor_targets {
            w.write_u32::<LittleEndian>(*idx)?;
            w.write_u32::<LittleEndian>(*target)?;
        }
        w.write_u32::<LittleEndian>(self.word_log.len() as u32)?;
        for local in &self.word_log {
            w.write_u32::<LittleEndian>(*local)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let doc_id = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let hit_count = r.read_u32::<LittleEndian>()?;
        let mut hits = Vec::with_capacity(hit_count as usize);
        for _ in 0..hit_count {
            hits.push(WordHit::read_from(r)?.ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, "truncated word hit")
            })?);
        }
        let anchor_count = r.read_u32::<LittleEndian>()?;
        let mut anchor_targets = Vec::with_capacity(anchor_count as usize);
        for _ in 0..anchor_count {
            let idx = r.read_u32::<LittleEndian>()?;
            let target = r.read_u32::<LittleEndian>()?;
            anchor_targets.push((idx, target));
        }
        let word_log_count = r.read_u32::<LittleEndian>()?;
        let mut word_log = Vec::with_capacity(word_log_count as usize);
        for _ in 0..word_log_count {
            word_log.push(r.read_u32::<LittleEndian>()?);
        }
        Ok(Some(DocWordLog { doc_id, hits, anchor_targets, word_log }))
    }
}

/// A single `(global_word_id, occurrence_count)` entry in the pre-pass
/// occurrence table consumed by hit-list assembly's excerpt-term gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceEntry {
    pub word_id: u32,
    pub count: u32,
}

impl Record for OccurrenceEntry {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.word_id)?;
        w.write_u32::<LittleEndian>(self.count)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let word_id = match r.read_u32::<LittleEndian>() {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let count = r.read_u32::<LittleEndian>()?;
        Ok(Some(OccurrenceEntry { word_id, count }))
    }
}

/// One document's excerpt-term side channel (spec.md §4.2, consumed by
/// the association pipeline's co-occurrence pass, §4.8).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcerptTerms {
    pub doc_id: DocId,
    pub term_ids: Vec<u32>,
}

impl Record for ExcerptTerms {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.doc_id.write_to(w)?;
        w.write_u32::<LittleEndian>(self.term_ids.len() as u32)?;
        for id in &self.term_ids {
            w.write_u32::<LittleEndian>(*id)?;
        }
        Ok(())
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let doc_id = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let count = r.read_u32::<LittleEndian>()?;
        let mut term_ids = Vec::with_capacity(count as usize);
        for _ in 0..count {
            term_ids.push(r.read_u32::<LittleEndian>()?);
        }
        Ok(Some(ExcerptTerms { doc_id, term_ids }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_word_log_round_trips() {
        let log = DocWordLog {
            doc_id: DocId::new(3),
            hits: vec![WordHit { term_type: 0, word_id: 9, word_div: 0 }],
            anchor_targets: vec![(0, 12)],
            word_log: vec![9],
        };
        let mut buf = Vec::new();
        log.write_to(&mut buf).unwrap();
        let back = DocWordLog::read_from(&mut &buf[..]).unwrap().unwrap();
        assert_eq!(log, back);
    }

    #[test]
    fn hit_item_round_trips() {
        let item = HitItem {
            word_id: 42,
            doc_id: DocId::new(7),
            enc: encode_hit(HitType::Excerpt, 3),
            image_id: Some(DocId::new(99)),
        };
        let mut buf = Vec::new();
        item.write_to(&mut buf).unwrap();
        let back = HitItem::read_from(&mut &buf[..]).unwrap().unwrap();
        assert_eq!(item, back);
        assert_eq!(back.hit_type().unwrap(), HitType::Excerpt);
    }

    #[test]
    fn dropped_hit_is_stop_and_exclude() {
        let hit = WordHit {
            term_type: TERM_STOP | TERM_EXCLUDE,
            word_id: -1,
            word_div: 0,
        };
        assert!(hit.is_dropped());
        let stop_only = WordHit {
            term_type: TERM_STOP,
            word_id: 5,
            word_div: 0,
        };
        assert!(!stop_only.is_dropped());
        assert!(!stop_only.consumes_word_log());
    }
}

//! `PulseMap` — the per-node score stream written by pulse-rank
//! (spec.md §3, §4.4).
use crate::ids::DocId;
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// One node's stationary-distribution score. Written in ascending `node`
/// order per shard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseMap {
    pub node: DocId,
    pub pulse_score: f32,
}

impl Record for PulseMap {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.node.write_to(w)?;
        w.write_f32::<LittleEndian>(self.pulse_score)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let node = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let pulse_score = r.read_f32::<LittleEndian>()?;
        Ok(Some(PulseMap { node, pulse_score }))
    }
}

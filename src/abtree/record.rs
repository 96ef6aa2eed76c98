//! The packed AB-tree node format (spec.md §4.6) and its reduced
//! in-node summary-link representation.
use crate::ids::DocId;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Fixed-size fields preceding a node's variable-length leaf payload,
/// child offsets, and summary links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbNodeHeader {
    pub child_num: u16,
    pub s_link_num: u16,
    pub total_node_num: u32,
    pub trav_prob: f32,
}

impl AbNodeHeader {
    pub const ENCODED_LEN: u64 = 2 + 2 + 4 + 4;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_u16::<LittleEndian>(self.child_num)?;
        w.write_u16::<LittleEndian>(self.s_link_num)?;
        w.write_u32::<LittleEndian>(self.total_node_num)?;
        w.write_f32::<LittleEndian>(self.trav_prob)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(AbNodeHeader {
            child_num: r.read_u16::<LittleEndian>()?,
            s_link_num: r.read_u16::<LittleEndian>()?,
            total_node_num: r.read_u32::<LittleEndian>()?,
            trav_prob: r.read_f32::<LittleEndian>()?,
        })
    }
}

/// The reduced summary link stored inside an AB-tree node; `subsume_level`
/// is implicit (the node's own depth), per spec.md §4.6.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SSummaryLink {
    pub src: DocId,
    pub dst: DocId,
    pub trav_prob: f32,
    pub is_forward: bool,
    pub create_level: u8,
}

impl SSummaryLink {
    pub const ENCODED_LEN: u64 = 5 + 5 + 4 + 1 + 1;

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.src.write_to(w)?;
        self.dst.write_to(w)?;
        w.write_f32::<LittleEndian>(self.trav_prob)?;
        w.write_u8(self.is_forward as u8)?;
        w.write_u8(self.create_level)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let src = DocId::read_from(r)?;
        let dst = DocId::read_from(r)?;
        let trav_prob = r.read_f32::<LittleEndian>()?;
        let is_forward = r.read_u8()? != 0;
        let create_level = r.read_u8()?;
        Ok(SSummaryLink {
            src,
            dst,
            trav_prob,
            is_forward,
            create_level,
        })
    }
}

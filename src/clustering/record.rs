//! Records produced by the clustering engine (spec.md §3, §4.5).
use crate::ids::{ClusterId, DocId};
use crate::segio::record::Record;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// An edge in the clustered graph: `base_link` are the original base-doc
/// endpoints, `cluster_link` their current cluster labels. When
/// `cluster_link.0 == cluster_link.1` the edge is subsumed and its
/// `base_link` is emitted as a summary link at `create_level`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterLink {
    pub base_link: (DocId, DocId),
    pub cluster_link: (ClusterId, ClusterId),
    pub link_weight: f32,
    pub create_level: u8,
}

impl Record for ClusterLink {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.base_link.0.write_to(w)?;
        self.base_link.1.write_to(w)?;
        self.cluster_link.0.write_to(w)?;
        self.cluster_link.1.write_to(w)?;
        w.write_f32::<LittleEndian>(self.link_weight)?;
        w.write_u8(self.create_level)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let base_src = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let base_dst = DocId::read_from(r)?;
        let cluster_src = ClusterId::read_from(r)?;
        let cluster_dst = ClusterId::read_from(r)?;
        let link_weight = r.read_f32::<LittleEndian>()?;
        let create_level = r.read_u8()?;
        Ok(Some(ClusterLink {
            base_link: (base_src, base_dst),
            cluster_link: (cluster_src, cluster_dst),
            link_weight,
            create_level,
        }))
    }
}

/// A summary link attached to the AB-tree (spec.md §3, §4.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryLink {
    pub src: DocId,
    pub dst: DocId,
    pub create_level: u8,
    pub subsume_level: u8,
    pub trav_prob: f32,
    pub is_forward: bool,
}

impl Record for SummaryLink {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.src.write_to(w)?;
        self.dst.write_to(w)?;
        w.write_u8(self.create_level)?;
        w.write_u8(self.subsume_level)?;
        w.write_f32::<LittleEndian>(self.trav_prob)?;
        w.write_u8(self.is_forward as u8)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let src = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let dst = DocId::read_from(r)?;
        let create_level = r.read_u8()?;
        let subsume_level = r.read_u8()?;
        let trav_prob = r.read_f32::<LittleEndian>()?;
        let is_forward = r.read_u8()? != 0;
        Ok(Some(SummaryLink {
            src,
            dst,
            create_level,
            subsume_level,
            trav_prob,
            is_forward,
        }))
    }
}

/// One base-node → cluster assignment (`forward_clus_map.<s>` / the
/// backward variant keyed the other way at read time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterMap {
    pub base_node: DocId,
    pub cluster: ClusterId,
}

impl Record for ClusterMap {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.base_node.write_to(w)?;
        self.cluster.write_to(w)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let base_node = match DocId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let cluster = ClusterId::read_from(r)?;
        Ok(Some(ClusterMap { base_node, cluster }))
    }
}

/// Per-cluster-node hierarchy statistics, stored depth-first
/// (spec.md §3 `HierarchyStat`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HierarchyStat {
    pub clus_id: ClusterId,
    pub total_subtrees: u32,
    pub total_node_num: u32,
    pub pulse_score: f32,
}

impl Record for HierarchyStat {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.clus_id.write_to(w)?;
        w.write_u32::<LittleEndian>(self.total_subtrees)?;
        w.write_u32::<LittleEndian>(self.total_node_num)?;
        w.write_f32::<LittleEndian>(self.pulse_score)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        let clus_id = match ClusterId::read_from(r) {
            Ok(v) => v,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let total_subtrees = r.read_u32::<LittleEndian>()?;
        let total_node_num = r.read_u32::<LittleEndian>()?;
        let pulse_score = r.read_f32::<LittleEndian>()?;
        Ok(Some(HierarchyStat {
            clus_id,
            total_subtrees,
            total_node_num,
            pulse_score,
        }))
    }
}

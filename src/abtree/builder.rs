//! AB-tree packing (spec.md §4.6): a depth-first walk that writes each
//! node's fixed header, leaf payload, forward child-offset deltas, and
//! attached summary links, in that order. Child offsets must point later
//! in the file than the parent, so sizes are computed bottom-up first
//! (`subtree_size`) and the actual write is a single top-down pass that
//! already knows where every child will land.
use crate::abtree::record::{AbNodeHeader, SSummaryLink};
use crate::clustering::record::SummaryLink;
use crate::error::Error;
use crate::ids::DocId;
use std::io::Write;

/// One node of the hierarchy being packed. `range` and `level` drive
/// summary-link attachment but are not themselves serialized — the spec
/// treats `subsume_level` as implicit in a node's depth.
pub struct HierarchyNode {
    pub range: (DocId, DocId),
    pub level: u8,
    pub total_node_num: u32,
    pub trav_prob: f32,
    pub leaf: Option<DocId>,
    pub aux: Vec<u8>,
    pub children: Vec<HierarchyNode>,
    pub s_links: Vec<SSummaryLink>,
}

impl HierarchyNode {
    /// Encoded size of this node's own fields, excluding its children's
    /// subtrees.
    fn own_size(&self) -> u64 {
        let mut size = AbNodeHeader::ENCODED_LEN;
        if self.leaf.is_some() {
            size += 5 + 4 + self.aux.len() as u64;
        }
        size += self.children.len() as u64 * 8;
        size += self.s_links.len() as u64 * SSummaryLink::ENCODED_LEN;
        size
    }

    fn subtree_size(&self) -> u64 {
        self.own_size() + self.children.iter().map(HierarchyNode::subtree_size).sum::<u64>()
    }
}

/// Attaches each summary link to the deepest node whose `[start, end)`
/// doc-id range contains `link.src` and whose `level` equals
/// `link.subsume_level` (spec.md §4.6 "Summary-link attachment").
pub fn attach_summary_links(root: &mut HierarchyNode, links: &[SummaryLink]) {
    for link in links {
        attach_one(root, link);
    }
}

fn attach_one(node: &mut HierarchyNode, link: &SummaryLink) -> bool {
    let (start, end) = node.range;
    if !(link.src >= start && link.src < end) {
        return false;
    }
    for child in &mut node.children {
        if attach_one(child, link) {
            return true;
        }
    }
    if node.level == link.subsume_level {
        node.s_links.push(SSummaryLink {
            src: link.src,
            dst: link.dst,
            trav_prob: link.trav_prob,
            is_forward: link.is_forward,
            create_level: link.create_level,
        });
        return true;
    }
    false
}

/// Writes `root` depth-first starting at byte offset `base_pos` in `w`,
/// returning the total bytes written.
pub fn write_hierarchy<W: Write>(node: &HierarchyNode, w: &mut W, base_pos: u64) -> Result<u64, Error> {
    let header = AbNodeHeader {
        child_num: node.children.len() as u16,
        s_link_num: node.s_links.len() as u16,
        total_node_num: node.total_node_num,
        trav_prob: node.trav_prob,
    };
    header.write_to(w)?;

    if let Some(doc_id) = node.leaf {
        doc_id.write_to(w)?;
        w.write_all(&(node.aux.len() as u32).to_le_bytes())?;
        w.write_all(&node.aux)?;
    }

    let own_size = node.own_size();
    let mut child_start = base_pos + own_size;
    let mut child_starts = Vec::with_capacity(node.children.len());
    for child in &node.children {
        child_starts.push(child_start);
        child_start += child.subtree_size();
    }
    for &start in &child_starts {
        let delta = start as i64 - base_pos as i64;
        if delta <= 0 {
            return Err(Error::Mismatch(format!(
                "AB-tree child offset {delta} is not strictly positive"
            )));
        }
        w.write_all(&delta.to_le_bytes())?;
    }

    for link in &node.s_links {
        link.write_to(w)?;
    }

    let mut written = own_size;
    for (child, &start) in node.children.iter().zip(&child_starts) {
        let child_written = write_hierarchy(child, w, start)?;
        written += child_written;
    }
    Ok(written)
}

/// `ab_root.<shard>`: one `(range start, byte offset)` pair per top-level
/// subtree, for the binary-search entry point described in spec.md §4.6.
pub fn build_root_index(roots: &[HierarchyNode]) -> Vec<(DocId, u64)> {
    let mut index = Vec::with_capacity(roots.len());
    let mut pos = 0u64;
    for root in roots {
        index.push((root.range.0, pos));
        pos += root.subtree_size();
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: u64, range_end: u64) -> HierarchyNode {
        HierarchyNode {
            range: (DocId::new(id), DocId::new(range_end)),
            level: 0,
            total_node_num: 1,
            trav_prob: 1.0,
            leaf: Some(DocId::new(id)),
            aux: Vec::new(),
            children: Vec::new(),
            s_links: Vec::new(),
        }
    }

    #[test]
    fn child_offsets_are_positive_and_tree_round_trips_leaf_order() {
        let root = HierarchyNode {
            range: (DocId::new(0), DocId::new(3)),
            level: 1,
            total_node_num: 2,
            trav_prob: 1.0,
            leaf: None,
            aux: Vec::new(),
            children: vec![leaf(0, 1), leaf(1, 2)],
            s_links: Vec::new(),
        };
        let mut buf = Vec::new();
        let written = write_hierarchy(&root, &mut buf, 0).unwrap();
        assert_eq!(written as usize, buf.len());

        // Re-read: header, 2 child offset deltas (8 bytes each, i64 LE).
        let header = AbNodeHeader::read_from(&mut &buf[..]).unwrap();
        assert_eq!(header.child_num, 2);
        let offsets_start = AbNodeHeader::ENCODED_LEN as usize;
        let off0 = i64::from_le_bytes(buf[offsets_start..offsets_start + 8].try_into().unwrap());
        let off1 = i64::from_le_bytes(buf[offsets_start + 8..offsets_start + 16].try_into().unwrap());
        assert!(off0 > 0);
        assert!(off1 > off0);
    }

    #[test]
    fn summary_link_attaches_to_deepest_matching_node() {
        let mut root = HierarchyNode {
            range: (DocId::new(0), DocId::new(4)),
            level: 1,
            total_node_num: 4,
            trav_prob: 1.0,
            leaf: None,
            aux: Vec::new(),
            children: vec![
                HierarchyNode {
                    range: (DocId::new(0), DocId::new(2)),
                    level: 0,
                    total_node_num: 2,
                    trav_prob: 1.0,
                    leaf: None,
                    aux: Vec::new(),
                    children: vec![leaf(0, 1), leaf(1, 2)],
                    s_links: Vec::new(),
                },
                leaf(2, 4),
            ],
            s_links: Vec::new(),
        };
        let link = SummaryLink {
            src: DocId::new(1),
            dst: DocId::new(3),
            create_level: 0,
            subsume_level: 0,
            trav_prob: 0.5,
            is_forward: true,
        };
        attach_summary_links(&mut root, &[link]);
        // src=1 falls in the second leaf's [1,2) range — the deepest node
        // that both contains src and matches subsume_level.
        assert_eq!(root.children[0].children[1].s_links.len(), 1);
        assert!(root.children[0].s_links.is_empty());
        assert!(root.s_links.is_empty());
    }
}

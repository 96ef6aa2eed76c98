//! Random-access AB-tree reads (spec.md §4.6, §4.6.e): binary search the
//! root index, then descend through child offsets, with an LRU page
//! cache fronting repeated reads within a query session.
use crate::abtree::record::AbNodeHeader;
use crate::error::Error;
use crate::ids::DocId;
use lru::LruCache;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::num::NonZeroUsize;
use std::path::Path;

/// A decoded node plus the byte offsets of its children (already resolved
/// to absolute file positions), cached by `(shard, byte_offset)`.
#[derive(Debug, Clone)]
pub struct CachedNode {
    pub header: AbNodeHeader,
    pub leaf: Option<DocId>,
    pub child_offsets: Vec<u64>,
}

pub struct AbTreeReader {
    file: File,
    shard: u32,
    root_index: Vec<(DocId, u64)>,
    cache: LruCache<(u32, u64), CachedNode>,
}

impl AbTreeReader {
    pub fn open(path: &Path, shard: u32, root_index: Vec<(DocId, u64)>, page_count: usize) -> Result<Self, Error> {
        let file = File::open(path)?;
        let cap = NonZeroUsize::new(page_count.max(1)).unwrap();
        Ok(AbTreeReader {
            file,
            shard,
            root_index,
            cache: LruCache::new(cap),
        })
    }

    /// Byte offset of the top-level subtree that may contain `doc_id`,
    /// found by binary search over the root index (spec.md §4.6 "Root
    /// index").
    pub fn root_offset_for(&self, doc_id: DocId) -> Option<u64> {
        match self.root_index.binary_search_by_key(&doc_id, |&(start, _)| start) {
            Ok(i) => Some(self.root_index[i].1),
            Err(0) => None,
            Err(i) => Some(self.root_index[i - 1].1),
        }
    }

    /// Reads and decodes the node at `offset`, serving from the LRU
    /// cache when present.
    pub fn read_node(&mut self, offset: u64) -> Result<CachedNode, Error> {
        let key = (self.shard, offset);
        if let Some(node) = self.cache.get(&key) {
            return Ok(node.clone());
        }
        self.file.seek(SeekFrom::Start(offset))?;
        let header = AbNodeHeader::read_from(&mut self.file)?;
        let leaf = if header.child_num == 0 {
            let doc_id = DocId::read_from(&mut self.file)?;
            let mut len_buf = [0u8; 4];
            self.file.read_exact(&mut len_buf)?;
            let aux_len = u32::from_le_bytes(len_buf);
            let mut aux = vec![0u8; aux_len as usize];
            self.file.read_exact(&mut aux)?;
            Some(doc_id)
        } else {
            None
        };

        let mut child_offsets = Vec::with_capacity(header.child_num as usize);
        for _ in 0..header.child_num {
            let mut delta_buf = [0u8; 8];
            self.file.read_exact(&mut delta_buf)?;
            let delta = i64::from_le_bytes(delta_buf);
            if delta <= 0 {
                return Err(Error::Corrupted(format!(
                    "AB-tree child offset {delta} is not strictly positive"
                )));
            }
            child_offsets.push(offset + delta as u64);
        }

        let node = CachedNode {
            header,
            leaf,
            child_offsets,
        };
        self.cache.put(key, node.clone());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abtree::builder::{write_hierarchy, HierarchyNode};

    #[test]
    fn reads_back_child_offsets_matching_what_was_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ab_tree.0");

        let root = HierarchyNode {
            range: (DocId::new(0), DocId::new(2)),
            level: 0,
            total_node_num: 2,
            trav_prob: 1.0,
            leaf: None,
            aux: Vec::new(),
            children: vec![
                HierarchyNode {
                    range: (DocId::new(0), DocId::new(1)),
                    level: 0,
                    total_node_num: 1,
                    trav_prob: 1.0,
                    leaf: Some(DocId::new(0)),
                    aux: vec![1, 2, 3],
                    children: Vec::new(),
                    s_links: Vec::new(),
                },
                HierarchyNode {
                    range: (DocId::new(1), DocId::new(2)),
                    level: 0,
                    total_node_num: 1,
                    trav_prob: 1.0,
                    leaf: Some(DocId::new(1)),
                    aux: Vec::new(),
                    children: Vec::new(),
                    s_links: Vec::new(),
                },
            ],
            s_links: Vec::new(),
        };

        {
            let mut f = std::fs::File::create(&path).unwrap();
            write_hierarchy(&root, &mut f, 0).unwrap();
        }

        let mut reader = AbTreeReader::open(&path, 0, vec![(DocId::new(0), 0)], 8).unwrap();
        let root_node = reader.read_node(0).unwrap();
        assert_eq!(root_node.child_offsets.len(), 2);
        let first_child = reader.read_node(root_node.child_offsets[0]).unwrap();
        assert_eq!(first_child.leaf, Some(DocId::new(0)));
    }
}

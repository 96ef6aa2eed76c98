/*! Segmented files: `file.<shard>` plus its `file.<shard>.comp_size` side
index. A logical stream is split across shards; each shard is a sequence
of independently block-compressed runs of encoded records, so a reader
can seek to any block boundary without decompressing earlier blocks, and
the dispatch coordinator (§5) can assign block ranges to workers from the
side index alone.
!*/
use crate::error::Error;
use crate::segio::block::{read_block, write_block, CompSizeEntry};
use crate::segio::record::Record;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// Default number of uncompressed record bytes buffered before a block is
/// flushed. Keeping blocks modestly sized lets the coordinator dispatch
/// fine-grained ranges (§4.1: "Blocks are the unit of parallel read
/// dispatch").
pub const DEFAULT_BLOCK_BYTES: usize = 256 * 1024;

fn comp_size_path(data_path: &Path) -> PathBuf {
    append_suffix(data_path, ".comp_size")
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// Path for logical file `name` in shard `shard`, e.g. `base_fin_hit.3`.
pub fn shard_path(dir: &Path, name: &str, shard: u32) -> PathBuf {
    dir.join(format!("{name}.{shard}"))
}

pub struct SegmentWriter<T: Record> {
    data: BufWriter<File>,
    comp_size: BufWriter<File>,
    pending: Vec<u8>,
    block_bytes: usize,
    final_path: PathBuf,
    tmp_data_path: PathBuf,
    tmp_comp_size_path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Record> SegmentWriter<T> {
    pub fn create(path: &Path) -> Result<Self, Error> {
        Self::create_with_block_bytes(path, DEFAULT_BLOCK_BYTES)
    }

    /// Writes go to `<path>.tmp` / `<path>.comp_size.tmp`; [`finish`] renames
    /// both into place atomically, so a worker killed mid-write (§5) never
    /// leaves a half-written shard visible at its final name, and a
    /// respawned worker overwriting the same path is safe.
    pub fn create_with_block_bytes(path: &Path, block_bytes: usize) -> Result<Self, Error> {
        let tmp_data_path = append_suffix(path, ".tmp");
        let tmp_comp_size_path = append_suffix(&comp_size_path(path), ".tmp");
        let data = BufWriter::new(File::create(&tmp_data_path)?);
        let comp_size = BufWriter::new(File::create(&tmp_comp_size_path)?);
        Ok(SegmentWriter {
            data,
            comp_size,
            pending: Vec::with_capacity(block_bytes),
            block_bytes,
            final_path: path.to_path_buf(),
            tmp_data_path,
            tmp_comp_size_path,
            _marker: PhantomData,
        })
    }

    pub fn write_record(&mut self, rec: &T) -> Result<(), Error> {
        rec.write_to(&mut self.pending)?;
        if self.pending.len() >= self.block_bytes {
            self.flush_block()?;
        }
        Ok(())
    }

    fn flush_block(&mut self) -> Result<(), Error> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let header = write_block(&mut self.data, &self.pending)?;
        header.write_to(&mut self.comp_size)?;
        self.pending.clear();
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Error> {
        self.flush_block()?;
        self.data.flush()?;
        self.comp_size.flush()?;
        std::fs::rename(&self.tmp_data_path, &self.final_path)?;
        std::fs::rename(&self.tmp_comp_size_path, comp_size_path(&self.final_path))?;
        Ok(())
    }
}

/// One decompressed block's worth of records, yielded in file order.
struct BlockCursor<T: Record> {
    buf: io::Cursor<Vec<u8>>,
    _marker: PhantomData<T>,
}

pub struct SegmentReader<T: Record> {
    data: BufReader<File>,
    headers: Vec<CompSizeEntry>,
    next_header: usize,
    cursor: Option<BlockCursor<T>>,
}

impl<T: Record> SegmentReader<T> {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let data = BufReader::new(File::open(path)?);
        let headers = read_comp_size(&comp_size_path(path))?;
        Ok(SegmentReader {
            data,
            headers,
            next_header: 0,
            cursor: None,
        })
    }

    /// Block boundaries as byte ranges into the data file, for the
    /// coordinator to slice into per-worker assignments.
    pub fn block_ranges(&self) -> Vec<(u64, u64)> {
        let mut offset = 0u64;
        self.headers
            .iter()
            .map(|h| {
                let start = offset;
                offset += CompSizeEntry::ENCODED_LEN as u64 + h.compressed_len as u64;
                (start, offset)
            })
            .collect()
    }

    fn advance_block(&mut self) -> Result<bool, Error> {
        if self.next_header >= self.headers.len() {
            return Ok(false);
        }
        let bytes = read_block(&mut self.data)?;
        self.next_header += 1;
        self.cursor = Some(BlockCursor {
            buf: io::Cursor::new(bytes),
            _marker: PhantomData,
        });
        Ok(true)
    }
}

impl<T: Record> Iterator for SegmentReader<T> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(cursor) = &mut self.cursor {
                match T::read_from(&mut cursor.buf) {
                    Ok(Some(rec)) => return Some(Ok(rec)),
                    Ok(None) => {
                        self.cursor = None;
                        // fall through to load the next block
                    }
                    Err(e) => return Some(Err(Error::from(e))),
                }
            }
            match self.advance_block() {
                Ok(true) => continue,
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

fn read_comp_size(path: &Path) -> Result<Vec<CompSizeEntry>, Error> {
    let mut f = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    loop {
        match CompSizeEntry::read_from(&mut f) {
            Ok(h) => out.push(h),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e) => return Err(Error::from(e)),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segio::record::U64Key;
    use tempfile::tempdir;

    #[test]
    fn writes_and_reads_back_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("demo.0");
        let mut w = SegmentWriter::<U64Key>::create_with_block_bytes(&path, 16).unwrap();
        for v in 0..100u64 {
            w.write_record(&U64Key(v)).unwrap();
        }
        w.finish().unwrap();

        let r = SegmentReader::<U64Key>::open(&path).unwrap();
        let got: Vec<u64> = r.map(|rec| rec.unwrap().0).collect();
        let want: Vec<u64> = (0..100).collect();
        assert_eq!(got, want);
        // Small block size forces multiple blocks; confirm we actually
        // exercised the multi-block path.
        assert!(SegmentReader::<U64Key>::open(&path)
            .unwrap()
            .block_ranges()
            .len()
            > 1);
    }
}

//! Block-compressed bytes: the unit of parallel read dispatch.
use crate::error::Error;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::{self, Read, Write};

/// One entry of a `.comp_size` side file: lets the dispatcher slice a
/// segment into block ranges without decompressing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompSizeEntry {
    pub compressed_len: u32,
    pub uncompressed_len: u32,
}

impl CompSizeEntry {
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let compressed_len = r.read_u32::<LittleEndian>()?;
        let uncompressed_len = r.read_u32::<LittleEndian>()?;
        Ok(CompSizeEntry {
            compressed_len,
            uncompressed_len,
        })
    }

    pub fn write_to<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.compressed_len)?;
        w.write_u32::<LittleEndian>(self.uncompressed_len)
    }

    /// On-disk size of this header within the data file itself
    /// (the header is duplicated in front of every block, and mirrored
    /// into the side `.comp_size` file).
    pub const ENCODED_LEN: usize = 8;
}

/// Compresses `data` and writes `(header, compressed_bytes)` to `out`,
/// returning the header so the caller can also append it to the
/// `.comp_size` side file.
pub fn write_block<W: Write>(out: &mut W, data: &[u8]) -> io::Result<CompSizeEntry> {
    let mut enc = DeflateEncoder::new(Vec::new(), Compression::fast());
    enc.write_all(data)?;
    let compressed = enc.finish()?;
    let header = CompSizeEntry {
        compressed_len: compressed.len() as u32,
        uncompressed_len: data.len() as u32,
    };
    header.write_to(out)?;
    out.write_all(&compressed)?;
    Ok(header)
}

/// Reads one `(header, compressed_bytes)` pair from `inp` and returns the
/// decompressed payload. Fails with [`Error::Corrupted`] if the header's
/// declared uncompressed length disagrees with the decoded length.
pub fn read_block<R: Read>(inp: &mut R) -> Result<Vec<u8>, Error> {
    let header = CompSizeEntry::read_from(inp)?;
    let mut compressed = vec![0u8; header.compressed_len as usize];
    inp.read_exact(&mut compressed)?;
    let mut decoder = DeflateDecoder::new(&compressed[..]);
    let mut out = Vec::with_capacity(header.uncompressed_len as usize);
    decoder.read_to_end(&mut out)?;
    if out.len() != header.uncompressed_len as usize {
        return Err(Error::Corrupted(format!(
            "block declared {} uncompressed bytes, decoded {}",
            header.uncompressed_len,
            out.len()
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_round_trips() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let mut buf = Vec::new();
        let header = write_block(&mut buf, &data).unwrap();
        assert_eq!(header.uncompressed_len as usize, data.len());
        let back = read_block(&mut &buf[..]).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn corrupted_length_is_detected() {
        let data = b"hello world";
        let mut buf = Vec::new();
        write_block(&mut buf, data).unwrap();
        // Tamper with the declared uncompressed length.
        buf[4] = 0xFF;
        buf[5] = 0xFF;
        let err = read_block(&mut &buf[..]).unwrap_err();
        assert!(matches!(err, Error::Corrupted(_)));
    }
}

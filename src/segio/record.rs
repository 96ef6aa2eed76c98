//! The `data_handler_name` concept (spec.md §4.1) as a Rust trait: a
//! registered record (de)serializer, chosen at the call site by the
//! concrete `T: Record` type rather than by a runtime string.
use std::io::{self, Read, Write};

pub trait Record: Sized {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()>;

    /// Returns `Ok(None)` at a clean end of stream.
    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>>;
}

/// A length-prefixed opaque value: `u32` length followed by raw bytes.
/// Used by handlers whose payload has no fixed width (e.g. posting lists
/// with a variable hit count).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque(pub Vec<u8>);

impl Record for Opaque {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        use byteorder::{LittleEndian, WriteBytesExt};
        w.write_u32::<LittleEndian>(self.0.len() as u32)?;
        w.write_all(&self.0)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        use byteorder::{LittleEndian, ReadBytesExt};
        let len = match r.read_u32::<LittleEndian>() {
            Ok(l) => l,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let mut buf = vec![0u8; len as usize];
        r.read_exact(&mut buf)?;
        Ok(Some(Opaque(buf)))
    }
}

/// A `(key, value)` pair where both sides are themselves `Record`s. This is
/// the shape every shuffle/merge primitive actually moves around: a key
/// used for partitioning/sorting/grouping, and an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRecord<K, V> {
    pub key: K,
    pub value: V,
}

impl<K: Record, V: Record> Record for KeyedRecord<K, V> {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        self.key.write_to(w)?;
        self.value.write_to(w)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        match K::read_from(r)? {
            None => Ok(None),
            Some(key) => {
                let value = V::read_from(r)?.ok_or_else(|| {
                    io::Error::new(io::ErrorKind::UnexpectedEof, "truncated keyed record")
                })?;
                Ok(Some(KeyedRecord { key, value }))
            }
        }
    }
}

/// Fixed-width 8-byte key used by the hash-partition primitives when the
/// caller only needs a numeric key (doc id, word id, ...), matching the
/// "4- or 5-byte key prefix" primitives operate on (spec.md §4.1); we use
/// the full 8 bytes on the wire and mask down where a narrower prefix matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U64Key(pub u64);

impl Record for U64Key {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        use byteorder::{LittleEndian, WriteBytesExt};
        w.write_u64::<LittleEndian>(self.0)
    }

    fn read_from<R: Read>(r: &mut R) -> io::Result<Option<Self>> {
        use byteorder::{LittleEndian, ReadBytesExt};
        match r.read_u64::<LittleEndian>() {
            Ok(v) => Ok(Some(U64Key(v))),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

//! Identifier newtypes.
//!
//! `DocId`, `AssocId` and `ClusterId` are the system's "5-byte" integers:
//! 40 bits stored on disk as 5 raw bytes, held in memory as `u64` with the
//! top 24 bits always zero. `WordId` is a plain 32-bit id.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

/// Mask applied to every 40-bit id to guard against accidental overflow.
pub const FIVE_BYTE_MASK: u64 = 0x00_FF_FF_FF_FF_FF;

/// Bit that a new cluster id sets to stay disjoint from base doc ids
/// during the merge cycles (spec.md §3, `ClusterId`).
pub const CLUSTER_ID_FLAG: u64 = 1 << 39;

macro_rules! five_byte_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub fn new(v: u64) -> Self {
                debug_assert!(v & !FIVE_BYTE_MASK == 0, "{} exceeds 40 bits", stringify!($name));
                $name(v & FIVE_BYTE_MASK)
            }

            pub fn get(self) -> u64 {
                self.0
            }

            pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
                let mut buf = [0u8; 5];
                r.read_exact(&mut buf)?;
                let v = (buf[0] as u64)
                    | (buf[1] as u64) << 8
                    | (buf[2] as u64) << 16
                    | (buf[3] as u64) << 24
                    | (buf[4] as u64) << 32;
                Ok($name(v))
            }

            pub fn write_to<W: Write>(self, w: &mut W) -> io::Result<()> {
                let buf = [
                    (self.0 & 0xFF) as u8,
                    ((self.0 >> 8) & 0xFF) as u8,
                    ((self.0 >> 16) & 0xFF) as u8,
                    ((self.0 >> 24) & 0xFF) as u8,
                    ((self.0 >> 32) & 0xFF) as u8,
                ];
                w.write_all(&buf)
            }
        }

        impl From<u64> for $name {
            fn from(v: u64) -> Self {
                $name::new(v)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }
    };
}

five_byte_id!(DocId);
five_byte_id!(AssocId);
five_byte_id!(ClusterId);

impl ClusterId {
    /// New cluster ids set the high bit to guarantee disjointness from
    /// base doc ids during the merge cycles.
    pub fn from_merge_index(idx: u64) -> Self {
        ClusterId::new((idx & FIVE_BYTE_MASK) | CLUSTER_ID_FLAG)
    }

    pub fn is_synthetic(self) -> bool {
        self.0 & CLUSTER_ID_FLAG != 0
    }
}

/// 32-bit word id, globally unique after lexicon writeback (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WordId(pub u32);

impl WordId {
    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        Ok(WordId(r.read_u32::<LittleEndian>()?))
    }

    pub fn write_to<W: Write>(self, w: &mut W) -> io::Result<()> {
        w.write_u32::<LittleEndian>(self.0)
    }
}

impl From<u32> for WordId {
    fn from(v: u32) -> Self {
        WordId(v)
    }
}
